//! Starter `Pulumi.<stack>.yaml` listing every key with its default

use once_cell::sync::OnceCell;
use serde::Serialize;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use crate::config::defaults;
use crate::error::RenderError;
use crate::names::config_keys;

const TEMPLATE_NAME: &str = "stack-config.yaml";

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

fn templates() -> Result<&'static Tera, RenderError> {
    TEMPLATES.get_or_try_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, include_str!("templates/stack-config.yaml"))?;
        Ok(tera)
    })
}

#[derive(Debug, Serialize)]
struct Entry {
    key: &'static str,
    value: String,
    note: Option<&'static str>,
}

impl Entry {
    fn new(key: &'static str, default: impl ToString) -> Self {
        Self {
            key,
            value: default.to_string(),
            note: None,
        }
    }

    fn note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

fn entries() -> Vec<Entry> {
    vec![
        Entry::new(config_keys::REGION, defaults::REGION),
        Entry::new(config_keys::ADDRESS_SPACE, defaults::ADDRESS_SPACE).note("comma-separated"),
        Entry::new(config_keys::PRIVATE_SUBNET, defaults::PRIVATE_SUBNET),
        Entry::new(config_keys::PUBLIC_SUBNET, defaults::PUBLIC_SUBNET),
        Entry::new(config_keys::DNS_PREFIX, defaults::DNS_PREFIX),
        Entry::new(config_keys::BACKEND_PORT, defaults::BACKEND_PORT),
        Entry::new(config_keys::BACKEND_PROTOCOL, defaults::BACKEND_PROTOCOL),
        Entry::new(config_keys::FRONTEND_PORT, defaults::BACKEND_PORT)
            .note("defaults to backendPort"),
        Entry::new(config_keys::FRONTEND_PROTOCOL, defaults::BACKEND_PROTOCOL)
            .note("defaults to backendProtocol"),
        Entry::new(config_keys::INSTANCE_COUNT, defaults::INSTANCE_COUNT),
        Entry::new(config_keys::ZONES, defaults::ZONES).note("comma-separated"),
        Entry::new(config_keys::INSTANCE_SIZE, defaults::INSTANCE_SIZE),
        Entry::new(config_keys::INSTANCE_NAME_PREFIX, defaults::INSTANCE_NAME_PREFIX),
        Entry::new(config_keys::ADMIN_USER, defaults::ADMIN_USER),
    ]
}

/// Render the starter stack config for `project` and `stack`
pub fn render_stack_config(project: &str, stack: &str) -> Result<String, RenderError> {
    let mut context = TeraContext::new();
    context.insert("project", project);
    context.insert("stack", stack);
    context.insert("admin_password_key", config_keys::ADMIN_PASSWORD);
    context.insert("entries", &entries());

    let rendered = templates()?.render(TEMPLATE_NAME, &context)?;
    debug!("Rendered stack config scaffold for {}/{}", project, stack);
    Ok(rendered)
}

/// Conventional file name for a stack's config
pub fn stack_config_file_name(stack: &str) -> String {
    format!("Pulumi.{stack}.yaml")
}
