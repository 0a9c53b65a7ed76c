//! Advisory checks over a declared graph
//!
//! The engine is the authority on validity. These checks catch the wiring
//! mistakes it would only report at apply time: references to undeclared
//! roots, out-of-range list indices, and gateway sub-resources bound by a
//! name that matches nothing.

use std::collections::BTreeSet;
use std::fmt;

use webscale_models::{ApplicationGatewayArgs, PathSegment, PropertyRef, ResourceArgs};

use crate::topology::Stack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringIssue {
    pub severity: Severity,
    /// Logical key of the resource the issue was found in
    pub resource: String,
    pub message: String,
}

impl WiringIssue {
    fn error(resource: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            resource: resource.to_string(),
            message,
        }
    }

    fn warning(resource: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            resource: resource.to_string(),
            message,
        }
    }
}

impl fmt::Display for WiringIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.severity, self.resource, self.message)
    }
}

/// Run every check over the stack
pub fn check(stack: &Stack) -> Vec<WiringIssue> {
    let mut issues = Vec::new();

    let mut seen = BTreeSet::new();
    for resource in &stack.resources {
        if !seen.insert(resource.key.as_str()) {
            issues.push(WiringIssue::error(
                &resource.key,
                "logical key is declared more than once".to_string(),
            ));
        }
    }

    for resource in &stack.resources {
        for reference in stack.references(&resource.key) {
            if let Some(issue) = check_reference(stack, &resource.key, &reference) {
                issues.push(issue);
            }
        }
        if let ResourceArgs::ApplicationGateway(gateway) = &resource.args {
            check_gateway(&resource.key, gateway, &mut issues);
        }
    }

    for (name, reference) in &stack.outputs {
        if let Some(issue) = check_reference(stack, &format!("outputs.{name}"), reference) {
            issues.push(issue);
        }
    }

    issues
}

pub fn has_errors(issues: &[WiringIssue]) -> bool {
    issues.iter().any(|issue| issue.severity == Severity::Error)
}

fn check_reference(stack: &Stack, owner: &str, reference: &PropertyRef) -> Option<WiringIssue> {
    if stack.is_secret(reference.root()) {
        return (!reference.path().is_empty()).then(|| {
            WiringIssue::error(
                owner,
                format!("{reference} reads a property of config variable '{}'", reference.root()),
            )
        });
    }

    let Some(target) = stack.resource(reference.root()) else {
        return Some(WiringIssue::error(
            owner,
            format!("{reference} refers to undeclared '{}'", reference.root()),
        ));
    };
    if target.key == owner {
        return Some(WiringIssue::error(owner, format!("{reference} refers to itself")));
    }

    // Only list indices into declared inputs can be verified; outputs such as
    // `id` or `fqdn` exist only after apply.
    let properties = serde_json::to_value(&target.args).ok()?;
    let mut current = &properties;
    for segment in reference.path() {
        match segment {
            PathSegment::Field(name) => match current.get(name) {
                Some(next) => current = next,
                None => return None,
            },
            PathSegment::Index(index) => {
                let items = current.as_array()?;
                match items.get(*index) {
                    Some(next) => current = next,
                    None => {
                        return Some(WiringIssue::error(
                            owner,
                            format!(
                                "{reference} indexes past the {} declared entries",
                                items.len()
                            ),
                        ))
                    }
                }
            }
        }
    }
    None
}

fn check_gateway(owner: &str, gateway: &ApplicationGatewayArgs, issues: &mut Vec<WiringIssue>) {
    let frontend_ips = unique_names(
        owner,
        "frontend IP configuration",
        gateway.frontend_ip_configurations.iter().map(|c| c.name.as_str()),
        issues,
    );
    let ports = unique_names(
        owner,
        "frontend port",
        gateway.frontend_ports.iter().map(|p| p.name.as_str()),
        issues,
    );
    let pools = unique_names(
        owner,
        "backend address pool",
        gateway.backend_address_pools.iter().map(|p| p.name.as_str()),
        issues,
    );
    let settings = unique_names(
        owner,
        "backend HTTP settings",
        gateway.backend_http_settings.iter().map(|s| s.name.as_str()),
        issues,
    );
    let listeners = unique_names(
        owner,
        "HTTP listener",
        gateway.http_listeners.iter().map(|l| l.name.as_str()),
        issues,
    );
    unique_names(
        owner,
        "request routing rule",
        gateway.request_routing_rules.iter().map(|r| r.name.as_str()),
        issues,
    );

    for listener in &gateway.http_listeners {
        let from = format!("listener '{}'", listener.name);
        require_declared(
            issues,
            owner,
            &from,
            "frontend IP configuration",
            &listener.frontend_ip_configuration_name,
            &frontend_ips,
        );
        require_declared(
            issues,
            owner,
            &from,
            "frontend port",
            &listener.frontend_port_name,
            &ports,
        );
    }
    for rule in &gateway.request_routing_rules {
        let from = format!("routing rule '{}'", rule.name);
        require_declared(
            issues,
            owner,
            &from,
            "HTTP listener",
            &rule.http_listener_name,
            &listeners,
        );
        require_declared(
            issues,
            owner,
            &from,
            "backend address pool",
            &rule.backend_address_pool_name,
            &pools,
        );
        require_declared(
            issues,
            owner,
            &from,
            "backend HTTP settings",
            &rule.backend_http_settings_name,
            &settings,
        );
    }

    if gateway.request_routing_rules.is_empty() {
        issues.push(WiringIssue::warning(
            owner,
            "no request routing rules; traffic is never forwarded".to_string(),
        ));
    }
}

fn require_declared(
    issues: &mut Vec<WiringIssue>,
    owner: &str,
    from: &str,
    kind: &str,
    name: &str,
    declared: &BTreeSet<&str>,
) {
    if !declared.contains(name) {
        issues.push(WiringIssue::error(
            owner,
            format!("{from} refers to {kind} '{name}' which is not declared"),
        ));
    }
}

fn unique_names<'a>(
    owner: &str,
    kind: &str,
    names: impl Iterator<Item = &'a str>,
    issues: &mut Vec<WiringIssue>,
) -> BTreeSet<&'a str> {
    let mut declared = BTreeSet::new();
    for name in names {
        if !declared.insert(name) {
            issues.push(WiringIssue::error(
                owner,
                format!("{kind} '{name}' is declared more than once"),
            ));
        }
    }
    declared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackSettings;
    use crate::names::keys;
    use crate::topology::declare;

    fn default_stack() -> Stack {
        declare("azure-cs-vmss", &StackSettings::default())
    }

    fn gateway_mut(stack: &mut Stack) -> &mut ApplicationGatewayArgs {
        let resource = stack
            .resources
            .iter_mut()
            .find(|r| r.key == keys::APPLICATION_GATEWAY)
            .unwrap();
        match &mut resource.args {
            ResourceArgs::ApplicationGateway(args) => &mut **args,
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn test_declared_stack_is_clean() {
        assert_eq!(check(&default_stack()), Vec::new());
    }

    #[test]
    fn test_mismatched_listener_name_is_flagged() {
        let mut stack = default_stack();
        gateway_mut(&mut stack).request_routing_rules[0].http_listener_name =
            "HTTPSListener".to_string();

        let issues = check(&stack);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].resource, "appGateway");
        assert!(issues[0].message.contains("HTTPSListener"));
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_mismatched_port_and_pool_names_are_flagged() {
        let mut stack = default_stack();
        let gateway = gateway_mut(&mut stack);
        gateway.http_listeners[0].frontend_port_name = "Port8080".to_string();
        gateway.request_routing_rules[0].backend_address_pool_name = "bepool".to_string();

        let messages: Vec<String> = check(&stack).into_iter().map(|i| i.message).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("frontend port 'Port8080'")));
        assert!(messages.iter().any(|m| m.contains("backend address pool 'bepool'")));
    }

    #[test]
    fn test_duplicate_sub_resource_names_are_flagged() {
        let mut stack = default_stack();
        let gateway = gateway_mut(&mut stack);
        let pool = gateway.backend_address_pools[0].clone();
        gateway.backend_address_pools.push(pool);

        let issues = check(&stack);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("declared more than once"));
    }

    #[test]
    fn test_backend_pool_index_out_of_range_is_flagged() {
        let mut stack = default_stack();
        let resource = stack
            .resources
            .iter_mut()
            .find(|r| r.key == keys::SCALE_SET)
            .unwrap();
        if let ResourceArgs::ScaleSet(args) = &mut resource.args {
            args.network_profiles[0].ip_configurations[0]
                .application_gateway_backend_address_pool_ids = vec![PropertyRef::new("appGateway")
                .field("backendAddressPools")
                .index(1)
                .field("id")
                .into()];
        }

        let issues = check(&stack);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].resource, "scaleSet");
        assert!(issues[0].message.contains("indexes past the 1 declared entries"));
    }

    #[test]
    fn test_undeclared_root_is_flagged() {
        let mut stack = default_stack();
        stack.resources.retain(|r| r.key != keys::VIRTUAL_NETWORK);

        let issues = check(&stack);
        // both subnets name the removed network
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.message.contains("undeclared 'vnet'")));
    }

    #[test]
    fn test_output_reference_is_checked() {
        let mut stack = default_stack();
        stack.outputs.push(("broken".to_string(), PropertyRef::new("nowhere").field("id")));

        let issues = check(&stack);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].resource, "outputs.broken");
    }

    #[test]
    fn test_missing_routing_rules_is_a_warning() {
        let mut stack = default_stack();
        gateway_mut(&mut stack).request_routing_rules.clear();

        let issues = check(&stack);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!has_errors(&issues));
    }
}
