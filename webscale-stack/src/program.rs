//! Rendering a declared [`Stack`] as a Pulumi YAML program
//!
//! The program is the handoff point: `pulumi up` consumes it and owns
//! everything from dependency ordering to state reconciliation.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;
use webscale_models::{Resource, ResourceArgs, ResourceOptions};

use crate::error::RenderError;
use crate::topology::Stack;

pub const RUNTIME: &str = "yaml";

pub const DEFAULT_DESCRIPTION: &str =
    "Windows IIS scale set behind an application gateway on Azure";

/// Output syntax for a rendered program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigDeclaration {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secret: bool,
}

/// A Pulumi YAML program document
#[derive(Debug, Serialize)]
pub struct Program<'a> {
    name: &'a str,
    runtime: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    config: BTreeMap<&'a str, ConfigDeclaration>,
    resources: Resources<'a>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<&'a str, String>,
}

/// Resources keyed by logical key, kept in declaration order
#[derive(Debug)]
struct Resources<'a>(&'a [Resource]);

#[derive(Serialize)]
struct ResourceEntry<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    properties: &'a ResourceArgs,
    #[serde(skip_serializing_if = "ResourceOptions::is_default")]
    options: &'a ResourceOptions,
}

impl Serialize for Resources<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for resource in self.0 {
            map.serialize_entry(
                &resource.key,
                &ResourceEntry {
                    kind: resource.kind().type_token(),
                    name: &resource.name,
                    properties: &resource.args,
                    options: &resource.options,
                },
            )?;
        }
        map.end()
    }
}

impl<'a> Program<'a> {
    pub fn new(stack: &'a Stack) -> Self {
        let config = stack
            .secrets
            .iter()
            .map(|secret| {
                (
                    secret.key.as_str(),
                    ConfigDeclaration {
                        kind: "string".to_string(),
                        secret: true,
                    },
                )
            })
            .collect();
        let outputs = stack
            .outputs
            .iter()
            .map(|(name, reference)| (name.as_str(), reference.to_string()))
            .collect();

        Self {
            name: &stack.project,
            runtime: RUNTIME,
            description: Some(DEFAULT_DESCRIPTION),
            config,
            resources: Resources(&stack.resources),
            outputs,
        }
    }

    pub fn with_description(mut self, description: Option<&'a str>) -> Self {
        self.description = description;
        self
    }

    pub fn to_yaml(&self) -> Result<String, RenderError> {
        let text = serde_yaml::to_string(self)?;
        debug!("Rendered program {} as YAML ({} bytes)", self.name, text.len());
        Ok(text)
    }

    pub fn to_json(&self) -> Result<String, RenderError> {
        let text = serde_json::to_string_pretty(self)?;
        debug!("Rendered program {} as JSON ({} bytes)", self.name, text.len());
        Ok(text)
    }

    pub fn render(&self, format: ProgramFormat) -> Result<String, RenderError> {
        match format {
            ProgramFormat::Yaml => self.to_yaml(),
            ProgramFormat::Json => self.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SecretState, StackSettings};
    use crate::topology::declare;

    fn rendered_json(settings: &StackSettings) -> serde_json::Value {
        let stack = declare("azure-cs-vmss", settings);
        let text = Program::new(&stack).to_json().unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_program_header_and_outputs() {
        let program = rendered_json(&StackSettings::default());

        assert_eq!(program["name"], "azure-cs-vmss");
        assert_eq!(program["runtime"], "yaml");
        assert_eq!(program["config"]["adminPassword"]["type"], "string");
        assert_eq!(program["config"]["adminPassword"]["secret"], true);
        assert_eq!(program["outputs"]["publicUrl"], "${publicIp.fqdn}");
    }

    #[test]
    fn test_resources_keep_declaration_order_in_yaml() {
        let stack = declare("azure-cs-vmss", &StackSettings::default());
        let yaml = Program::new(&stack).to_yaml().unwrap();
        let document: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let keys: Vec<&str> = document["resources"]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|key| key.as_str().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![
                "resourceGroup",
                "vnet",
                "privateSubnet",
                "publicSubnet",
                "publicIp",
                "appGateway",
                "scaleSet",
            ]
        );
    }

    #[test]
    fn test_resource_entries_carry_type_name_and_options() {
        let program = rendered_json(&StackSettings::default());
        let resources = &program["resources"];

        assert_eq!(resources["resourceGroup"]["type"], "azure:core/resourceGroup:ResourceGroup");
        assert_eq!(resources["resourceGroup"]["name"], "webScaleSet-rg");
        assert_eq!(resources["resourceGroup"]["properties"]["location"], "CentralUS");
        assert!(resources["resourceGroup"].get("options").is_none());

        assert_eq!(resources["publicIp"]["options"]["deleteBeforeReplace"], true);
        assert_eq!(resources["publicIp"]["properties"]["domainNameLabel"], "aspnettodo");
        assert_eq!(resources["publicIp"]["properties"]["allocationMethod"], "Dynamic");
    }

    #[test]
    fn test_gateway_properties_render_wiring() {
        let program = rendered_json(&StackSettings::default());
        let gateway = &program["resources"]["appGateway"]["properties"];

        assert_eq!(gateway["resourceGroupName"], "${resourceGroup.name}");
        assert_eq!(gateway["sku"]["name"], "Standard_Small");
        assert_eq!(
            gateway["frontendIpConfigurations"][0]["publicIpAddressId"],
            "${publicIp.id}"
        );
        assert_eq!(gateway["gatewayIpConfigurations"][0]["subnetId"], "${publicSubnet.id}");
        assert_eq!(gateway["frontendPorts"][0]["port"], 80);
        assert_eq!(gateway["requestRoutingRules"][0]["ruleType"], "Basic");
    }

    #[test]
    fn test_scale_set_properties_render_wiring() {
        let program = rendered_json(&StackSettings::default());
        let scale_set = &program["resources"]["scaleSet"]["properties"];

        assert_eq!(scale_set["zones"], serde_json::json!(["1", "2"]));
        assert_eq!(scale_set["sku"]["capacity"], 2);
        assert_eq!(scale_set["osProfile"]["adminPassword"], "${adminPassword}");
        assert_eq!(scale_set["storageProfileOsDisk"]["name"], "");
        assert_eq!(scale_set["osProfileWindowsConfig"]["provisionVmAgent"], true);
        assert_eq!(scale_set["extensions"][0]["type"], "CustomScriptExtension");
        assert_eq!(
            scale_set["networkProfiles"][0]["ipConfigurations"][0]
                ["applicationGatewayBackendAddressPoolIds"][0],
            "${appGateway.backendAddressPools[0].id}"
        );
    }

    #[test]
    fn test_admin_password_never_rendered() {
        let mut settings = StackSettings::default();
        settings.admin_password = SecretState::Plain("correct-horse-battery".to_string());
        let stack = declare("azure-cs-vmss", &settings);

        let yaml = Program::new(&stack).to_yaml().unwrap();
        let json = Program::new(&stack).to_json().unwrap();
        assert!(!yaml.contains("correct-horse-battery"));
        assert!(!json.contains("correct-horse-battery"));
    }

    #[test]
    fn test_yaml_and_json_describe_same_document() {
        let stack = declare("azure-cs-vmss", &StackSettings::default());
        let program = Program::new(&stack).with_description(None);

        let from_yaml: serde_json::Value =
            serde_yaml::from_str(&program.render(ProgramFormat::Yaml).unwrap()).unwrap();
        let from_json: serde_json::Value =
            serde_json::from_str(&program.render(ProgramFormat::Json).unwrap()).unwrap();
        assert_eq!(from_yaml, from_json);
        assert!(from_json.get("description").is_none());
    }

    #[test]
    fn test_literal_interpolation_in_config_is_not_a_reference() {
        let mut settings = StackSettings::default();
        settings.admin_user = "${x}".to_string();
        let stack = declare("azure-cs-vmss", &settings);

        let program = rendered_json(&settings);
        assert_eq!(
            program["resources"]["scaleSet"]["properties"]["osProfile"]["adminUsername"],
            "$${x}"
        );
        assert!(!stack.dependencies("scaleSet").contains("x"));
        assert!(crate::wiring::check(&stack).is_empty());
    }
}
