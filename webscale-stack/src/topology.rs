//! Declaration of the web scale set resource graph
//!
//! Resource group, virtual network, private and public subnets, public IP,
//! application gateway, and a scale set registered with the gateway's backend
//! pool. Resources are wired by [`PropertyRef`]; ordering is left to the engine.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::{debug, info};
use webscale_models::*;

use crate::config::{RawConfig, StackSettings};
use crate::error::ConfigError;
use crate::names::{self, config_keys, keys, outputs};

const POWERSHELL_INSTALL_IIS: &str =
    "powershell Add-WindowsFeature Web-Server,Web-Asp-Net45,NET-Framework-Features";

/// Which rendition of the graph to declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackVariant {
    /// Values read from stack configuration with fallback defaults
    #[default]
    Configured,
    /// Hard-coded values, stack configuration is ignored
    Fixed,
}

impl StackVariant {
    pub fn settings(&self, config: &RawConfig) -> Result<StackSettings, ConfigError> {
        match self {
            StackVariant::Configured => StackSettings::from_config(config),
            StackVariant::Fixed => Ok(StackSettings::fixed(config)),
        }
    }
}

/// A declared config variable the engine supplies at apply time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVariable {
    pub key: String,
}

/// The declared resource graph and its published outputs
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub project: String,
    /// Resources in declaration order
    pub resources: Vec<Resource>,
    pub secrets: Vec<SecretVariable>,
    pub outputs: Vec<(String, PropertyRef)>,
}

impl Stack {
    pub fn resource(&self, key: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.key == key)
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.secrets.iter().any(|secret| secret.key == key)
    }

    /// Every reference appearing in a resource's arguments
    pub fn references(&self, key: &str) -> Vec<PropertyRef> {
        let Some(resource) = self.resource(key) else {
            return Vec::new();
        };
        let Ok(properties) = serde_json::to_value(&resource.args) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        collect_references(&properties, &mut found);
        found
    }

    /// Roots the resource's arguments reference: resources or config variables
    pub fn dependencies(&self, key: &str) -> BTreeSet<String> {
        self.references(key)
            .into_iter()
            .map(|reference| reference.root().to_string())
            .collect()
    }
}

fn collect_references(value: &serde_json::Value, found: &mut Vec<PropertyRef>) {
    match value {
        serde_json::Value::String(text) => {
            if let Some(reference) = PropertyRef::parse(text) {
                found.push(reference);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_references(item, found);
            }
        }
        serde_json::Value::Object(fields) => {
            for field in fields.values() {
                collect_references(field, found);
            }
        }
        _ => {}
    }
}

/// Declare the full graph for a project from resolved settings
pub fn declare(project: &str, settings: &StackSettings) -> Stack {
    info!("Declaring web scale set topology for project {}", project);

    let resource_group = Resource::new(
        keys::RESOURCE_GROUP,
        names::resource_name("rg"),
        ResourceArgs::ResourceGroup(ResourceGroupArgs {
            location: settings.region.as_str().into(),
        }),
    );

    let vnet = Resource::new(
        keys::VIRTUAL_NETWORK,
        names::resource_name("vnet"),
        ResourceArgs::VirtualNetwork(VirtualNetworkArgs {
            resource_group_name: resource_group.name_ref().into(),
            address_spaces: settings
                .address_space
                .iter()
                .map(|cidr| cidr.as_str().into())
                .collect(),
        }),
    );

    let private_subnet = subnet(
        keys::PRIVATE_SUBNET,
        "privateSubnet",
        &settings.private_subnet_prefix,
        &resource_group,
        &vnet,
    );
    let public_subnet = subnet(
        keys::PUBLIC_SUBNET,
        "publicSubnet",
        &settings.public_subnet_prefix,
        &resource_group,
        &vnet,
    );

    let public_ip = Resource::new(
        keys::PUBLIC_IP,
        names::resource_name("pip"),
        ResourceArgs::PublicIp(PublicIpArgs {
            resource_group_name: resource_group.name_ref().into(),
            sku: "Basic".to_string(),
            allocation_method: "Dynamic".to_string(),
            domain_name_label: Some(settings.dns_prefix.as_str().into()),
        }),
    )
    .with_options(ResourceOptions {
        delete_before_replace: true,
    });

    let gateway = application_gateway(settings, &resource_group, &public_subnet, &public_ip);
    let scale_set = scale_set(settings, &resource_group, &private_subnet, &gateway);

    let outputs = vec![(outputs::PUBLIC_URL.to_string(), public_ip.output("fqdn"))];
    let resources = vec![
        resource_group,
        vnet,
        private_subnet,
        public_subnet,
        public_ip,
        gateway,
        scale_set,
    ];
    debug!("Declared {} resources", resources.len());

    Stack {
        project: project.to_string(),
        resources,
        secrets: vec![SecretVariable {
            key: config_keys::ADMIN_PASSWORD.to_string(),
        }],
        outputs,
    }
}

fn subnet(
    key: &str,
    suffix: &str,
    prefix: &str,
    resource_group: &Resource,
    vnet: &Resource,
) -> Resource {
    Resource::new(
        key,
        names::resource_name(suffix),
        ResourceArgs::Subnet(SubnetArgs {
            resource_group_name: resource_group.name_ref().into(),
            address_prefix: prefix.into(),
            virtual_network_name: vnet.name_ref().into(),
        }),
    )
}

fn application_gateway(
    settings: &StackSettings,
    resource_group: &Resource,
    public_subnet: &Resource,
    public_ip: &Resource,
) -> Resource {
    let frontend_ip_name = names::frontend_ip_configuration(0);
    let frontend_port_name = names::frontend_port(settings.frontend_port);
    let pool_name = names::backend_address_pool(0);
    let settings_name = names::backend_http_settings(&settings.backend_protocol);
    let listener_name = names::http_listener(&settings.frontend_protocol);

    let args = ApplicationGatewayArgs {
        resource_group_name: resource_group.name_ref().into(),
        sku: ApplicationGatewaySku {
            tier: "Standard".to_string(),
            name: "Standard_Small".to_string(),
            capacity: 1,
        },
        frontend_ip_configurations: vec![FrontendIpConfiguration {
            name: frontend_ip_name.clone(),
            public_ip_address_id: Some(public_ip.id().into()),
        }],
        frontend_ports: vec![FrontendPort {
            name: frontend_port_name.clone(),
            port: settings.frontend_port.into(),
        }],
        backend_address_pools: vec![BackendAddressPool {
            name: pool_name.clone(),
        }],
        backend_http_settings: vec![BackendHttpSettings {
            name: settings_name.clone(),
            protocol: settings.backend_protocol.as_str().into(),
            port: settings.backend_port.into(),
            cookie_based_affinity: "Disabled".to_string(),
        }],
        gateway_ip_configurations: vec![GatewayIpConfiguration {
            name: names::IP_CONFIGURATION.to_string(),
            subnet_id: public_subnet.id().into(),
        }],
        http_listeners: vec![HttpListener {
            name: listener_name.clone(),
            protocol: settings.frontend_protocol.as_str().into(),
            frontend_ip_configuration_name: frontend_ip_name,
            frontend_port_name,
        }],
        request_routing_rules: vec![RequestRoutingRule {
            name: names::ROUTING_RULE.to_string(),
            backend_address_pool_name: pool_name,
            http_listener_name: listener_name,
            rule_type: "Basic".to_string(),
            backend_http_settings_name: settings_name,
        }],
    };

    Resource::new(
        keys::APPLICATION_GATEWAY,
        names::resource_name("appgw"),
        ResourceArgs::ApplicationGateway(Box::new(args)),
    )
}

fn scale_set(
    settings: &StackSettings,
    resource_group: &Resource,
    private_subnet: &Resource,
    gateway: &Resource,
) -> Resource {
    let backend_pool_id = gateway
        .output("backendAddressPools")
        .index(0)
        .field("id");
    let script_settings = json!({ "commandToExecute": POWERSHELL_INSTALL_IIS }).to_string();

    let args = ScaleSetArgs {
        resource_group_name: resource_group.name_ref().into(),
        location: resource_group.output("location").into(),
        zones: settings
            .zones
            .iter()
            .map(|zone| zone.as_str().into())
            .collect(),
        network_profiles: vec![NetworkProfile {
            name: names::NETWORK_PROFILE.to_string(),
            primary: true,
            accelerated_networking: false,
            ip_configurations: vec![IpConfiguration {
                name: names::IP_CONFIGURATION.to_string(),
                primary: true,
                subnet_id: private_subnet.id().into(),
                application_gateway_backend_address_pool_ids: vec![backend_pool_id.into()],
            }],
        }],
        os_profile: OsProfile {
            admin_username: settings.admin_user.as_str().into(),
            admin_password: Some(PropertyRef::new(config_keys::ADMIN_PASSWORD).into()),
            computer_name_prefix: settings.instance_name_prefix.as_str().into(),
        },
        sku: ScaleSetSku {
            capacity: settings.instance_count.into(),
            name: settings.instance_size.as_str().into(),
            tier: "Standard".to_string(),
        },
        storage_profile_image_reference: ImageReference {
            publisher: "MicrosoftWindowsServer".to_string(),
            offer: "WindowsServer".to_string(),
            sku: "2019-Datacenter-Core".to_string(),
            version: "latest".to_string(),
        },
        storage_profile_os_disk: OsDisk {
            caching: "ReadWrite".to_string(),
            create_option: "FromImage".to_string(),
            managed_disk_type: "Standard_LRS".to_string(),
            name: String::new(),
        },
        upgrade_policy_mode: "Automatic".to_string(),
        os_profile_windows_config: Some(WindowsConfig {
            provision_vm_agent: true,
        }),
        extensions: vec![Extension {
            name: names::SCRIPT_EXTENSION.to_string(),
            publisher: "Microsoft.Compute".to_string(),
            kind: "CustomScriptExtension".to_string(),
            type_handler_version: "1.4".to_string(),
            settings: Some(script_settings),
        }],
    };

    Resource::new(
        keys::SCALE_SET,
        names::resource_name("vmss"),
        ResourceArgs::ScaleSet(Box::new(args)),
    )
}
