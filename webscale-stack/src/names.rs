//! Name constants and builders for the web scale set stack
//!
//! Physical names follow `{STACK_ID}-{suffix}`. Gateway sub-resources are
//! cross-referenced by name, so every such name comes from a function here.

/// Prefix shared by every physical resource name
pub const STACK_ID: &str = "webScaleSet";

/// Logical keys resources are referenced by inside the program
pub mod keys {
    pub const RESOURCE_GROUP: &str = "resourceGroup";
    pub const VIRTUAL_NETWORK: &str = "vnet";
    pub const PRIVATE_SUBNET: &str = "privateSubnet";
    pub const PUBLIC_SUBNET: &str = "publicSubnet";
    pub const PUBLIC_IP: &str = "publicIp";
    pub const APPLICATION_GATEWAY: &str = "appGateway";
    pub const SCALE_SET: &str = "scaleSet";
}

/// Stack configuration keys, relative to the project namespace
pub mod config_keys {
    pub const REGION: &str = "region";
    pub const ADDRESS_SPACE: &str = "addressSpace";
    pub const PRIVATE_SUBNET: &str = "privateSubnet";
    pub const PUBLIC_SUBNET: &str = "publicSubnet";
    pub const DNS_PREFIX: &str = "dnsPrefix";
    pub const BACKEND_PORT: &str = "backendPort";
    pub const BACKEND_PROTOCOL: &str = "backendProtocol";
    pub const FRONTEND_PORT: &str = "frontendPort";
    pub const FRONTEND_PROTOCOL: &str = "frontendProtocol";
    pub const INSTANCE_COUNT: &str = "instanceCount";
    pub const ZONES: &str = "zones";
    pub const INSTANCE_SIZE: &str = "instanceSize";
    pub const INSTANCE_NAME_PREFIX: &str = "instanceNamePrefix";
    pub const ADMIN_USER: &str = "adminUser";
    /// Never embedded in the program; read by the engine at apply time
    pub const ADMIN_PASSWORD: &str = "adminPassword";
}

/// Published stack outputs
pub mod outputs {
    /// Public DNS name of the gateway's IP
    pub const PUBLIC_URL: &str = "publicUrl";
}

/// Gateway IP configuration name, shared by the gateway and scale set NICs
pub const IP_CONFIGURATION: &str = "IPConfiguration";

/// Name of the only routing rule
pub const ROUTING_RULE: &str = "Default";

pub const NETWORK_PROFILE: &str = "networkprofile";

pub const SCRIPT_EXTENSION: &str = "IIS-Script-Extension";

/// Physical resource name, e.g. `webScaleSet-rg`
pub fn resource_name(suffix: &str) -> String {
    format!("{STACK_ID}-{suffix}")
}

pub fn frontend_ip_configuration(index: usize) -> String {
    format!("{STACK_ID}-appgw-ipconfig-{index}")
}

pub fn backend_address_pool(index: usize) -> String {
    format!("{STACK_ID}-bepool-{index}")
}

pub fn frontend_port(port: u16) -> String {
    format!("Port{port}")
}

pub fn backend_http_settings(protocol: &str) -> String {
    format!("{protocol}Settings")
}

pub fn http_listener(protocol: &str) -> String {
    format!("{protocol}Listener")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_names_use_stack_prefix() {
        assert_eq!(resource_name("rg"), "webScaleSet-rg");
        assert_eq!(resource_name("privateSubnet"), "webScaleSet-privateSubnet");
        assert_eq!(resource_name("vmss"), "webScaleSet-vmss");
    }

    #[test]
    fn test_gateway_sub_resource_names() {
        assert_eq!(frontend_ip_configuration(0), "webScaleSet-appgw-ipconfig-0");
        assert_eq!(backend_address_pool(0), "webScaleSet-bepool-0");
        assert_eq!(frontend_port(8080), "Port8080");
        assert_eq!(backend_http_settings("HTTP"), "HTTPSettings");
        assert_eq!(http_listener("HTTPS"), "HTTPSListener");
    }
}
