//! Argument types for virtual-machine scale sets

use serde::Serialize;

use crate::value::Input;

/// A managed group of identical VM instances
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSetArgs {
    pub resource_group_name: Input<String>,
    pub location: Input<String>,
    /// Availability zones instances are spread across
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Input<String>>,
    pub network_profiles: Vec<NetworkProfile>,
    pub os_profile: OsProfile,
    pub sku: ScaleSetSku,
    pub storage_profile_image_reference: ImageReference,
    pub storage_profile_os_disk: OsDisk,
    /// "Manual", "Automatic" or "Rolling"
    pub upgrade_policy_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_profile_windows_config: Option<WindowsConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub name: String,
    pub primary: bool,
    pub accelerated_networking: bool,
    pub ip_configurations: Vec<IpConfiguration>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    pub name: String,
    pub primary: bool,
    pub subnet_id: Input<String>,
    /// Gateway backend pools the instances register with
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub application_gateway_backend_address_pool_ids: Vec<Input<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    pub admin_username: Input<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<Input<String>>,
    pub computer_name_prefix: Input<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSetSku {
    /// Number of instances
    pub capacity: Input<u32>,
    /// VM size, e.g. "Standard_B1s"
    pub name: Input<String>,
    pub tier: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    pub caching: String,
    pub create_option: String,
    pub managed_disk_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowsConfig {
    pub provision_vm_agent: bool,
}

/// VM extension run on every instance after provisioning
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub name: String,
    pub publisher: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_handler_version: String,
    /// JSON-encoded settings handed to the extension handler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}
