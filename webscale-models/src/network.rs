//! Argument types for resource groups and networking resources
//!
//! Field names serialize to the Azure provider's camelCase property names.

use serde::Serialize;

use crate::value::Input;

// ============================================================================
// Resource Group
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupArgs {
    /// Azure region all other resources are scoped to
    pub location: Input<String>,
}

// ============================================================================
// Virtual Network and Subnets
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkArgs {
    pub resource_group_name: Input<String>,
    /// CIDR blocks owned by the network
    pub address_spaces: Vec<Input<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetArgs {
    pub resource_group_name: Input<String>,
    /// CIDR carved from the parent network's address space
    pub address_prefix: Input<String>,
    pub virtual_network_name: Input<String>,
}

// ============================================================================
// Public IP
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpArgs {
    pub resource_group_name: Input<String>,
    /// "Basic" or "Standard"
    pub sku: String,
    /// "Static" or "Dynamic"
    pub allocation_method: String,
    /// DNS label, yields `<label>.<region>.cloudapp.azure.com`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<Input<String>>,
}

// ============================================================================
// Application Gateway
// ============================================================================

/// Layer-7 load balancer routing HTTP traffic to backend pools
///
/// Listeners, pools, and settings refer to each other by name, not by typed
/// reference. A name that matches nothing is only rejected by the provider.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGatewayArgs {
    pub resource_group_name: Input<String>,
    pub sku: ApplicationGatewaySku,
    pub frontend_ip_configurations: Vec<FrontendIpConfiguration>,
    pub frontend_ports: Vec<FrontendPort>,
    pub backend_address_pools: Vec<BackendAddressPool>,
    pub backend_http_settings: Vec<BackendHttpSettings>,
    pub gateway_ip_configurations: Vec<GatewayIpConfiguration>,
    pub http_listeners: Vec<HttpListener>,
    pub request_routing_rules: Vec<RequestRoutingRule>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGatewaySku {
    pub tier: String,
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfiguration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_address_id: Option<Input<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendPort {
    pub name: String,
    pub port: Input<u16>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddressPool {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendHttpSettings {
    pub name: String,
    /// "HTTP" or "HTTPS"
    pub protocol: Input<String>,
    pub port: Input<u16>,
    /// "Enabled" or "Disabled"
    pub cookie_based_affinity: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayIpConfiguration {
    pub name: String,
    pub subnet_id: Input<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpListener {
    pub name: String,
    pub protocol: Input<String>,
    /// Name of an entry in `frontend_ip_configurations`
    pub frontend_ip_configuration_name: String,
    /// Name of an entry in `frontend_ports`
    pub frontend_port_name: String,
}

/// Binds a listener to a backend pool and its HTTP settings, all by name
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestRoutingRule {
    pub name: String,
    pub backend_address_pool_name: String,
    pub http_listener_name: String,
    /// "Basic" or "PathBasedRouting"
    pub rule_type: String,
    pub backend_http_settings_name: String,
}
