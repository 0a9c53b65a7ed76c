//! Typed resource declarations for the web scale set topology
//!
//! Every resource is a logical key, a physical name, provider arguments, and
//! options. Cross-resource wiring goes through [`PropertyRef`] values that the
//! provisioning engine resolves at apply time.

use serde::Serialize;

pub mod compute;
pub mod network;
pub mod value;

pub use compute::*;
pub use network::*;
pub use value::{escape_interpolation, Input, Literal, PathSegment, PropertyRef};

/// Kind of a declared resource, with its provider type token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ResourceGroup,
    VirtualNetwork,
    Subnet,
    PublicIp,
    ApplicationGateway,
    ScaleSet,
}

impl ResourceKind {
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceKind::ResourceGroup => "azure:core/resourceGroup:ResourceGroup",
            ResourceKind::VirtualNetwork => "azure:network/virtualNetwork:VirtualNetwork",
            ResourceKind::Subnet => "azure:network/subnet:Subnet",
            ResourceKind::PublicIp => "azure:network/publicIp:PublicIp",
            ResourceKind::ApplicationGateway => {
                "azure:network/applicationGateway:ApplicationGateway"
            }
            ResourceKind::ScaleSet => "azure:compute/scaleSet:ScaleSet",
        }
    }
}

/// Provider arguments for one resource
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceArgs {
    ResourceGroup(ResourceGroupArgs),
    VirtualNetwork(VirtualNetworkArgs),
    Subnet(SubnetArgs),
    PublicIp(PublicIpArgs),
    ApplicationGateway(Box<ApplicationGatewayArgs>),
    ScaleSet(Box<ScaleSetArgs>),
}

impl ResourceArgs {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceArgs::ResourceGroup(_) => ResourceKind::ResourceGroup,
            ResourceArgs::VirtualNetwork(_) => ResourceKind::VirtualNetwork,
            ResourceArgs::Subnet(_) => ResourceKind::Subnet,
            ResourceArgs::PublicIp(_) => ResourceKind::PublicIp,
            ResourceArgs::ApplicationGateway(_) => ResourceKind::ApplicationGateway,
            ResourceArgs::ScaleSet(_) => ResourceKind::ScaleSet,
        }
    }
}

/// Engine-side options attached to a resource
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOptions {
    /// Delete the old resource before creating its replacement
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delete_before_replace: bool,
}

impl ResourceOptions {
    pub fn is_default(&self) -> bool {
        self == &ResourceOptions::default()
    }
}

/// A declared resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Logical key other resources reference this one by
    pub key: String,
    /// Physical name handed to the engine
    pub name: String,
    pub args: ResourceArgs,
    pub options: ResourceOptions,
}

impl Resource {
    pub fn new(key: impl Into<String>, name: impl Into<String>, args: ResourceArgs) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            args,
            options: ResourceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResourceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.args.kind()
    }

    /// Reference to one of this resource's properties
    pub fn output(&self, property: &str) -> PropertyRef {
        PropertyRef::new(self.key.as_str()).field(property)
    }

    pub fn id(&self) -> PropertyRef {
        self.output("id")
    }

    pub fn name_ref(&self) -> PropertyRef {
        self.output("name")
    }
}
