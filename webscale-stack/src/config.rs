//! Stack configuration: raw values from a `Pulumi.<stack>.yaml` file and the
//! resolved settings the topology is declared from

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::names::config_keys;

/// Fallback values applied when a key is absent
pub mod defaults {
    pub const REGION: &str = "CentralUS";
    pub const ADDRESS_SPACE: &str = "10.0.0.0/16";
    pub const PRIVATE_SUBNET: &str = "10.0.2.0/24";
    pub const PUBLIC_SUBNET: &str = "10.0.1.0/24";
    pub const DNS_PREFIX: &str = "aspnettodo";
    pub const BACKEND_PORT: u16 = 80;
    pub const BACKEND_PROTOCOL: &str = "HTTP";
    pub const INSTANCE_COUNT: u32 = 2;
    pub const ZONES: &str = "1,2";
    pub const INSTANCE_SIZE: &str = "Standard_B1s";
    pub const INSTANCE_NAME_PREFIX: &str = "web";
    pub const ADMIN_USER: &str = "webadmin";
}

/// A single stack config value as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Plain(String),
    /// Ciphertext only the provisioning engine can decrypt
    Secure(String),
}

#[derive(Debug, Default, Deserialize)]
struct StackFile {
    #[serde(default)]
    config: Option<BTreeMap<String, serde_yaml::Value>>,
}

/// Config values in one project namespace, keyed without the namespace prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConfig {
    project: String,
    values: BTreeMap<String, ConfigValue>,
}

impl RawConfig {
    pub fn empty(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            values: BTreeMap::new(),
        }
    }

    /// Parse the contents of a stack config file
    pub fn from_yaml_str(project: impl Into<String>, text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::empty(project);
        let file: StackFile = if text.trim().is_empty() {
            StackFile::default()
        } else {
            serde_yaml::from_str(text)?
        };

        for (qualified, value) in file.config.unwrap_or_default() {
            let Some(key) = config.local_key(&qualified) else {
                debug!("Ignoring config key {} outside project namespace", qualified);
                continue;
            };
            let key = key.to_string();
            match value {
                serde_yaml::Value::Null => {}
                serde_yaml::Value::String(text) => config.set(key, ConfigValue::Plain(text)),
                serde_yaml::Value::Number(number) => {
                    config.set(key, ConfigValue::Plain(number.to_string()))
                }
                serde_yaml::Value::Bool(flag) => {
                    config.set(key, ConfigValue::Plain(flag.to_string()))
                }
                serde_yaml::Value::Mapping(mapping) => {
                    match mapping.get("secure").and_then(|v| v.as_str()) {
                        Some(ciphertext) if mapping.len() == 1 => {
                            config.set(key, ConfigValue::Secure(ciphertext.to_string()))
                        }
                        _ => return Err(ConfigError::UnsupportedValue { key }),
                    }
                }
                _ => return Err(ConfigError::UnsupportedValue { key }),
            }
        }

        Ok(config)
    }

    /// Load a stack config file. A missing file is an empty configuration.
    pub fn load(project: impl Into<String>, path: &Path) -> Result<Self, ConfigError> {
        let project = project.into();
        if !path.exists() {
            info!("No stack config at {}, using defaults", path.display());
            return Ok(Self::empty(project));
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(project, &text)?;
        debug!("Loaded {} config value(s) from {}", config.values.len(), path.display());
        Ok(config)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    /// Apply a `key=value` override on top of the file's values
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
        let key = self
            .local_key(key.trim())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?
            .to_string();
        self.set(key, ConfigValue::Plain(value.to_string()));
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Read a plain string value
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Plain(value)) => Ok(Some(value.clone())),
            Some(ConfigValue::Secure(_)) => Err(ConfigError::EncryptedValue {
                key: key.to_string(),
            }),
        }
    }

    /// Read a non-negative integer that must fit `T`
    pub fn get_int<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
    {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidInteger {
                key: key.to_string(),
                value,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Read a comma-separated list; entries are trimmed and empty ones dropped
    pub fn get_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        Ok(self.get(key)?.map(|value| split_list(&value)))
    }

    /// Strip the project namespace from a key; bare keys belong to the project
    fn local_key<'a>(&self, qualified: &'a str) -> Option<&'a str> {
        match qualified.split_once(':') {
            Some((namespace, key)) if namespace == self.project => Some(key),
            Some(_) => None,
            None => Some(qualified),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// How the admin password is provided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretState {
    Unset,
    Plain(String),
    Encrypted,
}

impl SecretState {
    fn from_config(config: &RawConfig, key: &str) -> Self {
        match config.raw(key) {
            None => SecretState::Unset,
            Some(ConfigValue::Plain(value)) => SecretState::Plain(value.clone()),
            Some(ConfigValue::Secure(_)) => SecretState::Encrypted,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, SecretState::Unset)
    }
}

/// Fully resolved values the topology is declared from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    pub region: String,
    pub address_space: Vec<String>,
    pub private_subnet_prefix: String,
    pub public_subnet_prefix: String,
    pub dns_prefix: String,
    pub backend_port: u16,
    pub backend_protocol: String,
    pub frontend_port: u16,
    pub frontend_protocol: String,
    pub instance_count: u32,
    pub zones: Vec<String>,
    pub instance_size: String,
    pub instance_name_prefix: String,
    pub admin_user: String,
    pub admin_password: SecretState,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            region: defaults::REGION.to_string(),
            address_space: split_list(defaults::ADDRESS_SPACE),
            private_subnet_prefix: defaults::PRIVATE_SUBNET.to_string(),
            public_subnet_prefix: defaults::PUBLIC_SUBNET.to_string(),
            dns_prefix: defaults::DNS_PREFIX.to_string(),
            backend_port: defaults::BACKEND_PORT,
            backend_protocol: defaults::BACKEND_PROTOCOL.to_string(),
            frontend_port: defaults::BACKEND_PORT,
            frontend_protocol: defaults::BACKEND_PROTOCOL.to_string(),
            instance_count: defaults::INSTANCE_COUNT,
            zones: split_list(defaults::ZONES),
            instance_size: defaults::INSTANCE_SIZE.to_string(),
            instance_name_prefix: defaults::INSTANCE_NAME_PREFIX.to_string(),
            admin_user: defaults::ADMIN_USER.to_string(),
            admin_password: SecretState::Unset,
        }
    }
}

impl StackSettings {
    /// Resolve every key, falling back to its default when absent
    pub fn from_config(config: &RawConfig) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| -> Result<String, ConfigError> {
            Ok(config.get(key)?.unwrap_or_else(|| default.to_string()))
        };
        let list = |key: &str, default: &str| -> Result<Vec<String>, ConfigError> {
            Ok(config
                .get_list(key)?
                .unwrap_or_else(|| split_list(default)))
        };

        let backend_port = config
            .get_int::<u16>(config_keys::BACKEND_PORT)?
            .unwrap_or(defaults::BACKEND_PORT);
        let backend_protocol = text(config_keys::BACKEND_PROTOCOL, defaults::BACKEND_PROTOCOL)?;
        let frontend_port = config
            .get_int::<u16>(config_keys::FRONTEND_PORT)?
            .unwrap_or(backend_port);
        let frontend_protocol = text(config_keys::FRONTEND_PROTOCOL, &backend_protocol)?;

        Ok(Self {
            region: text(config_keys::REGION, defaults::REGION)?,
            address_space: list(config_keys::ADDRESS_SPACE, defaults::ADDRESS_SPACE)?,
            private_subnet_prefix: text(config_keys::PRIVATE_SUBNET, defaults::PRIVATE_SUBNET)?,
            public_subnet_prefix: text(config_keys::PUBLIC_SUBNET, defaults::PUBLIC_SUBNET)?,
            dns_prefix: text(config_keys::DNS_PREFIX, defaults::DNS_PREFIX)?,
            backend_port,
            backend_protocol,
            frontend_port,
            frontend_protocol,
            instance_count: config
                .get_int::<u32>(config_keys::INSTANCE_COUNT)?
                .unwrap_or(defaults::INSTANCE_COUNT),
            zones: list(config_keys::ZONES, defaults::ZONES)?,
            instance_size: text(config_keys::INSTANCE_SIZE, defaults::INSTANCE_SIZE)?,
            instance_name_prefix: text(
                config_keys::INSTANCE_NAME_PREFIX,
                defaults::INSTANCE_NAME_PREFIX,
            )?,
            admin_user: text(config_keys::ADMIN_USER, defaults::ADMIN_USER)?,
            admin_password: SecretState::from_config(config, config_keys::ADMIN_PASSWORD),
        })
    }

    /// Hard-coded values, only the admin password state comes from config
    pub fn fixed(config: &RawConfig) -> Self {
        Self {
            admin_password: SecretState::from_config(config, config_keys::ADMIN_PASSWORD),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "azure-cs-vmss";

    #[test]
    fn test_defaults_apply_when_config_absent() {
        let settings = StackSettings::from_config(&RawConfig::empty(PROJECT)).unwrap();

        assert_eq!(settings, StackSettings::default());
        assert_eq!(settings.region, "CentralUS");
        assert_eq!(settings.address_space, vec!["10.0.0.0/16"]);
        assert_eq!(settings.zones, vec!["1", "2"]);
        assert_eq!(settings.backend_port, 80);
        assert_eq!(settings.frontend_port, 80);
        assert_eq!(settings.frontend_protocol, "HTTP");
        assert_eq!(settings.instance_count, 2);
        assert_eq!(settings.admin_password, SecretState::Unset);
    }

    #[test]
    fn test_frontend_falls_back_to_backend_values() {
        let yaml = r#"
config:
  azure-cs-vmss:backendPort: "8080"
  azure-cs-vmss:backendProtocol: HTTPS
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();
        let settings = StackSettings::from_config(&config).unwrap();

        assert_eq!(settings.backend_port, 8080);
        assert_eq!(settings.frontend_port, 8080);
        assert_eq!(settings.backend_protocol, "HTTPS");
        assert_eq!(settings.frontend_protocol, "HTTPS");
    }

    #[test]
    fn test_explicit_frontend_overrides_fallback() {
        let yaml = r#"
config:
  azure-cs-vmss:backendPort: 8080
  azure-cs-vmss:frontendPort: 443
  azure-cs-vmss:frontendProtocol: HTTPS
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();
        let settings = StackSettings::from_config(&config).unwrap();

        assert_eq!(settings.backend_port, 8080);
        assert_eq!(settings.frontend_port, 443);
        assert_eq!(settings.backend_protocol, "HTTP");
        assert_eq!(settings.frontend_protocol, "HTTPS");
    }

    #[test]
    fn test_lists_split_on_commas() {
        let yaml = r#"
config:
  azure-cs-vmss:addressSpace: "10.0.0.0/16, 10.1.0.0/16"
  azure-cs-vmss:zones: "1,2,3,"
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();
        let settings = StackSettings::from_config(&config).unwrap();

        assert_eq!(settings.address_space, vec!["10.0.0.0/16", "10.1.0.0/16"]);
        assert_eq!(settings.zones, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_other_namespaces_are_ignored() {
        let yaml = r#"
encryptionsalt: v1:abc
config:
  azure:location: westeurope
  other-project:region: EastUS
  azure-cs-vmss:region: WestUS2
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();

        assert!(!config.contains("location"));
        assert_eq!(config.get("region").unwrap().as_deref(), Some("WestUS2"));
    }

    #[test]
    fn test_invalid_integer_names_key() {
        let yaml = "config:\n  azure-cs-vmss:instanceCount: lots\n";
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();

        let err = StackSettings::from_config(&config).unwrap_err();
        match err {
            ConfigError::InvalidInteger { key, value, .. } => {
                assert_eq!(key, "instanceCount");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_port_out_of_range_is_rejected() {
        let mut config = RawConfig::empty(PROJECT);
        config.apply_override("backendPort=70000").unwrap();

        assert!(matches!(
            StackSettings::from_config(&config),
            Err(ConfigError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_secure_admin_password_is_tracked_not_read() {
        let yaml = r#"
config:
  azure-cs-vmss:adminPassword:
    secure: AAABAKxyz
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();
        let settings = StackSettings::from_config(&config).unwrap();

        assert_eq!(settings.admin_password, SecretState::Encrypted);
        assert!(matches!(
            config.get("adminPassword"),
            Err(ConfigError::EncryptedValue { .. })
        ));
    }

    #[test]
    fn test_encrypted_plain_key_is_an_error() {
        let yaml = "config:\n  azure-cs-vmss:region:\n    secure: AAAB\n";
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();

        assert!(matches!(
            StackSettings::from_config(&config),
            Err(ConfigError::EncryptedValue { .. })
        ));
    }

    #[test]
    fn test_structured_values_are_unsupported() {
        let yaml = "config:\n  azure-cs-vmss:zones:\n    - 1\n    - 2\n";
        assert!(matches!(
            RawConfig::from_yaml_str(PROJECT, yaml),
            Err(ConfigError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_overrides_accept_bare_and_qualified_keys() {
        let mut config = RawConfig::from_yaml_str(
            PROJECT,
            "config:\n  azure-cs-vmss:instanceSize: Standard_B2s\n",
        )
        .unwrap();
        config.apply_override("instanceSize=Standard_D2s_v3").unwrap();
        config.apply_override("azure-cs-vmss:instanceCount=4").unwrap();

        let settings = StackSettings::from_config(&config).unwrap();
        assert_eq!(settings.instance_size, "Standard_D2s_v3");
        assert_eq!(settings.instance_count, 4);

        assert!(config.apply_override("no-equals-sign").is_err());
        assert!(config.apply_override("other:key=value").is_err());
    }

    #[test]
    fn test_empty_and_null_config_sections() {
        assert_eq!(RawConfig::from_yaml_str(PROJECT, "").unwrap(), RawConfig::empty(PROJECT));
        assert_eq!(
            RawConfig::from_yaml_str(PROJECT, "config:\n").unwrap(),
            RawConfig::empty(PROJECT)
        );
    }

    #[test]
    fn test_fixed_settings_ignore_config() {
        let yaml = r#"
config:
  azure-cs-vmss:region: WestUS
  azure-cs-vmss:instanceCount: 10
  azure-cs-vmss:adminPassword: hunter2
"#;
        let config = RawConfig::from_yaml_str(PROJECT, yaml).unwrap();
        let settings = StackSettings::fixed(&config);

        assert_eq!(settings.region, "CentralUS");
        assert_eq!(settings.instance_count, 2);
        assert_eq!(settings.admin_password, SecretState::Plain("hunter2".to_string()));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let path = std::env::temp_dir().join("webscale-does-not-exist/Pulumi.dev.yaml");
        let config = RawConfig::load(PROJECT, &path).unwrap();
        assert_eq!(config, RawConfig::empty(PROJECT));
    }
}
