use crate::error::{Result, SalvageError};
use axum::http::StatusCode;
use dashmap::DashMap;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

/// Prefix of the environment variables picked up by [`ConfigService::from_env`].
pub const ENV_PREFIX: &str = "SALVAGE_";

pub const STATUS_KEY: &str = "SALVAGE_STATUS";
pub const EXPOSE_PAYLOAD_KEY: &str = "SALVAGE_EXPOSE_PAYLOAD";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from every environment variable starting with [`ENV_PREFIX`].
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Like [`from_env`](Self::from_env), over an explicit set of variables.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let service = Self::default();
        for (key, value) in vars.into_iter().filter(|(key, _)| key.starts_with(ENV_PREFIX)) {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Settings for the built-in [`JsonResponder`](crate::responder::JsonResponder).
///
/// Deserializable so it can be embedded in a larger application config.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Status code of the fault response.
    pub status: u16,

    /// Put the panic message in the response body. Off by default, since
    /// panic messages can leak internals to clients.
    pub expose_payload: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            status: 500,
            expose_payload: false,
        }
    }
}

impl RecoveryConfig {
    /// Read overrides from `service`, falling back to defaults for missing keys.
    pub fn from_service(service: &ConfigService) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = service.get(STATUS_KEY) {
            config.status = value
                .trim()
                .parse()
                .map_err(|_| SalvageError::invalid_status(STATUS_KEY, &value))?;
        }
        if let Some(value) = service.get(EXPOSE_PAYLOAD_KEY) {
            config.expose_payload = parse_flag(EXPOSE_PAYLOAD_KEY, &value)?;
        }

        config.status_code()?;
        Ok(config)
    }

    pub fn status_code(&self) -> Result<StatusCode> {
        StatusCode::from_u16(self.status).map_err(|_| SalvageError::invalid_status("status", self.status))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SalvageError::invalid_flag(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecoveryConfig::from_service(&ConfigService::new()).unwrap();
        assert_eq!(config, RecoveryConfig::default());
        assert_eq!(config.status_code().unwrap(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_overrides() {
        let service = ConfigService::new();
        service.set(STATUS_KEY, " 503 ");
        service.set(EXPOSE_PAYLOAD_KEY, "Yes");

        let config = RecoveryConfig::from_service(&service).unwrap();

        assert_eq!(config.status, 503);
        assert!(config.expose_payload);
    }

    #[test]
    fn test_only_prefixed_vars_are_loaded() {
        let vars = [
            ("SALVAGE_STATUS", "503"),
            ("OTHER_X", "1"),
            ("salvage_status", "418"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let service = ConfigService::from_vars(vars);

        assert_eq!(service.get(STATUS_KEY).as_deref(), Some("503"));
        assert_eq!(service.get("OTHER_X"), None);
        assert_eq!(service.get("salvage_status"), None);
        assert_eq!(RecoveryConfig::from_service(&service).unwrap().status, 503);
    }

    #[test]
    fn test_from_env_skips_foreign_vars() {
        let service = ConfigService::from_env();
        for (key, _) in std::env::vars().filter(|(key, _)| !key.starts_with(ENV_PREFIX)) {
            assert_eq!(service.get(&key), None);
        }
    }

    #[test]
    fn test_rejects_invalid_values() {
        let service = ConfigService::new();
        service.set(STATUS_KEY, "teapot");
        assert!(matches!(
            RecoveryConfig::from_service(&service),
            Err(SalvageError::InvalidStatus { .. })
        ));

        service.set(STATUS_KEY, "1000");
        assert!(matches!(
            RecoveryConfig::from_service(&service),
            Err(SalvageError::InvalidStatus { .. })
        ));

        service.set(STATUS_KEY, "500");
        service.set(EXPOSE_PAYLOAD_KEY, "maybe");
        let err = RecoveryConfig::from_service(&service).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid flag for SALVAGE_EXPOSE_PAYLOAD: maybe (expected true or false)"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: RecoveryConfig = serde_json::from_str(r#"{"expose_payload": true}"#).unwrap();
        assert_eq!(config.status, 500);
        assert!(config.expose_payload);
    }
}
