//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente: URL de la API,
//! timeouts, fichero de sesión y nivel de log.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::errors::{config_error, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 30,
            session_file: PathBuf::from(".employee_session.json"),
            log_level: "info".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno, con valores por defecto
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| config_error("REQUEST_TIMEOUT_SECS", "must be a valid number"))?,
            None => defaults.request_timeout_secs,
        };

        let api_base_url = lookup("EMPLOYEE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(config_error("EMPLOYEE_API_URL", "must be an http(s) URL"));
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url,
            request_timeout_secs,
            session_file: lookup("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
