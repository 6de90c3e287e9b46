//! Gateway de registros de empleados
//!
//! Contrato que consume el núcleo para las llamadas de red. La
//! implementación HTTP vive en `clients::employee_api_client`; los tests
//! usan implementaciones en memoria.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::dto::employee_dto::{ListPage, ListParams, SearchParams};
use crate::models::employee::{EmployeeDraft, EmployeeRecord, EmployeeStatistics, EmploymentStatus};
use crate::services::employee_validation::ValidationResult;

pub const FETCH_ERROR: &str = "Failed to fetch employees";
pub const FETCH_ONE_ERROR: &str = "Failed to fetch employee details";
pub const CREATE_ERROR: &str = "Failed to create employee";
pub const UPDATE_ERROR: &str = "Failed to update employee";
pub const DELETE_ERROR: &str = "Failed to delete employee";
pub const STATUS_ERROR: &str = "Failed to change status";
pub const STATISTICS_ERROR: &str = "Failed to fetch statistics";
pub const SEARCH_ERROR: &str = "Search failed";
pub const REGISTER_ERROR: &str = "Registration failed. Please try again.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";

/// Fallo del gateway: rechazo por campos o error operativo
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Validation rejected by server: {0:?}")]
    Fields(BTreeMap<String, String>),

    #[error("{0}")]
    Operational(String),
}

impl GatewayError {
    /// Interpretar un cuerpo de error de la API.
    ///
    /// Un objeto cuyos valores son textos o listas de textos, y que no es un
    /// sobre `detail`/`error`/`message`, se considera error por campos (se
    /// conserva el primer mensaje de cada campo). Todo lo demás es operativo.
    pub fn from_body(body: &Value, default_message: &str) -> Self {
        if let Value::Object(map) = body {
            for key in ["detail", "error", "message"] {
                if let Some(Value::String(message)) = map.get(key) {
                    return GatewayError::Operational(message.clone());
                }
            }

            let mut fields = BTreeMap::new();
            for (field, value) in map {
                let message = match value {
                    Value::String(message) => Some(message.clone()),
                    Value::Array(messages) => messages
                        .iter()
                        .find_map(|m| m.as_str().map(str::to_string)),
                    _ => None,
                };
                match message {
                    Some(message) => {
                        fields.insert(field.clone(), message);
                    }
                    None => return GatewayError::Operational(default_message.to_string()),
                }
            }

            if !fields.is_empty() {
                return GatewayError::Fields(fields);
            }
        }

        if let Value::String(message) = body {
            if !message.trim().is_empty() {
                return GatewayError::Operational(message.clone());
            }
        }

        GatewayError::Operational(default_message.to_string())
    }

    /// Mensaje único para una notificación
    pub fn message(&self) -> String {
        match self {
            GatewayError::Fields(fields) => fields
                .iter()
                .next()
                .map(|(field, message)| format!("{}: {}", field, message))
                .unwrap_or_else(|| "Operation failed".to_string()),
            GatewayError::Operational(message) => message.clone(),
        }
    }

    /// Errores por campo en la misma forma que la validación local
    pub fn field_errors(&self) -> Option<ValidationResult> {
        match self {
            GatewayError::Fields(fields) => Some(ValidationResult::from(fields.clone())),
            GatewayError::Operational(_) => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            GatewayError::Operational(NETWORK_ERROR.to_string())
        } else {
            GatewayError::Operational(error.to_string())
        }
    }
}

/// Resultado tipado de las operaciones del gateway
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Operaciones remotas sobre registros de empleados
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn list(&self, params: &ListParams) -> GatewayResult<ListPage>;

    async fn get(&self, id: i64) -> GatewayResult<EmployeeRecord>;

    async fn create(&self, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord>;

    async fn update(&self, id: i64, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord>;

    /// Edición parcial: sólo se envían los campos presentes en el borrador
    async fn partial_update(&self, id: i64, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord>;

    async fn delete(&self, id: i64) -> GatewayResult<()>;

    async fn change_status(&self, id: i64, status: EmploymentStatus) -> GatewayResult<EmployeeRecord>;

    async fn statistics(&self) -> GatewayResult<EmployeeStatistics>;

    async fn search(&self, params: &SearchParams) -> GatewayResult<ListPage>;
}
