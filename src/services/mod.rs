//! Services module
//!
//! Este módulo contiene la lógica de negocio del cliente: validación de
//! empleados, el contrato del gateway, autenticación y el formulario.

pub mod auth_service;
pub mod employee_form_service;
pub mod employee_validation;
pub mod gateway;

pub use auth_service::{AuthService, Authenticator, CurrentUser};
pub use employee_form_service::{EmployeeFormService, FormOutcome};
pub use employee_validation::{validate, validate_at, ValidationResult, REQUIRED_FIELDS};
pub use gateway::{EmployeeGateway, GatewayError, GatewayResult};
