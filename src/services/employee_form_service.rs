//! Servicio de formulario de empleados
//!
//! Camino de escritura: control de acceso, validación local y envío al
//! gateway. Los errores por campo devueltos por la API se presentan igual
//! que los de la validación local.

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::employee::{EmployeeDraft, EmployeeField, EmployeeRecord};
use crate::services::auth_service::Authenticator;
use crate::services::employee_validation::{validate, ValidationResult, REQUIRED_FIELDS};
use crate::services::gateway::{EmployeeGateway, GatewayError, GatewayResult};

pub const EMPLOYEE_ID_LOCKED_MESSAGE: &str = "Employee ID cannot be changed";

/// Resultado de enviar el formulario
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Sin sesión: no se valida ni se envía nada
    Unauthenticated,
    /// La validación local falló; el gateway no se llamó
    Invalid(ValidationResult),
    /// La API rechazó campos concretos
    Rejected(ValidationResult),
    Failed(String),
    Saved(EmployeeRecord),
}

pub struct EmployeeFormService {
    gateway: Arc<dyn EmployeeGateway>,
    auth: Arc<dyn Authenticator>,
    required_fields: Vec<EmployeeField>,
}

impl EmployeeFormService {
    pub fn new(gateway: Arc<dyn EmployeeGateway>, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            gateway,
            auth,
            required_fields: REQUIRED_FIELDS.to_vec(),
        }
    }

    pub fn with_required_fields(mut self, required_fields: &[EmployeeField]) -> Self {
        self.required_fields = required_fields.to_vec();
        self
    }

    pub async fn submit_create(&self, draft: &EmployeeDraft) -> FormOutcome {
        if !self.auth.is_authenticated().await {
            warn!("🔒 Alta de empleado sin sesión");
            return FormOutcome::Unauthenticated;
        }

        let validation = validate(draft, &self.required_fields);
        if !validation.is_valid() {
            info!("📝 Alta con {} errores de validación", validation.len());
            return FormOutcome::Invalid(validation);
        }

        Self::settle(self.gateway.create(draft).await)
    }

    /// Edición: el `employee_id` original no puede cambiar
    pub async fn submit_update(
        &self,
        id: i64,
        original_employee_id: &str,
        draft: &EmployeeDraft,
    ) -> FormOutcome {
        if !self.auth.is_authenticated().await {
            warn!("🔒 Edición de empleado {} sin sesión", id);
            return FormOutcome::Unauthenticated;
        }

        let mut validation = validate(draft, &self.required_fields);
        let submitted = draft.value(EmployeeField::EmployeeId).map(str::trim);
        if submitted.is_some_and(|value| !value.is_empty() && value != original_employee_id) {
            validation.insert(EmployeeField::EmployeeId.as_str(), EMPLOYEE_ID_LOCKED_MESSAGE);
        }
        if !validation.is_valid() {
            info!("📝 Edición de {} con {} errores de validación", id, validation.len());
            return FormOutcome::Invalid(validation);
        }

        Self::settle(self.gateway.update(id, draft).await)
    }

    /// Cargar un empleado como borrador editable
    pub async fn load_for_edit(&self, id: i64) -> GatewayResult<EmployeeDraft> {
        let record = self.gateway.get(id).await?;
        Ok(EmployeeDraft::from(&record))
    }

    fn settle(result: GatewayResult<EmployeeRecord>) -> FormOutcome {
        match result {
            Ok(record) => FormOutcome::Saved(record),
            Err(GatewayError::Fields(fields)) => {
                warn!("⚠️ La API rechazó {} campos", fields.len());
                FormOutcome::Rejected(ValidationResult::from(fields))
            }
            Err(GatewayError::Operational(message)) => FormOutcome::Failed(message),
        }
    }
}
