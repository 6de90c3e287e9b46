//! Motor de validación de empleados
//!
//! Valida un borrador de empleado contra las reglas de formato, rango y
//! negocio. Todas las reglas se evalúan y todos los fallos se reportan
//! juntos; las reglas de formato sólo se aplican a campos presentes, la
//! ausencia es asunto exclusivo de la regla de obligatoriedad.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use validator::ValidationError;

use crate::models::employee::{Department, EmployeeDraft, EmployeeField, EmploymentStatus, Gender};
use crate::utils::validation::{
    validate_age, validate_choice, validate_date, validate_email, validate_employee_id,
    validate_not_empty, validate_not_future, validate_phone, validate_salary,
};

pub const HIRE_BEFORE_BIRTH_MESSAGE: &str = "Hire date cannot be before date of birth";

/// Campos obligatorios del formulario de alta y edición
pub const REQUIRED_FIELDS: [EmployeeField; 14] = [
    EmployeeField::EmployeeId,
    EmployeeField::FirstName,
    EmployeeField::LastName,
    EmployeeField::Email,
    EmployeeField::Phone,
    EmployeeField::DateOfBirth,
    EmployeeField::Gender,
    EmployeeField::Address,
    EmployeeField::Department,
    EmployeeField::Position,
    EmployeeField::HireDate,
    EmployeeField::Salary,
    EmployeeField::EmergencyContactName,
    EmployeeField::EmergencyContactPhone,
];

/// Mapa campo → mensaje de error. Vacío significa válido.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_error(&self, field: EmployeeField) -> bool {
        self.errors.contains_key(field.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Registrar un error; el último mensaje para un campo gana
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    fn record(&mut self, field: EmployeeField, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            let message = error
                .message
                .map(|m| m.into_owned())
                .unwrap_or_else(|| format!("Invalid {}", field.display_name()));
            self.insert(field.as_str(), message);
        }
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }
}

impl From<BTreeMap<String, String>> for ValidationResult {
    fn from(errors: BTreeMap<String, String>) -> Self {
        Self { errors }
    }
}

/// Validar con la fecha local actual
pub fn validate(draft: &EmployeeDraft, required_fields: &[EmployeeField]) -> ValidationResult {
    validate_at(draft, required_fields, Local::now().date_naive())
}

/// Validar respecto de una fecha "hoy" explícita
pub fn validate_at(
    draft: &EmployeeDraft,
    required_fields: &[EmployeeField],
    today: NaiveDate,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in required_fields {
        if !draft.is_present(*field) {
            result.insert(field.as_str(), format!("{} is required", field.display_name()));
        }
    }

    let present = |field: EmployeeField| {
        draft
            .value(field)
            .filter(|v| validate_not_empty(v).is_ok())
    };

    if let Some(email) = present(EmployeeField::Email) {
        result.record(EmployeeField::Email, validate_email(email));
    }

    for field in [EmployeeField::Phone, EmployeeField::EmergencyContactPhone] {
        if let Some(phone) = present(field) {
            result.record(field, validate_phone(phone));
        }
    }

    if let Some(employee_id) = present(EmployeeField::EmployeeId) {
        result.record(EmployeeField::EmployeeId, validate_employee_id(employee_id));
    }

    if let Some(gender) = present(EmployeeField::Gender) {
        result.record(EmployeeField::Gender, validate_choice(gender, &Gender::CODES));
    }
    if let Some(department) = present(EmployeeField::Department) {
        result.record(EmployeeField::Department, validate_choice(department, &Department::CODES));
    }
    if let Some(status) = present(EmployeeField::EmploymentStatus) {
        result.record(
            EmployeeField::EmploymentStatus,
            validate_choice(status, &EmploymentStatus::CODES),
        );
    }

    let mut birth_date = None;
    if let Some(value) = present(EmployeeField::DateOfBirth) {
        let outcome = validate_age(value, today);
        if outcome.is_ok() {
            birth_date = validate_date(value).ok();
        }
        result.record(EmployeeField::DateOfBirth, outcome);
    }

    let mut hire_date = None;
    if let Some(value) = present(EmployeeField::HireDate) {
        let outcome = validate_date(value).and_then(|date| {
            validate_not_future(date, today)?;
            hire_date = Some(date);
            Ok(())
        });
        result.record(EmployeeField::HireDate, outcome);
    }

    if let (Some(birth), Some(hire)) = (birth_date, hire_date) {
        if hire < birth {
            result.insert(EmployeeField::HireDate.as_str(), HIRE_BEFORE_BIRTH_MESSAGE);
        }
    }

    if let Some(salary) = present(EmployeeField::Salary) {
        result.record(EmployeeField::Salary, validate_salary(salary).map(|_| ()));
    }

    result
}
