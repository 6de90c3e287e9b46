//! Modelo de Employee
//!
//! Este módulo contiene el registro de empleado tal como lo devuelve la API,
//! la fila ligera del listado, el borrador editable del formulario y la
//! lista estática de campos que se envían al servidor.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Departamentos de la empresa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "HR")]
    HumanResources,
    #[serde(rename = "IT")]
    InformationTechnology,
    #[serde(rename = "FIN")]
    Finance,
    #[serde(rename = "MKT")]
    Marketing,
    #[serde(rename = "OPS")]
    Operations,
    #[serde(rename = "SALES")]
    Sales,
    #[serde(rename = "ENG")]
    Engineering,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::HumanResources,
        Department::InformationTechnology,
        Department::Finance,
        Department::Marketing,
        Department::Operations,
        Department::Sales,
        Department::Engineering,
    ];

    pub const CODES: [&'static str; 7] = ["HR", "IT", "FIN", "MKT", "OPS", "SALES", "ENG"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::HumanResources => "HR",
            Department::InformationTechnology => "IT",
            Department::Finance => "FIN",
            Department::Marketing => "MKT",
            Department::Operations => "OPS",
            Department::Sales => "SALES",
            Department::Engineering => "ENG",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::HumanResources => "Human Resources",
            Department::InformationTechnology => "Information Technology",
            Department::Finance => "Finance",
            Department::Marketing => "Marketing",
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::Engineering => "Engineering",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == code)
    }
}

/// Estado laboral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Active,
    Inactive,
    OnLeave,
    Terminated,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 4] = [
        EmploymentStatus::Active,
        EmploymentStatus::Inactive,
        EmploymentStatus::OnLeave,
        EmploymentStatus::Terminated,
    ];

    pub const CODES: [&'static str; 4] = ["ACTIVE", "INACTIVE", "ON_LEAVE", "TERMINATED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "ACTIVE",
            EmploymentStatus::Inactive => "INACTIVE",
            EmploymentStatus::OnLeave => "ON_LEAVE",
            EmploymentStatus::Terminated => "TERMINATED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "Active",
            EmploymentStatus::Inactive => "Inactive",
            EmploymentStatus::OnLeave => "On Leave",
            EmploymentStatus::Terminated => "Terminated",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == code)
    }
}

/// Género
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub const CODES: [&'static str; 3] = ["M", "F", "O"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

/// Campos escribibles de un empleado, en el orden del formulario.
///
/// El payload de creación/edición se construye recorriendo `EmployeeField::ALL`,
/// de modo que añadir un campo obliga a declararlo aquí.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    EmployeeId,
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    Address,
    Department,
    Position,
    HireDate,
    Salary,
    EmploymentStatus,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelationship,
    ProfilePicture,
}

impl EmployeeField {
    pub const ALL: [EmployeeField; 17] = [
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
        EmployeeField::EmploymentStatus,
        EmployeeField::EmergencyContactName,
        EmployeeField::EmergencyContactPhone,
        EmployeeField::EmergencyContactRelationship,
        EmployeeField::ProfilePicture,
    ];

    /// Nombre del campo en el wire y en el mapa de errores
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeField::EmployeeId => "employee_id",
            EmployeeField::FirstName => "first_name",
            EmployeeField::LastName => "last_name",
            EmployeeField::Email => "email",
            EmployeeField::Phone => "phone",
            EmployeeField::DateOfBirth => "date_of_birth",
            EmployeeField::Gender => "gender",
            EmployeeField::Address => "address",
            EmployeeField::Department => "department",
            EmployeeField::Position => "position",
            EmployeeField::HireDate => "hire_date",
            EmployeeField::Salary => "salary",
            EmployeeField::EmploymentStatus => "employment_status",
            EmployeeField::EmergencyContactName => "emergency_contact_name",
            EmployeeField::EmergencyContactPhone => "emergency_contact_phone",
            EmployeeField::EmergencyContactRelationship => "emergency_contact_relationship",
            EmployeeField::ProfilePicture => "profile_picture",
        }
    }

    /// Nombre legible: guiones bajos reemplazados por espacios
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Registro completo de empleado devuelto por la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: i64,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub age: Option<i32>,
    pub gender: Gender,
    pub address: String,
    pub department: Department,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
    pub employment_status: EmploymentStatus,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub emergency_contact_relationship: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by_username: Option<String>,
    #[serde(default)]
    pub updated_by_username: Option<String>,
}

impl EmployeeRecord {
    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Fila ligera del listado paginado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
    pub position: String,
    pub employment_status: EmploymentStatus,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Imagen de perfil adjunta como binario opaco
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePicture {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Borrador editable de un empleado: los valores crudos del formulario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDraft {
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<String>,
    pub salary: Option<String>,
    pub employment_status: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub profile_picture: Option<ProfilePicture>,
}

impl EmployeeDraft {
    /// Borrador vacío con los valores por defecto del formulario de alta
    pub fn new() -> Self {
        Self {
            gender: Some(Gender::Male.as_str().to_string()),
            department: Some(Department::InformationTechnology.as_str().to_string()),
            employment_status: Some(EmploymentStatus::Active.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Valor textual de un campo escalar; `None` para la imagen de perfil
    pub fn value(&self, field: EmployeeField) -> Option<&str> {
        let value = match field {
            EmployeeField::EmployeeId => &self.employee_id,
            EmployeeField::FirstName => &self.first_name,
            EmployeeField::LastName => &self.last_name,
            EmployeeField::Email => &self.email,
            EmployeeField::Phone => &self.phone,
            EmployeeField::DateOfBirth => &self.date_of_birth,
            EmployeeField::Gender => &self.gender,
            EmployeeField::Address => &self.address,
            EmployeeField::Department => &self.department,
            EmployeeField::Position => &self.position,
            EmployeeField::HireDate => &self.hire_date,
            EmployeeField::Salary => &self.salary,
            EmployeeField::EmploymentStatus => &self.employment_status,
            EmployeeField::EmergencyContactName => &self.emergency_contact_name,
            EmployeeField::EmergencyContactPhone => &self.emergency_contact_phone,
            EmployeeField::EmergencyContactRelationship => &self.emergency_contact_relationship,
            EmployeeField::ProfilePicture => return None,
        };
        value.as_deref()
    }

    /// Asignar un campo escalar desde texto del formulario
    pub fn set(&mut self, field: EmployeeField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            EmployeeField::EmployeeId => self.employee_id = value,
            EmployeeField::FirstName => self.first_name = value,
            EmployeeField::LastName => self.last_name = value,
            EmployeeField::Email => self.email = value,
            EmployeeField::Phone => self.phone = value,
            EmployeeField::DateOfBirth => self.date_of_birth = value,
            EmployeeField::Gender => self.gender = value,
            EmployeeField::Address => self.address = value,
            EmployeeField::Department => self.department = value,
            EmployeeField::Position => self.position = value,
            EmployeeField::HireDate => self.hire_date = value,
            EmployeeField::Salary => self.salary = value,
            EmployeeField::EmploymentStatus => self.employment_status = value,
            EmployeeField::EmergencyContactName => self.emergency_contact_name = value,
            EmployeeField::EmergencyContactPhone => self.emergency_contact_phone = value,
            EmployeeField::EmergencyContactRelationship => {
                self.emergency_contact_relationship = value
            }
            EmployeeField::ProfilePicture => {}
        }
    }

    /// ¿Está presente el campo? (la imagen cuenta si hay adjunto)
    pub fn is_present(&self, field: EmployeeField) -> bool {
        match field {
            EmployeeField::ProfilePicture => self.profile_picture.is_some(),
            _ => self
                .value(field)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false),
        }
    }
}

impl From<&EmployeeRecord> for EmployeeDraft {
    /// Copia transitoria para edición; la imagen existente no se reenvía
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            employee_id: Some(record.employee_id.clone()),
            first_name: Some(record.first_name.clone()),
            last_name: Some(record.last_name.clone()),
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            date_of_birth: Some(record.date_of_birth.format("%Y-%m-%d").to_string()),
            gender: Some(record.gender.as_str().to_string()),
            address: Some(record.address.clone()),
            department: Some(record.department.as_str().to_string()),
            position: Some(record.position.clone()),
            hire_date: Some(record.hire_date.format("%Y-%m-%d").to_string()),
            salary: Some(record.salary.to_string()),
            employment_status: Some(record.employment_status.as_str().to_string()),
            emergency_contact_name: Some(record.emergency_contact_name.clone()),
            emergency_contact_phone: Some(record.emergency_contact_phone.clone()),
            emergency_contact_relationship: Some(record.emergency_contact_relationship.clone()),
            profile_picture: None,
        }
    }
}

/// Estadísticas agregadas de la plantilla
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeStatistics {
    pub total_employees: u64,
    pub active_employees: u64,
    pub inactive_employees: u64,
    #[serde(default)]
    pub department_distribution: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names_are_unique_and_round_trip() {
        for field in EmployeeField::ALL {
            assert_eq!(EmployeeField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(EmployeeField::EmergencyContactPhone.display_name(), "emergency contact phone");
    }

    #[test]
    fn test_enum_codes_match_wire_values() {
        assert_eq!(Department::from_code("SALES"), Some(Department::Sales));
        assert_eq!(Department::from_code("sales"), None);
        assert_eq!(EmploymentStatus::from_code("ON_LEAVE"), Some(EmploymentStatus::OnLeave));
        assert_eq!(
            serde_json::to_value(EmploymentStatus::OnLeave).unwrap(),
            json!("ON_LEAVE")
        );
        assert_eq!(serde_json::to_value(Department::Finance).unwrap(), json!("FIN"));
    }

    #[test]
    fn test_new_draft_has_form_defaults() {
        let draft = EmployeeDraft::new();
        assert_eq!(draft.value(EmployeeField::Gender), Some("M"));
        assert_eq!(draft.value(EmployeeField::Department), Some("IT"));
        assert_eq!(draft.value(EmployeeField::EmploymentStatus), Some("ACTIVE"));
        assert!(!draft.is_present(EmployeeField::EmployeeId));
    }

    #[test]
    fn test_blank_value_is_not_present() {
        let mut draft = EmployeeDraft::new();
        draft.set(EmployeeField::FirstName, "   ");
        assert!(!draft.is_present(EmployeeField::FirstName));
        draft.set(EmployeeField::FirstName, "Ada");
        assert!(draft.is_present(EmployeeField::FirstName));
    }

    #[test]
    fn test_record_deserializes_from_api_payload() {
        let payload = json!({
            "id": 12,
            "employee_id": "EMP0012",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+12345678901",
            "date_of_birth": "1990-12-10",
            "age": 35,
            "gender": "F",
            "address": "12 Analytical St",
            "department": "ENG",
            "position": "Engineer",
            "hire_date": "2020-01-06",
            "salary": "85000.00",
            "employment_status": "ACTIVE",
            "emergency_contact_name": "Charles",
            "emergency_contact_phone": "+12345678902",
            "emergency_contact_relationship": "Friend",
            "profile_picture": null,
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z",
            "created_by_username": "admin",
            "updated_by_username": null
        });

        let record: EmployeeRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.employee_id, "EMP0012");
        assert_eq!(record.department, Department::Engineering);
        assert_eq!(record.salary, Decimal::new(8_500_000, 2));

        let draft = EmployeeDraft::from(&record);
        assert_eq!(draft.value(EmployeeField::DateOfBirth), Some("1990-12-10"));
        assert_eq!(draft.value(EmployeeField::Salary), Some("85000.00"));
        assert_eq!(draft.value(EmployeeField::EmployeeId), Some("EMP0012"));
    }
}
