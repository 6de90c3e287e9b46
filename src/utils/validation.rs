//! Utilidades de validación
//!
//! Este módulo contiene los validadores primitivos de campos de empleado.
//! Cada validador devuelve un `ValidationError` con el código, el mensaje
//! que se muestra al usuario y el valor ofensivo como parámetro.

use std::borrow::Cow;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

pub const EMAIL_MESSAGE: &str = "Invalid email format";
pub const PHONE_MESSAGE: &str = "Invalid phone number format";
pub const EMPLOYEE_ID_MESSAGE: &str = "Employee ID must be in format: EMP0001";
pub const AGE_MESSAGE: &str = "Employee must be between 18 and 100 years old";
pub const HIRE_DATE_MESSAGE: &str = "Hire date cannot be in the future";
pub const SALARY_MESSAGE: &str = "Invalid salary amount";
pub const DATE_MESSAGE: &str = "Enter a valid date (YYYY-MM-DD)";
pub const CHOICE_MESSAGE: &str = "Select a valid choice";

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 100;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?1?[0-9]{9,15}$").unwrap();
    static ref EMPLOYEE_ID_REGEX: Regex = Regex::new(r"^EMP[0-9]{4,}$").unwrap();
    static ref MAX_SALARY: Decimal = Decimal::from(10_000_000);
}

fn error_with_message(code: &'static str, message: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error.add_param("value".into(), &value.to_string());
    error
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = error_with_message("date", DATE_MESSAGE, value);
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar formato de email (`local@dominio.tld`, sin espacios)
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(value) {
        return Err(error_with_message("email", EMAIL_MESSAGE, value));
    }
    Ok(())
}

/// Validar formato de teléfono, ignorando cualquier espacio en blanco y guiones
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !PHONE_REGEX.is_match(&clean_phone) {
        return Err(error_with_message("phone", PHONE_MESSAGE, value));
    }
    Ok(())
}

/// Validar formato de identificador de empleado (EMP + 4 dígitos o más)
pub fn validate_employee_id(value: &str) -> Result<(), ValidationError> {
    if !EMPLOYEE_ID_REGEX.is_match(value) {
        return Err(error_with_message("employee_id", EMPLOYEE_ID_MESSAGE, value));
    }
    Ok(())
}

/// Edad en años cumplidos a una fecha dada
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Validar que la fecha de nacimiento corresponda a una edad laboral
pub fn validate_age(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    let date_of_birth =
        validate_date(value).map_err(|_| error_with_message("age", AGE_MESSAGE, value))?;

    validate_range(age_on(date_of_birth, today), MIN_AGE, MAX_AGE).map_err(|mut error| {
        error.message = Some(Cow::Borrowed(AGE_MESSAGE));
        error
    })
}

/// Validar que una fecha no esté en el futuro (el mismo día es válido)
pub fn validate_not_future(value: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if value > today {
        return Err(error_with_message("future_date", HIRE_DATE_MESSAGE, &value.to_string()));
    }
    Ok(())
}

/// Validar y convertir un salario: decimal positivo de hasta 10.000.000,
/// en notación decimal o científica (`5e4`)
pub fn validate_salary(value: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    // Separadores `_` no son un decimal válido para la API
    if trimmed.contains('_') {
        return Err(error_with_message("salary", SALARY_MESSAGE, value));
    }
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    let salary = parsed.map_err(|_| error_with_message("salary", SALARY_MESSAGE, value))?;

    validate_positive(salary)
        .and_then(|_| validate_range(salary, Decimal::ZERO, *MAX_SALARY))
        .map_err(|mut error| {
            error.message = Some(Cow::Borrowed(SALARY_MESSAGE));
            error
        })?;

    Ok(salary)
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_choice(value: &str, allowed_values: &[&str]) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = error_with_message("choice", CHOICE_MESSAGE, value);
        error.add_param("allowed_values".into(), &allowed_values);
        return Err(error);
    }
    Ok(())
}
