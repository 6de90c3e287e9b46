//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean a los payloads
//! de la API REST de empleados y de autenticación.

pub mod auth;
pub mod employee;

pub use auth::*;
pub use employee::*;
