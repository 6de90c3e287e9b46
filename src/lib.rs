//! Núcleo cliente de gestión de empleados
//!
//! Validación de formularios, controlador del listado paginado y gateway
//! HTTP hacia la API REST de empleados.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
