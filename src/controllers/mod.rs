//! Controllers
//!
//! Controladores con estado que la interfaz consulta y acciona.

pub mod employee_list_controller;

pub use employee_list_controller::*;
