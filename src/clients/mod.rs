//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the employee records REST API.

pub mod employee_api_client;

pub use employee_api_client::EmployeeApiClient;
