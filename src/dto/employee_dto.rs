use serde::{Deserialize, Serialize};

use crate::models::employee::{
    Department, EmployeeDraft, EmployeeField, EmployeeSummary, EmploymentStatus, ProfilePicture,
};

/// Tamaño fijo de página del listado
pub const PAGE_SIZE: u32 = 10;

/// Parámetros de consulta del listado paginado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub search: Option<String>,
    pub department: Option<Department>,
    pub employment_status: Option<EmploymentStatus>,
}

impl ListParams {
    /// Pares de query string; los filtros vacíos se omiten
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string())];
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(department) = self.department {
            query.push(("department", department.as_str().to_string()));
        }
        if let Some(status) = self.employment_status {
            query.push(("employment_status", status.as_str().to_string()));
        }
        query
    }
}

/// Parámetros de la búsqueda avanzada (`search_advanced`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub department: Option<Department>,
    pub status: Option<EmploymentStatus>,
    pub page: u32,
}

impl SearchParams {
    /// `q` viaja siempre, aunque sea vacío; el filtro de estado se llama `status`
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("q", self.query.trim().to_string())];
        if let Some(department) = self.department {
            query.push(("department", department.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        query.push(("page", self.page.max(1).to_string()));
        query
    }
}

/// Página tal como la devuelve la paginación de la API
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<EmployeeSummary>,
}

/// Resultado de una página, reemplazado completo en cada consulta
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub items: Vec<EmployeeSummary>,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl ListPage {
    /// Página vacía más allá del final, conservando el recuento real
    pub fn past_end(count: u64) -> Self {
        Self {
            count,
            next: None,
            previous: Some("previous".to_string()),
            results: Vec::new(),
        }
    }
}

impl From<ListPage> for PageResult {
    fn from(page: ListPage) -> Self {
        Self {
            items: page.results,
            total_count: page.count,
            has_next: page.next.is_some(),
            has_previous: page.previous.is_some(),
        }
    }
}

/// Ventana "mostrando X–Y de N"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl PageWindow {
    pub fn new(page: u32, total: u64) -> Self {
        let page = u64::from(page.max(1));
        let size = u64::from(PAGE_SIZE);
        Self {
            from: (page - 1) * size + 1,
            to: (page * size).min(total),
            total,
        }
    }

    /// Página vacía: sin total o más allá del último registro
    pub fn is_empty(&self) -> bool {
        self.total == 0 || self.from > self.to
    }
}

/// Número total de páginas para un recuento
pub fn total_pages(total: u64) -> u64 {
    total.div_ceil(u64::from(PAGE_SIZE))
}

/// Parte de un formulario multipart
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(&'static str, String),
    File(&'static str, ProfilePicture),
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text(name, _) | FormPart::File(name, _) => name,
        }
    }
}

/// Codificar un campo del borrador. `None` si el campo no se envía.
fn encode_field(draft: &EmployeeDraft, field: EmployeeField) -> Option<FormPart> {
    match field {
        EmployeeField::ProfilePicture => draft
            .profile_picture
            .clone()
            .map(|picture| FormPart::File(field.as_str(), picture)),
        // employee_id viaja siempre como texto formateado
        _ => draft
            .value(field)
            .map(|value| FormPart::Text(field.as_str(), value.trim().to_string())),
    }
}

/// Payload de creación/edición construido desde la lista estática de campos
pub fn encode_draft(draft: &EmployeeDraft) -> Vec<FormPart> {
    EmployeeField::ALL
        .into_iter()
        .filter_map(|field| encode_field(draft, field))
        .collect()
}

/// Request de cambio de estado laboral
#[derive(Debug, Clone, Serialize)]
pub struct ChangeStatusRequest {
    pub employment_status: EmploymentStatus,
}
