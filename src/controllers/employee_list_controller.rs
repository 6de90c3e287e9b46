//! Controlador del listado de empleados
//!
//! Mantiene la consulta (búsqueda, filtros, página), deriva los parámetros
//! de cada petición y reconcilia las respuestas del gateway. Cada petición
//! lleva un número de generación: sólo se aplica la respuesta de la última
//! petición emitida, las anteriores se descartan aunque lleguen después.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::dto::employee_dto::{total_pages, ListParams, PageResult, PageWindow};
use crate::models::employee::{Department, EmploymentStatus};
use crate::services::gateway::EmployeeGateway;

/// Estado de carga del listado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Consulta actual del listado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
    pub search_text: String,
    pub department_filter: Option<Department>,
    pub status_filter: Option<EmploymentStatus>,
    pub page_number: u32,
}

impl Default for ListQueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            department_filter: None,
            status_filter: None,
            page_number: 1,
        }
    }
}

impl ListQueryState {
    pub fn to_params(&self) -> ListParams {
        let search = self.search_text.trim();
        ListParams {
            page: self.page_number,
            search: (!search.is_empty()).then(|| search.to_string()),
            department: self.department_filter,
            employment_status: self.status_filter,
        }
    }
}

/// Vista del listado: lo que la UI pinta
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub query: ListQueryState,
    pub load_state: LoadState,
    pub page: PageResult,
    pub last_error: Option<String>,
}

impl ListSnapshot {
    pub fn showing(&self) -> PageWindow {
        PageWindow::new(self.query.page_number, self.page.total_count)
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.page.total_count)
    }
}

/// Resultado de una consulta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// La respuesta se aplicó a la vista
    Applied,
    /// La consulta falló; se mantiene la última página buena
    Failed(String),
    /// Respuesta superada por una petición más reciente, descartada
    Stale,
}

/// Resultado de un borrado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Borrado hecho; incluye el resultado de la recarga posterior
    Deleted(FetchOutcome),
    Failed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),
}

struct ListInner {
    snapshot: ListSnapshot,
    generation: u64,
}

impl ListInner {
    /// Emitir una nueva petición con la consulta actual
    fn begin(&mut self) -> (u64, ListParams) {
        self.generation += 1;
        self.snapshot.load_state = LoadState::Loading;
        (self.generation, self.snapshot.query.to_params())
    }
}

/// Controlador del listado paginado
#[derive(Clone)]
pub struct EmployeeListController {
    gateway: Arc<dyn EmployeeGateway>,
    inner: Arc<RwLock<ListInner>>,
}

impl EmployeeListController {
    pub fn new(gateway: Arc<dyn EmployeeGateway>) -> Self {
        Self {
            gateway,
            inner: Arc::new(RwLock::new(ListInner {
                snapshot: ListSnapshot {
                    query: ListQueryState::default(),
                    load_state: LoadState::Idle,
                    page: PageResult::default(),
                    last_error: None,
                },
                generation: 0,
            })),
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn load_state(&self) -> LoadState {
        self.inner.read().await.snapshot.load_state
    }

    pub async fn query(&self) -> ListQueryState {
        self.inner.read().await.snapshot.query.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.snapshot.last_error.clone()
    }

    pub async fn set_search(&self, text: impl Into<String>) -> FetchOutcome {
        let text = text.into();
        let (generation, params) = {
            let mut inner = self.inner.write().await;
            inner.snapshot.query.search_text = text;
            inner.snapshot.query.page_number = 1;
            inner.begin()
        };
        self.execute(generation, params).await
    }

    pub async fn set_department(&self, department: Option<Department>) -> FetchOutcome {
        let (generation, params) = {
            let mut inner = self.inner.write().await;
            inner.snapshot.query.department_filter = department;
            inner.snapshot.query.page_number = 1;
            inner.begin()
        };
        self.execute(generation, params).await
    }

    pub async fn set_status(&self, status: Option<EmploymentStatus>) -> FetchOutcome {
        let (generation, params) = {
            let mut inner = self.inner.write().await;
            inner.snapshot.query.status_filter = status;
            inner.snapshot.query.page_number = 1;
            inner.begin()
        };
        self.execute(generation, params).await
    }

    /// Cambiar de página; los filtros no se tocan
    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, ListError> {
        if page < 1 {
            return Err(ListError::InvalidPage(page));
        }

        let (generation, params) = {
            let mut inner = self.inner.write().await;
            inner.snapshot.query.page_number = page;
            inner.begin()
        };
        Ok(self.execute(generation, params).await)
    }

    /// Consultar de nuevo con la consulta actual
    pub async fn fetch(&self) -> FetchOutcome {
        let (generation, params) = self.inner.write().await.begin();
        self.execute(generation, params).await
    }

    /// Recargar tras un alta o edición
    pub async fn refresh(&self) -> FetchOutcome {
        info!("🔄 Recargando listado de empleados");
        self.fetch().await
    }

    /// Borrar un empleado y recargar la página actual (no la primera)
    pub async fn delete(&self, id: i64) -> DeleteOutcome {
        if let Err(e) = self.gateway.delete(id).await {
            let message = e.message();
            warn!("❌ No se pudo borrar el empleado {}: {}", id, message);
            self.inner.write().await.snapshot.last_error = Some(message.clone());
            return DeleteOutcome::Failed(message);
        }

        info!("🗑️ Empleado {} borrado, recargando página", id);
        DeleteOutcome::Deleted(self.fetch().await)
    }

    async fn execute(&self, generation: u64, params: ListParams) -> FetchOutcome {
        debug!("🔍 Petición #{} {:?}", generation, params);
        let result = self.gateway.list(&params).await;

        let mut inner = self.inner.write().await;
        if generation != inner.generation {
            debug!(
                "⏭️ Respuesta #{} descartada (última emitida #{})",
                generation, inner.generation
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let page = PageResult::from(page);
                debug!(
                    "✅ Página {} con {} empleados de {}",
                    params.page,
                    page.items.len(),
                    page.total_count
                );
                inner.snapshot.page = page;
                inner.snapshot.load_state = LoadState::Loaded;
                inner.snapshot.last_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = e.message();
                warn!("⚠️ Error cargando empleados: {}", message);
                inner.snapshot.load_state = LoadState::Error;
                inner.snapshot.last_error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::employee_dto::{ListPage, SearchParams, PAGE_SIZE};
    use crate::models::employee::{
        EmployeeDraft, EmployeeRecord, EmployeeStatistics, EmployeeSummary,
    };
    use crate::services::gateway::{GatewayError, GatewayResult};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeGateway {
        rows: Mutex<Vec<EmployeeSummary>>,
        delays: HashMap<String, Duration>,
        failing_searches: HashSet<String>,
        fail_list: AtomicBool,
        fail_delete: AtomicBool,
        calls: Mutex<Vec<ListParams>>,
    }

    fn row(n: i64, department: Department, status: EmploymentStatus) -> EmployeeSummary {
        EmployeeSummary {
            id: n,
            employee_id: format!("EMP{:04}", n),
            full_name: format!("Employee {}", n),
            email: format!("employee{}@example.com", n),
            department,
            position: "Analyst".to_string(),
            employment_status: status,
            profile_picture: None,
        }
    }

    impl FakeGateway {
        fn with_rows(count: i64) -> Self {
            let rows = (1..=count)
                .map(|n| {
                    let department = if n % 2 == 0 { Department::Finance } else { Department::Sales };
                    row(n, department, EmploymentStatus::Active)
                })
                .collect();
            Self {
                rows: Mutex::new(rows),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<ListParams> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmployeeGateway for FakeGateway {
        async fn list(&self, params: &ListParams) -> GatewayResult<ListPage> {
            self.calls.lock().unwrap().push(params.clone());
            let search = params.search.clone().unwrap_or_default();
            if let Some(delay) = self.delays.get(&search) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail_list.load(Ordering::SeqCst) || self.failing_searches.contains(&search) {
                return Err(GatewayError::Operational("Failed to fetch employees".to_string()));
            }

            let matching: Vec<EmployeeSummary> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.full_name.contains(&search) || r.employee_id.contains(&search))
                .filter(|r| params.department.map_or(true, |d| r.department == d))
                .filter(|r| params.employment_status.map_or(true, |s| r.employment_status == s))
                .cloned()
                .collect();

            let size = PAGE_SIZE as usize;
            let start = (params.page as usize - 1) * size;
            let results: Vec<EmployeeSummary> =
                matching.iter().skip(start).take(size).cloned().collect();
            Ok(ListPage {
                count: matching.len() as u64,
                next: (start + size < matching.len()).then(|| "next".to_string()),
                previous: (params.page > 1).then(|| "previous".to_string()),
                results,
            })
        }

        async fn get(&self, _id: i64) -> GatewayResult<EmployeeRecord> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn create(&self, _draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn update(&self, _id: i64, _draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn partial_update(
            &self,
            _id: i64,
            _draft: &EmployeeDraft,
        ) -> GatewayResult<EmployeeRecord> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn delete(&self, id: i64) -> GatewayResult<()> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(GatewayError::Operational("Failed to delete employee".to_string()));
            }
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }

        async fn change_status(
            &self,
            _id: i64,
            _status: EmploymentStatus,
        ) -> GatewayResult<EmployeeRecord> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn statistics(&self) -> GatewayResult<EmployeeStatistics> {
            Err(GatewayError::Operational("unused".to_string()))
        }

        async fn search(&self, _params: &SearchParams) -> GatewayResult<ListPage> {
            Err(GatewayError::Operational("unused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let controller = EmployeeListController::new(Arc::new(FakeGateway::with_rows(3)));
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.load_state, LoadState::Idle);
        assert_eq!(snapshot.query, ListQueryState::default());
        assert!(snapshot.page.items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_loads_first_page() {
        let gateway = Arc::new(FakeGateway::with_rows(25));
        let controller = EmployeeListController::new(gateway.clone());

        assert_eq!(controller.fetch().await, FetchOutcome::Applied);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.load_state, LoadState::Loaded);
        assert_eq!(snapshot.page.items.len(), 10);
        assert_eq!(snapshot.page.total_count, 25);
        assert!(snapshot.page.has_next);
        assert!(!snapshot.page.has_previous);
        assert_eq!(snapshot.showing(), PageWindow { from: 1, to: 10, total: 25 });
        assert_eq!(snapshot.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_filters_reset_page_to_one() {
        let gateway = Arc::new(FakeGateway::with_rows(40));
        let controller = EmployeeListController::new(gateway.clone());

        controller.set_page(3).await.unwrap();
        assert_eq!(controller.query().await.page_number, 3);
        controller.set_search("Employee").await;
        assert_eq!(controller.query().await.page_number, 1);

        controller.set_page(2).await.unwrap();
        controller.set_department(Some(Department::Finance)).await;
        assert_eq!(controller.query().await.page_number, 1);

        controller.set_page(2).await.unwrap();
        controller.set_status(Some(EmploymentStatus::Active)).await;
        let query = controller.query().await;
        assert_eq!(query.page_number, 1);
        assert_eq!(query.search_text, "Employee");
        assert_eq!(query.department_filter, Some(Department::Finance));

        let last = gateway.calls().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.search.as_deref(), Some("Employee"));
        assert_eq!(last.department, Some(Department::Finance));
        assert_eq!(last.employment_status, Some(EmploymentStatus::Active));
    }

    #[tokio::test]
    async fn test_set_page_keeps_filters() {
        let gateway = Arc::new(FakeGateway::with_rows(40));
        let controller = EmployeeListController::new(gateway.clone());

        controller.set_department(Some(Department::Sales)).await;
        controller.set_search("Employee").await;
        let before = controller.query().await;

        assert_eq!(controller.set_page(2).await, Ok(FetchOutcome::Applied));
        let after = controller.query().await;
        assert_eq!(after.page_number, 2);
        assert_eq!(after.search_text, before.search_text);
        assert_eq!(after.department_filter, before.department_filter);
        assert_eq!(after.status_filter, before.status_filter);
    }

    #[tokio::test]
    async fn test_set_page_zero_is_rejected() {
        let gateway = Arc::new(FakeGateway::with_rows(5));
        let controller = EmployeeListController::new(gateway.clone());

        assert_eq!(controller.set_page(0).await, Err(ListError::InvalidPage(0)));
        assert_eq!(controller.load_state().await, LoadState::Idle);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_last_good_page() {
        let gateway = Arc::new(FakeGateway::with_rows(15));
        let controller = EmployeeListController::new(gateway.clone());
        controller.fetch().await;
        let good = controller.snapshot().await.page;

        gateway.fail_list.store(true, Ordering::SeqCst);
        let outcome = controller.set_page(2).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Failed("Failed to fetch employees".to_string()));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.load_state, LoadState::Error);
        assert_eq!(snapshot.page, good);
        assert_eq!(snapshot.last_error.as_deref(), Some("Failed to fetch employees"));

        gateway.fail_list.store(false, Ordering::SeqCst);
        assert_eq!(controller.fetch().await, FetchOutcome::Applied);
        assert_eq!(controller.last_error().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_responses_keep_latest() {
        let mut gateway = FakeGateway::with_rows(12);
        gateway.delays.insert("1".to_string(), Duration::from_millis(200));
        gateway.delays.insert("2".to_string(), Duration::from_millis(10));
        let controller = EmployeeListController::new(Arc::new(gateway));

        // "1" se emite primero pero responde último
        let (older, newer) = tokio::join!(controller.set_search("1"), controller.set_search("2"));

        assert_eq!(older, FetchOutcome::Stale);
        assert_eq!(newer, FetchOutcome::Applied);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.query.search_text, "2");
        assert_eq!(snapshot.load_state, LoadState::Loaded);
        assert!(snapshot.page.items.iter().all(|r| r.employee_id.contains('2')));
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_response_arriving_first_is_discarded() {
        let mut gateway = FakeGateway::with_rows(12);
        gateway.delays.insert("1".to_string(), Duration::from_millis(10));
        gateway.delays.insert("2".to_string(), Duration::from_millis(200));
        let controller = EmployeeListController::new(Arc::new(gateway));

        let (older, newer) = tokio::join!(controller.set_search("1"), controller.set_search("2"));

        assert_eq!(older, FetchOutcome::Stale);
        assert_eq!(newer, FetchOutcome::Applied);
        let snapshot = controller.snapshot().await;
        assert!(snapshot.page.items.iter().all(|r| r.employee_id.contains('2')));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_failure_is_discarded() {
        let mut gateway = FakeGateway::with_rows(12);
        gateway.delays.insert("1".to_string(), Duration::from_millis(200));
        gateway.delays.insert("2".to_string(), Duration::from_millis(10));
        gateway.failing_searches.insert("1".to_string());
        let controller = EmployeeListController::new(Arc::new(gateway));

        // La petición antigua falla tarde; su error no debe pisar la vista
        let (older, newer) = tokio::join!(controller.set_search("1"), controller.set_search("2"));

        assert_eq!(older, FetchOutcome::Stale);
        assert_eq!(newer, FetchOutcome::Applied);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.load_state, LoadState::Loaded);
        assert_eq!(snapshot.last_error, None);
        assert!(!snapshot.page.items.is_empty());
    }

    #[tokio::test]
    async fn test_delete_refetches_current_page() {
        let gateway = Arc::new(FakeGateway::with_rows(21));
        let controller = EmployeeListController::new(gateway.clone());
        controller.set_page(3).await.unwrap();
        assert_eq!(controller.snapshot().await.page.items.len(), 1);

        let outcome = controller.delete(21).await;
        assert_eq!(outcome, DeleteOutcome::Deleted(FetchOutcome::Applied));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.query.page_number, 3);
        assert_eq!(snapshot.load_state, LoadState::Loaded);
        assert!(snapshot.page.items.is_empty());
        assert_eq!(snapshot.page.total_count, 20);
        assert!(snapshot.showing().is_empty());
        assert_eq!(snapshot.last_error, None);
        assert_eq!(gateway.calls().last().unwrap().page, 3);
    }

    #[tokio::test]
    async fn test_delete_failure_records_message() {
        let gateway = Arc::new(FakeGateway::with_rows(5));
        let controller = EmployeeListController::new(gateway.clone());
        controller.fetch().await;
        gateway.fail_delete.store(true, Ordering::SeqCst);

        let outcome = controller.delete(1).await;
        assert_eq!(outcome, DeleteOutcome::Failed("Failed to delete employee".to_string()));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.load_state, LoadState::Loaded);
        assert_eq!(snapshot.page.items.len(), 5);
        assert_eq!(snapshot.last_error.as_deref(), Some("Failed to delete employee"));
    }

    #[tokio::test]
    async fn test_refetch_failure_after_delete_is_recoverable() {
        let gateway = Arc::new(FakeGateway::with_rows(5));
        let controller = EmployeeListController::new(gateway.clone());
        controller.fetch().await;
        gateway.fail_list.store(true, Ordering::SeqCst);

        let outcome = controller.delete(1).await;
        assert!(matches!(outcome, DeleteOutcome::Deleted(FetchOutcome::Failed(_))));
        assert_eq!(controller.load_state().await, LoadState::Error);
        assert_eq!(controller.snapshot().await.page.items.len(), 5);

        gateway.fail_list.store(false, Ordering::SeqCst);
        assert_eq!(controller.fetch().await, FetchOutcome::Applied);
        assert_eq!(controller.snapshot().await.page.items.len(), 4);
    }
}
