//! Cliente HTTP para la API de empleados
//!
//! Implementa `EmployeeGateway` sobre la API REST y expone las llamadas de
//! autenticación (`auth/login/`, `auth/logout/`, `auth/profile/`,
//! `auth/register/`) que usa `AuthService`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::environment::EnvironmentConfig;
use crate::dto::employee_dto::{
    encode_draft, ChangeStatusRequest, FormPart, ListPage, ListParams, SearchParams,
};
use crate::models::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RegisterRequest, RegisterResponse, RegisteredUser,
    SessionUser,
};
use crate::models::employee::{EmployeeDraft, EmployeeRecord, EmployeeStatistics, EmploymentStatus};
use crate::services::gateway::{
    EmployeeGateway, GatewayError, GatewayResult, CREATE_ERROR, DELETE_ERROR, FETCH_ERROR,
    FETCH_ONE_ERROR, REGISTER_ERROR, SEARCH_ERROR, STATISTICS_ERROR, STATUS_ERROR, UPDATE_ERROR,
};
use crate::state::SessionStore;
use crate::utils::errors::{AppError, AppResult};

/// Cliente HTTP para la API de empleados
#[derive(Clone)]
pub struct EmployeeApiClient {
    client: Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
}

impl EmployeeApiClient {
    /// Crear nuevo cliente HTTP con la URL base configurada
    pub fn new(config: &EnvironmentConfig, sessions: Arc<dyn SessionStore>) -> AppResult<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Añadir el header Authorization si hay sesión
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.sessions.load().await {
            Ok(Some(session)) => request.bearer_auth(session.access_token),
            Ok(None) => request,
            Err(e) => {
                warn!("⚠️ No se pudo leer la sesión: {}", e);
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let request = self.authorized(request).await;
        request.send().await.map_err(|e| {
            error!("❌ Error de red: {}", e);
            GatewayError::from(e)
        })
    }

    /// Construir el formulario multipart desde el borrador
    fn build_form(draft: &EmployeeDraft) -> GatewayResult<Form> {
        let mut form = Form::new();
        for part in encode_draft(draft) {
            form = match part {
                FormPart::Text(name, value) => form.text(name, value),
                FormPart::File(name, picture) => {
                    let file = Part::bytes(picture.bytes)
                        .file_name(picture.file_name)
                        .mime_str(&picture.mime_type)?;
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }

    /// Login: devuelve usuario y tokens
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("auth/login/"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<LoginResponse>().await?);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Login failed. Please try again.")
            .to_string();
        warn!("❌ Login rechazado ({}) para '{}'", status, username);
        Err(AppError::Unauthorized(message))
    }

    /// Logout: invalida el refresh token en el servidor
    pub async fn logout(&self, access_token: &str, refresh_token: &str) -> AppResult<()> {
        let request = LogoutRequest {
            refresh_token: refresh_token.to_string(),
        };

        self.client
            .post(self.url("auth/logout/"))
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Registro de usuario; los errores del serializer vuelven por campo
    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<RegisteredUser> {
        let response = self
            .client
            .post(self.url("auth/register/"))
            .json(request)
            .send()
            .await?;

        let registered: RegisterResponse = parse_response(response, REGISTER_ERROR).await?;
        info!("✅ Usuario '{}' registrado", registered.user.username);
        Ok(registered.user)
    }

    /// Perfil del usuario autenticado
    pub async fn profile(&self, access_token: &str) -> AppResult<SessionUser> {
        let response = self
            .client
            .get(self.url("auth/profile/"))
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        Ok(response.error_for_status()?.json::<SessionUser>().await?)
    }
}

/// Interpretar la respuesta: JSON tipado si 2xx, `GatewayError` si no
async fn parse_response<T: DeserializeOwned>(response: Response, default_message: &str) -> GatewayResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            error!("❌ Respuesta inesperada de la API: {}", e);
            GatewayError::Operational(default_message.to_string())
        });
    }

    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    warn!("⚠️ La API respondió {}: {}", status, body);
    Err(GatewayError::from_body(&body, default_message))
}

#[async_trait]
impl EmployeeGateway for EmployeeApiClient {
    async fn list(&self, params: &ListParams) -> GatewayResult<ListPage> {
        debug!("🔍 Listando empleados: {:?}", params);
        let request = self.client.get(self.url("employees/")).query(&params.to_query());
        let response = self.send(request).await?;

        // La paginación responde 404 "Invalid page." más allá de la última página
        if response.status() == StatusCode::NOT_FOUND && params.page > 1 {
            warn!("📄 Página {} fuera de rango, se devuelve vacía", params.page);
            let first = ListParams {
                page: 1,
                ..params.clone()
            };
            let request = self.client.get(self.url("employees/")).query(&first.to_query());
            let response = self.send(request).await?;
            let page: ListPage = parse_response(response, FETCH_ERROR).await?;
            return Ok(ListPage::past_end(page.count));
        }

        parse_response(response, FETCH_ERROR).await
    }

    async fn get(&self, id: i64) -> GatewayResult<EmployeeRecord> {
        let request = self.client.get(self.url(&format!("employees/{}/", id)));
        let response = self.send(request).await?;
        parse_response(response, FETCH_ONE_ERROR).await
    }

    async fn create(&self, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord> {
        let form = Self::build_form(draft)?;
        let request = self.client.post(self.url("employees/")).multipart(form);
        let response = self.send(request).await?;
        let record: EmployeeRecord = parse_response(response, CREATE_ERROR).await?;
        info!("✅ Empleado {} creado", record.employee_id);
        Ok(record)
    }

    async fn update(&self, id: i64, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord> {
        let form = Self::build_form(draft)?;
        let request = self
            .client
            .put(self.url(&format!("employees/{}/", id)))
            .multipart(form);
        let response = self.send(request).await?;
        let record: EmployeeRecord = parse_response(response, UPDATE_ERROR).await?;
        info!("✅ Empleado {} actualizado", record.employee_id);
        Ok(record)
    }

    async fn partial_update(&self, id: i64, draft: &EmployeeDraft) -> GatewayResult<EmployeeRecord> {
        let form = Self::build_form(draft)?;
        let request = self
            .client
            .patch(self.url(&format!("employees/{}/", id)))
            .multipart(form);
        let response = self.send(request).await?;
        parse_response(response, UPDATE_ERROR).await
    }

    async fn delete(&self, id: i64) -> GatewayResult<()> {
        let request = self.client.delete(self.url(&format!("employees/{}/", id)));
        let response = self.send(request).await?;

        if response.status().is_success() {
            info!("🗑️ Empleado {} eliminado", id);
            return Ok(());
        }

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        warn!("⚠️ Borrado rechazado ({}): {}", status, body);
        Err(GatewayError::from_body(&body, DELETE_ERROR))
    }

    async fn change_status(&self, id: i64, status: EmploymentStatus) -> GatewayResult<EmployeeRecord> {
        let request = self
            .client
            .patch(self.url(&format!("employees/{}/change_status/", id)))
            .json(&ChangeStatusRequest {
                employment_status: status,
            });
        let response = self.send(request).await?;
        parse_response(response, STATUS_ERROR).await
    }

    async fn statistics(&self) -> GatewayResult<EmployeeStatistics> {
        let request = self.client.get(self.url("employees/statistics/"));
        let response = self.send(request).await?;
        parse_response(response, STATISTICS_ERROR).await
    }

    async fn search(&self, params: &SearchParams) -> GatewayResult<ListPage> {
        debug!("🔍 Búsqueda avanzada: {:?}", params);
        let request = self
            .client
            .get(self.url("employees/search_advanced/"))
            .query(&params.to_query());
        let response = self.send(request).await?;
        parse_response(response, SEARCH_ERROR).await
    }
}
