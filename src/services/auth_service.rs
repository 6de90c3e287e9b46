use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clients::employee_api_client::EmployeeApiClient;
use crate::models::auth::{RegisterRequest, RegisteredUser, Session, SessionUser};
use crate::services::gateway::GatewayResult;
use crate::state::SessionStore;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{is_token_expired, read_claims};

/// Usuario actual visto por el resto del cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
}

/// Colaborador de autenticación: sólo controla el acceso
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn is_authenticated(&self) -> bool;

    async fn current_user(&self) -> Option<CurrentUser>;
}

/// ¿Sigue siendo usable la sesión? Un token ilegible no se da por caducado;
/// el servidor tiene la última palabra.
fn session_is_live(session: &Session) -> bool {
    match read_claims(&session.access_token) {
        Ok(claims) => !is_token_expired(&claims, Utc::now()),
        Err(_) => !session.access_token.is_empty(),
    }
}

/// Servicio de autenticación
pub struct AuthService {
    api: EmployeeApiClient,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
}

impl AuthService {
    /// Inicializar leyendo la sesión persistida
    pub async fn init(api: EmployeeApiClient, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let session = store.load().await?;
        if let Some(session) = &session {
            info!("🔑 Sesión previa encontrada para '{}'", session.user.username);
        }

        Ok(Self {
            api,
            store,
            session: RwLock::new(session),
        })
    }

    /// Autentica un usuario y persiste la sesión
    pub async fn login(&self, username: &str, password: &str) -> AppResult<SessionUser> {
        let response = self.api.login(username, password).await?;
        let session = Session::from(response);

        self.store.save(&session).await?;
        let user = session.user.clone();
        *self.session.write().await = Some(session);

        info!("✅ Login correcto para '{}' (admin: {})", user.username, user.is_admin);
        Ok(user)
    }

    /// Alta de un usuario nuevo; no inicia sesión
    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<RegisteredUser> {
        self.api.register(request).await
    }

    /// Cierra la sesión; el estado local se borra aunque falle la llamada remota
    pub async fn logout(&self) -> AppResult<()> {
        let session = self.session.write().await.take();

        if let Some(session) = &session {
            if let Err(e) = self
                .api
                .logout(&session.access_token, &session.refresh_token)
                .await
            {
                warn!("⚠️ Error en logout remoto: {}", e);
            }
        }

        self.store.clear().await?;
        info!("👋 Sesión cerrada");
        Ok(())
    }

    /// Comprobar la sesión restaurada contra `auth/profile/`
    pub async fn verify_session(&self) -> AppResult<Option<SessionUser>> {
        let access_token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => return Ok(None),
        };

        match self.api.profile(&access_token).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::Unauthorized(_)) => {
                warn!("⏰ Sesión caducada, se descarta");
                *self.session.write().await = None;
                self.store.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Authenticator for AuthService {
    async fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .map(session_is_live)
            .unwrap_or(false)
    }

    async fn current_user(&self) -> Option<CurrentUser> {
        self.session.read().await.as_ref().map(|session| CurrentUser {
            username: session.user.username.clone(),
            is_admin: session.user.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::EnvironmentConfig;
    use crate::state::MemorySessionStore;
    use crate::utils::jwt::AccessClaims;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(exp: i64) -> String {
        let claims = AccessClaims {
            exp,
            user_id: Some(1),
            token_type: Some("access".to_string()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap()
    }

    fn session(access_token: String) -> Session {
        Session {
            access_token,
            refresh_token: "refresh".to_string(),
            user: SessionUser {
                id: 1,
                username: "admin".to_string(),
                email: None,
                first_name: None,
                last_name: None,
                is_admin: true,
            },
        }
    }

    async fn service(store: MemorySessionStore) -> AuthService {
        let config = EnvironmentConfig {
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            request_timeout_secs: 2,
            ..EnvironmentConfig::default()
        };
        let store: Arc<dyn SessionStore> = Arc::new(store);
        let api = EmployeeApiClient::new(&config, store.clone()).unwrap();
        AuthService::init(api, store).await.unwrap()
    }

    #[tokio::test]
    async fn test_no_session_is_not_authenticated() {
        let auth = service(MemorySessionStore::new()).await;
        assert!(!auth.is_authenticated().await);
        assert_eq!(auth.current_user().await, None);
    }

    #[tokio::test]
    async fn test_restored_session_is_authenticated() {
        let store = MemorySessionStore::with_session(session(token(4_000_000_000)));
        let auth = service(store).await;

        assert!(auth.is_authenticated().await);
        assert_eq!(
            auth.current_user().await,
            Some(CurrentUser {
                username: "admin".to_string(),
                is_admin: true
            })
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_not_authenticated() {
        let store = MemorySessionStore::with_session(session(token(1_000)));
        let auth = service(store).await;

        assert!(!auth.is_authenticated().await);
        assert!(auth.current_user().await.is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_store_even_if_server_unreachable() {
        let store = MemorySessionStore::with_session(session(token(4_000_000_000)));
        let auth = service(store.clone()).await;

        auth.logout().await.unwrap();

        assert!(!auth.is_authenticated().await);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_failure_is_operational_and_keeps_logged_out() {
        let auth = service(MemorySessionStore::new()).await;
        let request = RegisterRequest {
            username: "grace".to_string(),
            password: "s3cret-pass".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        };

        let result = auth.register(&request).await;
        assert!(matches!(
            result,
            Err(crate::services::gateway::GatewayError::Operational(_))
        ));
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_logged_out() {
        let store = MemorySessionStore::new();
        let auth = service(store.clone()).await;

        assert!(auth.login("admin", "wrong").await.is_err());
        assert!(!auth.is_authenticated().await);
        assert_eq!(store.load().await.unwrap(), None);
    }
}
