//! Estado de sesión compartido
//!
//! Este módulo define dónde se guarda la sesión autenticada. El servicio
//! de autenticación lee la sesión al arrancar (`load`) y la borra al cerrar
//! sesión (`clear`); nadie más accede a ella.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::auth::Session;
use crate::utils::errors::AppResult;

/// Almacenamiento de sesión inyectable
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> AppResult<Option<Session>>;

    async fn save(&self, session: &Session) -> AppResult<()>;

    async fn clear(&self) -> AppResult<()>;
}

/// Sesión en memoria del proceso
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<RwLock<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(session))),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}

/// Sesión persistida como JSON en disco
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Option<Session>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("❌ Sin sesión guardada en {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => {
                info!("🔑 Sesión restaurada para '{}'", session.user.username);
                Ok(Some(session))
            }
            Err(e) => {
                warn!("⚠️ Sesión corrupta en {}, se ignora: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let serialized = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, serialized).await?;
        debug!("💾 Sesión guardada en {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("🗑️ Sesión eliminada de {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::SessionUser;

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
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

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        FileSessionStore::new(&path).save(&session()).await.unwrap();

        let reloaded = FileSessionStore::new(&path);
        assert_eq!(reloaded.load().await.unwrap(), Some(session()));

        reloaded.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(reloaded.load().await.unwrap(), None);
        reloaded.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(FileSessionStore::new(&path).load().await.unwrap(), None);
    }
}
