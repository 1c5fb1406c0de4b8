//! Server state
//!
//! [`ServerState`] holds shared references to every service a request
//! handler needs. `Clone` is shallow (Arc / pool handles), so axum can
//! hand a copy to each request.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::documents::DocumentStore;
use crate::services::bootstrap;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub documents: DocumentStore,
}

impl ServerState {
    /// Initialize the state in order: work dir layout, database
    /// (migrations included), initial admin, services.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::utils::AppError::internal(format!("work dir: {e}")))?;

        let db_path = config.database_dir().join("verdant.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        bootstrap::ensure_initial_admin(&db.pool, config.is_production()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let documents = DocumentStore::new(&config.work_dir);

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            jwt_service,
            documents,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
