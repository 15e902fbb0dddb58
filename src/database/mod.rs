pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{AttachmentRepository, CandidateRepository};

/// Both repositories backed by one store, so the candidate service can
/// cascade into co-located attachments.
#[derive(Clone)]
pub struct Repositories {
    pub candidates: Arc<dyn CandidateRepository>,
    pub attachments: Arc<dyn AttachmentRepository>,
}

impl Repositories {
    pub fn from_store<S>(store: S) -> Self
    where
        S: CandidateRepository + AttachmentRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            candidates: store.clone(),
            attachments: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(MemoryStore::new())
    }
}

/// Postgres when `DATABASE_URL` is set (migrations applied on startup),
/// otherwise a process-local in-memory store.
pub async fn open(config: &Config) -> Result<Repositories> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = pool::create_pool(config, url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Connected to Postgres, migrations applied");
            Ok(Repositories::from_store(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Ok(Repositories::in_memory())
        }
    }
}
