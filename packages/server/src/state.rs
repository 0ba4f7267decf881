use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::asset::{AssetError, AssetStore, Collection, ReconcileReport};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub media: Arc<AssetStore>,
    pub documents: Arc<AssetStore>,
}

impl AppState {
    /// Open both collections against the configured upload root.
    pub async fn init(config: AppConfig, db: DatabaseConnection) -> Result<Self, AssetError> {
        let root = config.storage.root.as_path();
        let media = AssetStore::open(
            db.clone(),
            root,
            Collection::Media,
            config.media.clone(),
        )
        .await?;
        let documents = AssetStore::open(
            db,
            root,
            Collection::Documents,
            config.documents.clone(),
        )
        .await?;

        Ok(Self {
            config: Arc::new(config),
            media: Arc::new(media),
            documents: Arc::new(documents),
        })
    }

    /// Reconcile every collection. Call once before serving.
    pub async fn reconcile(&self) -> Result<Vec<(Collection, ReconcileReport)>, AssetError> {
        let mut reports = Vec::with_capacity(2);
        for store in [&self.media, &self.documents] {
            reports.push((store.collection(), store.reconcile().await?));
        }
        Ok(reports)
    }
}
