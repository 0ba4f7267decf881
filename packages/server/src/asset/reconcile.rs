use std::collections::HashSet;

use common::storage::BlobStore;
use common::storage::journal::PendingOp;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::AssetError;
use super::service::AssetStore;
use crate::entity::asset;

/// Outcome of a reconciliation pass over one collection.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Interrupted creates whose orphaned blob was deleted.
    pub creates_rolled_back: usize,
    /// Interrupted creates whose row had already been inserted.
    pub creates_kept: usize,
    /// Interrupted removes that were carried through.
    pub removes_completed: usize,
    /// Local rows whose blob is missing. Reported, not repaired.
    pub dangling_records: usize,
    /// Blobs that no row references. Reported, not deleted.
    pub unreferenced_blobs: usize,
}

impl AssetStore {
    /// Replay journal markers left by interrupted operations, then audit
    /// rows against blobs.
    ///
    /// Must run before the store serves requests: a marker of an in-flight
    /// create is indistinguishable from one left by a crash.
    #[instrument(skip(self), fields(collection = %self.collection()))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, AssetError> {
        let mut report = ReconcileReport::default();
        let collection = self.collection().as_str();

        for op in self.journal().pending().await? {
            match &op {
                PendingOp::Create { name } => {
                    let has_row = asset::Entity::find()
                        .filter(asset::Column::Collection.eq(collection))
                        .filter(asset::Column::Url.eq(self.url_for(name)))
                        .one(self.db())
                        .await?
                        .is_some();
                    if has_row {
                        report.creates_kept += 1;
                    } else {
                        self.blobs().delete(name).await?;
                        report.creates_rolled_back += 1;
                        info!(blob = %name, "rolled back interrupted create");
                    }
                }
                PendingOp::Remove { name, record_id } => {
                    self.blobs().delete(name).await?;
                    asset::Entity::delete_many()
                        .filter(asset::Column::Id.eq(*record_id))
                        .filter(asset::Column::Collection.eq(collection))
                        .exec(self.db())
                        .await?;
                    report.removes_completed += 1;
                    info!(blob = %name, record_id, "completed interrupted remove");
                }
            }
            self.journal().clear(op.name()).await?;
        }

        let blobs: HashSet<_> = self.blobs().list().await?.into_iter().collect();
        let mut referenced = HashSet::new();
        for record in self.find_all().await? {
            let Some(name) = self.blob_name_of(&record) else {
                continue;
            };
            if !record.external && !blobs.contains(&name) {
                report.dangling_records += 1;
                warn!(id = record.id, url = %record.url, "record points at a missing blob");
            }
            referenced.insert(name);
        }
        report.unreferenced_blobs = blobs.difference(&referenced).count();

        info!(
            creates_rolled_back = report.creates_rolled_back,
            creates_kept = report.creates_kept,
            removes_completed = report.removes_completed,
            dangling_records = report.dangling_records,
            unreferenced_blobs = report.unreferenced_blobs,
            "reconciliation finished"
        );
        Ok(report)
    }
}
