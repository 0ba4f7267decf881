use std::path::{Path, PathBuf};

use chrono::Utc;
use common::storage::filesystem::FilesystemBlobStore;
use common::storage::journal::{Journal, PendingOp};
use common::storage::{BlobName, BlobStore};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{error, info, instrument, warn};

use super::content_type;
use super::error::AssetError;
use super::policy::{AssetPolicy, Collection};
use super::validator::UploadValidator;
use crate::entity::asset;

/// MIME type assumed when an upload does not declare one.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
}

/// Bytes of a stored blob, with the content type when the collection
/// resolves one.
#[derive(Debug)]
pub struct AssetFile {
    pub name: BlobName,
    pub bytes: Vec<u8>,
    pub content_type: Option<&'static str>,
}

/// Partial update of an asset row. `None` leaves a field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssetPatch {
    pub original_name: Option<Option<String>>,
    pub url: Option<String>,
    pub is_active: Option<bool>,
    pub external: Option<bool>,
}

/// One collection of assets: a blob directory plus the matching rows.
pub struct AssetStore {
    db: DatabaseConnection,
    collection: Collection,
    policy: AssetPolicy,
    blobs: FilesystemBlobStore,
    journal: Journal,
}

impl AssetStore {
    /// Provision `{upload_root}/{policy.subdirectory}` and open the store.
    pub async fn open(
        db: DatabaseConnection,
        upload_root: &Path,
        collection: Collection,
        policy: AssetPolicy,
    ) -> Result<Self, AssetError> {
        policy.validate().map_err(AssetError::Validation)?;

        let subdirectory = policy.subdirectory.trim_matches('/');
        let dir: PathBuf = if subdirectory.is_empty() {
            upload_root.to_path_buf()
        } else {
            upload_root.join(subdirectory)
        };

        let blobs = FilesystemBlobStore::open(dir).await?;
        let journal = blobs.journal();
        info!(%collection, root = %blobs.root().display(), "asset store ready");

        Ok(Self {
            db,
            collection,
            policy,
            blobs,
            journal,
        })
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub(super) fn blobs(&self) -> &FilesystemBlobStore {
        &self.blobs
    }

    pub(super) fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(super) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Validate, write the blob, then insert its row.
    ///
    /// A create marker brackets both effects. If the insert fails the blob
    /// is removed again; if that also fails the marker is left for
    /// [`reconcile`](Self::reconcile).
    #[instrument(skip(self, file), fields(collection = %self.collection))]
    pub async fn create(&self, file: Option<UploadedFile>) -> Result<asset::Model, AssetError> {
        let file = file
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AssetError::Validation("File is required".into()))?;
        let mime_type = file.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
        UploadValidator::from_policy(&self.policy).check(mime_type)?;

        let extension = self.extension_for(&file, mime_type);
        let name = BlobName::generate(extension.as_deref());

        self.journal
            .begin(&PendingOp::Create { name: name.clone() })
            .await?;

        if let Err(e) = self.blobs.put(&name, &file.bytes).await {
            self.clear_marker(&name).await;
            return Err(e.into());
        }

        let now = Utc::now();
        let original_name = if self.policy.record_original_name {
            file.original_name
        } else {
            None
        };
        let record = asset::ActiveModel {
            collection: Set(self.collection.as_str().to_string()),
            original_name: Set(original_name),
            url: Set(self.url_for(&name)),
            is_active: Set(true),
            external: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = match record.insert(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                self.compensate_create(&name).await;
                return Err(e.into());
            }
        };
        self.clear_marker(&name).await;

        info!(id = model.id, url = %model.url, size = file.bytes.len(), "asset created");
        Ok(model)
    }

    /// Every row of the collection, inactive ones included.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn find_all(&self) -> Result<Vec<asset::Model>, AssetError> {
        Ok(asset::Entity::find()
            .filter(asset::Column::Collection.eq(self.collection.as_str()))
            .order_by_asc(asset::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn find_one(&self, id: i32) -> Result<asset::Model, AssetError> {
        asset::Entity::find_by_id(id)
            .filter(asset::Column::Collection.eq(self.collection.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Read a stored blob by bare name or by its record `url`.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn get_file(&self, requested: &str) -> Result<AssetFile, AssetError> {
        let name = self.resolve_name(requested)?;
        if !self.blobs.exists(&name).await? {
            return Err(AssetError::NotFound("File not found".into()));
        }

        let content_type = if self.policy.resolve_content_type {
            Some(content_type::resolve(name.as_str())?)
        } else {
            None
        };

        let bytes = self.blobs.get(&name).await?;
        Ok(AssetFile {
            name,
            bytes,
            content_type,
        })
    }

    /// Apply `patch`. A new `url` is not checked against the blob store.
    #[instrument(skip(self, patch), fields(collection = %self.collection))]
    pub async fn update(&self, id: i32, patch: AssetPatch) -> Result<asset::Model, AssetError> {
        let existing = self.find_one(id).await?;
        if patch == AssetPatch::default() {
            return Ok(existing);
        }
        self.write_patch(existing, patch).await
    }

    /// A row removed after `existing` was read is `NotFound`.
    async fn write_patch(
        &self,
        existing: asset::Model,
        patch: AssetPatch,
    ) -> Result<asset::Model, AssetError> {
        let id = existing.id;
        let mut active: asset::ActiveModel = existing.into();
        if let Some(original_name) = patch.original_name {
            active.original_name = Set(original_name);
        }
        if let Some(url) = patch.url {
            active.url = Set(url);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(external) = patch.external {
            active.external = Set(external);
        }
        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) => Err(self.not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the row, and the blob first when the policy says so.
    ///
    /// Returns the deleted row.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn remove(&self, id: i32) -> Result<asset::Model, AssetError> {
        let existing = self.find_one(id).await?;

        let name = self
            .policy
            .delete_blob_on_remove
            .then(|| self.blob_name_of(&existing))
            .flatten();

        let Some(name) = name else {
            asset::Entity::delete_by_id(id).exec(&self.db).await?;
            info!(id, "asset record removed");
            return Ok(existing);
        };

        self.journal
            .begin(&PendingOp::Remove {
                name: name.clone(),
                record_id: id,
            })
            .await?;

        if let Err(e) = self.blobs.delete(&name).await {
            self.clear_marker(&name).await;
            return Err(e.into());
        }

        // On failure the marker stays so reconciliation can finish the delete.
        asset::Entity::delete_by_id(id).exec(&self.db).await?;
        self.clear_marker(&name).await;

        info!(id, blob = %name, "asset removed");
        Ok(existing)
    }

    /// The URL a record uses to reference `name`.
    pub fn url_for(&self, name: &BlobName) -> String {
        format!("{}/{name}", self.policy.url_prefix())
    }

    /// The managed blob a record points at, if its url is inside this
    /// collection's directory.
    pub fn blob_name_of(&self, record: &asset::Model) -> Option<BlobName> {
        let prefix = format!("{}/", self.policy.url_prefix());
        let rest = record.url.strip_prefix(&prefix)?;
        BlobName::parse(rest).ok()
    }

    fn resolve_name(&self, requested: &str) -> Result<BlobName, AssetError> {
        let requested = requested.trim();
        let prefix = format!("{}/", self.policy.url_prefix());
        let bare = requested.strip_prefix(&prefix).unwrap_or(requested);
        Ok(BlobName::parse(bare)?)
    }

    fn extension_for(&self, file: &UploadedFile, mime_type: &str) -> Option<String> {
        if !self.policy.keep_extension {
            return None;
        }
        file.original_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .and_then(common::storage::normalize_extension)
            .or_else(|| {
                let essence = mime_type.split(';').next().unwrap_or_default().trim();
                content_type::preferred_extension(essence).map(str::to_string)
            })
    }

    fn not_found(&self, id: i32) -> AssetError {
        AssetError::NotFound(format!("{} with ID {id} not found", self.collection.label()))
    }

    async fn compensate_create(&self, name: &BlobName) {
        match self.blobs.delete(name).await {
            Ok(_) => self.clear_marker(name).await,
            Err(e) => error!(
                blob = %name,
                "failed to remove blob after insert failure, leaving it for reconciliation: {e}"
            ),
        }
    }

    async fn clear_marker(&self, name: &BlobName) {
        if let Err(e) = self.journal.clear(name).await {
            warn!(blob = %name, "failed to clear journal marker: {e}");
        }
    }
}
