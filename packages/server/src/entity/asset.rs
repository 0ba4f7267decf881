use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning collection ("media" or "documents").
    #[sea_orm(indexed)]
    pub collection: String,

    /// Caller-supplied file name, stored verbatim. Media only.
    pub original_name: Option<String>,

    /// `/uploads/<name>` or `/uploads/documents/<name>`; joins to the blob.
    #[sea_orm(indexed)]
    pub url: String,

    pub is_active: bool,

    /// Bytes live outside the managed upload tree.
    pub external: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
