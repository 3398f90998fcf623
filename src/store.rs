//! Group documents in MongoDB.
//!
//! One document per group. Expenses and settlements are appended with
//! `$push`, which is atomic per document, so two members recording at the
//! same time never overwrite each other.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use thiserror::Error;
use tracing::debug;

use crate::schemas::{Expense, Group, Settlement};

const GROUPS_COLLECTION: &str = "Groups";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group `{0}` not found")]
    NotFound(String),
    #[error("group `{0}` already exists")]
    AlreadyExists(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Group>, StoreError>;
    async fn find(&self, id: &str) -> Result<Group, StoreError>;
    async fn insert(&self, group: &Group) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn push_expense(&self, id: &str, expense: &Expense) -> Result<(), StoreError>;
    async fn push_settlement(&self, id: &str, settlement: &Settlement) -> Result<(), StoreError>;
}

pub struct MongoGroupStore {
    groups: Collection<Group>,
}

impl MongoGroupStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let store = MongoGroupStore::new(&client, database);
        store.ensure_indexes().await?;
        Ok(store)
    }

    pub fn new(client: &Client, database: &str) -> Self {
        MongoGroupStore {
            groups: client.database(database).collection(GROUPS_COLLECTION),
        }
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_id = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.groups.create_index(unique_id, None).await?;
        Ok(())
    }

    async fn push(&self, id: &str, update: Document) -> Result<(), StoreError> {
        let result = self.groups.update_one(doc! { "id": id }, update, None).await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GroupStore for MongoGroupStore {
    async fn list(&self) -> Result<Vec<Group>, StoreError> {
        let cursor = self.groups.find(None, None).await?;
        Ok(cursor.try_collect::<Vec<Group>>().await?)
    }

    async fn find(&self, id: &str) -> Result<Group, StoreError> {
        self.groups
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, group: &Group) -> Result<(), StoreError> {
        match self.groups.insert_one(group, None).await {
            Ok(_) => {
                debug!(group = %group.id, "group inserted");
                Ok(())
            }
            Err(err) if is_duplicate_key(&err) => Err(StoreError::AlreadyExists(group.id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = self.groups.delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(group = %id, "group deleted");
        Ok(())
    }

    async fn push_expense(&self, id: &str, expense: &Expense) -> Result<(), StoreError> {
        let expense = bson::to_bson(expense)?;
        self.push(id, doc! { "$push": { "expenses": expense } }).await?;
        debug!(group = %id, "expense appended");
        Ok(())
    }

    async fn push_settlement(&self, id: &str, settlement: &Settlement) -> Result<(), StoreError> {
        let settlement = bson::to_bson(settlement)?;
        self.push(id, doc! { "$push": { "settlements": settlement } })
            .await?;
        debug!(group = %id, "settlement appended");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
