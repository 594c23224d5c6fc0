use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{Document, DocumentStore, StoreResult, StoredDocument, Value, auto_id};
use crate::{
    clock::Clock,
    db::entities::{document, prelude::StoredDocument as DocumentRow},
};

/// Document store on a relational database: one `documents` row per
/// document, with the body kept as JSON.
pub struct SqlDocumentStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SqlDocumentStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    async fn find_row(&self, collection: &str, id: &str) -> StoreResult<Option<document::Model>> {
        Ok(DocumentRow::find()
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::DocId.eq(id))
            .one(&self.db)
            .await?)
    }

    async fn insert_row(&self, collection: &str, id: &str, mut data: Document) -> StoreResult<()> {
        let now = self.clock.now();
        data.resolve_server_timestamps(now);
        let now = now.fixed_offset();
        let model = document::ActiveModel {
            id: Set(Uuid::new_v4()),
            collection: Set(collection.to_string()),
            doc_id: Set(id.to_string()),
            data: Set(data.to_json()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn rows(&self, collection: &str) -> StoreResult<Vec<document::Model>> {
        Ok(DocumentRow::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by_asc(document::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[async_trait]
impl DocumentStore for SqlDocumentStore {
    fn backend(&self) -> &'static str {
        "sql"
    }

    async fn set(&self, collection: &str, id: &str, mut data: Document) -> StoreResult<()> {
        let Some(existing) = self.find_row(collection, id).await? else {
            return self.insert_row(collection, id, data).await;
        };

        let now = self.clock.now();
        data.resolve_server_timestamps(now);
        let mut active = existing.into_active_model();
        active.data = Set(data.to_json());
        active.updated_at = Set(now.fixed_offset());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn add(&self, collection: &str, data: Document) -> StoreResult<String> {
        let id = auto_id();
        self.insert_row(collection, &id, data).await?;
        Ok(id)
    }

    async fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut query = DocumentRow::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by_asc(document::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit as u64);
        }
        let rows = query.all(&self.db).await?;
        Ok(rows.iter().map(to_stored).collect())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        // JSON operators differ per database; the seed collections are small
        // enough to filter after loading.
        let wanted = value.to_json();
        Ok(self
            .rows(collection)
            .await?
            .iter()
            .filter(|row| row.data.get(field) == Some(&wanted))
            .take(limit.unwrap_or(usize::MAX))
            .map(to_stored)
            .collect())
    }
}

fn to_stored(row: &document::Model) -> StoredDocument {
    let data = match Value::from_json(&row.data) {
        Value::Map(document) => document,
        _ => Document::new(),
    };
    StoredDocument {
        id: row.doc_id.clone(),
        data,
    }
}
