use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value as Json;
use tokio::sync::broadcast;

use crate::modules::store::adapter::outgoing::ChangeFeed;
use crate::modules::store::application::domain::entities::{
    strip_reserved, ChangeEvent, ChangeKind, Collection, Document, DocumentId, Fields,
};
use crate::modules::store::application::ports::outgoing::{DocumentStore, DocumentStoreError};

use super::sea_orm_entity::documents::{
    ActiveModel as DocumentActiveModel, Column, Entity as DocumentEntity,
};

/// Documents kept as `jsonb` rows keyed by `(collection, id)`.
///
/// The change feed is process-local: writes made by other processes against
/// the same database are only seen on the next read.
#[derive(Debug, Clone)]
pub struct DocumentStorePostgres {
    db: Arc<DatabaseConnection>,
    feed: ChangeFeed,
}

impl DocumentStorePostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            feed: ChangeFeed::default(),
        }
    }
}

fn db_err(e: sea_orm::DbErr) -> DocumentStoreError {
    DocumentStoreError::DatabaseError(e.to_string())
}

fn key(collection: Collection, id: &DocumentId) -> (String, String) {
    (collection.as_str().to_string(), id.as_str().to_string())
}

#[async_trait]
impl DocumentStore for DocumentStorePostgres {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DocumentStoreError> {
        let models = DocumentEntity::find()
            .filter(Column::Collection.eq(collection.as_str()))
            .filter(Column::CreatedAt.is_not_null())
            .order_by_desc(Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(db_err)?;

        models.iter().map(|m| m.to_document()).collect()
    }

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let model = DocumentEntity::find_by_id(key(collection, id))
            .one(&*self.db)
            .await
            .map_err(db_err)?;

        model.map(|m| m.to_document()).transpose()
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = DocumentId::generate();

        let active = DocumentActiveModel {
            collection: Set(collection.as_str().to_string()),
            id: Set(id.as_str().to_string()),
            data: Set(Json::Object(strip_reserved(fields))),
            created_at: Set(Some(created_at.fixed_offset())),
            updated_at: Set(None),
        };

        active.insert(&*self.db).await.map_err(db_err)?;

        self.feed.publish(collection, &id, ChangeKind::Added);
        Ok(id)
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        let patch = Json::Object(strip_reserved(fields));

        let result = DocumentEntity::update_many()
            .col_expr(
                Column::Data,
                Expr::cust_with_values("data || $1::jsonb", [patch]),
            )
            .col_expr(Column::UpdatedAt, Expr::value(updated_at.fixed_offset()))
            .filter(Column::Collection.eq(collection.as_str()))
            .filter(Column::Id.eq(id.as_str()))
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DocumentStoreError::NotFound);
        }

        self.feed.publish(collection, id, ChangeKind::Modified);
        Ok(())
    }

    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        let active = DocumentActiveModel {
            collection: Set(collection.as_str().to_string()),
            id: Set(id.as_str().to_string()),
            data: Set(Json::Object(strip_reserved(fields))),
            created_at: Set(None),
            updated_at: Set(Some(updated_at.fixed_offset())),
        };

        DocumentEntity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::Collection, Column::Id])
                    .update_columns([Column::Data, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(db_err)?;

        self.feed.publish(collection, id, ChangeKind::Modified);
        Ok(())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let result = DocumentEntity::delete_by_id(key(collection, id))
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            self.feed.publish(collection, id, ChangeKind::Removed);
        }
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}
