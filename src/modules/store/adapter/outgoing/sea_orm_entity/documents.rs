use sea_orm::entity::prelude::*;

use crate::modules::store::application::domain::entities::{strip_reserved, Document, DocumentId};
use crate::modules::store::application::ports::outgoing::DocumentStoreError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,

    pub created_at: Option<DateTimeWithTimeZone>,

    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    pub fn to_document(&self) -> Result<Document, DocumentStoreError> {
        let fields = match &self.data {
            Json::Object(map) => strip_reserved(map.clone()),
            other => {
                return Err(DocumentStoreError::SerializationError(format!(
                    "document {}/{} holds non-object data: {}",
                    self.collection, self.id, other
                )))
            }
        };

        Ok(Document {
            id: DocumentId::new(self.id.clone()),
            fields,
            created_at: self.created_at.map(Into::into),
            updated_at: self.updated_at.map(Into::into),
        })
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        #[cfg(feature = "no_db_triggers")]
        {
            use chrono::Utc;
            use sea_orm::ActiveValue::Set;

            if !_insert {
                self.updated_at = Set(Some(Utc::now().into()));
            }
        }

        Ok(self)
    }
}
