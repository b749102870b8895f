use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::modules::auth::application::domain::entities::{AdminAccount, NewAccount};
use crate::modules::auth::application::ports::outgoing::{UserRepository, UserRepositoryError};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_account(model: UserModel) -> AdminAccount {
        AdminAccount {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AdminAccount, UserRepositoryError> {
        let now = Utc::now().fixed_offset();
        let active = UserActiveModel {
            id: Set(account.id),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = active.insert(&*self.db).await.map_err(|e| {
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("23505")
                || err_str.contains("duplicate key")
                || err_str.contains("unique constraint")
            {
                return UserRepositoryError::AccountAlreadyExists;
            }
            UserRepositoryError::DatabaseError(e.to_string())
        })?;

        Ok(Self::to_account(inserted))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminAccount>, UserRepositoryError> {
        let user = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(user.map(Self::to_account))
    }
}
