//! PostgreSQL store implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use chirp_core::error::StoreError;
use chirp_core::ports::{PostDraft, PostRecord, PostStore, UserRecord, UserStore};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL-backed store.
pub struct PostgresStore {
    db: DbConn,
}

impl PostgresStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(err: DbErr) -> StoreError {
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Connection(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

/// Write failures the adapter reports as rejections rather than errors.
fn is_write_rejection(err: &DbErr) -> bool {
    let text = err.to_string().to_lowercase();
    text.contains("duplicate") || text.contains("unique") || text.contains("foreign key")
}

#[async_trait]
impl PostStore for PostgresStore {
    async fn fetch_by_id(&self, id: &str) -> Result<Vec<PostRecord>, StoreError> {
        tracing::debug!(post_id = %id, "Fetching post by id");

        let rows = PostEntity::find()
            .filter(post::Column::Id.eq(id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_by_parent(&self, parent: &str) -> Result<Vec<PostRecord>, StoreError> {
        let rows = PostEntity::find()
            .filter(post::Column::Parent.eq(parent))
            .order_by_desc(post::Column::CreatedTime)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, draft: PostDraft) -> Result<Option<PostRecord>, StoreError> {
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            author: Set(draft.author),
            content: Set(draft.content),
            created_time: Set(Utc::now().timestamp()),
            modified_time: Set(None),
            parent: Set(draft.parent),
            link: Set(draft.link),
        };

        match model.insert(&self.db).await {
            Ok(stored) => Ok(Some(stored.into())),
            Err(err) if is_write_rejection(&err) => Ok(None),
            Err(err) => Err(map_db_err(err)),
        }
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<bool, StoreError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Content, Expr::value(content))
            .col_expr(
                post::Column::ModifiedTime,
                Expr::value(Utc::now().timestamp()),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_write_rejection(&err) => Ok(false),
            Err(err) => Err(map_db_err(err)),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_write_rejection(&err) => Ok(false),
            Err(err) => Err(map_db_err(err)),
        }
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn fetch_user(&self, identity: &str) -> Result<Vec<UserRecord>, StoreError> {
        tracing::debug!(user_identity = %identity, "Fetching user by identity");

        let rows = UserEntity::find()
            .filter(user::Column::Identity.eq(identity))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
