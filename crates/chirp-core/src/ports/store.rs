use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Raw persisted shape of a post row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_time: i64,
    pub modified_time: Option<i64>,
    pub parent: Option<String>,
    pub link: Option<String>,
}

/// Insert payload for a new post. The store assigns `id` and `created_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub author: String,
    pub content: String,
    pub parent: Option<String>,
    pub link: Option<String>,
}

/// Raw persisted shape of a user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub identity: String,
    pub name: String,
}

/// Post persistence port.
///
/// Implementations must use parameterized queries and report connectivity
/// failures as errors; an empty result set is a successful fetch.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All rows whose id equals `id`.
    async fn fetch_by_id(&self, id: &str) -> Result<Vec<PostRecord>, StoreError>;

    /// All rows whose parent equals `parent`, newest first.
    async fn fetch_by_parent(&self, parent: &str) -> Result<Vec<PostRecord>, StoreError>;

    /// Insert a new row and return it as stored, with the assigned id and
    /// creation time. `Ok(None)` means the store rejected the write.
    async fn insert(&self, draft: PostDraft) -> Result<Option<PostRecord>, StoreError>;

    /// Update content and stamp `modified_time` for `id`.
    async fn update_content(&self, id: &str, content: &str) -> Result<bool, StoreError>;

    /// Delete the row `id`.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// User lookup port - the load path the author reference resolves through.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All rows whose identity equals `identity`.
    async fn fetch_user(&self, identity: &str) -> Result<Vec<UserRecord>, StoreError>;
}

/// The single store handle entity operations borrow.
pub trait Store: PostStore + UserStore {}

impl<T: PostStore + UserStore> Store for T {}
