//! In-memory store implementation - used for tests and store-less setups.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use chirp_core::error::StoreError;
use chirp_core::ports::{PostDraft, PostRecord, PostStore, UserRecord, UserStore};

/// Stored row plus its insertion sequence.
///
/// `created_time` has second resolution, so rows inserted within the same
/// second tie; the sequence keeps newest-first ordering deterministic.
struct StoredPost {
    record: PostRecord,
    seq: u64,
}

#[derive(Default)]
struct State {
    posts: HashMap<String, StoredPost>,
    users: HashMap<String, UserRecord>,
    next_seq: u64,
}

/// In-memory store over HashMaps with an async RwLock.
///
/// Assigns UUIDv4 ids and epoch-second creation times at insert, like the
/// backing database would. Note: data is lost on process restart.
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Seed a user row; author resolution loads through [`UserStore`].
    pub async fn add_user(&self, record: UserRecord) {
        let mut state = self.state.write().await;
        state.users.insert(record.identity.clone(), record);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn fetch_by_id(&self, id: &str) -> Result<Vec<PostRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .get(id)
            .map(|stored| stored.record.clone())
            .into_iter()
            .collect())
    }

    async fn fetch_by_parent(&self, parent: &str) -> Result<Vec<PostRecord>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .posts
            .values()
            .filter(|stored| stored.record.parent.as_deref() == Some(parent))
            .collect();
        rows.sort_by(|a, b| {
            b.record
                .created_time
                .cmp(&a.record.created_time)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|stored| stored.record.clone()).collect())
    }

    async fn insert(&self, draft: PostDraft) -> Result<Option<PostRecord>, StoreError> {
        let mut state = self.state.write().await;
        let record = PostRecord {
            id: Uuid::new_v4().to_string(),
            author: draft.author,
            content: draft.content,
            created_time: Utc::now().timestamp(),
            modified_time: None,
            parent: draft.parent,
            link: draft.link,
        };
        let seq = state.next_seq;
        state.next_seq += 1;
        state.posts.insert(
            record.id.clone(),
            StoredPost {
                record: record.clone(),
                seq,
            },
        );
        Ok(Some(record))
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.posts.get_mut(id) {
            stored.record.content = content.to_string();
            stored.record.modified_time = Some(Utc::now().timestamp());
        }
        // Statement-level success: updating an absent row is not a failure.
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        state.posts.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn fetch_user(&self, identity: &str) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.get(identity).cloned().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chirp_core::domain::{Post, User};

    use super::*;

    async fn store_with_author(identity: &str) -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .add_user(UserRecord {
                identity: identity.into(),
                name: "Ada".into(),
            })
            .await;
        store
    }

    async fn insert_post(store: &InMemoryStore, author: &str, content: &str) -> Post {
        let mut post = Post::new();
        post.set_author_id(author).set_content(content);
        assert!(post.create(store).await.unwrap());
        post
    }

    #[tokio::test]
    async fn test_create_makes_post_ready() {
        let store = store_with_author("u-1").await;

        let mut post = Post::new();
        post.set_author_id("u-1").set_content("hello");
        assert!(!post.is_ready());

        assert!(post.create(&store).await.unwrap());
        assert!(post.is_ready());
        assert!(post.created_at().is_some());
    }

    #[tokio::test]
    async fn test_create_then_load_round_trip() {
        let store = store_with_author("u-1").await;
        let post = insert_post(&store, "u-1", "hello").await;
        let id = post.id().unwrap().to_owned();

        let mut loaded = Post::new();
        loaded.load(&store, &id).await.unwrap();

        assert!(loaded.is_ready());
        assert_eq!(loaded.content(), "hello");
        assert_eq!(loaded.author().unwrap().identifier(), "u-1");
    }

    #[tokio::test]
    async fn test_create_with_resolved_author_persists_identifier() {
        let store = store_with_author("u-1").await;
        let mut user = User::new();
        user.load(&store, "u-1").await.unwrap();
        assert!(user.is_ready());

        let mut post = Post::new();
        post.set_author(user).set_content("hello");
        assert!(post.create(&store).await.unwrap());
        // The reference itself is read, not demoted.
        assert!(post.author().unwrap().is_resolved());

        let mut loaded = Post::new();
        loaded.load(&store, &post.id().unwrap().to_owned()).await.unwrap();
        assert_eq!(loaded.author().unwrap().identifier(), "u-1");
    }

    #[tokio::test]
    async fn test_load_nonexistent_stays_unready() {
        let store = InMemoryStore::new();

        let mut post = Post::new();
        post.load(&store, "nonexistent").await.unwrap();

        assert!(!post.is_ready());
    }

    #[tokio::test]
    async fn test_children_scenario() {
        let store = store_with_author("u-1").await;
        let mut root = insert_post(&store, "u-1", "root").await;

        let mut reply = Post::new();
        reply
            .set_author_id("u-1")
            .set_content("reply")
            .set_parent(root.id().unwrap());
        assert!(reply.create(&store).await.unwrap());

        root.resolve_children(&store).await.unwrap();

        let children = root.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id(), reply.id());
        assert!(children[0].author().unwrap().is_resolved());
        assert_eq!(
            children[0].author().unwrap().as_resolved().unwrap().name(),
            "Ada"
        );
    }

    #[tokio::test]
    async fn test_children_come_newest_first() {
        let store = store_with_author("u-1").await;
        let mut root = insert_post(&store, "u-1", "root").await;
        let root_id = root.id().unwrap().to_owned();

        let mut reply_ids = Vec::new();
        for n in 0..3 {
            let mut reply = Post::new();
            reply
                .set_author_id("u-1")
                .set_content(format!("reply {n}"))
                .set_parent(&*root_id);
            assert!(reply.create(&store).await.unwrap());
            reply_ids.push(reply.id().unwrap().to_owned());
        }

        root.resolve_children(&store).await.unwrap();

        let ordered: Vec<_> = root
            .children()
            .unwrap()
            .iter()
            .filter_map(|c| c.id())
            .collect();
        let expected: Vec<_> = reply_ids.iter().rev().map(String::as_str).collect();
        assert_eq!(ordered, expected);
    }

    #[tokio::test]
    async fn test_replace_updates_content_and_keeps_conflict() {
        let store = store_with_author("u-1").await;
        let root = insert_post(&store, "u-1", "root").await;
        let other = insert_post(&store, "u-1", "other").await;

        let mut post = Post::new();
        post.set_author_id("u-1")
            .set_content("v1")
            .set_parent(root.id().unwrap())
            .set_link(other.id().unwrap());
        assert!(post.create(&store).await.unwrap());
        assert!(post.is_conflict());

        post.set_content("v2");
        assert!(post.replace(&store).await.unwrap());
        assert!(post.is_conflict());

        let mut loaded = Post::new();
        loaded.load(&store, &post.id().unwrap().to_owned()).await.unwrap();
        assert_eq!(loaded.content(), "v2");
        assert!(loaded.modified_at().is_some());
        assert!(loaded.is_conflict());
    }

    #[tokio::test]
    async fn test_reload_discards_resolution() {
        let store = store_with_author("u-1").await;
        let mut post = insert_post(&store, "u-1", "hello").await;
        let id = post.id().unwrap().to_owned();

        // A fresh loaded copy, fully resolved.
        let mut loaded = Post::new();
        loaded.load(&store, &id).await.unwrap();
        loaded.resolve_author(&store).await.unwrap();
        loaded.resolve_children(&store).await.unwrap();
        assert!(loaded.author().unwrap().is_resolved());
        assert!(loaded.children().is_some());

        post.set_content("edited");
        post.replace(&store).await.unwrap();

        loaded.reload(&store).await.unwrap();
        assert_eq!(loaded.content(), "edited");
        assert!(!loaded.author().unwrap().is_resolved());
        assert!(loaded.children().is_none());
    }

    #[tokio::test]
    async fn test_destroy_removes_row_but_not_fields() {
        let store = store_with_author("u-1").await;
        let post = insert_post(&store, "u-1", "doomed").await;
        let id = post.id().unwrap().to_owned();

        assert!(post.destroy(&store).await.unwrap());
        // In-memory state survives; the caller discards the object.
        assert!(post.is_ready());

        let mut gone = Post::new();
        gone.load(&store, &id).await.unwrap();
        assert!(!gone.is_ready());
    }

    #[tokio::test]
    async fn test_resolve_parent_one_hop() {
        let store = store_with_author("u-1").await;
        let root = insert_post(&store, "u-1", "root").await;

        let mut reply = Post::new();
        reply
            .set_author_id("u-1")
            .set_content("reply")
            .set_parent(root.id().unwrap());
        assert!(reply.create(&store).await.unwrap());

        reply.resolve_parent(&store).await.unwrap();
        let parent = reply.parent().unwrap().as_resolved().unwrap();
        assert_eq!(parent.content(), "root");
        // One hop only: the parent's own relations stay unresolved.
        assert!(parent.children().is_none());
    }
}
