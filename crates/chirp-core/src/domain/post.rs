use serde::{Deserialize, Serialize};

use crate::domain::reference::{EntityRef, Identify};
use crate::domain::user::User;
use crate::error::DomainError;
use crate::ports::{PostDraft, PostRecord, Store};

/// Post entity - a threaded micro-post.
///
/// A post replies to at most one `parent` and reposts at most one `link`;
/// both relations and the author are [`EntityRef`]s that hydrate lazily
/// through the store ports. `children` stays absent until explicitly
/// resolved - absent means "not loaded", not "no replies".
///
/// The parent and link fields holding both relations at once is the
/// *conflict* state; it is detectable via [`Post::is_conflict`] but never
/// auto-corrected here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    id: Option<String>,
    author: Option<EntityRef<User>>,
    content: String,
    created_at: Option<i64>,
    modified_at: Option<i64>,
    parent: Option<Box<EntityRef<Post>>>,
    link: Option<Box<EntityRef<Post>>>,
    children: Option<Vec<Post>>,
}

impl Post {
    /// Blank skeleton, destined for [`Post::create`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Row-hydrated instance: scalar fields set, references unresolved,
    /// children not loaded.
    pub fn from_record(record: PostRecord) -> Self {
        Self {
            id: Some(record.id),
            author: Some(EntityRef::Unresolved(record.author)),
            content: record.content,
            created_at: Some(record.created_time),
            modified_at: record.modified_time,
            parent: record.parent.map(|id| Box::new(EntityRef::Unresolved(id))),
            link: record.link.map(|id| Box::new(EntityRef::Unresolved(id))),
            children: None,
        }
    }

    /// True once the post has a persisted identity.
    pub fn is_ready(&self) -> bool {
        self.id.is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    pub fn author(&self) -> Option<&EntityRef<User>> {
        self.author.as_ref()
    }

    pub fn parent(&self) -> Option<&EntityRef<Post>> {
        self.parent.as_deref()
    }

    pub fn link(&self) -> Option<&EntityRef<Post>> {
        self.link.as_deref()
    }

    /// Replies, newest first. `None` until [`Post::resolve_children`] ran.
    pub fn children(&self) -> Option<&[Post]> {
        self.children.as_deref()
    }

    /// True iff both the reply-parent and the repost-link are present.
    pub fn is_conflict(&self) -> bool {
        self.parent.is_some() && self.link.is_some()
    }

    /// Identifier-normalized author comparison: the result is the same
    /// whether the author reference is resolved or not. False when either
    /// side has no identity yet.
    pub fn is_author(&self, candidate: &User) -> bool {
        let candidate_id = candidate.identity();
        !candidate_id.is_empty()
            && self
                .author
                .as_ref()
                .is_some_and(|author| author.identifier() == candidate_id)
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    /// Set the author in resolved form.
    pub fn set_author(&mut self, author: User) -> &mut Self {
        self.author = Some(EntityRef::Resolved(author));
        self
    }

    /// Set the author in identifier form.
    pub fn set_author_id(&mut self, identity: impl Into<String>) -> &mut Self {
        self.author = Some(EntityRef::Unresolved(identity.into()));
        self
    }

    /// Mark this post as a reply to `id`.
    pub fn set_parent(&mut self, id: impl Into<String>) -> &mut Self {
        self.parent = Some(Box::new(EntityRef::Unresolved(id.into())));
        self
    }

    /// Mark this post as a repost of `id`.
    pub fn set_link(&mut self, id: impl Into<String>) -> &mut Self {
        self.link = Some(Box::new(EntityRef::Unresolved(id.into())));
        self
    }

    /// Load by identifier. Exactly one matching row hydrates the instance;
    /// zero or many rows leave it untouched - check `is_ready` afterwards.
    pub async fn load(&mut self, store: &dyn Store, id: &str) -> Result<&mut Self, DomainError> {
        let rows = store.fetch_by_id(id).await?;
        if let [row] = rows.as_slice() {
            *self = Post::from_record(row.clone());
        }
        Ok(self)
    }

    /// Re-run [`Post::load`] with the instance's own id, overwriting every
    /// field with the latest persisted state and discarding any resolved
    /// relations or children.
    pub async fn reload(&mut self, store: &dyn Store) -> Result<&mut Self, DomainError> {
        let id = self.id.clone().ok_or(DomainError::NotReady)?;
        self.load(store, &id).await
    }

    /// Persist a new row. The store assigns the id and creation timestamp;
    /// on success the instance adopts them and becomes ready.
    ///
    /// The author is persisted in identifier form whichever form the field
    /// holds; an already-resolved reference is read, not demoted.
    /// `Ok(false)` signals a write the adapter rejected without failing.
    pub async fn create(&mut self, store: &dyn Store) -> Result<bool, DomainError> {
        if self.content.is_empty() {
            return Err(DomainError::MissingField("content"));
        }
        let author = match self.author.as_ref() {
            Some(author) if !author.identifier().is_empty() => author.identifier().to_owned(),
            _ => return Err(DomainError::MissingField("author")),
        };

        let draft = PostDraft {
            author,
            content: self.content.clone(),
            parent: self.parent.as_ref().map(|r| r.identifier().to_owned()),
            link: self.link.as_ref().map(|r| r.identifier().to_owned()),
        };

        match store.insert(draft).await? {
            Some(row) => {
                self.id = Some(row.id);
                self.created_at = Some(row.created_time);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the current content; the store stamps `modified_time`. All
    /// other columns are left untouched, so a conflict survives a replace.
    pub async fn replace(&mut self, store: &dyn Store) -> Result<bool, DomainError> {
        let id = self.id.as_deref().ok_or(DomainError::NotReady)?;
        Ok(store.update_content(id, &self.content).await?)
    }

    /// Delete the persisted row. In-memory fields are left as-is; the caller
    /// discards the object.
    pub async fn destroy(&self, store: &dyn Store) -> Result<bool, DomainError> {
        let id = self.id.as_deref().ok_or(DomainError::NotReady)?;
        Ok(store.delete(id).await?)
    }

    /// Resolve the author reference; no-op once resolved. A missing user row
    /// leaves the reference unresolved, keeping the identifier.
    pub async fn resolve_author(&mut self, store: &dyn Store) -> Result<&mut Self, DomainError> {
        if let Some(author) = self.author.as_mut() {
            author
                .resolve_with(|identity| async move {
                    let mut user = User::new();
                    user.load(store, &identity).await?;
                    Ok::<_, DomainError>(user.is_ready().then_some(user))
                })
                .await?;
        }
        Ok(self)
    }

    /// Resolve the reply-parent reference; no-op when absent or resolved.
    pub async fn resolve_parent(&mut self, store: &dyn Store) -> Result<&mut Self, DomainError> {
        if let Some(parent) = self.parent.as_deref_mut() {
            Self::resolve_post_ref(parent, store).await?;
        }
        Ok(self)
    }

    /// Resolve the repost-link reference; no-op when absent or resolved.
    pub async fn resolve_link(&mut self, store: &dyn Store) -> Result<&mut Self, DomainError> {
        if let Some(link) = self.link.as_deref_mut() {
            Self::resolve_post_ref(link, store).await?;
        }
        Ok(self)
    }

    /// Resolve the replies to this post, newest first; no-op once resolved,
    /// including when resolved to empty.
    ///
    /// Each child's author is resolved eagerly: children are typically
    /// displayed immediately with author identity.
    pub async fn resolve_children(&mut self, store: &dyn Store) -> Result<&mut Self, DomainError> {
        if self.children.is_some() {
            return Ok(self);
        }
        let id = self.id.clone().ok_or(DomainError::NotReady)?;

        let rows = store.fetch_by_parent(&id).await?;
        let mut children = Vec::with_capacity(rows.len());
        for row in rows {
            let mut child = Post::from_record(row);
            child.resolve_author(store).await?;
            children.push(child);
        }
        self.children = Some(children);
        Ok(self)
    }

    async fn resolve_post_ref(
        reference: &mut EntityRef<Post>,
        store: &dyn Store,
    ) -> Result<(), DomainError> {
        reference
            .resolve_with(|id| async move {
                let mut post = Post::new();
                post.load(store, &id).await?;
                Ok::<_, DomainError>(post.is_ready().then_some(post))
            })
            .await?;
        Ok(())
    }
}

impl Identify for Post {
    fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}
