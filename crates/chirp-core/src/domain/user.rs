use serde::{Deserialize, Serialize};

use crate::domain::reference::Identify;
use crate::error::DomainError;
use crate::ports::Store;

/// User entity - the resolved form of a post's author reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    identity: Option<String>,
    name: String,
}

impl User {
    /// Blank, not-ready user.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the user has a persisted identity.
    pub fn is_ready(&self) -> bool {
        self.identity.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Load by identity. Exactly one matching row hydrates the instance;
    /// zero or many leave it untouched - check `is_ready` afterwards.
    pub async fn load(
        &mut self,
        store: &dyn Store,
        identity: &str,
    ) -> Result<&mut Self, DomainError> {
        let rows = store.fetch_user(identity).await?;
        if let [row] = rows.as_slice() {
            self.identity = Some(row.identity.clone());
            self.name = row.name.clone();
        }
        Ok(self)
    }
}

impl Identify for User {
    fn identity(&self) -> &str {
        self.identity.as_deref().unwrap_or_default()
    }
}
