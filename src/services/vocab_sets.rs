use std::sync::Arc;

use uuid::Uuid;

use crate::db::VocabRepository;
use crate::error::{ClassroomError, StorageContext};
use crate::models::{Batch, UserId, VocabSet};

pub struct SetService {
    store: Arc<dyn VocabRepository>,
}

impl SetService {
    pub fn new(store: Arc<dyn VocabRepository>) -> Self {
        Self { store }
    }

    pub async fn list_sets(&self, user: &UserId) -> Result<Vec<VocabSet>, ClassroomError> {
        self.store
            .fetch_vocab_sets(user)
            .await
            .context("failed to fetch user vocab sets")
    }

    /// Items of a set in set order. Members that were deleted are skipped;
    /// a positive `limit` caps the number of items.
    pub async fn get_set_batch(
        &self,
        user: &UserId,
        set_id: Uuid,
        limit: usize,
    ) -> Result<Batch, ClassroomError> {
        let set = self.require_set(user, set_id).await?;

        let mut vocabs = self
            .store
            .get_multiple_vocabulary(user, &set.vocab_ids)
            .await
            .context("failed to get vocab items for set")?;

        if limit > 0 {
            vocabs.truncate(limit);
        }
        Ok(Batch { vocabs })
    }

    pub async fn add_set(
        &self,
        user: &UserId,
        name: &str,
        vocab_ids: Vec<Uuid>,
    ) -> Result<VocabSet, ClassroomError> {
        let set = VocabSet {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
            vocab_ids,
        };

        self.store
            .upsert_vocab_set(user, set.clone())
            .await
            .context("failed to add vocab set")?;
        tracing::debug!(user_id = %user, set_id = %set.id, "vocab set created");
        Ok(set)
    }

    pub async fn update_set(
        &self,
        user: &UserId,
        set_id: Uuid,
        name: &str,
        vocab_ids: Vec<Uuid>,
    ) -> Result<VocabSet, ClassroomError> {
        let name = validate_name(name)?;
        self.require_set(user, set_id).await?;

        let set = VocabSet {
            id: set_id,
            name,
            vocab_ids,
        };
        self.store
            .upsert_vocab_set(user, set.clone())
            .await
            .context("failed to update vocab set")?;
        Ok(set)
    }

    /// Deletes the set only; member vocabulary is untouched.
    pub async fn remove_set(&self, user: &UserId, set_id: Uuid) -> Result<(), ClassroomError> {
        self.require_set(user, set_id).await?;
        self.store
            .remove_vocab_set(user, set_id)
            .await
            .context("failed to remove vocab set")
    }

    async fn require_set(&self, user: &UserId, set_id: Uuid) -> Result<VocabSet, ClassroomError> {
        self.store
            .get_vocab_set(user, set_id)
            .await
            .context("failed to get vocab set")?
            .ok_or_else(|| ClassroomError::NotFound(format!("vocab set {set_id}")))
    }
}

fn validate_name(name: &str) -> Result<String, ClassroomError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClassroomError::InvalidInput("set name is required".to_string()));
    }
    Ok(name.to_string())
}
