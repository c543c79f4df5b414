pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Pool, UserId, Vocab, VocabSet};

pub use memory::MemoryStore;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-user document storage for vocabulary, the practice pool and vocab sets.
///
/// Lookups return `Ok(None)` for missing documents; errors are reserved for
/// backend failures.
#[async_trait]
pub trait VocabRepository: Send + Sync {
    async fn fetch_all_vocabulary(&self, user: &UserId) -> StoreResult<Vec<Vocab>>;

    async fn upsert_vocabulary(&self, user: &UserId, vocab: Vocab) -> StoreResult<()>;

    async fn remove_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<()>;

    async fn get_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<Option<Vocab>>;

    /// Present items in the order of `vocab_ids`; missing ids are skipped.
    async fn get_multiple_vocabulary(
        &self,
        user: &UserId,
        vocab_ids: &[Uuid],
    ) -> StoreResult<Vec<Vocab>> {
        let mut out = Vec::with_capacity(vocab_ids.len());
        for id in vocab_ids {
            if let Some(vocab) = self.get_vocabulary(user, *id).await? {
                out.push(vocab);
            }
        }
        Ok(out)
    }

    async fn fetch_pool(&self, user: &UserId) -> StoreResult<Option<Pool>>;

    async fn replace_pool(&self, user: &UserId, pool: Pool) -> StoreResult<()>;

    async fn fetch_vocab_sets(&self, user: &UserId) -> StoreResult<Vec<VocabSet>>;

    async fn get_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<Option<VocabSet>>;

    async fn upsert_vocab_set(&self, user: &UserId, set: VocabSet) -> StoreResult<()>;

    async fn remove_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<()>;
}
