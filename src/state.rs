use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::{Config, PoolSettings};
use crate::db::{MemoryStore, VocabRepository};
use crate::error::ClassroomError;
use crate::models::{Batch, BatchResult, UserId, Vocab, VocabSet};
use crate::random::{RandomSource, StdRandom};
use crate::services::dictionary::Dictionary;
use crate::services::vocab_sets::SetService;
use crate::services::word_pool::WordPool;

/// Entry point for the request-handling layer. Cheap to clone; every
/// operation is scoped to the given user.
#[derive(Clone)]
pub struct ClassroomState {
    dictionary: Arc<Dictionary>,
    word_pool: Arc<WordPool>,
    sets: Arc<SetService>,
}

impl ClassroomState {
    pub fn new(
        store: Arc<dyn VocabRepository>,
        rng: Arc<dyn RandomSource>,
        settings: PoolSettings,
    ) -> Self {
        Self {
            dictionary: Arc::new(Dictionary::new(Arc::clone(&store))),
            word_pool: Arc::new(WordPool::new(Arc::clone(&store), rng, settings)),
            sets: Arc::new(SetService::new(store)),
        }
    }

    /// In-memory store and an OS-seeded generator, unless `RNG_SEED` pins it.
    pub fn from_config(config: &Config) -> Self {
        let rng: Arc<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Arc::new(StdRandom::from_seed(seed)),
            None => Arc::new(StdRandom::new()),
        };
        tracing::info!(
            pool_ttl_hours = config.pool.ttl.num_hours(),
            batch_size = config.pool.batch_size,
            seeded = config.rng_seed.is_some(),
            "classroom initialized"
        );
        Self::new(Arc::new(MemoryStore::new()), rng, config.pool)
    }

    pub async fn add_word(&self, user: &UserId, vocab: Vocab) -> Result<Vocab, ClassroomError> {
        self.dictionary.add_word(user, vocab).await
    }

    pub async fn update_word(&self, user: &UserId, vocab: Vocab) -> Result<Vocab, ClassroomError> {
        self.dictionary.update_word(user, vocab).await
    }

    pub async fn remove_word(&self, user: &UserId, vocab_id: Uuid) -> Result<(), ClassroomError> {
        self.dictionary.remove_word(user, vocab_id).await
    }

    pub async fn list_words(&self, user: &UserId) -> Result<Vec<Vocab>, ClassroomError> {
        self.dictionary.list_words(user).await
    }

    pub async fn get_batch(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Batch, ClassroomError> {
        self.word_pool.get_batch(user, now).await
    }

    /// Forms practiced without mistakes leave the pool; every reported form
    /// then has its progress registered.
    pub async fn report_batch_result(
        &self,
        user: &UserId,
        result: &BatchResult,
        now: DateTime<Utc>,
    ) -> Result<(), ClassroomError> {
        self.word_pool
            .remove_from_pool(user, &result.without_mistake)
            .await?;
        self.dictionary
            .register_progress(user, &result.without_mistake, &result.with_mistake, now)
            .await
    }

    pub async fn list_sets(&self, user: &UserId) -> Result<Vec<VocabSet>, ClassroomError> {
        self.sets.list_sets(user).await
    }

    pub async fn add_set(
        &self,
        user: &UserId,
        name: &str,
        vocab_ids: Vec<Uuid>,
    ) -> Result<VocabSet, ClassroomError> {
        self.sets.add_set(user, name, vocab_ids).await
    }

    pub async fn update_set(
        &self,
        user: &UserId,
        set_id: Uuid,
        name: &str,
        vocab_ids: Vec<Uuid>,
    ) -> Result<VocabSet, ClassroomError> {
        self.sets.update_set(user, set_id, name, vocab_ids).await
    }

    pub async fn remove_set(&self, user: &UserId, set_id: Uuid) -> Result<(), ClassroomError> {
        self.sets.remove_set(user, set_id).await
    }

    pub async fn get_set_batch(
        &self,
        user: &UserId,
        set_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Batch, ClassroomError> {
        self.sets.get_set_batch(user, set_id, limit.unwrap_or(0)).await
    }
}
