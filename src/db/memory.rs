use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{StoreResult, VocabRepository};
use crate::models::{Pool, UserId, Vocab, VocabSet};

#[derive(Debug, Default)]
struct UserDocuments {
    vocab: Vec<Vocab>,
    pool: Option<Pool>,
    sets: Vec<VocabSet>,
}

/// In-process document store keyed by user. Documents are cloned in and out,
/// so callers never share state with the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserDocuments>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, user: &UserId, f: impl FnOnce(&UserDocuments) -> T) -> Option<T> {
        self.users.read().get(user).map(f)
    }

    fn write<T>(&self, user: &UserId, f: impl FnOnce(&mut UserDocuments) -> T) -> T {
        let mut users = self.users.write();
        f(users.entry(user.clone()).or_default())
    }
}

#[async_trait]
impl VocabRepository for MemoryStore {
    async fn fetch_all_vocabulary(&self, user: &UserId) -> StoreResult<Vec<Vocab>> {
        Ok(self.read(user, |docs| docs.vocab.clone()).unwrap_or_default())
    }

    async fn upsert_vocabulary(&self, user: &UserId, vocab: Vocab) -> StoreResult<()> {
        self.write(user, |docs| {
            match docs.vocab.iter_mut().find(|v| v.id == vocab.id) {
                Some(existing) => *existing = vocab,
                None => docs.vocab.push(vocab),
            }
        });
        Ok(())
    }

    async fn remove_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<()> {
        self.write(user, |docs| docs.vocab.retain(|v| v.id != vocab_id));
        Ok(())
    }

    async fn get_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<Option<Vocab>> {
        Ok(self
            .read(user, |docs| docs.vocab.iter().find(|v| v.id == vocab_id).cloned())
            .flatten())
    }

    async fn fetch_pool(&self, user: &UserId) -> StoreResult<Option<Pool>> {
        Ok(self.read(user, |docs| docs.pool.clone()).flatten())
    }

    async fn replace_pool(&self, user: &UserId, pool: Pool) -> StoreResult<()> {
        self.write(user, |docs| docs.pool = Some(pool));
        Ok(())
    }

    async fn fetch_vocab_sets(&self, user: &UserId) -> StoreResult<Vec<VocabSet>> {
        Ok(self.read(user, |docs| docs.sets.clone()).unwrap_or_default())
    }

    async fn get_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<Option<VocabSet>> {
        Ok(self
            .read(user, |docs| docs.sets.iter().find(|s| s.id == set_id).cloned())
            .flatten())
    }

    async fn upsert_vocab_set(&self, user: &UserId, set: VocabSet) -> StoreResult<()> {
        self.write(user, |docs| {
            match docs.sets.iter_mut().find(|s| s.id == set.id) {
                Some(existing) => *existing = set,
                None => docs.sets.push(set),
            }
        });
        Ok(())
    }

    async fn remove_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<()> {
        self.write(user, |docs| docs.sets.retain(|s| s.id != set_id));
        Ok(())
    }
}
