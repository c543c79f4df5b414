#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Barrier;
use uuid::Uuid;

use danci_classroom::config::PoolSettings;
use danci_classroom::db::{MemoryStore, StoreError, StoreResult, VocabRepository};
use danci_classroom::models::{PartOfSpeech, Pool, UserId, Vocab, VocabForm, VocabSet};
use danci_classroom::random::RandomSource;
use danci_classroom::ClassroomState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchAllVocabulary,
    UpsertVocabulary,
    RemoveVocabulary,
    GetVocabulary,
    FetchPool,
    ReplacePool,
    FetchSets,
    GetSet,
    UpsertSet,
    RemoveSet,
}

/// Repository double: delegates to a [`MemoryStore`], counts calls, and can
/// fail chosen operations or hold vocabulary writes at a barrier.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<Op>>,
    failing: Mutex<HashSet<Op>>,
    failing_writes: Mutex<HashSet<Uuid>>,
    write_barrier: Option<Barrier>,
    in_flight_writes: AtomicUsize,
    max_in_flight_writes: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every vocabulary write waits until `parties` writes are in flight.
    pub fn with_write_barrier(parties: usize) -> Self {
        Self {
            write_barrier: Some(Barrier::new(parties)),
            ..Self::default()
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().insert(op);
    }

    pub fn fail_write_of(&self, vocab_id: Uuid) {
        self.failing_writes.lock().insert(vocab_id);
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    pub fn max_in_flight_writes(&self) -> usize {
        self.max_in_flight_writes.load(Ordering::SeqCst)
    }

    fn record(&self, op: Op) -> StoreResult<()> {
        self.calls.lock().push(op);
        if self.failing.lock().contains(&op) {
            return Err(StoreError::Backend(format!("{op:?} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl VocabRepository for RecordingStore {
    async fn fetch_all_vocabulary(&self, user: &UserId) -> StoreResult<Vec<Vocab>> {
        self.record(Op::FetchAllVocabulary)?;
        self.inner.fetch_all_vocabulary(user).await
    }

    async fn upsert_vocabulary(&self, user: &UserId, vocab: Vocab) -> StoreResult<()> {
        self.record(Op::UpsertVocabulary)?;

        let now_in_flight = self.in_flight_writes.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight_writes.fetch_max(now_in_flight, Ordering::SeqCst);
        if let Some(barrier) = &self.write_barrier {
            barrier.wait().await;
        }
        self.in_flight_writes.fetch_sub(1, Ordering::SeqCst);

        if self.failing_writes.lock().contains(&vocab.id) {
            return Err(StoreError::Unavailable(format!("write of {} rejected", vocab.id)));
        }
        self.inner.upsert_vocabulary(user, vocab).await
    }

    async fn remove_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<()> {
        self.record(Op::RemoveVocabulary)?;
        self.inner.remove_vocabulary(user, vocab_id).await
    }

    async fn get_vocabulary(&self, user: &UserId, vocab_id: Uuid) -> StoreResult<Option<Vocab>> {
        self.record(Op::GetVocabulary)?;
        self.inner.get_vocabulary(user, vocab_id).await
    }

    async fn fetch_pool(&self, user: &UserId) -> StoreResult<Option<Pool>> {
        self.record(Op::FetchPool)?;
        self.inner.fetch_pool(user).await
    }

    async fn replace_pool(&self, user: &UserId, pool: Pool) -> StoreResult<()> {
        self.record(Op::ReplacePool)?;
        self.inner.replace_pool(user, pool).await
    }

    async fn fetch_vocab_sets(&self, user: &UserId) -> StoreResult<Vec<VocabSet>> {
        self.record(Op::FetchSets)?;
        self.inner.fetch_vocab_sets(user).await
    }

    async fn get_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<Option<VocabSet>> {
        self.record(Op::GetSet)?;
        self.inner.get_vocab_set(user, set_id).await
    }

    async fn upsert_vocab_set(&self, user: &UserId, set: VocabSet) -> StoreResult<()> {
        self.record(Op::UpsertSet)?;
        self.inner.upsert_vocab_set(user, set).await
    }

    async fn remove_vocab_set(&self, user: &UserId, set_id: Uuid) -> StoreResult<()> {
        self.record(Op::RemoveSet)?;
        self.inner.remove_vocab_set(user, set_id).await
    }
}

/// Deterministic shuffle that reverses the sequence.
pub struct ReverseRandom;

impl RandomSource for ReverseRandom {
    fn int_n(&self, _n: usize) -> usize {
        0
    }

    fn shuffle(&self, n: usize, swap: &mut dyn FnMut(usize, usize)) {
        for i in 0..n / 2 {
            swap(i, n - 1 - i);
        }
    }
}

pub fn user() -> UserId {
    UserId::new("test-user")
}

pub fn form(value: &str, tag: &str) -> VocabForm {
    VocabForm {
        id: Uuid::new_v4(),
        ..VocabForm::new(value, tag)
    }
}

pub fn practiced_form(value: &str, tag: &str, level: u8, last_success: DateTime<Utc>) -> VocabForm {
    VocabForm {
        level,
        last_success,
        ..form(value, tag)
    }
}

pub fn vocab(definition: &str, forms: Vec<VocabForm>) -> Vocab {
    Vocab {
        id: Uuid::new_v4(),
        definition: definition.to_string(),
        part_of_speech: PartOfSpeech::Noun,
        forms,
        paused_until: None,
    }
}

/// Copy of `item` naming only the forms at the given positions.
pub fn reported(item: &Vocab, positions: &[usize]) -> Vocab {
    Vocab {
        forms: positions.iter().map(|i| item.forms[*i].clone()).collect(),
        ..item.clone()
    }
}

pub fn classroom(store: Arc<RecordingStore>) -> ClassroomState {
    ClassroomState::new(store, Arc::new(ReverseRandom), PoolSettings::default())
}
