use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::PoolSettings;
use crate::db::VocabRepository;
use crate::error::{ClassroomError, StorageContext};
use crate::models::{Batch, Pool, UserId, Vocab, VocabForm};
use crate::random::{shuffle_slice, RandomSource};
use crate::services::scheduling::{form_is_due, item_is_eligible};

/// Builds a pool holding only eligible items and, for each, only its due forms.
pub fn build_pool(items: Vec<Vocab>, now: DateTime<Utc>) -> Pool {
    let vocabs = items
        .into_iter()
        .filter(|item| item_is_eligible(item, now))
        .filter_map(|mut item| {
            item.forms.retain(|form| form_is_due(form, now));
            (!item.forms.is_empty()).then_some(item)
        })
        .collect();

    Pool {
        created_at: now,
        vocabs,
    }
}

/// Draws up to `n` forms uniformly from the pool and groups them by parent
/// item. Item order in the batch carries no meaning.
pub fn sample_batch(pool: &Pool, n: usize, rng: &dyn RandomSource) -> Batch {
    let mut candidates: Vec<(&Vocab, &VocabForm)> = pool
        .vocabs
        .iter()
        .flat_map(|vocab| vocab.forms.iter().map(move |form| (vocab, form)))
        .collect();

    if n == 0 || candidates.is_empty() {
        return Batch::default();
    }

    shuffle_slice(rng, &mut candidates);
    candidates.truncate(n);

    let mut slots: HashMap<Uuid, usize> = HashMap::new();
    let mut vocabs: Vec<Vocab> = Vec::new();
    for (parent, form) in candidates {
        let slot = *slots.entry(parent.id).or_insert_with(|| {
            vocabs.push(parent.empty_shell());
            vocabs.len() - 1
        });
        vocabs[slot].forms.push(form.clone());
    }

    Batch { vocabs }
}

/// Drops every named (item, form) pair from the pool, and items left without
/// forms. Unknown ids are ignored. Returns the number of forms removed.
pub fn remove_forms(pool: &mut Pool, practiced: &[Vocab]) -> usize {
    let mut targets: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for vocab in practiced {
        targets
            .entry(vocab.id)
            .or_default()
            .extend(vocab.forms.iter().map(|f| f.id));
    }

    let mut removed = 0;
    pool.vocabs.retain_mut(|vocab| {
        let Some(form_ids) = targets.get(&vocab.id) else {
            return true;
        };
        let before = vocab.forms.len();
        vocab.forms.retain(|form| !form_ids.contains(&form.id));
        removed += before - vocab.forms.len();
        !vocab.forms.is_empty()
    });
    removed
}

pub struct WordPool {
    store: Arc<dyn VocabRepository>,
    rng: Arc<dyn RandomSource>,
    settings: PoolSettings,
}

impl WordPool {
    pub fn new(
        store: Arc<dyn VocabRepository>,
        rng: Arc<dyn RandomSource>,
        settings: PoolSettings,
    ) -> Self {
        Self {
            store,
            rng,
            settings,
        }
    }

    fn is_stale(&self, pool: &Pool, now: DateTime<Utc>) -> bool {
        if pool.is_empty() {
            return true;
        }
        now.checked_sub_signed(self.settings.ttl)
            .is_some_and(|cutoff| pool.created_at < cutoff)
    }

    /// Serves a batch from the user's pool, rebuilding the pool first when it
    /// is missing, empty or stale. Concurrent callers may both rebuild; the
    /// last write wins.
    pub async fn get_batch(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Batch, ClassroomError> {
        let current = self
            .store
            .fetch_pool(user)
            .await
            .context("failed to fetch pool")?;

        let pool = match current {
            Some(pool) if !self.is_stale(&pool, now) => pool,
            _ => self.rebuild(user, now).await?,
        };

        let batch = sample_batch(&pool, self.settings.batch_size, self.rng.as_ref());
        tracing::debug!(
            user_id = %user,
            pool_forms = pool.form_count(),
            batch_forms = batch.form_count(),
            "batch sampled"
        );
        Ok(batch)
    }

    async fn rebuild(&self, user: &UserId, now: DateTime<Utc>) -> Result<Pool, ClassroomError> {
        let vocabulary = self
            .store
            .fetch_all_vocabulary(user)
            .await
            .context("failed to fetch vocab to build pool")?;
        let total = vocabulary.len();

        let pool = build_pool(vocabulary, now);
        self.store
            .replace_pool(user, pool.clone())
            .await
            .context("failed to update pool")?;

        tracing::info!(
            user_id = %user,
            vocabulary = total,
            pooled_items = pool.vocabs.len(),
            pooled_forms = pool.form_count(),
            "practice pool rebuilt"
        );
        Ok(pool)
    }

    pub async fn remove_from_pool(
        &self,
        user: &UserId,
        practiced: &[Vocab],
    ) -> Result<(), ClassroomError> {
        let Some(mut pool) = self
            .store
            .fetch_pool(user)
            .await
            .context("failed to get user pool")?
        else {
            tracing::debug!(user_id = %user, "no pool to remove practiced forms from");
            return Ok(());
        };

        let removed = remove_forms(&mut pool, practiced);
        self.store
            .replace_pool(user, pool)
            .await
            .context("failed to save updated pool")?;

        tracing::debug!(user_id = %user, removed, "practiced forms removed from pool");
        Ok(())
    }
}
