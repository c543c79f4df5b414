use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use uuid::Uuid;

use crate::db::VocabRepository;
use crate::error::{ClassroomError, StorageContext};
use crate::models::{UserId, Vocab};
use crate::services::scheduling::{apply_success, normalize_form};

pub struct Dictionary {
    store: Arc<dyn VocabRepository>,
}

impl Dictionary {
    pub fn new(store: Arc<dyn VocabRepository>) -> Self {
        Self { store }
    }

    pub async fn add_word(&self, user: &UserId, vocab: Vocab) -> Result<Vocab, ClassroomError> {
        self.save_word(user, vocab, "failed to add vocab").await
    }

    pub async fn update_word(&self, user: &UserId, vocab: Vocab) -> Result<Vocab, ClassroomError> {
        self.save_word(user, vocab, "failed to update vocab").await
    }

    async fn save_word(
        &self,
        user: &UserId,
        vocab: Vocab,
        context: &str,
    ) -> Result<Vocab, ClassroomError> {
        let vocab = prepare_vocab(vocab)?;
        self.store
            .upsert_vocabulary(user, vocab.clone())
            .await
            .context(context)?;
        tracing::debug!(
            user_id = %user,
            vocab_id = %vocab.id,
            forms = vocab.forms.len(),
            "vocab saved"
        );
        Ok(vocab)
    }

    pub async fn remove_word(&self, user: &UserId, vocab_id: Uuid) -> Result<(), ClassroomError> {
        self.store
            .remove_vocabulary(user, vocab_id)
            .await
            .context("failed to remove vocab")
    }

    pub async fn list_words(&self, user: &UserId) -> Result<Vec<Vocab>, ClassroomError> {
        self.store
            .fetch_all_vocabulary(user)
            .await
            .context("failed to fetch vocabulary")
    }

    /// Applies one success to every distinct (item, form) pair named in either
    /// list and persists each touched item once. Forms reported with mistakes
    /// take the success path as well.
    ///
    /// Items that no longer exist are skipped. Writes run concurrently; the
    /// first failing write fails the call and already-finished writes stay.
    pub async fn register_progress(
        &self,
        user: &UserId,
        without_mistakes: &[Vocab],
        with_mistakes: &[Vocab],
        now: DateTime<Utc>,
    ) -> Result<(), ClassroomError> {
        let mut updated: HashMap<Uuid, Vocab> = HashMap::new();
        let mut missing: HashSet<Uuid> = HashSet::new();
        let mut applied: HashSet<(Uuid, Uuid)> = HashSet::new();

        for reported in without_mistakes.iter().chain(with_mistakes) {
            if missing.contains(&reported.id) {
                continue;
            }
            if !updated.contains_key(&reported.id) {
                let stored = self
                    .store
                    .get_vocabulary(user, reported.id)
                    .await
                    .context("could not find vocab")?;
                let Some(stored) = stored else {
                    tracing::warn!(
                        user_id = %user,
                        vocab_id = %reported.id,
                        "progress reported for unknown vocab"
                    );
                    missing.insert(reported.id);
                    continue;
                };
                updated.insert(reported.id, stored);
            }

            let Some(vocab) = updated.get_mut(&reported.id) else {
                continue;
            };
            for form in &reported.forms {
                if !applied.insert((reported.id, form.id)) {
                    continue;
                }
                if let Some(stored_form) = vocab.form_mut(form.id) {
                    apply_success(stored_form, now);
                }
            }
        }

        let items = updated.len();
        let writes = updated
            .into_values()
            .map(|vocab| self.store.upsert_vocabulary(user, vocab));
        try_join_all(writes)
            .await
            .context("could not update vocab progress")?;

        tracing::info!(user_id = %user, items, "practice progress registered");
        Ok(())
    }
}

/// Assigns ids to new items and forms and validates form identity.
fn prepare_vocab(mut vocab: Vocab) -> Result<Vocab, ClassroomError> {
    if vocab.id.is_nil() {
        vocab.id = Uuid::new_v4();
    }

    let mut seen = HashSet::with_capacity(vocab.forms.len());
    for form in &mut vocab.forms {
        if form.id.is_nil() {
            form.id = Uuid::new_v4();
        }
        if !seen.insert(form.id) {
            return Err(ClassroomError::InvalidInput(format!(
                "duplicate form id {} in vocab {}",
                form.id, vocab.id
            )));
        }
        normalize_form(form);
    }
    Ok(vocab)
}
