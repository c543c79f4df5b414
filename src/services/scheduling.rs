use chrono::{DateTime, Duration, Utc};

use crate::models::{Vocab, VocabForm, MAX_LEVEL};

/// Successes in a row needed to move a form up one level.
pub const LEVEL_UP_STREAK: u32 = 7;

/// Form tags that are never scheduled for practice.
pub const FIXED_FORMS: [&str; 2] = ["definite_singular", "definite_plural"];

pub fn level_interval(level: u8) -> Duration {
    match level {
        0 => Duration::hours(1),
        1 => Duration::hours(24),
        2 => Duration::hours(24 * 3),
        3 => Duration::hours(24 * 7),
        4 => Duration::hours(24 * 12),
        5 => Duration::hours(24 * 21),
        _ => Duration::hours(1),
    }
}

pub fn is_fixed_form(form: &VocabForm) -> bool {
    FIXED_FORMS.contains(&form.form.as_str())
}

/// Any pause marker excludes the item; the pause end is not compared with `now`.
pub fn item_is_eligible(item: &Vocab, _now: DateTime<Utc>) -> bool {
    item.paused_until.is_none()
}

/// When the form becomes due, or `None` if it never does.
pub fn next_due_at(form: &VocabForm) -> Option<DateTime<Utc>> {
    if is_fixed_form(form) {
        return None;
    }
    form.last_success.checked_add_signed(level_interval(form.level))
}

pub fn form_is_due(form: &VocabForm, now: DateTime<Utc>) -> bool {
    next_due_at(form).is_some_and(|due| due <= now)
}

pub fn apply_success(form: &mut VocabForm, now: DateTime<Utc>) {
    form.streak = form.streak.saturating_add(1);
    form.last_success = now;
    if form.streak >= LEVEL_UP_STREAK {
        form.streak = 0;
        form.level = form.level.saturating_add(1).min(MAX_LEVEL);
    }
}

pub fn apply_failure(form: &mut VocabForm) {
    form.level = form.level.saturating_sub(1);
}

/// Clamps stored mastery state into its valid range.
pub fn normalize_form(form: &mut VocabForm) {
    form.level = form.level.min(MAX_LEVEL);
}
