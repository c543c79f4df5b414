use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClassroomError;

pub const MAX_LEVEL: u8 = 5;

/// Identity of the user every operation is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Panics on an empty id: callers must resolve identity before reaching the
    /// classroom. Use [`UserId::parse`] for untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.trim().is_empty(), "user id must not be empty");
        Self(id)
    }

    pub fn parse(id: &str) -> Result<Self, ClassroomError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ClassroomError::InvalidInput("user id is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Numeral,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Question,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocab {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub forms: Vec<VocabForm>,
    #[serde(rename = "pause_until", default, skip_serializing_if = "Option::is_none")]
    pub paused_until: Option<DateTime<Utc>>,
}

impl Vocab {
    pub fn new(definition: impl Into<String>, part_of_speech: PartOfSpeech) -> Self {
        Self {
            id: Uuid::nil(),
            definition: definition.into(),
            part_of_speech,
            forms: Vec::new(),
            paused_until: None,
        }
    }

    pub fn with_form(mut self, form: VocabForm) -> Self {
        self.forms.push(form);
        self
    }

    pub fn form(&self, form_id: Uuid) -> Option<&VocabForm> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    pub fn form_mut(&mut self, form_id: Uuid) -> Option<&mut VocabForm> {
        self.forms.iter_mut().find(|f| f.id == form_id)
    }

    /// Same item identity with no forms, used when regrouping sampled forms.
    pub(crate) fn empty_shell(&self) -> Self {
        Self {
            id: self.id,
            definition: self.definition.clone(),
            part_of_speech: self.part_of_speech,
            forms: Vec::new(),
            paused_until: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabForm {
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default = "never")]
    pub last_success: DateTime<Utc>,
    #[serde(rename = "success_in_row", default)]
    pub streak: u32,
}

impl VocabForm {
    pub fn new(value: impl Into<String>, form: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            value: value.into(),
            form: form.into(),
            level: 0,
            last_success: never(),
            streak: 0,
        }
    }
}

/// Timestamp used for forms that were never practiced.
pub fn never() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub vocabs: Vec<Vocab>,
}

impl Pool {
    pub fn form_count(&self) -> usize {
        self.vocabs.iter().map(|v| v.forms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub vocabs: Vec<Vocab>,
}

impl Batch {
    pub fn form_count(&self) -> usize {
        self.vocabs.iter().map(|v| v.forms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabs.is_empty()
    }
}

/// Outcome of one practice session, split by whether the learner slipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub without_mistake: Vec<Vocab>,
    #[serde(default)]
    pub with_mistake: Vec<Vocab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabSet {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub vocab_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "user id must not be empty")]
    fn test_user_id_rejects_empty() {
        let _ = UserId::new("  ");
    }

    #[test]
    fn test_user_id_parse_trims() {
        let user = UserId::parse(" alice ").unwrap();
        assert_eq!(user.as_str(), "alice");
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn test_vocab_document_field_names() {
        let raw = r#"{
            "id": "5f1c1c52-0d3e-4b7a-9c39-0c6c2d3c9a11",
            "definition": "house",
            "part_of_speech": "interjection",
            "pause_until": "2024-01-01T00:00:00Z",
            "forms": [{
                "id": "0b3c8a1e-8f7d-4c55-a8f4-2b0f0f4f7e20",
                "value": "hus",
                "form": "indefinite_singular",
                "level": 2,
                "last_success": "2024-01-01T00:00:00Z",
                "success_in_row": 3
            }]
        }"#;

        let vocab: Vocab = serde_json::from_str(raw).unwrap();
        assert_eq!(vocab.part_of_speech, PartOfSpeech::Unknown);
        assert!(vocab.paused_until.is_some());
        assert_eq!(vocab.forms[0].streak, 3);

        let mut unpaused = vocab.clone();
        unpaused.paused_until = None;
        let json = serde_json::to_value(&unpaused).unwrap();
        assert!(json.get("pause_until").is_none());
        assert_eq!(json["forms"][0]["success_in_row"], 3);
    }

    #[test]
    fn test_part_of_speech_names() {
        let known: PartOfSpeech = serde_json::from_str(r#""noun""#).unwrap();
        assert_eq!(known, PartOfSpeech::Noun);
        let other: PartOfSpeech = serde_json::from_str(r#""article""#).unwrap();
        assert_eq!(other, PartOfSpeech::Unknown);
        assert_eq!(PartOfSpeech::default(), PartOfSpeech::Unknown);
        assert_eq!(serde_json::to_string(&PartOfSpeech::Unknown).unwrap(), r#""unknown""#);
    }

    #[test]
    fn test_form_lookup() {
        let mut form = VocabForm::new("huset", "definite_singular");
        form.id = Uuid::new_v4();
        let id = form.id;
        let mut vocab = Vocab::new("house", PartOfSpeech::Noun).with_form(form);

        assert!(vocab.form(id).is_some());
        vocab.form_mut(id).unwrap().level = 3;
        assert_eq!(vocab.forms[0].level, 3);
        assert!(vocab.form(Uuid::new_v4()).is_none());
    }
}
