pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod random;
pub mod services;
pub mod state;

pub use error::ClassroomError;
pub use models::{Batch, BatchResult, PartOfSpeech, Pool, UserId, Vocab, VocabForm, VocabSet};
pub use state::ClassroomState;
