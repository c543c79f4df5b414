use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum ClassroomError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{context}")]
    Storage {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl ClassroomError {
    pub fn storage(context: impl Into<String>, source: StoreError) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Attaches a context message to a repository failure.
pub(crate) trait StorageContext<T> {
    fn context(self, context: &str) -> Result<T, ClassroomError>;
}

impl<T> StorageContext<T> for Result<T, StoreError> {
    fn context(self, context: &str) -> Result<T, ClassroomError> {
        self.map_err(|source| ClassroomError::storage(context, source))
    }
}
