use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category of a content operation, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ParamError,
    DatabaseWriteError,
    DatabaseReadError,
    DatabaseDeleteError,
    FileWriteFailure,
    FileReadFailure,
    FileDeleteFailure,
    CreateFileFailure,
}

/// Tagged error returned by every content manager operation: a kind plus detail.
///
/// Nothing is retried or rolled back. A metadata write that succeeded before a
/// failed body write stays in place.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid parameter: {0}")]
    Param(String),
    #[error("Database write failed: {0}")]
    DatabaseWrite(String),
    #[error("Database read failed: {0}")]
    DatabaseRead(String),
    #[error("Database delete failed: {0}")]
    DatabaseDelete(String),
    #[error("File write failed: {0}")]
    FileWrite(String),
    #[error("File read failed: {0}")]
    FileRead(String),
    #[error("File delete failed: {0}")]
    FileDelete(String),
    #[error("Create file failed: {0}")]
    CreateFile(String),
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::Param(_) => ErrorKind::ParamError,
            ContentError::DatabaseWrite(_) => ErrorKind::DatabaseWriteError,
            ContentError::DatabaseRead(_) => ErrorKind::DatabaseReadError,
            ContentError::DatabaseDelete(_) => ErrorKind::DatabaseDeleteError,
            ContentError::FileWrite(_) => ErrorKind::FileWriteFailure,
            ContentError::FileRead(_) => ErrorKind::FileReadFailure,
            ContentError::FileDelete(_) => ErrorKind::FileDeleteFailure,
            ContentError::CreateFile(_) => ErrorKind::CreateFileFailure,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ContentError::Param(d)
            | ContentError::DatabaseWrite(d)
            | ContentError::DatabaseRead(d)
            | ContentError::DatabaseDelete(d)
            | ContentError::FileWrite(d)
            | ContentError::FileRead(d)
            | ContentError::FileDelete(d)
            | ContentError::CreateFile(d) => d,
        }
    }

    pub(crate) fn param(message: impl Into<String>) -> Self {
        ContentError::Param(message.into())
    }
}

pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_with_wire_name() {
        let json = serde_json::to_string(&ErrorKind::FileWriteFailure).unwrap();
        assert_eq!(json, "\"FileWriteFailure\"");
    }

    #[test]
    fn test_detail_and_kind() {
        let err = ContentError::param("id");
        assert_eq!(err.kind(), ErrorKind::ParamError);
        assert_eq!(err.detail(), "id");
        assert_eq!(err.to_string(), "Invalid parameter: id");
    }
}
