//! Source patching error types
//!
//! Every variant names the project-relative path of the file being patched so
//! a caller can report the failing file and decide whether to skip it or fail
//! the whole run.

use thiserror::Error;

/// Errors raised while patching one target source file
#[derive(Error, Debug)]
pub enum PatchError {
    /// Class selector matched zero or several classes
    #[error("{path}: expected exactly one class matching {selector}, found {found}")]
    AmbiguousTarget {
        path: String,
        selector: String,
        found: usize,
    },

    /// Named instance field is absent from the target class
    #[error("{path}: member '{member}' not found on class {class}")]
    MemberNotFound {
        path: String,
        class: String,
        member: String,
    },

    /// Array literal addressed by a collection selector is absent
    #[error("{path}: collection {selector} not found")]
    CollectionNotFound { path: String, selector: String },

    /// Source text (as loaded or after an edit) does not parse
    #[error("{path}: failed to parse source: {reason}")]
    Parse { path: String, reason: String },

    /// Reading or persisting the file failed
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    /// Project-relative path of the file the error belongs to
    pub fn path(&self) -> &str {
        match self {
            PatchError::AmbiguousTarget { path, .. }
            | PatchError::MemberNotFound { path, .. }
            | PatchError::CollectionNotFound { path, .. }
            | PatchError::Parse { path, .. }
            | PatchError::Io { path, .. } => path,
        }
    }

    /// Get error code for CLI reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            PatchError::AmbiguousTarget { .. } => "AMBIGUOUS_TARGET",
            PatchError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            PatchError::CollectionNotFound { .. } => "COLLECTION_NOT_FOUND",
            PatchError::Parse { .. } => "PARSE_FAILED",
            PatchError::Io { .. } => "IO_ERROR",
        }
    }
}
