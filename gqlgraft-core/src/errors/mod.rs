//! Domain-specific error types for gqlgraft-core
//!
//! # Error Categories
//!
//! - **ResolveError**: destination path resolution (template evaluation, collisions)
//! - **CopyError**: copying resolved template files into the project tree
//! - **PatchError**: patching a single target source file
//! - **ConfigError**: loading the generator configuration
//!
//! Resolution errors abort a whole `resolve` call. Patch errors abort only the
//! file they were raised for.
//!
//! # Examples
//!
//! ```rust
//! use gqlgraft::errors::PatchError;
//!
//! let err = PatchError::MemberNotFound {
//!     path: "server/src/service/dto/user.dto.ts".to_string(),
//!     class: "UserDTO".to_string(),
//!     member: "password".to_string(),
//! };
//! assert_eq!(err.path(), "server/src/service/dto/user.dto.ts");
//! assert_eq!(err.error_code(), "MEMBER_NOT_FOUND");
//! ```

pub mod artifact;
pub mod config;
pub mod patch;

pub use artifact::{CopyError, ResolveError};
pub use config::ConfigError;
pub use patch::PatchError;
