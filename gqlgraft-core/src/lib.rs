pub mod artifact;
pub mod blueprint;
pub mod common;
pub mod config;
pub mod errors;
pub mod patch;

#[cfg(test)]
mod testing;

pub use artifact::{copy_artifacts, resolve, Activation, ArtifactDescriptor, ResolvedArtifact};
pub use config::{ClientFramework, GeneratorConfig, IdempotenceMode, TypeDefinition};
pub use errors::{ConfigError, CopyError, PatchError, ResolveError};
pub use patch::{
    patch, ClassSelector, CollectionSelector, DecoratorSpec, EditOperation, EditOutcome,
    EditStatus, FileReport, InsertPosition, MemberMutation, PatchResult, PatchRoutine, Project,
    ProjectReport, SourceAst, TsSourceFile,
};
