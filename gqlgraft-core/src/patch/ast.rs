use super::DecoratorSpec;
use crate::errors::PatchError;
use std::fmt;

/// Field of a class as seen by the patcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberInfo {
    pub decorators: Vec<String>,
    pub type_annotation: Option<String>,
}

/// Array literal location with the class already resolved to a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionTarget<'a> {
    DecoratorProperty {
        class: &'a str,
        decorator: &'a str,
        property: &'a str,
    },
    MemberInitializer {
        class: &'a str,
        member: &'a str,
    },
}

impl<'a> CollectionTarget<'a> {
    pub fn class(&self) -> &'a str {
        match *self {
            CollectionTarget::DecoratorProperty { class, .. }
            | CollectionTarget::MemberInitializer { class, .. } => class,
        }
    }
}

impl fmt::Display for CollectionTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionTarget::DecoratorProperty {
                class,
                decorator,
                property,
            } => write!(f, "@{decorator}.{property} on class {class}"),
            CollectionTarget::MemberInitializer { class, member } => {
                write!(f, "{member} initializer on class {class}")
            }
        }
    }
}

/// Minimal structural view of a parsed source file.
///
/// Queries never mutate; mutations assume the caller already checked the
/// corresponding marker, so implementations do not re-check for duplicates.
/// Selector policy (which class an edit addresses) is decided by the patcher
/// from [`SourceAst::class_names`].
pub trait SourceAst: Clone {
    /// Project-relative path.
    fn path(&self) -> &str;

    /// Current text, as it would be persisted.
    fn source_text(&self) -> String;

    fn has_named_import(&self, module: &str, name: &str) -> Result<bool, PatchError>;

    /// Merges into an existing declaration for `module` when possible,
    /// otherwise appends a new declaration after the last import.
    fn add_named_import(&mut self, module: &str, name: &str) -> Result<(), PatchError>;

    /// Names of the top-level classes in declaration order.
    fn class_names(&self) -> Result<Vec<String>, PatchError>;

    fn class_decorators(&self, class: &str) -> Result<Vec<String>, PatchError>;

    fn add_class_decorator(&mut self, class: &str, decorator: &DecoratorSpec)
        -> Result<(), PatchError>;

    /// `None` when the class has no instance field with that name.
    fn member(&self, class: &str, member: &str) -> Result<Option<MemberInfo>, PatchError>;

    fn add_member_decorator(
        &mut self,
        class: &str,
        member: &str,
        decorator: &DecoratorSpec,
    ) -> Result<(), PatchError>;

    fn set_member_type(&mut self, class: &str, member: &str, type_text: &str)
        -> Result<(), PatchError>;

    /// Source text of each element, `None` when the array is absent.
    fn collection_elements(
        &self,
        target: CollectionTarget<'_>,
    ) -> Result<Option<Vec<String>>, PatchError>;

    fn insert_collection_element(
        &mut self,
        target: CollectionTarget<'_>,
        index: usize,
        element: &str,
    ) -> Result<(), PatchError>;
}

/// Builds a file handle from text read off disk.
pub trait ParseSource: Sized {
    fn parse(path: &str, text: &str) -> Result<Self, PatchError>;
}
