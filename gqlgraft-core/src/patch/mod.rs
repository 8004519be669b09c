//! Idempotent, additive edits on generated source files.
//!
//! Edits are declared as [`EditOperation`] values and applied through the
//! [`SourceAst`] capability trait, so the marker checks (does the import,
//! decorator or element already exist?) live in one place, [`patcher`], and
//! are independent of the parser backing a file.

mod ast;
mod patcher;
mod project;
mod typescript;

use std::fmt;

pub use ast::{CollectionTarget, MemberInfo, ParseSource, SourceAst};
pub use patcher::{patch, PatchRoutine};
pub use project::{FileReport, Project, ProjectReport};
pub use typescript::TsSourceFile;

/// Which class of a file an edit addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSelector {
    /// The first and only class declared in the file.
    Only,
    Named(String),
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassSelector::Only => write!(f, "the only class"),
            ClassSelector::Named(name) => write!(f, "class {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorSpec {
    pub name: String,
    pub arguments: Vec<String>,
}

impl DecoratorSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: &str) -> Self {
        self.arguments.push(argument.to_string());
        self
    }

    /// Source form, e.g. `@InputType('_user')`.
    pub fn render(&self) -> String {
        format!("@{}({})", self.name, self.arguments.join(", "))
    }
}

/// Array literal addressed by a collection insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSelector {
    /// `property: [...]` inside the first object argument of a class decorator,
    /// e.g. `@Module({ providers: [...] })`.
    DecoratorProperty {
        class: ClassSelector,
        decorator: String,
        property: String,
    },
    /// `member = [...]` initializer of a class field.
    MemberInitializer { class: ClassSelector, member: String },
}

impl CollectionSelector {
    pub fn decorator_property(class: ClassSelector, decorator: &str, property: &str) -> Self {
        CollectionSelector::DecoratorProperty {
            class,
            decorator: decorator.to_string(),
            property: property.to_string(),
        }
    }

    pub fn member_initializer(class: ClassSelector, member: &str) -> Self {
        CollectionSelector::MemberInitializer {
            class,
            member: member.to_string(),
        }
    }

    pub fn class(&self) -> &ClassSelector {
        match self {
            CollectionSelector::DecoratorProperty { class, .. }
            | CollectionSelector::MemberInitializer { class, .. } => class,
        }
    }
}

impl fmt::Display for CollectionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionSelector::DecoratorProperty {
                class,
                decorator,
                property,
            } => write!(f, "@{decorator}.{property} on {class}"),
            CollectionSelector::MemberInitializer { class, member } => {
                write!(f, "{member} initializer on {class}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Append,
    /// Before the current last element; appends into an empty collection.
    BeforeLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberMutation {
    SetType(String),
    AddDecorator(DecoratorSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAddition {
    pub module_specifier: String,
    pub named_import: String,
}

/// One additive change to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Import(ImportAddition),
    Decorator {
        class: ClassSelector,
        decorator: DecoratorSpec,
    },
    Member {
        class: ClassSelector,
        member: String,
        mutation: MemberMutation,
    },
    Collection {
        collection: CollectionSelector,
        element: String,
        position: InsertPosition,
    },
}

impl EditOperation {
    pub fn import(module_specifier: &str, named_import: &str) -> Self {
        EditOperation::Import(ImportAddition {
            module_specifier: module_specifier.to_string(),
            named_import: named_import.to_string(),
        })
    }

    pub fn class_decorator(class: ClassSelector, decorator: DecoratorSpec) -> Self {
        EditOperation::Decorator { class, decorator }
    }

    pub fn member_decorator(class: ClassSelector, member: &str, decorator: DecoratorSpec) -> Self {
        EditOperation::Member {
            class,
            member: member.to_string(),
            mutation: MemberMutation::AddDecorator(decorator),
        }
    }

    pub fn set_member_type(class: ClassSelector, member: &str, type_text: &str) -> Self {
        EditOperation::Member {
            class,
            member: member.to_string(),
            mutation: MemberMutation::SetType(type_text.to_string()),
        }
    }

    pub fn insert_element(
        collection: CollectionSelector,
        element: &str,
        position: InsertPosition,
    ) -> Self {
        EditOperation::Collection {
            collection,
            element: element.to_string(),
            position,
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOperation::Import(import) => write!(
                f,
                "import {{ {} }} from '{}'",
                import.named_import, import.module_specifier
            ),
            EditOperation::Decorator { class, decorator } => {
                write!(f, "{} on {class}", decorator.render())
            }
            EditOperation::Member {
                class,
                member,
                mutation: MemberMutation::SetType(type_text),
            } => write!(f, "{member}: {type_text} on {class}"),
            EditOperation::Member {
                class,
                member,
                mutation: MemberMutation::AddDecorator(decorator),
            } => write!(f, "{} on {member} of {class}", decorator.render()),
            EditOperation::Collection {
                collection,
                element,
                ..
            } => {
                let head = element.lines().next().unwrap_or_default();
                write!(f, "{head} into {collection}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStatus {
    Applied,
    /// The idempotence marker was already present.
    Unchanged,
    /// Not attempted because no import of the routine was added.
    Gated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub edit: EditOperation,
    pub status: EditStatus,
}

impl EditOutcome {
    pub fn applied(&self) -> bool {
        self.status == EditStatus::Applied
    }
}

/// Outcome of patching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub path: String,
    pub outcomes: Vec<EditOutcome>,
    /// Whether the persisted text differs from what was loaded.
    pub changed: bool,
}

impl PatchResult {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.applied()).count()
    }
}
