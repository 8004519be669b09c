use super::ast::{CollectionTarget, SourceAst};
use super::{
    ClassSelector, CollectionSelector, EditOperation, EditOutcome, EditStatus, ImportAddition,
    InsertPosition, MemberMutation, PatchResult,
};
use crate::config::IdempotenceMode;
use crate::errors::PatchError;
use tracing::debug;

/// Applies `edits` in order, each guarded by its own idempotence marker.
///
/// Edits run against a working copy; `file` is replaced only when every edit
/// succeeded, so a failing edit leaves the handle exactly as it was.
pub fn patch<F: SourceAst>(file: &mut F, edits: &[EditOperation]) -> Result<PatchResult, PatchError> {
    let before = file.source_text();
    let mut working = file.clone();
    let mut outcomes = Vec::with_capacity(edits.len());
    for edit in edits {
        outcomes.push(apply_edit(&mut working, edit)?);
    }
    Ok(commit(file, working, &before, outcomes))
}

/// The batch of edits for one file: imports first, then the edits that depend
/// on them.
///
/// Under [`IdempotenceMode::ImportGated`] the dependent edits only run when at
/// least one import was added in this run. An already-imported file is
/// therefore treated as patched, even if a previous run stopped between the
/// imports and the structural edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRoutine {
    pub path: String,
    pub imports: Vec<ImportAddition>,
    pub dependent: Vec<EditOperation>,
}

impl PatchRoutine {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            imports: Vec::new(),
            dependent: Vec::new(),
        }
    }

    pub fn import(mut self, module_specifier: &str, named_import: &str) -> Self {
        self.imports.push(ImportAddition {
            module_specifier: module_specifier.to_string(),
            named_import: named_import.to_string(),
        });
        self
    }

    pub fn then(mut self, edit: EditOperation) -> Self {
        self.dependent.push(edit);
        self
    }

    pub fn apply<F: SourceAst>(
        &self,
        file: &mut F,
        mode: IdempotenceMode,
    ) -> Result<PatchResult, PatchError> {
        let before = file.source_text();
        let mut working = file.clone();
        let mut outcomes = Vec::with_capacity(self.imports.len() + self.dependent.len());

        for import in &self.imports {
            outcomes.push(apply_edit(&mut working, &EditOperation::Import(import.clone()))?);
        }
        let added = outcomes.iter().any(EditOutcome::applied);

        if added || mode == IdempotenceMode::PerEdit {
            for edit in &self.dependent {
                outcomes.push(apply_edit(&mut working, edit)?);
            }
        } else {
            debug!("{}: imports already present, skipping dependent edits", self.path);
            outcomes.extend(self.dependent.iter().map(|edit| EditOutcome {
                edit: edit.clone(),
                status: EditStatus::Gated,
            }));
        }

        Ok(commit(file, working, &before, outcomes))
    }
}

fn commit<F: SourceAst>(
    file: &mut F,
    working: F,
    before: &str,
    outcomes: Vec<EditOutcome>,
) -> PatchResult {
    let changed = working.source_text() != before;
    *file = working;
    PatchResult {
        path: file.path().to_string(),
        outcomes,
        changed,
    }
}

fn apply_edit<F: SourceAst>(file: &mut F, edit: &EditOperation) -> Result<EditOutcome, PatchError> {
    let applied = match edit {
        EditOperation::Import(import) => {
            if file.has_named_import(&import.module_specifier, &import.named_import)? {
                false
            } else {
                file.add_named_import(&import.module_specifier, &import.named_import)?;
                true
            }
        }
        EditOperation::Decorator { class, decorator } => {
            let class = select_class(file, class)?;
            if file
                .class_decorators(&class)?
                .iter()
                .any(|name| *name == decorator.name)
            {
                false
            } else {
                file.add_class_decorator(&class, decorator)?;
                true
            }
        }
        EditOperation::Member {
            class,
            member,
            mutation,
        } => {
            let class = select_class(file, class)?;
            let info = file
                .member(&class, member)?
                .ok_or_else(|| PatchError::MemberNotFound {
                    path: file.path().to_string(),
                    class: class.clone(),
                    member: member.clone(),
                })?;
            match mutation {
                MemberMutation::SetType(type_text) => {
                    let current = info.type_annotation.as_deref().map(normalize);
                    if current.as_deref() == Some(normalize(type_text).as_str()) {
                        false
                    } else {
                        file.set_member_type(&class, member, type_text)?;
                        true
                    }
                }
                MemberMutation::AddDecorator(decorator) => {
                    if info.decorators.iter().any(|name| *name == decorator.name) {
                        false
                    } else {
                        file.add_member_decorator(&class, member, decorator)?;
                        true
                    }
                }
            }
        }
        EditOperation::Collection {
            collection,
            element,
            position,
        } => {
            let class = select_class(file, collection.class())?;
            let target = collection_target(collection, &class);
            let elements =
                file.collection_elements(target)?
                    .ok_or_else(|| PatchError::CollectionNotFound {
                        path: file.path().to_string(),
                        selector: collection.to_string(),
                    })?;
            let wanted = normalize(element);
            if elements.iter().any(|existing| normalize(existing) == wanted) {
                false
            } else {
                let index = match position {
                    InsertPosition::Append => elements.len(),
                    InsertPosition::BeforeLast => elements.len().saturating_sub(1),
                };
                file.insert_collection_element(target, index, element)?;
                true
            }
        }
    };

    debug!(
        "{}: {} ({})",
        file.path(),
        edit,
        if applied { "applied" } else { "already present" }
    );
    Ok(EditOutcome {
        edit: edit.clone(),
        status: if applied {
            EditStatus::Applied
        } else {
            EditStatus::Unchanged
        },
    })
}

fn select_class<F: SourceAst>(file: &F, selector: &ClassSelector) -> Result<String, PatchError> {
    let names = file.class_names()?;
    let mut matches: Vec<String> = match selector {
        ClassSelector::Only => names,
        ClassSelector::Named(wanted) => names.into_iter().filter(|n| n == wanted).collect(),
    };
    if matches.len() == 1 {
        Ok(matches.remove(0))
    } else {
        Err(PatchError::AmbiguousTarget {
            path: file.path().to_string(),
            selector: selector.to_string(),
            found: matches.len(),
        })
    }
}

fn collection_target<'a>(collection: &'a CollectionSelector, class: &'a str) -> CollectionTarget<'a> {
    match collection {
        CollectionSelector::DecoratorProperty {
            decorator,
            property,
            ..
        } => CollectionTarget::DecoratorProperty {
            class,
            decorator,
            property,
        },
        CollectionSelector::MemberInitializer { member, .. } => {
            CollectionTarget::MemberInitializer { class, member }
        }
    }
}

/// Whitespace-insensitive form used for element and type equality.
fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
