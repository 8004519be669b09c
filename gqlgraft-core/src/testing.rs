//! In-memory [`SourceAst`] used to test the patcher without a parser.

use crate::errors::PatchError;
use crate::patch::{CollectionTarget, DecoratorSpec, MemberInfo, SourceAst};

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MockSource {
    path: String,
    pub imports: Vec<(String, Vec<String>)>,
    pub classes: Vec<MockClass>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MockClass {
    pub name: String,
    pub decorators: Vec<DecoratorSpec>,
    pub members: Vec<MockMember>,
    pub collections: Vec<MockCollection>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MockMember {
    pub name: String,
    pub ty: Option<String>,
    pub decorators: Vec<DecoratorSpec>,
    pub initializer: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MockCollection {
    pub decorator: String,
    pub property: String,
    pub elements: Vec<String>,
}

impl MockSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, module: &str, name: &str) -> Self {
        self.push_import(module, name);
        self
    }

    pub fn with_class(mut self, class: MockClass) -> Self {
        self.classes.push(class);
        self
    }

    fn push_import(&mut self, module: &str, name: &str) {
        match self.imports.iter_mut().find(|(m, _)| m == module) {
            Some((_, names)) => names.push(name.to_string()),
            None => self
                .imports
                .push((module.to_string(), vec![name.to_string()])),
        }
    }

    fn class(&self, name: &str) -> Result<&MockClass, PatchError> {
        self.classes
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| self.no_class(name))
    }

    fn class_mut(&mut self, name: &str) -> Result<&mut MockClass, PatchError> {
        let err = self.no_class(name);
        self.classes
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or(err)
    }

    fn member_mut(&mut self, class: &str, member: &str) -> Result<&mut MockMember, PatchError> {
        let path = self.path.clone();
        self.class_mut(class)?
            .members
            .iter_mut()
            .find(|m| m.name == member)
            .ok_or_else(|| PatchError::MemberNotFound {
                path,
                class: class.to_string(),
                member: member.to_string(),
            })
    }

    fn no_class(&self, name: &str) -> PatchError {
        PatchError::AmbiguousTarget {
            path: self.path.clone(),
            selector: format!("class {name}"),
            found: 0,
        }
    }

    fn missing_collection(&self) -> PatchError {
        PatchError::CollectionNotFound {
            path: self.path.clone(),
            selector: "mock".to_string(),
        }
    }
}

impl MockClass {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_member(mut self, member: MockMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_collection(mut self, decorator: &str, property: &str, elements: &[&str]) -> Self {
        self.collections.push(MockCollection {
            decorator: decorator.to_string(),
            property: property.to_string(),
            elements: elements.iter().map(|e| e.to_string()).collect(),
        });
        self
    }
}

impl MockMember {
    pub fn new(name: &str, ty: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.map(str::to_string),
            ..Self::default()
        }
    }
}

impl SourceAst for MockSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn source_text(&self) -> String {
        let mut out = String::new();
        for (module, names) in &self.imports {
            out.push_str(&format!("import {{ {} }} from '{module}';\n", names.join(", ")));
        }
        for class in &self.classes {
            for decorator in &class.decorators {
                out.push_str(&format!("{}\n", decorator.render()));
            }
            for collection in &class.collections {
                out.push_str(&format!(
                    "@{}({{ {}: [{}] }})\n",
                    collection.decorator,
                    collection.property,
                    collection.elements.join(", ")
                ));
            }
            out.push_str(&format!("class {} {{\n", class.name));
            for member in &class.members {
                for decorator in &member.decorators {
                    out.push_str(&format!("  {}\n", decorator.render()));
                }
                out.push_str(&format!(
                    "  {}: {};\n",
                    member.name,
                    member.ty.as_deref().unwrap_or("any")
                ));
            }
            out.push_str("}\n");
        }
        out
    }

    fn has_named_import(&self, module: &str, name: &str) -> Result<bool, PatchError> {
        Ok(self
            .imports
            .iter()
            .any(|(m, names)| m == module && names.iter().any(|n| n == name)))
    }

    fn add_named_import(&mut self, module: &str, name: &str) -> Result<(), PatchError> {
        self.push_import(module, name);
        Ok(())
    }

    fn class_names(&self) -> Result<Vec<String>, PatchError> {
        Ok(self.classes.iter().map(|c| c.name.clone()).collect())
    }

    fn class_decorators(&self, class: &str) -> Result<Vec<String>, PatchError> {
        Ok(self
            .class(class)?
            .decorators
            .iter()
            .map(|d| d.name.clone())
            .collect())
    }

    fn add_class_decorator(
        &mut self,
        class: &str,
        decorator: &DecoratorSpec,
    ) -> Result<(), PatchError> {
        self.class_mut(class)?.decorators.push(decorator.clone());
        Ok(())
    }

    fn member(&self, class: &str, member: &str) -> Result<Option<MemberInfo>, PatchError> {
        Ok(self
            .class(class)?
            .members
            .iter()
            .find(|m| m.name == member)
            .map(|m| MemberInfo {
                decorators: m.decorators.iter().map(|d| d.name.clone()).collect(),
                type_annotation: m.ty.clone(),
            }))
    }

    fn add_member_decorator(
        &mut self,
        class: &str,
        member: &str,
        decorator: &DecoratorSpec,
    ) -> Result<(), PatchError> {
        self.member_mut(class, member)?
            .decorators
            .push(decorator.clone());
        Ok(())
    }

    fn set_member_type(
        &mut self,
        class: &str,
        member: &str,
        type_text: &str,
    ) -> Result<(), PatchError> {
        self.member_mut(class, member)?.ty = Some(type_text.to_string());
        Ok(())
    }

    fn collection_elements(
        &self,
        target: CollectionTarget<'_>,
    ) -> Result<Option<Vec<String>>, PatchError> {
        Ok(match target {
            CollectionTarget::DecoratorProperty {
                class,
                decorator,
                property,
            } => self
                .class(class)?
                .collections
                .iter()
                .find(|c| c.decorator == decorator && c.property == property)
                .map(|c| c.elements.clone()),
            CollectionTarget::MemberInitializer { class, member } => self
                .class(class)?
                .members
                .iter()
                .find(|m| m.name == member)
                .and_then(|m| m.initializer.clone()),
        })
    }

    fn insert_collection_element(
        &mut self,
        target: CollectionTarget<'_>,
        index: usize,
        element: &str,
    ) -> Result<(), PatchError> {
        let err = self.missing_collection();
        let elements = match target {
            CollectionTarget::DecoratorProperty {
                class,
                decorator,
                property,
            } => self
                .class_mut(class)?
                .collections
                .iter_mut()
                .find(|c| c.decorator == decorator && c.property == property)
                .map(|c| &mut c.elements),
            CollectionTarget::MemberInitializer { class, member } => self
                .class_mut(class)?
                .members
                .iter_mut()
                .find(|m| m.name == member)
                .and_then(|m| m.initializer.as_mut()),
        }
        .ok_or(err)?;
        elements.insert(index, element.to_string());
        Ok(())
    }
}
