use super::ast::{CollectionTarget, MemberInfo, ParseSource, SourceAst};
use super::DecoratorSpec;
use crate::errors::PatchError;
use std::ops::Range;
use std::path::PathBuf;
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    ArrayLit, Callee, Class, ClassMember, ClassProp, Decl, Decorator, DefaultDecl, EsVersion, Expr,
    ImportDecl, ImportSpecifier, MemberProp, Module, ModuleDecl, ModuleItem, Prop, PropName,
    PropOrSpread, Stmt,
};
use swc_ecma_parser::lexer::Lexer;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// TypeScript source file patched by splicing text at parser spans.
///
/// The text is the source of truth; it is re-parsed for every query and after
/// every edit, so an edit that would leave the file unparseable fails right
/// away. Bytes outside the spliced ranges are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsSourceFile {
    path: String,
    text: String,
}

struct ParsedModule {
    module: Module,
    base: u32,
}

impl ParsedModule {
    fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.base) as usize
    }

    fn range(&self, span: Span) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.module.body.iter().filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        })
    }

    fn classes(&self) -> Vec<ClassRef<'_>> {
        self.module
            .body
            .iter()
            .filter_map(|item| {
                let (name, class) = match item {
                    ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) => {
                        (decl.ident.sym.to_string(), &*decl.class)
                    }
                    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                        Decl::Class(decl) => (decl.ident.sym.to_string(), &*decl.class),
                        _ => return None,
                    },
                    ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                        match &export.decl {
                            DefaultDecl::Class(expr) => (
                                expr.ident
                                    .as_ref()
                                    .map(|ident| ident.sym.to_string())
                                    .unwrap_or_else(|| "default".to_string()),
                                &*expr.class,
                            ),
                            _ => return None,
                        }
                    }
                    _ => return None,
                };
                Some(ClassRef {
                    name,
                    class,
                    item_span: item.span(),
                })
            })
            .collect()
    }
}

struct ClassRef<'m> {
    name: String,
    class: &'m Class,
    /// Whole statement, including any `export` keyword.
    item_span: Span,
}

impl TsSourceFile {
    pub fn new(path: &str, text: &str) -> Result<Self, PatchError> {
        let file = Self {
            path: path.to_string(),
            text: text.to_string(),
        };
        file.parse_module()?;
        Ok(file)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn parse_module(&self) -> Result<ParsedModule, PatchError> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            FileName::Real(PathBuf::from(&self.path)).into(),
            self.text.clone(),
        );

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: self.path.ends_with(".tsx"),
            decorators: true,
            ..Default::default()
        });
        let lexer = Lexer::new(syntax, EsVersion::Es2022, StringInput::from(&*fm), None);

        let mut parser = Parser::new_from(lexer);
        let module = parser
            .parse_module()
            .map_err(|err| self.parse_error(format!("{:?}", err)))?;
        if let Some(err) = parser.take_errors().into_iter().next() {
            return Err(self.parse_error(format!("{:?}", err)));
        }

        Ok(ParsedModule {
            module,
            base: fm.start_pos.0,
        })
    }

    fn parse_error(&self, reason: String) -> PatchError {
        PatchError::Parse {
            path: self.path.clone(),
            reason,
        }
    }

    fn find_class<'m>(&self, parsed: &'m ParsedModule, name: &str) -> Result<ClassRef<'m>, PatchError> {
        parsed
            .classes()
            .into_iter()
            .find(|class| class.name == name)
            .ok_or_else(|| PatchError::AmbiguousTarget {
                path: self.path.clone(),
                selector: format!("class {name}"),
                found: 0,
            })
    }

    fn find_member<'m>(
        &self,
        class: &ClassRef<'m>,
        member: &str,
    ) -> Result<&'m ClassProp, PatchError> {
        find_prop(class.class, member).ok_or_else(|| PatchError::MemberNotFound {
            path: self.path.clone(),
            class: class.name.clone(),
            member: member.to_string(),
        })
    }

    /// Where and what to insert so `decorator` follows the existing ones, or
    /// sits on its own line above `owner` when there are none.
    fn decorator_insertion(
        &self,
        parsed: &ParsedModule,
        existing: &[Decorator],
        owner: Span,
        decorator: &DecoratorSpec,
    ) -> (usize, String) {
        let eol = self.eol();
        match existing.last() {
            Some(last) => {
                let range = parsed.range(last.span);
                let indent = line_indent(&self.text, range.start);
                (range.end, format!("{eol}{indent}{}", decorator.render()))
            }
            None => {
                let start = parsed.range(owner).start;
                let indent = line_indent(&self.text, start);
                (start, format!("{}{eol}{indent}", decorator.render()))
            }
        }
    }

    /// Line terminator used for inserted text, following the file.
    fn eol(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn splice(&mut self, at: Range<usize>, replacement: &str) -> Result<(), PatchError> {
        self.text.replace_range(at, replacement);
        self.parse_module().map(|_| ())
    }

    fn insert(&mut self, at: usize, insertion: &str) -> Result<(), PatchError> {
        self.splice(at..at, insertion)
    }
}

impl ParseSource for TsSourceFile {
    fn parse(path: &str, text: &str) -> Result<Self, PatchError> {
        TsSourceFile::new(path, text)
    }
}

impl SourceAst for TsSourceFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn source_text(&self) -> String {
        self.text.clone()
    }

    fn has_named_import(&self, module: &str, name: &str) -> Result<bool, PatchError> {
        let parsed = self.parse_module()?;
        let found = parsed
            .imports()
            .filter(|decl| !decl.type_only && import_source(decl) == module)
            .flat_map(|decl| decl.specifiers.iter())
            .any(|spec| match spec {
                ImportSpecifier::Named(named) => !named.is_type_only && &*named.local.sym == name,
                _ => false,
            });
        Ok(found)
    }

    fn add_named_import(&mut self, module: &str, name: &str) -> Result<(), PatchError> {
        let parsed = self.parse_module()?;
        let imports: Vec<&ImportDecl> = parsed.imports().collect();

        let merge = imports
            .iter()
            .filter(|decl| is_mergeable(decl, module))
            .find_map(|decl| {
                let last_named = decl
                    .specifiers
                    .iter()
                    .filter_map(|spec| match spec {
                        ImportSpecifier::Named(named) => Some(named.span),
                        _ => None,
                    })
                    .last();
                if let Some(span) = last_named {
                    return Some((parsed.range(span).end, format!(", {name}")));
                }
                decl.specifiers.iter().find_map(|spec| match spec {
                    ImportSpecifier::Default(default) => Some((
                        parsed.range(default.span).end,
                        format!(", {{ {name} }}"),
                    )),
                    _ => None,
                })
            });

        let (at, insertion) = match merge {
            Some(found) => found,
            None => {
                let quote = imports
                    .first()
                    .map(|decl| quote_at(&self.text, parsed.range(decl.src.span).start))
                    .unwrap_or('\'');
                let declaration = format!("import {{ {name} }} from {quote}{module}{quote};");
                let eol = self.eol();
                match imports.last() {
                    Some(last) => {
                        let mut end = parsed.range(last.span).end;
                        if self.text[end..].starts_with(';') {
                            end += 1;
                        }
                        (end, format!("{eol}{declaration}"))
                    }
                    None => (0, format!("{declaration}{eol}")),
                }
            }
        };

        self.insert(at, &insertion)
    }

    fn class_names(&self) -> Result<Vec<String>, PatchError> {
        let parsed = self.parse_module()?;
        Ok(parsed.classes().into_iter().map(|class| class.name).collect())
    }

    fn class_decorators(&self, class: &str) -> Result<Vec<String>, PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, class)?;
        Ok(found
            .class
            .decorators
            .iter()
            .filter_map(decorator_name)
            .collect())
    }

    fn add_class_decorator(
        &mut self,
        class: &str,
        decorator: &DecoratorSpec,
    ) -> Result<(), PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, class)?;
        let (at, insertion) =
            self.decorator_insertion(&parsed, &found.class.decorators, found.item_span, decorator);
        self.insert(at, &insertion)
    }

    fn member(&self, class: &str, member: &str) -> Result<Option<MemberInfo>, PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, class)?;
        Ok(find_prop(found.class, member).map(|prop| MemberInfo {
            decorators: prop.decorators.iter().filter_map(decorator_name).collect(),
            type_annotation: prop
                .type_ann
                .as_ref()
                .map(|ann| self.text[parsed.range(ann.type_ann.span())].to_string()),
        }))
    }

    fn add_member_decorator(
        &mut self,
        class: &str,
        member: &str,
        decorator: &DecoratorSpec,
    ) -> Result<(), PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, class)?;
        let prop = self.find_member(&found, member)?;
        let (at, insertion) =
            self.decorator_insertion(&parsed, &prop.decorators, prop.span, decorator);
        self.insert(at, &insertion)
    }

    fn set_member_type(
        &mut self,
        class: &str,
        member: &str,
        type_text: &str,
    ) -> Result<(), PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, class)?;
        let prop = self.find_member(&found, member)?;
        match &prop.type_ann {
            Some(ann) => {
                let range = parsed.range(ann.type_ann.span());
                self.splice(range, type_text)
            }
            None => {
                let mut end = parsed.range(prop.key.span()).end;
                if matches!(self.text[end..].chars().next(), Some('?') | Some('!')) {
                    end += 1;
                }
                self.insert(end, &format!(": {type_text}"))
            }
        }
    }

    fn collection_elements(
        &self,
        target: CollectionTarget<'_>,
    ) -> Result<Option<Vec<String>>, PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, target.class())?;
        Ok(find_array(found.class, target).map(|array| {
            element_ranges(&parsed, array)
                .into_iter()
                .map(|range| self.text[range].to_string())
                .collect()
        }))
    }

    fn insert_collection_element(
        &mut self,
        target: CollectionTarget<'_>,
        index: usize,
        element: &str,
    ) -> Result<(), PatchError> {
        let parsed = self.parse_module()?;
        let found = self.find_class(&parsed, target.class())?;
        let array = find_array(found.class, target).ok_or_else(|| PatchError::CollectionNotFound {
            path: self.path.clone(),
            selector: target.to_string(),
        })?;

        let array_range = parsed.range(array.span);
        let elements = element_ranges(&parsed, array);
        let multiline = self.text[array_range.clone()].contains('\n');
        let eol = self.eol();

        if elements.is_empty() {
            let inner = array_range.start + 1..array_range.end - 1;
            let outer = line_indent(&self.text, array_range.start);
            let indent = format!("{outer}    ");
            let element = reindent(element, &indent, eol);
            if self.text[inner.clone()].trim().is_empty() {
                let replacement = if multiline {
                    format!("{eol}{indent}{element}{eol}{outer}")
                } else {
                    element
                };
                return self.splice(inner, &replacement);
            }
            // Only comments inside the brackets; they stay after the element.
            let insertion = if multiline {
                format!("{eol}{indent}{element}")
            } else {
                element
            };
            return self.insert(inner.start, &insertion);
        }

        let (at, insertion) = if index >= elements.len() {
            let last = &elements[elements.len() - 1];
            let indent = line_indent(&self.text, last.start);
            let separator = if multiline {
                format!(",{eol}{indent}")
            } else {
                ", ".to_string()
            };
            (
                last.end,
                format!("{separator}{}", reindent(element, &indent, eol)),
            )
        } else {
            let next = &elements[index];
            let indent = line_indent(&self.text, next.start);
            let separator = if multiline {
                format!(",{eol}{indent}")
            } else {
                ", ".to_string()
            };
            (
                next.start,
                format!("{}{separator}", reindent(element, &indent, eol)),
            )
        };

        self.insert(at, &insertion)
    }
}

fn import_source(decl: &ImportDecl) -> String {
    decl.src.value.to_string_lossy().into_owned()
}

/// A value import of `module` that named specifiers can be appended to.
fn is_mergeable(decl: &ImportDecl, module: &str) -> bool {
    !decl.type_only
        && import_source(decl) == module
        && !decl
            .specifiers
            .iter()
            .any(|spec| matches!(spec, ImportSpecifier::Namespace(_)))
}

fn expr_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(id) => Some(id.sym.to_string()),
            _ => None,
        },
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => expr_name(callee),
            _ => None,
        },
        _ => None,
    }
}

fn decorator_name(decorator: &Decorator) -> Option<String> {
    expr_name(&decorator.expr)
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(id) => Some(id.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().into_owned()),
        _ => None,
    }
}

fn find_prop<'m>(class: &'m Class, member: &str) -> Option<&'m ClassProp> {
    class.body.iter().find_map(|item| match item {
        ClassMember::ClassProp(prop)
            if !prop.is_static && prop_name(&prop.key).as_deref() == Some(member) =>
        {
            Some(prop)
        }
        _ => None,
    })
}

fn find_array<'m>(class: &'m Class, target: CollectionTarget<'_>) -> Option<&'m ArrayLit> {
    match target {
        CollectionTarget::DecoratorProperty {
            decorator,
            property,
            ..
        } => {
            let found = class
                .decorators
                .iter()
                .find(|d| decorator_name(d).as_deref() == Some(decorator))?;
            let Expr::Call(call) = &*found.expr else {
                return None;
            };
            let Expr::Object(object) = &*call.args.first()?.expr else {
                return None;
            };
            object.props.iter().find_map(|prop| match prop {
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(kv) if prop_name(&kv.key).as_deref() == Some(property) => {
                        match &*kv.value {
                            Expr::Array(array) => Some(array),
                            _ => None,
                        }
                    }
                    _ => None,
                },
                _ => None,
            })
        }
        CollectionTarget::MemberInitializer { member, .. } => {
            match find_prop(class, member)?.value.as_deref()? {
                Expr::Array(array) => Some(array),
                _ => None,
            }
        }
    }
}

/// Byte ranges of the non-hole elements, spread operator included.
fn element_ranges(parsed: &ParsedModule, array: &ArrayLit) -> Vec<Range<usize>> {
    array
        .elems
        .iter()
        .flatten()
        .map(|elem| {
            let span = elem.expr.span();
            let start = elem.spread.map(|spread| spread.lo).unwrap_or(span.lo);
            parsed.offset(start)..parsed.offset(span.hi)
        })
        .collect()
}

fn quote_at(text: &str, pos: usize) -> char {
    text[pos..]
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '\'')
        .unwrap_or('\'')
}

/// Leading whitespace of the line containing `pos`.
fn line_indent(text: &str, pos: usize) -> String {
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    text[start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Prefixes every line after the first with `indent`, joining lines with `eol`.
fn reindent(text: &str, indent: &str, eol: &str) -> String {
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push_str(eol);
        if !line.is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}
