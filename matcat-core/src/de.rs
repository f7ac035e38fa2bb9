//! Deserialiser: XML element trees to typed domain graphs.
//!
//! The walk is driven entirely by the static descriptor tables in
//! [`crate::schema`]. Recovery policy: a sequence item that fails conversion
//! is dropped and reported in [`Parsed::recovered`] with its source position
//! so one malformed layer or material never blocks the rest of the catalog;
//! everything else (unknown root tag, malformed attribute outside a
//! sequence, non-well-formed XML) is fatal for the document.

use std::fs;
use std::path::Path;

use roxmltree::Document;
use tracing::warn;

use crate::config::MapperOptions;
use crate::error::{MapError, Recovered};
use crate::model::Node;
use crate::schema::{
    convert_scalar, Bindings, Descriptor, FieldKind, Mapped, Registry, Value, NAMESPACE,
    SCHEMA_FILE,
};

/// A parsed document: the typed graph plus every problem the parse absorbed.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub recovered: Vec<Recovered>,
}

/// Read and deserialise a document from disk.
pub fn from_xml_file<T: Mapped>(
    path: impl AsRef<Path>,
    options: &MapperOptions,
) -> Result<Parsed<T>, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    from_xml_str(&text, &path.display().to_string(), options)
}

/// Deserialise a document from a string. `origin` names the source in
/// diagnostics (a file path, a URL, or a synthetic label).
pub fn from_xml_str<T: Mapped>(
    xml: &str,
    origin: &str,
    options: &MapperOptions,
) -> Result<Parsed<T>, MapError> {
    let doc = Document::parse(xml).map_err(|source| MapError::Xml {
        origin: origin.to_string(),
        source,
    })?;
    if options.validate {
        validate_root::<T>(&doc, origin)?;
    }
    let root = doc.root_element();
    let descriptor = Registry::global().resolve(root.tag_name().name())?;
    let mut ctx = Context {
        doc: &doc,
        origin,
        recovered: Vec::new(),
    };
    let node = deserialise_element(root, Some(descriptor), true, &mut ctx)?;
    let found = node.descriptor().tag;
    let value = T::from_node(node).ok_or_else(|| MapError::UnexpectedRoot {
        origin: origin.to_string(),
        found: found.to_string(),
        expected: T::descriptor().tag,
    })?;
    Ok(Parsed {
        value,
        recovered: ctx.recovered,
    })
}

struct Context<'a, 'input> {
    doc: &'a Document<'input>,
    origin: &'a str,
    recovered: Vec<Recovered>,
}

impl Context<'_, '_> {
    fn position(&self, node: roxmltree::Node<'_, '_>) -> roxmltree::TextPos {
        self.doc.text_pos_at(node.range().start)
    }
}

/// Convert one element. `descriptor` is supplied for typed child fields and
/// resolved from the tag name via the registry otherwise.
fn deserialise_element<'a, 'input>(
    element: roxmltree::Node<'a, 'input>,
    descriptor: Option<&'static Descriptor>,
    is_root: bool,
    ctx: &mut Context<'a, 'input>,
) -> Result<Node, MapError> {
    let registry = Registry::global();
    let descriptor = match descriptor {
        Some(d) => d,
        None => registry.resolve(element.tag_name().name())?,
    };

    let mut bindings = Bindings::new();

    if descriptor.leaf {
        bindings.set_text(element.text().unwrap_or("").to_string());
    }

    for field in descriptor.attributes {
        let Some(raw) = element.attribute(field.name) else {
            continue;
        };
        let Some(scalar) = field.kind.scalar() else {
            continue;
        };
        match convert_scalar(raw, scalar) {
            Ok(value) => bindings.insert(field.name, value),
            Err(reason) => {
                return Err(MapError::Value {
                    tag: descriptor.tag.to_string(),
                    field: field.name.to_string(),
                    value: raw.to_string(),
                    line: ctx.position(element).row,
                    reason,
                });
            }
        }
    }

    for field in descriptor.children {
        match field.kind {
            FieldKind::Sequence(tag) => {
                let target = registry.get(tag)?;
                let mut items = Vec::new();
                let matching = element
                    .children()
                    .filter(|c| c.is_element() && c.tag_name().name() == field.name);
                for child in matching {
                    match deserialise_element(child, Some(target), false, ctx) {
                        Ok(node) => items.push(node),
                        Err(err) => {
                            let pos = ctx.position(child);
                            warn!(
                                element = field.name,
                                line = pos.row,
                                origin = ctx.origin,
                                error = %err,
                                "dropping sequence item that failed to convert"
                            );
                            ctx.recovered.push(Recovered::ChildDropped {
                                element: field.name.to_string(),
                                line: pos.row,
                                column: pos.col,
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                bindings.insert(field.name, Value::Seq(items));
            }
            FieldKind::Nested(tag) | FieldKind::OptionalNested(tag) => {
                let target = registry.get(tag)?;
                let found = element
                    .children()
                    .find(|c| c.is_element() && c.tag_name().name() == field.name);
                if let Some(child) = found {
                    let node = deserialise_element(child, Some(target), false, ctx)?;
                    bindings.insert(field.name, Value::Node(Box::new(node)));
                }
            }
            FieldKind::Scalar(scalar) | FieldKind::OptionalScalar(scalar) => {
                let found = element
                    .children()
                    .find(|c| c.is_element() && c.tag_name().name() == field.name);
                if let Some(child) = found {
                    let raw = child.text().unwrap_or("");
                    match convert_scalar(raw, scalar) {
                        Ok(value) => bindings.insert(field.name, value),
                        Err(reason) => {
                            return Err(MapError::Value {
                                tag: descriptor.tag.to_string(),
                                field: field.name.to_string(),
                                value: raw.to_string(),
                                line: ctx.position(child).row,
                                reason,
                            });
                        }
                    }
                }
            }
        }
    }

    if is_root {
        synthesise_missing_trust(descriptor, &mut bindings, ctx)?;
    }

    Ok((descriptor.build)(bindings))
}

/// Pre-pass outcome applied at the root: any required trust element that is
/// absent gets a flagged placeholder so schema-dependent consumers still see
/// a well-shaped tree.
fn synthesise_missing_trust(
    descriptor: &'static Descriptor,
    bindings: &mut Bindings,
    ctx: &mut Context<'_, '_>,
) -> Result<(), MapError> {
    let registry = Registry::global();
    for name in descriptor.required_trust {
        if bindings.contains(name) {
            continue;
        }
        let Some(field) = descriptor.children.iter().find(|f| f.name == *name) else {
            continue;
        };
        let Some(tag) = field.kind.nested_tag() else {
            continue;
        };
        let target = registry.get(tag)?;
        if let Some(placeholder) = target.placeholder {
            warn!(
                element = *name,
                origin = ctx.origin,
                "trust element missing, inserting flagged placeholder"
            );
            let message = format!("required element '{}' missing from {}", name, ctx.origin);
            bindings.insert(*name, Value::Node(Box::new(placeholder(message))));
            ctx.recovered.push(Recovered::MissingTrustElement {
                element: name.to_string(),
                origin: ctx.origin.to_string(),
            });
        }
    }
    Ok(())
}

/// Strict-mode structural check: the fixed schema checks (root type,
/// namespace, both trust elements), nothing more.
fn validate_root<T: Mapped>(doc: &Document<'_>, origin: &str) -> Result<(), MapError> {
    let root = doc.root_element();
    let expected = T::descriptor();
    let fail = |reason: String| MapError::Validation {
        origin: origin.to_string(),
        reason,
    };

    let resolved = Registry::global().resolve(root.tag_name().name())?;
    if !std::ptr::eq(resolved, expected) {
        return Err(fail(format!(
            "root element <{}> does not match the expected root <{}>",
            root.tag_name().name(),
            expected.tag
        )));
    }
    if root.tag_name().namespace() != Some(NAMESPACE) {
        return Err(fail(format!(
            "document namespace {:?} is not {} (see {})",
            root.tag_name().namespace(),
            NAMESPACE,
            SCHEMA_FILE
        )));
    }
    for name in expected.required_trust {
        let present = root
            .children()
            .any(|c| c.is_element() && c.tag_name().name() == *name);
        if !present {
            return Err(fail(format!(
                "required element '{}' is missing (see {})",
                name, SCHEMA_FILE
            )));
        }
    }
    Ok(())
}
