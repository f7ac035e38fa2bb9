//! Serialiser: typed domain graphs back to XML documents.
//!
//! Structural inverse of [`crate::de`]: descriptor-driven, attributes and
//! children emitted in declared order, sequence fields as one sibling per
//! item. Emitted documents carry the fixed namespace and a standard,
//! non-standalone XML declaration, pretty-printed with two-space indent. No
//! re-validation happens on this path.

use std::fs;
use std::io;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::MapError;
use crate::model::Node;
use crate::schema::{render_scalar, Bindings, Descriptor, FieldKind, Mapped, Value, NAMESPACE};

/// Serialise a domain graph to a pretty-printed XML string.
pub fn to_xml_string<T: Mapped>(value: &T) -> Result<String, MapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    write_element(&mut writer, T::descriptor(), value.bindings(), None, true)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Serialise a domain graph to a file.
pub fn to_xml_file<T: Mapped>(value: &T, path: impl AsRef<Path>) -> Result<(), MapError> {
    let mut xml = to_xml_string(value)?;
    xml.push('\n');
    fs::write(path, xml.as_bytes())?;
    Ok(())
}

enum Emit {
    Node(Node),
    Text(String),
}

/// Emit one element. `tag_override` names the element after its field when
/// that differs from the descriptor tag (typed child fields).
fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    descriptor: &'static Descriptor,
    mut bindings: Bindings,
    tag_override: Option<&str>,
    declare_namespace: bool,
) -> Result<(), MapError> {
    let tag = tag_override.unwrap_or(descriptor.tag);
    let mut start = BytesStart::new(tag);
    if declare_namespace {
        start.push_attribute(("xmlns", NAMESPACE));
    }
    for field in descriptor.attributes {
        if let Some(value) = bindings.take(field.name) {
            start.push_attribute((field.name, render_scalar(&value).as_str()));
        }
    }

    if descriptor.leaf {
        let text = bindings.text_content();
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new(&text)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
        return Ok(());
    }

    let mut emit = Vec::new();
    for field in descriptor.children {
        match field.kind {
            FieldKind::Sequence(_) => {
                if let Some(Value::Seq(nodes)) = bindings.take(field.name) {
                    for node in nodes {
                        emit.push((field.name, Emit::Node(node)));
                    }
                }
            }
            FieldKind::Nested(_) | FieldKind::OptionalNested(_) => {
                if let Some(Value::Node(node)) = bindings.take(field.name) {
                    emit.push((field.name, Emit::Node(*node)));
                }
            }
            FieldKind::Scalar(_) | FieldKind::OptionalScalar(_) => {
                if let Some(value) = bindings.take(field.name) {
                    emit.push((field.name, Emit::Text(render_scalar(&value))));
                }
            }
        }
    }

    if emit.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for (name, item) in emit {
        match item {
            Emit::Node(node) => {
                write_element(writer, node.descriptor(), node.bindings(), Some(name), false)?;
            }
            Emit::Text(text) => {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
