//! Schema registry: static descriptor tables driving the XML mapper.
//!
//! Every domain type has exactly one [`Descriptor`] describing how its fields
//! map to XML attributes and child elements, plus a factory function building
//! the typed node from collected [`Bindings`]. Descriptors are plain statics,
//! assembled into the tag-keyed [`Registry`] once per process and shared
//! read-only from then on, so lookups need no synchronisation.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::error::MapError;
use crate::model::{
    Company, Geometry, IndexEntry, Information, Layer, LocalisedText, Material, Materials, Node,
    ProducerIndex, PropertySet, PublicKey, SignatureValue, WebLink,
};

/// Namespace declared on every emitted catalog document.
pub const NAMESPACE: &str = "http://schemas.matcat.org/catalog/1.0";

/// Date encoding used for all date-valued attributes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Schema document shipped alongside the mapper, describing the catalog
/// shape the fixed validation checks refer to.
pub const SCHEMA_FILE: &str = "schema/materials.xsd";

/// Primitive value types an attribute or primitive child can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Text,
    Int,
    Float,
    Date,
}

/// Declared type of a single field, the explicit replacement for runtime
/// introspection of optional/list wrappers.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar(Scalar),
    OptionalScalar(Scalar),
    Nested(&'static str),
    OptionalNested(&'static str),
    Sequence(&'static str),
}

impl FieldKind {
    /// The base scalar type with any optional wrapper stripped, if this is a
    /// primitive field.
    pub fn scalar(&self) -> Option<Scalar> {
        match self {
            FieldKind::Scalar(s) | FieldKind::OptionalScalar(s) => Some(*s),
            _ => None,
        }
    }

    /// Descriptor tag of the nested type, if this field holds one.
    pub fn nested_tag(&self) -> Option<&'static str> {
        match self {
            FieldKind::Nested(t) | FieldKind::OptionalNested(t) | FieldKind::Sequence(t) => {
                Some(t)
            }
            _ => None,
        }
    }
}

/// One attribute or child field of a domain type. `name` is both the XML
/// name (attribute name or child element tag) and the bindings key.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Static metadata describing how one domain type maps to XML.
#[derive(Debug)]
pub struct Descriptor {
    /// Tag name, matching the type name.
    pub tag: &'static str,
    /// Leaf types carry a scalar text value instead of structured children.
    pub leaf: bool,
    pub attributes: &'static [Field],
    pub children: &'static [Field],
    /// Child fields the document root must carry; missing ones are
    /// synthesised as flagged placeholders during deserialisation.
    pub required_trust: &'static [&'static str],
    /// Factory from collected bindings to the typed node.
    pub build: fn(Bindings) -> Node,
    /// Factory for a flagged placeholder carrying a diagnostic message.
    pub placeholder: Option<fn(String) -> Node>,
}

/// A converted field value on its way into or out of a domain object.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Node(Box<Node>),
    Seq(Vec<Node>),
}

/// Keyword bindings collected for one element, keyed by field name.
#[derive(Debug, Default)]
pub struct Bindings {
    text: Option<String>,
    values: HashMap<&'static str, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Scalar text content of a leaf element, empty if absent.
    pub fn text_content(&mut self) -> String {
        self.text.take().unwrap_or_default()
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn take_str(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn take_int(&mut self, name: &str) -> Option<i64> {
        match self.values.remove(name) {
            Some(Value::Int(i)) => Some(i),
            _ => None,
        }
    }

    pub fn take_float(&mut self, name: &str) -> Option<f64> {
        match self.values.remove(name) {
            Some(Value::Float(f)) => Some(f),
            _ => None,
        }
    }

    pub fn take_date(&mut self, name: &str) -> Option<NaiveDate> {
        match self.values.remove(name) {
            Some(Value::Date(d)) => Some(d),
            _ => None,
        }
    }

    pub fn take_nested<T: Mapped>(&mut self, name: &str) -> Option<T> {
        match self.values.remove(name) {
            Some(Value::Node(node)) => T::from_node(*node),
            _ => None,
        }
    }

    pub fn take_seq<T: Mapped>(&mut self, name: &str) -> Vec<T> {
        match self.values.remove(name) {
            Some(Value::Seq(nodes)) => nodes.into_iter().filter_map(T::from_node).collect(),
            _ => Vec::new(),
        }
    }

    // Collection helpers for the serialise direction. Optional fields that
    // are `None` are simply not inserted, which is what makes absent
    // attributes stay absent on re-emit.

    pub fn put_str(&mut self, name: &'static str, value: &str) {
        self.insert(name, Value::Text(value.to_string()));
    }

    pub fn put_opt_str(&mut self, name: &'static str, value: Option<&str>) {
        if let Some(v) = value {
            self.put_str(name, v);
        }
    }

    pub fn put_int(&mut self, name: &'static str, value: i64) {
        self.insert(name, Value::Int(value));
    }

    pub fn put_opt_int(&mut self, name: &'static str, value: Option<i64>) {
        if let Some(v) = value {
            self.put_int(name, v);
        }
    }

    pub fn put_opt_float(&mut self, name: &'static str, value: Option<f64>) {
        if let Some(v) = value {
            self.insert(name, Value::Float(v));
        }
    }

    pub fn put_opt_date(&mut self, name: &'static str, value: Option<NaiveDate>) {
        if let Some(v) = value {
            self.insert(name, Value::Date(v));
        }
    }

    pub fn put_opt_node(&mut self, name: &'static str, value: Option<Node>) {
        if let Some(v) = value {
            self.insert(name, Value::Node(Box::new(v)));
        }
    }

    pub fn put_nodes(&mut self, name: &'static str, nodes: Vec<Node>) {
        self.insert(name, Value::Seq(nodes));
    }
}

/// Convert a raw attribute/text value to the declared scalar type.
pub(crate) fn convert_scalar(raw: &str, scalar: Scalar) -> Result<Value, String> {
    match scalar {
        Scalar::Text => Ok(Value::Text(raw.to_string())),
        Scalar::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| e.to_string()),
        Scalar::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| e.to_string()),
        Scalar::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| e.to_string()),
    }
}

/// Stringify a bound value for emission as attribute or leaf text.
pub(crate) fn render_scalar(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::Node(_) | Value::Seq(_) => String::new(),
    }
}

// ── Descriptor tables ──

pub static MATERIALS: Descriptor = Descriptor {
    tag: "Materials",
    leaf: false,
    attributes: &[
        Field {
            name: "version",
            kind: FieldKind::OptionalScalar(Scalar::Text),
        },
        Field {
            name: "created",
            kind: FieldKind::OptionalScalar(Scalar::Date),
        },
    ],
    children: &[
        Field {
            name: "Company",
            kind: FieldKind::OptionalNested("Company"),
        },
        Field {
            name: "SignatureValue",
            kind: FieldKind::OptionalNested("SignatureValue"),
        },
        Field {
            name: "PublicKey",
            kind: FieldKind::OptionalNested("PublicKey"),
        },
        Field {
            name: "Material",
            kind: FieldKind::Sequence("Material"),
        },
    ],
    required_trust: &["SignatureValue", "PublicKey"],
    build: build_materials,
    placeholder: None,
};

pub static COMPANY: Descriptor = Descriptor {
    tag: "Company",
    leaf: false,
    attributes: &[
        Field {
            name: "id",
            kind: FieldKind::Scalar(Scalar::Int),
        },
        Field {
            name: "country",
            kind: FieldKind::OptionalScalar(Scalar::Text),
        },
    ],
    children: &[
        Field {
            name: "Name",
            kind: FieldKind::Sequence("LocalisedText"),
        },
        Field {
            name: "WebLink",
            kind: FieldKind::Sequence("WebLink"),
        },
    ],
    required_trust: &[],
    build: build_company,
    placeholder: None,
};

pub static MATERIAL: Descriptor = Descriptor {
    tag: "Material",
    leaf: false,
    attributes: &[Field {
        name: "id",
        kind: FieldKind::Scalar(Scalar::Int),
    }],
    children: &[
        Field {
            name: "Code",
            kind: FieldKind::OptionalScalar(Scalar::Text),
        },
        Field {
            name: "Information",
            kind: FieldKind::OptionalNested("Information"),
        },
        Field {
            name: "Layer",
            kind: FieldKind::Sequence("Layer"),
        },
    ],
    required_trust: &[],
    build: build_material,
    placeholder: None,
};

pub static INFORMATION: Descriptor = Descriptor {
    tag: "Information",
    leaf: false,
    attributes: &[
        Field {
            name: "category",
            kind: FieldKind::OptionalScalar(Scalar::Text),
        },
        Field {
            name: "loadbearing",
            kind: FieldKind::OptionalScalar(Scalar::Int),
        },
        Field {
            name: "insulating",
            kind: FieldKind::OptionalScalar(Scalar::Int),
        },
    ],
    children: &[
        Field {
            name: "Name",
            kind: FieldKind::Sequence("LocalisedText"),
        },
        Field {
            name: "Description",
            kind: FieldKind::Sequence("LocalisedText"),
        },
        Field {
            name: "WebLink",
            kind: FieldKind::Sequence("WebLink"),
        },
    ],
    required_trust: &[],
    build: build_information,
    placeholder: None,
};

pub static LAYER: Descriptor = Descriptor {
    tag: "Layer",
    leaf: false,
    attributes: &[Field {
        name: "number",
        kind: FieldKind::Scalar(Scalar::Int),
    }],
    children: &[
        Field {
            name: "Geometry",
            kind: FieldKind::Sequence("Geometry"),
        },
        Field {
            name: "PropertySet",
            kind: FieldKind::Sequence("PropertySet"),
        },
    ],
    required_trust: &[],
    build: build_layer,
    placeholder: None,
};

pub static GEOMETRY: Descriptor = Descriptor {
    tag: "Geometry",
    leaf: false,
    attributes: &[
        Field {
            name: "country",
            kind: FieldKind::Scalar(Scalar::Text),
        },
        Field {
            name: "thickness",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
        Field {
            name: "arealdensity",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
    ],
    children: &[],
    required_trust: &[],
    build: build_geometry,
    placeholder: None,
};

pub static PROPERTY_SET: Descriptor = Descriptor {
    tag: "PropertySet",
    leaf: false,
    attributes: &[
        Field {
            name: "country",
            kind: FieldKind::Scalar(Scalar::Text),
        },
        Field {
            name: "conductivity",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
        Field {
            name: "density",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
        Field {
            name: "specificheat",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
        Field {
            name: "vapourresistance",
            kind: FieldKind::OptionalScalar(Scalar::Float),
        },
    ],
    children: &[],
    required_trust: &[],
    build: build_property_set,
    placeholder: None,
};

pub static LOCALISED_TEXT: Descriptor = Descriptor {
    tag: "LocalisedText",
    leaf: true,
    attributes: &[Field {
        name: "lang",
        kind: FieldKind::OptionalScalar(Scalar::Text),
    }],
    children: &[],
    required_trust: &[],
    build: build_localised_text,
    placeholder: None,
};

pub static WEB_LINK: Descriptor = Descriptor {
    tag: "WebLink",
    leaf: true,
    attributes: &[Field {
        name: "lang",
        kind: FieldKind::OptionalScalar(Scalar::Text),
    }],
    children: &[],
    required_trust: &[],
    build: build_web_link,
    placeholder: None,
};

pub static SIGNATURE_VALUE: Descriptor = Descriptor {
    tag: "SignatureValue",
    leaf: true,
    attributes: &[Field {
        name: "version",
        kind: FieldKind::Scalar(Scalar::Int),
    }],
    children: &[],
    required_trust: &[],
    build: build_signature_value,
    placeholder: Some(placeholder_signature_value),
};

pub static PUBLIC_KEY: Descriptor = Descriptor {
    tag: "PublicKey",
    leaf: true,
    attributes: &[Field {
        name: "version",
        kind: FieldKind::Scalar(Scalar::Int),
    }],
    children: &[],
    required_trust: &[],
    build: build_public_key,
    placeholder: Some(placeholder_public_key),
};

pub static PRODUCER_INDEX: Descriptor = Descriptor {
    tag: "ProducerIndex",
    leaf: false,
    attributes: &[Field {
        name: "created",
        kind: FieldKind::OptionalScalar(Scalar::Date),
    }],
    children: &[Field {
        // Index entries appear as <Company> elements; the declared type, not
        // the tag, selects the descriptor here.
        name: "Company",
        kind: FieldKind::Sequence("IndexEntry"),
    }],
    required_trust: &[],
    build: build_producer_index,
    placeholder: None,
};

pub static INDEX_ENTRY: Descriptor = Descriptor {
    tag: "IndexEntry",
    leaf: false,
    attributes: &[
        Field {
            name: "id",
            kind: FieldKind::Scalar(Scalar::Text),
        },
        Field {
            name: "href",
            kind: FieldKind::Scalar(Scalar::Text),
        },
        Field {
            name: "name",
            kind: FieldKind::OptionalScalar(Scalar::Text),
        },
        Field {
            name: "LastKnownDate",
            kind: FieldKind::OptionalScalar(Scalar::Date),
        },
        Field {
            name: "KnownVersion",
            kind: FieldKind::OptionalScalar(Scalar::Int),
        },
    ],
    children: &[],
    required_trust: &[],
    build: build_index_entry,
    placeholder: None,
};

static ALL_DESCRIPTORS: &[&Descriptor] = &[
    &MATERIALS,
    &COMPANY,
    &MATERIAL,
    &INFORMATION,
    &LAYER,
    &GEOMETRY,
    &PROPERTY_SET,
    &LOCALISED_TEXT,
    &WEB_LINK,
    &SIGNATURE_VALUE,
    &PUBLIC_KEY,
    &PRODUCER_INDEX,
    &INDEX_ENTRY,
];

// ── Factories ──

fn build_materials(mut b: Bindings) -> Node {
    Node::Materials(Materials {
        version: b.take_str("version"),
        created: b.take_date("created"),
        company: b.take_nested("Company"),
        signature: b.take_nested("SignatureValue"),
        public_key: b.take_nested("PublicKey"),
        materials: b.take_seq("Material"),
    })
}

fn build_company(mut b: Bindings) -> Node {
    Node::Company(Company {
        id: b.take_int("id").unwrap_or_default(),
        country: b.take_str("country"),
        names: b.take_seq("Name"),
        links: b.take_seq("WebLink"),
    })
}

fn build_material(mut b: Bindings) -> Node {
    Node::Material(Material {
        id: b.take_int("id").unwrap_or_default(),
        code: b.take_str("Code"),
        information: b.take_nested("Information"),
        layers: b.take_seq("Layer"),
    })
}

fn build_information(mut b: Bindings) -> Node {
    Node::Information(Information {
        category: b.take_str("category"),
        loadbearing: b.take_int("loadbearing"),
        insulating: b.take_int("insulating"),
        names: b.take_seq("Name"),
        descriptions: b.take_seq("Description"),
        links: b.take_seq("WebLink"),
    })
}

fn build_layer(mut b: Bindings) -> Node {
    Node::Layer(Layer {
        number: b.take_int("number").unwrap_or_default(),
        geometries: b.take_seq("Geometry"),
        property_sets: b.take_seq("PropertySet"),
    })
}

fn build_geometry(mut b: Bindings) -> Node {
    Node::Geometry(Geometry {
        country: b.take_str("country").unwrap_or_default(),
        thickness: b.take_float("thickness"),
        arealdensity: b.take_float("arealdensity"),
    })
}

fn build_property_set(mut b: Bindings) -> Node {
    Node::PropertySet(PropertySet {
        country: b.take_str("country").unwrap_or_default(),
        conductivity: b.take_float("conductivity"),
        density: b.take_float("density"),
        specificheat: b.take_float("specificheat"),
        vapourresistance: b.take_float("vapourresistance"),
    })
}

fn build_localised_text(mut b: Bindings) -> Node {
    Node::LocalisedText(LocalisedText {
        lang: b.take_str("lang"),
        value: b.text_content(),
    })
}

fn build_web_link(mut b: Bindings) -> Node {
    Node::WebLink(WebLink {
        lang: b.take_str("lang"),
        href: b.text_content(),
    })
}

fn build_signature_value(mut b: Bindings) -> Node {
    Node::SignatureValue(SignatureValue {
        version: b.take_int("version").unwrap_or_default(),
        value: b.text_content(),
    })
}

fn build_public_key(mut b: Bindings) -> Node {
    Node::PublicKey(PublicKey {
        version: b.take_int("version").unwrap_or_default(),
        value: b.text_content(),
    })
}

fn build_producer_index(mut b: Bindings) -> Node {
    Node::ProducerIndex(ProducerIndex {
        created: b.take_date("created"),
        entries: b.take_seq("Company"),
    })
}

fn build_index_entry(mut b: Bindings) -> Node {
    Node::IndexEntry(IndexEntry {
        id: b.take_str("id").unwrap_or_default(),
        href: b.take_str("href").unwrap_or_default(),
        name: b.take_str("name"),
        last_known_date: b.take_date("LastKnownDate"),
        known_version: b.take_int("KnownVersion"),
    })
}

fn placeholder_signature_value(message: String) -> Node {
    Node::SignatureValue(SignatureValue {
        version: 0,
        value: message,
    })
}

fn placeholder_public_key(message: String) -> Node {
    Node::PublicKey(PublicKey {
        version: 0,
        value: message,
    })
}

// ── Registry ──

/// Tag-keyed descriptor lookup, built once per process.
pub struct Registry {
    by_tag: HashMap<&'static str, &'static Descriptor>,
}

impl Registry {
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut by_tag = HashMap::new();
            for descriptor in ALL_DESCRIPTORS {
                by_tag.insert(descriptor.tag, *descriptor);
            }
            Registry { by_tag }
        })
    }

    /// Resolve an element tag by the naming convention: capitalise the first
    /// letter if it is not already capitalised.
    pub fn resolve(&self, tag: &str) -> Result<&'static Descriptor, MapError> {
        let key = capitalise_first(tag);
        self.by_tag
            .get(key.as_str())
            .copied()
            .ok_or_else(|| MapError::UnknownTag {
                tag: tag.to_string(),
            })
    }

    /// Exact lookup for tags referenced from descriptor tables.
    pub(crate) fn get(&self, tag: &'static str) -> Result<&'static Descriptor, MapError> {
        self.by_tag
            .get(tag)
            .copied()
            .ok_or_else(|| MapError::UnknownTag {
                tag: tag.to_string(),
            })
    }
}

fn capitalise_first(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            first.to_uppercase().collect::<String>() + chars.as_str()
        }
        _ => tag.to_string(),
    }
}

// ── Typed access ──

/// Implemented by every domain type the mapper can move through XML.
pub trait Mapped: Sized {
    fn descriptor() -> &'static Descriptor;
    fn from_node(node: Node) -> Option<Self>;
    /// Collect this value's fields for the serialise direction. Optional
    /// fields that are unset are not collected.
    fn bindings(&self) -> Bindings;
}

impl Node {
    pub fn descriptor(&self) -> &'static Descriptor {
        match self {
            Node::Materials(_) => &MATERIALS,
            Node::Company(_) => &COMPANY,
            Node::Material(_) => &MATERIAL,
            Node::Information(_) => &INFORMATION,
            Node::Layer(_) => &LAYER,
            Node::Geometry(_) => &GEOMETRY,
            Node::PropertySet(_) => &PROPERTY_SET,
            Node::LocalisedText(_) => &LOCALISED_TEXT,
            Node::WebLink(_) => &WEB_LINK,
            Node::SignatureValue(_) => &SIGNATURE_VALUE,
            Node::PublicKey(_) => &PUBLIC_KEY,
            Node::ProducerIndex(_) => &PRODUCER_INDEX,
            Node::IndexEntry(_) => &INDEX_ENTRY,
        }
    }

    pub(crate) fn bindings(&self) -> Bindings {
        match self {
            Node::Materials(v) => v.bindings(),
            Node::Company(v) => v.bindings(),
            Node::Material(v) => v.bindings(),
            Node::Information(v) => v.bindings(),
            Node::Layer(v) => v.bindings(),
            Node::Geometry(v) => v.bindings(),
            Node::PropertySet(v) => v.bindings(),
            Node::LocalisedText(v) => v.bindings(),
            Node::WebLink(v) => v.bindings(),
            Node::SignatureValue(v) => v.bindings(),
            Node::PublicKey(v) => v.bindings(),
            Node::ProducerIndex(v) => v.bindings(),
            Node::IndexEntry(v) => v.bindings(),
        }
    }
}

impl Mapped for Materials {
    fn descriptor() -> &'static Descriptor {
        &MATERIALS
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Materials(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_opt_str("version", self.version.as_deref());
        b.put_opt_date("created", self.created);
        b.put_opt_node("Company", self.company.clone().map(Node::Company));
        b.put_opt_node(
            "SignatureValue",
            self.signature.clone().map(Node::SignatureValue),
        );
        b.put_opt_node("PublicKey", self.public_key.clone().map(Node::PublicKey));
        b.put_nodes(
            "Material",
            self.materials.iter().cloned().map(Node::Material).collect(),
        );
        b
    }
}

impl Mapped for Company {
    fn descriptor() -> &'static Descriptor {
        &COMPANY
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Company(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_int("id", self.id);
        b.put_opt_str("country", self.country.as_deref());
        b.put_nodes(
            "Name",
            self.names.iter().cloned().map(Node::LocalisedText).collect(),
        );
        b.put_nodes(
            "WebLink",
            self.links.iter().cloned().map(Node::WebLink).collect(),
        );
        b
    }
}

impl Mapped for Material {
    fn descriptor() -> &'static Descriptor {
        &MATERIAL
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Material(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_int("id", self.id);
        b.put_opt_str("Code", self.code.as_deref());
        b.put_opt_node(
            "Information",
            self.information.clone().map(Node::Information),
        );
        b.put_nodes("Layer", self.layers.iter().cloned().map(Node::Layer).collect());
        b
    }
}

impl Mapped for Information {
    fn descriptor() -> &'static Descriptor {
        &INFORMATION
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Information(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_opt_str("category", self.category.as_deref());
        b.put_opt_int("loadbearing", self.loadbearing);
        b.put_opt_int("insulating", self.insulating);
        b.put_nodes(
            "Name",
            self.names.iter().cloned().map(Node::LocalisedText).collect(),
        );
        b.put_nodes(
            "Description",
            self.descriptions
                .iter()
                .cloned()
                .map(Node::LocalisedText)
                .collect(),
        );
        b.put_nodes(
            "WebLink",
            self.links.iter().cloned().map(Node::WebLink).collect(),
        );
        b
    }
}

impl Mapped for Layer {
    fn descriptor() -> &'static Descriptor {
        &LAYER
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Layer(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_int("number", self.number);
        b.put_nodes(
            "Geometry",
            self.geometries.iter().cloned().map(Node::Geometry).collect(),
        );
        b.put_nodes(
            "PropertySet",
            self.property_sets
                .iter()
                .cloned()
                .map(Node::PropertySet)
                .collect(),
        );
        b
    }
}

impl Mapped for Geometry {
    fn descriptor() -> &'static Descriptor {
        &GEOMETRY
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::Geometry(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_str("country", &self.country);
        b.put_opt_float("thickness", self.thickness);
        b.put_opt_float("arealdensity", self.arealdensity);
        b
    }
}

impl Mapped for PropertySet {
    fn descriptor() -> &'static Descriptor {
        &PROPERTY_SET
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::PropertySet(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_str("country", &self.country);
        b.put_opt_float("conductivity", self.conductivity);
        b.put_opt_float("density", self.density);
        b.put_opt_float("specificheat", self.specificheat);
        b.put_opt_float("vapourresistance", self.vapourresistance);
        b
    }
}

impl Mapped for LocalisedText {
    fn descriptor() -> &'static Descriptor {
        &LOCALISED_TEXT
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::LocalisedText(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_opt_str("lang", self.lang.as_deref());
        b.set_text(self.value.clone());
        b
    }
}

impl Mapped for WebLink {
    fn descriptor() -> &'static Descriptor {
        &WEB_LINK
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::WebLink(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_opt_str("lang", self.lang.as_deref());
        b.set_text(self.href.clone());
        b
    }
}

impl Mapped for SignatureValue {
    fn descriptor() -> &'static Descriptor {
        &SIGNATURE_VALUE
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::SignatureValue(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_int("version", self.version);
        b.set_text(self.value.clone());
        b
    }
}

impl Mapped for PublicKey {
    fn descriptor() -> &'static Descriptor {
        &PUBLIC_KEY
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::PublicKey(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_int("version", self.version);
        b.set_text(self.value.clone());
        b
    }
}

impl Mapped for ProducerIndex {
    fn descriptor() -> &'static Descriptor {
        &PRODUCER_INDEX
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::ProducerIndex(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_opt_date("created", self.created);
        b.put_nodes(
            "Company",
            self.entries.iter().cloned().map(Node::IndexEntry).collect(),
        );
        b
    }
}

impl Mapped for IndexEntry {
    fn descriptor() -> &'static Descriptor {
        &INDEX_ENTRY
    }

    fn from_node(node: Node) -> Option<Self> {
        match node {
            Node::IndexEntry(v) => Some(v),
            _ => None,
        }
    }

    fn bindings(&self) -> Bindings {
        let mut b = Bindings::new();
        b.put_str("id", &self.id);
        b.put_str("href", &self.href);
        b.put_opt_str("name", self.name.as_deref());
        b.put_opt_date("LastKnownDate", self.last_known_date);
        b.put_opt_int("KnownVersion", self.known_version);
        b
    }
}
