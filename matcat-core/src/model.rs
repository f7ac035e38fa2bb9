//! Typed domain model for producer material catalogs.
//!
//! The graph is strictly tree-shaped and rooted at [`Materials`]: company
//! metadata, trust elements and an ordered sequence of [`Material`] nodes,
//! each carrying an [`Information`] record and its [`Layer`]s. The
//! [`ProducerIndex`] types model the remote/local manifest the synchroniser
//! diffs against. All construction goes through the mapper; consumers only
//! need the read-only accessors at the bottom of this module.

use chrono::NaiveDate;

use crate::config::CatalogPrefs;

/// Root of a producer's catalog document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Materials {
    pub version: Option<String>,
    pub created: Option<NaiveDate>,
    pub company: Option<Company>,
    pub signature: Option<SignatureValue>,
    pub public_key: Option<PublicKey>,
    pub materials: Vec<Material>,
}

/// Producer metadata carried on the catalog root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Company {
    pub id: i64,
    pub country: Option<String>,
    pub names: Vec<LocalisedText>,
    pub links: Vec<WebLink>,
}

/// One catalog entry: identification, descriptive record and layer build-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub id: i64,
    pub code: Option<String>,
    pub information: Option<Information>,
    pub layers: Vec<Layer>,
}

/// Localised names, descriptions, web links and usage flags of a material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Information {
    pub category: Option<String>,
    pub loadbearing: Option<i64>,
    pub insulating: Option<i64>,
    pub names: Vec<LocalisedText>,
    pub descriptions: Vec<LocalisedText>,
    pub links: Vec<WebLink>,
}

/// One layer of a material's build-up, with per-country geometry and
/// physical properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub number: i64,
    pub geometries: Vec<Geometry>,
    pub property_sets: Vec<PropertySet>,
}

/// Country-scoped layer geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub country: String,
    pub thickness: Option<f64>,
    pub arealdensity: Option<f64>,
}

/// Country-scoped thermal/physical properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    pub country: String,
    pub conductivity: Option<f64>,
    pub density: Option<f64>,
    pub specificheat: Option<f64>,
    pub vapourresistance: Option<f64>,
}

/// Leaf: a language-tagged string, carried as element text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalisedText {
    pub lang: Option<String>,
    pub value: String,
}

/// Leaf: a language-tagged URL, carried as element text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebLink {
    pub lang: Option<String>,
    pub href: String,
}

/// Leaf: detached document signature. A `version` of 0 marks a placeholder
/// synthesised for a document that shipped without one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureValue {
    pub version: i64,
    pub value: String,
}

/// Leaf: signing public key, same versioning convention as
/// [`SignatureValue`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicKey {
    pub version: i64,
    pub value: String,
}

/// Root of the producer index manifest (remote and cached form).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducerIndex {
    pub created: Option<NaiveDate>,
    pub entries: Vec<IndexEntry>,
}

/// One company entry in the producer index, keyed by its stable `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub href: String,
    pub name: Option<String>,
    pub last_known_date: Option<NaiveDate>,
    pub known_version: Option<i64>,
}

/// Sum over every mapped domain type. The mapper machinery moves values
/// through this; typed callers go through [`Mapped`](crate::schema::Mapped)
/// and never see it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Materials(Materials),
    Company(Company),
    Material(Material),
    Information(Information),
    Layer(Layer),
    Geometry(Geometry),
    PropertySet(PropertySet),
    LocalisedText(LocalisedText),
    WebLink(WebLink),
    SignatureValue(SignatureValue),
    PublicKey(PublicKey),
    ProducerIndex(ProducerIndex),
    IndexEntry(IndexEntry),
}

fn pick<'a>(texts: &'a [LocalisedText], lang: &str) -> Option<&'a str> {
    texts
        .iter()
        .find(|t| t.lang.as_deref() == Some(lang))
        .or_else(|| texts.first())
        .map(|t| t.value.as_str())
}

fn pick_link<'a>(links: &'a [WebLink], lang: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|l| l.lang.as_deref() == Some(lang))
        .or_else(|| links.first())
        .map(|l| l.href.as_str())
}

impl Materials {
    pub fn material_by_id(&self, id: i64) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Whether the document carried genuine trust elements. Placeholders
    /// synthesised by the mapper carry version 0 and make this false.
    pub fn is_signed(&self) -> bool {
        matches!(&self.signature, Some(s) if s.version > 0)
            && matches!(&self.public_key, Some(k) if k.version > 0)
    }

    /// Preferred company name, falling back to the first one on record.
    pub fn company_name(&self, prefs: &CatalogPrefs) -> Option<&str> {
        self.company
            .as_ref()
            .and_then(|c| pick(&c.names, &prefs.language))
    }
}

impl Material {
    pub fn display_name(&self, prefs: &CatalogPrefs) -> Option<&str> {
        self.information
            .as_ref()
            .and_then(|i| i.name_in(&prefs.language))
    }
}

impl Information {
    pub fn name_in(&self, lang: &str) -> Option<&str> {
        pick(&self.names, lang)
    }

    pub fn description_in(&self, lang: &str) -> Option<&str> {
        pick(&self.descriptions, lang)
    }

    pub fn link_in(&self, lang: &str) -> Option<&str> {
        pick_link(&self.links, lang)
    }
}

impl Layer {
    pub fn geometry_for(&self, country: &str) -> Option<&Geometry> {
        self.geometries.iter().find(|g| g.country == country)
    }

    pub fn properties_for(&self, country: &str) -> Option<&PropertySet> {
        self.property_sets.iter().find(|p| p.country == country)
    }

    /// Layer thickness for the given country, in the catalog's millimetre
    /// convention.
    pub fn thickness_for(&self, country: &str) -> Option<f64> {
        self.geometry_for(country).and_then(|g| g.thickness)
    }
}

impl ProducerIndex {
    pub fn entry(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
