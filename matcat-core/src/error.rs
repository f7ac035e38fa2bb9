//! Error and diagnostic types shared across the mapper and the synchroniser.
//!
//! The split follows the recoverable/fatal policy of the pipeline: [`MapError`]
//! and [`SyncError`] abort the operation that raised them, while [`Recovered`]
//! entries describe problems the mapper absorbed (a dropped sequence item, a
//! synthesised trust placeholder) and are returned to the caller alongside the
//! parsed graph instead of being scraped from console output.

use thiserror::Error;

/// Fatal mapper errors. Any of these aborts the parse or emit of the whole
/// document.
#[derive(Debug, Error)]
pub enum MapError {
    /// No descriptor is registered for the resolved tag name.
    #[error("no descriptor registered for tag '{tag}'")]
    UnknownTag { tag: String },

    /// The document is not well-formed XML.
    #[error("malformed XML in {origin}: {source}")]
    Xml {
        origin: String,
        #[source]
        source: roxmltree::Error,
    },

    /// An attribute or primitive child value failed type conversion outside a
    /// recoverable sequence context.
    #[error("invalid value '{value}' for {field} on <{tag}> at line {line}: {reason}")]
    Value {
        tag: String,
        field: String,
        value: String,
        line: u32,
        reason: String,
    },

    /// The document root resolved to a descriptor other than the one the
    /// caller asked for.
    #[error("document root <{found}> in {origin} does not map to expected type {expected}")]
    UnexpectedRoot {
        origin: String,
        found: String,
        expected: &'static str,
    },

    /// Strict-mode structural check failed. Only raised when
    /// [`MapperOptions::validate`](crate::config::MapperOptions) is set.
    #[error("schema validation failed for {origin}: {reason}")]
    Validation { origin: String, reason: String },

    #[error("failed to write XML: {0}")]
    Write(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A problem the deserialiser recovered from without aborting the document.
///
/// One malformed layer or material must not block loading the rest of the
/// catalog, so sequence items that fail conversion are dropped and reported
/// here. Missing trust elements are likewise patched with a flagged
/// placeholder and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovered {
    /// A sequence item failed to convert and was omitted from its parent.
    ChildDropped {
        /// Tag of the dropped child element.
        element: String,
        line: u32,
        column: u32,
        reason: String,
    },
    /// A required trust element was absent from the document root; a
    /// placeholder with version 0 was synthesised in its place.
    MissingTrustElement { element: String, origin: String },
}

impl std::fmt::Display for Recovered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recovered::ChildDropped {
                element,
                line,
                column,
                reason,
            } => write!(
                f,
                "dropped <{element}> at line {line}, column {column}: {reason}"
            ),
            Recovered::MissingTrustElement { element, origin } => {
                write!(f, "missing trust element <{element}> in {origin}")
            }
        }
    }
}

/// Boxed error alias for fetch implementations, mirroring the loose contract
/// an HTTP client needs.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors of a synchronisation run. The persisted index is never
/// touched once one of these is raised.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch producer index: {0}")]
    IndexFetch(#[source] FetchError),

    #[error("failed to fetch payload for producer '{id}': {source}")]
    PayloadFetch {
        id: String,
        #[source]
        source: FetchError,
    },

    /// The remote or cached index document did not parse.
    #[error("producer index did not parse: {0}")]
    Index(#[from] MapError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
