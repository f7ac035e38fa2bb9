#![doc = "matcat-core: core logic library for matcat."]

//! This crate contains the two algorithmic halves of the catalog pipeline:
//! the schema-driven XML object mapper ([`schema`], [`model`], [`de`],
//! [`ser`]) and the versioned producer-index cache synchroniser
//! ([`contract`], [`synchronise`]). CLI glue lives in the `matcat` crate.
//!
//! # Usage
//! Parse a catalog with [`de::from_xml_file`], emit one with
//! [`ser::to_xml_file`], and refresh the local cache with
//! [`synchronise::synchronise`] against a [`contract::ProducerFetcher`].

pub mod config;
pub mod contract;
pub mod de;
pub mod error;
pub mod model;
pub mod schema;
pub mod ser;
pub mod synchronise;
