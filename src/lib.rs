//! smw-client: read and write Semantic MediaWiki pages
//!
//! This crate wraps the MediaWiki Action API and Semantic MediaWiki's RDF export
//! for data-import/export pipelines:
//!
//! 1. **Login** -- A [`client::MediawikiApi`] owns one cookie-carrying HTTP session and
//!    authenticates on construction through the `clientlogin` token exchange
//! 2. **Read** -- Category listings, page wikitext reduced to free text, and the page's
//!    semantic properties resolved from `Special:ExportRDF` into label/type/value triples
//! 3. **Write** -- Page creation and replacement through `action=edit` with a fresh CSRF token
//!
//! # Property Resolution
//!
//! SMW exports reference properties and pages by resolver URIs
//! (`Special:URIResolver/Property-3AName`). Each property's label and datatype live on the
//! property's own page, so every distinct property costs one extra RDF export fetch. Those
//! lookups run a few at a time and are memoised per client.
//!
//! # Key Modules
//!
//! - [`client`] -- Authenticated API client and property resolution
//! - [`rdf`] -- RDF/XML parsing into an ordered in-memory triple list
//! - [`content`] -- Free-text extraction and resolver-URI decoding
//! - [`ns`] -- SMW namespace and datatype IRIs
//! - [`models`] -- Page records and property descriptors
//! - [`export`] -- Category export to JSON files
//! - [`import`] -- Page import from `*.wiki` files
//! - [`config`] -- YAML connection settings and constants
//! - [`error`] -- Error taxonomy
//!
//! # Example Usage
//!
//! ```bash
//! # List a category
//! smw -c config.yml category Persons
//!
//! # Fetch one page with its semantic properties
//! smw -c config.yml page "Peter Example"
//!
//! # Export a whole category to JSON
//! smw -c config.yml export Persons -o output/
//! ```

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod ns;
pub mod rdf;

pub use client::MediawikiApi;
pub use error::{SmwError, SmwResult};
pub use models::{PageRecord, PropertyDescriptor, PropertyType, PropertyValue};
