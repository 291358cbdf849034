//! Well-known IRIs used by Semantic MediaWiki's RDF export.

/// Root of the SMW vocabulary (`swivt:`).
pub const SMW: &str = "http://semantic-mediawiki.org/swivt/1.0#";

/// Predicate carrying a property's declared datatype.
pub const SMW_TYPE: &str = "http://semantic-mediawiki.org/swivt/1.0#type";

// SMW datatype IRIs
pub const BOOLEAN: &str = "http://semantic-mediawiki.org/swivt/1.0#_boo";
pub const WIKI_PAGE: &str = "http://semantic-mediawiki.org/swivt/1.0#_wpg";
pub const URI: &str = "http://semantic-mediawiki.org/swivt/1.0#_uri";
pub const DATE: &str = "http://semantic-mediawiki.org/swivt/1.0#_dat";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Path fragment SMW uses for page and property references inside exports.
pub const URI_RESOLVER: &str = "Special:URIResolver/";

/// Special page serving a page's RDF/XML export.
pub const EXPORT_RDF: &str = "Special:ExportRDF/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatypes_live_in_smw_namespace() {
        for iri in [SMW_TYPE, BOOLEAN, WIKI_PAGE, URI, DATE] {
            assert!(iri.starts_with(SMW), "{iri} outside {SMW}");
        }
    }
}
