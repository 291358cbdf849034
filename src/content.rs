use crate::ns::URI_RESOLVER;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

/// `{{ ... }}` template invocations, shortest match, spanning newlines.
static TEMPLATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap());

/// Returns the page's prose: wikitext with every template removed, trimmed.
pub fn extract_free_text(wikitext: &str) -> String {
    TEMPLATE_REGEX.replace_all(wikitext, "").trim().to_string()
}

/// The encoded title following `Special:URIResolver/`, or the whole URI if it
/// is not a resolver URI.
fn resolver_suffix(uri: &str) -> &str {
    match uri.find(URI_RESOLVER) {
        Some(pos) => &uri[pos + URI_RESOLVER.len()..],
        None => uri,
    }
}

/// Page title of a property predicate, e.g. `.../Property-3AHas_name` -> `Property:Has_name`.
pub fn property_title(uri: &str) -> String {
    resolver_suffix(uri).replace("-3A", ":")
}

/// Human-readable title of a referenced page.
///
/// SMW escapes `%` as `-` in resolver URIs, so the suffix is un-escaped before
/// percent-decoding. Invalid escape sequences are left as they are.
pub fn page_label(uri: &str) -> String {
    let escaped = resolver_suffix(uri).replace('_', " ").replace('-', "%");
    percent_decode_str(&escaped).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_strips_template() {
        let text = "{{Infobox person|name=Test}}\nThis is the text.";
        assert_eq!(extract_free_text(text), "This is the text.");
    }

    #[test]
    fn free_text_strips_multiline_templates() {
        let text = "{{Person\n| name = Peter\n| born = 1901\n}}\nPeter was a printer.\n{{Footer\n}}";
        assert_eq!(extract_free_text(text), "Peter was a printer.");
    }

    #[test]
    fn free_text_strips_multiple_templates_without_respacing() {
        let text = "{{a}} middle {{b}} end";
        assert_eq!(extract_free_text(text), "middle  end");
    }

    #[test]
    fn free_text_without_templates_is_trimmed() {
        assert_eq!(extract_free_text("  plain text \n"), "plain text");
    }

    #[test]
    fn free_text_only_templates_is_empty() {
        assert_eq!(extract_free_text("{{a}}\n{{b|c=d}}\n"), "");
    }

    #[test]
    fn free_text_leaves_no_template_pairs() {
        let inputs = [
            "{{a}}",
            "x {{a\nb}} y {{c}}",
            "{{{{nested}}}} tail",
            "{{unclosed and {{closed}}",
            "}} stray {{ open",
        ];
        for input in inputs {
            let result = extract_free_text(input);
            assert!(
                !TEMPLATE_REGEX.is_match(&result),
                "{input:?} left a template in {result:?}"
            );
        }
    }

    #[test]
    fn free_text_unclosed_template_is_kept() {
        assert_eq!(extract_free_text("{{unclosed text"), "{{unclosed text");
    }

    #[test]
    fn property_title_decodes_colon() {
        let uri = "http://wiki.test/Special:URIResolver/Property-3AHas_name";
        assert_eq!(property_title(uri), "Property:Has_name");
    }

    #[test]
    fn property_title_without_resolver_uses_whole_uri() {
        assert_eq!(property_title("Property-3AFoo"), "Property:Foo");
    }

    #[test]
    fn property_title_of_non_resolver_predicate_is_whole_iri() {
        let uri = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
        assert_eq!(property_title(uri), uri);
    }

    #[test]
    fn page_label_decodes_smw_escaping() {
        let uri = "http://wiki.test/Special:URIResolver/Some_Page-3AFoo";
        assert_eq!(page_label(uri), "Some Page:Foo");
    }

    #[test]
    fn page_label_decodes_utf8() {
        let uri = "http://wiki.test/Special:URIResolver/Peter_M-C3-BChleder";
        assert_eq!(page_label(uri), "Peter Mühleder");
    }

    #[test]
    fn page_label_keeps_invalid_escapes() {
        let uri = "http://wiki.test/Special:URIResolver/Jean-Paul";
        assert_eq!(page_label(uri), "Jean%Paul");
    }
}
