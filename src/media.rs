//! The closed set of serialization formats the daemon stores and serves.
//!
//! Every ontology is persisted once per entry in this table, plus the
//! synthesized `text/html` documentation page.

/// Media type of the synthesized HTML documentation page.
pub const HTML: &str = "text/html";

/// Media type of the plain-text index rendering.
pub const PLAIN: &str = "text/plain";

/// (extension, media type) pairs for every RDF serialization we produce.
///
/// `text/html` is not listed here: it is not produced by the RDF
/// serializer but synthesized by the documentation renderer.
const FORMATS: &[(&str, &str)] = &[
    ("xml", "application/rdf+xml"),
    ("turtle", "text/turtle"),
    ("nt", "text/plain"),
    ("trig", "application/trig"),
    ("json-ld", "application/ld+json"),
];

/// Iterate over all (extension, media type) pairs of RDF serializations.
pub fn media_types() -> impl Iterator<Item = (&'static str, &'static str)> {
    FORMATS.iter().copied()
}

/// The canonical file extension (without a period) for a media type.
///
/// Covers both the RDF serializations and the synthesized HTML page.
pub fn extension_from_type(typ: &str) -> Option<&'static str> {
    if typ == HTML {
        return Some("html");
    }
    FORMATS
        .iter()
        .find(|(_, media)| *media == typ)
        .map(|(ext, _)| *ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_types_are_unique() {
        let types: Vec<_> = media_types().map(|(_, t)| t).collect();
        let mut deduped = types.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(types.len(), deduped.len());
    }

    #[test]
    fn extension_round_trips() {
        for (ext, typ) in media_types() {
            assert_eq!(extension_from_type(typ), Some(ext));
        }
    }

    #[test]
    fn html_has_extension() {
        assert_eq!(extension_from_type("text/html"), Some("html"));
    }

    #[test]
    fn unknown_type_has_no_extension() {
        assert_eq!(extension_from_type("application/xml"), None);
    }
}
