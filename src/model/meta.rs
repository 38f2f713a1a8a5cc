//! Display data for well-known predicates, taken from the bundled
//! meta-ontologies.

use crate::graph::Literal;
use crate::html::{Node, a, span};

/// One of the bundled vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaOntology {
    pub iri: String,
    pub titles: Vec<Literal>,
}

impl MetaOntology {
    /// Whether the vocabulary defines the given IRI, by prefix match.
    pub fn defines(&self, iri: &str) -> bool {
        iri.starts_with(&self.iri)
    }
}

/// Human-readable description of a predicate, shown as the left-hand
/// cell of every property row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaProperty {
    pub iri: String,
    pub titles: Vec<Literal>,
    pub descriptions: Vec<Literal>,
    pub ontologies: Vec<MetaOntology>,
}

impl MetaProperty {
    pub fn to_html(&self) -> Node {
        let mut description_parts: Vec<String> = self
            .descriptions
            .iter()
            .map(|description| format!("{}.", description.lexical.trim_end_matches('.')))
            .collect();
        description_parts.extend(self.ontologies.iter().map(|ontology| {
            let titles: Vec<&str> = ontology.titles.iter().map(|t| t.lexical.as_str()).collect();
            format!("Defined in {}.", titles.join(", "))
        }));

        let mut link = a().class("hover_property").attr("href", &self.iri);
        if !description_parts.is_empty() {
            link = link.attr("title", description_parts.join(" "));
        }
        for title in &self.titles {
            link = link.child(
                span()
                    .attr_opt("lang", title.language.clone())
                    .text(title_case(&title.lexical)),
            );
        }
        link.into()
    }
}

/// Uppercase the first letter of every word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("date accepted"), "Date Accepted");
        assert_eq!(title_case("TITLE"), "Title");
    }

    #[test]
    fn defines_matches_by_prefix() {
        let ontology = MetaOntology {
            iri: "http://purl.org/dc/terms/".to_string(),
            titles: vec![Literal::new("DCMI Metadata Terms")],
        };
        assert!(ontology.defines("http://purl.org/dc/terms/title"));
        assert!(!ontology.defines("http://www.w3.org/2002/07/owl#Class"));
    }

    #[test]
    fn to_html_links_the_predicate() {
        let prop = MetaProperty {
            iri: "http://purl.org/dc/terms/title".to_string(),
            titles: vec![Literal::new("title")],
            descriptions: vec![Literal::new("A name given to the resource.")],
            ontologies: Vec::new(),
        };
        let html = prop.to_html().render();
        assert!(html.contains(r#"href="http://purl.org/dc/terms/title""#));
        assert!(html.contains("<span>Title</span>"));
        assert!(html.contains(r#"title="A name given to the resource.""#));
    }
}
