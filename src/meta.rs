//! Bundled metadata about well-known RDF/OWL predicates.
//!
//! The Turtle snippets under `assets/meta/` describe the predicates the
//! renderer prints labels for. Parsing them is expensive and the result
//! immutable, so it happens once behind a one-shot initializer and is
//! shared across all requests.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::graph::{Literal, ObjectFilter, OntGraph, subject_object_map};
use crate::model::{MetaOntology, MetaProperty};
use crate::vocab;

/// The bundled vocabulary snippets.
const META_SOURCES: &[(&str, &str)] = &[
    ("dcterms", include_str!("../assets/meta/dcterms.ttl")),
    ("rdfs", include_str!("../assets/meta/rdfs.ttl")),
    ("owl", include_str!("../assets/meta/owl.ttl")),
    ("skos", include_str!("../assets/meta/skos.ttl")),
    ("schema", include_str!("../assets/meta/schema.ttl")),
    ("vann", include_str!("../assets/meta/vann.ttl")),
    ("ontdoc", include_str!("../assets/meta/ontdoc.ttl")),
];

static META: LazyLock<Meta> = LazyLock::new(Meta::load);

/// The loaded meta-ontology data. Immutable and shared.
pub fn meta() -> &'static Meta {
    &META
}

#[derive(Debug)]
pub struct Meta {
    types: HashMap<String, Vec<String>>,
    titles: HashMap<String, Vec<Literal>>,
    descriptions: HashMap<String, Vec<Literal>>,
    ontologies: Vec<MetaOntology>,
    props: HashMap<String, MetaProperty>,
}

impl Meta {
    fn load() -> Self {
        let mut graph = OntGraph::with_core_bindings();
        for (name, source) in META_SOURCES {
            match crate::parse::parse_turtle(source) {
                Ok(parsed) => {
                    for (s, p, o) in parsed.triples() {
                        graph.insert(s.clone(), p.clone(), o.clone());
                    }
                }
                Err(err) => {
                    tracing::error!("skipping bundled vocabulary {name}: {err}");
                }
            }
        }

        let types: HashMap<String, Vec<String>> =
            subject_object_map(&graph, &[vocab::RDF_TYPE], ObjectFilter::Iris)
                .into_iter()
                .map(|(subject, objects)| {
                    let iris = objects
                        .into_iter()
                        .filter_map(|o| o.as_iri().map(str::to_string))
                        .collect();
                    (subject, iris)
                })
                .collect();

        let literal_map = |predicates: &[&str]| -> HashMap<String, Vec<Literal>> {
            subject_object_map(&graph, predicates, ObjectFilter::Literals)
                .into_iter()
                .map(|(subject, objects)| {
                    let literals = objects
                        .into_iter()
                        .filter_map(|o| o.as_literal().cloned())
                        .collect();
                    (subject, literals)
                })
                .collect()
        };

        let titles = literal_map(&[
            vocab::DC_TITLE,
            vocab::RDFS_LABEL,
            vocab::SKOS_PREF_LABEL,
            vocab::SDO_NAME,
            vocab::DCTERMS_TITLE,
        ]);
        let descriptions = literal_map(&[
            vocab::DC_DESCRIPTION,
            vocab::RDFS_COMMENT,
            vocab::SKOS_DEFINITION,
            vocab::SDO_DESCRIPTION,
            vocab::DCTERMS_DESCRIPTION,
        ]);

        let ontology_term = crate::graph::Term::iri(vocab::OWL_ONTOLOGY);
        let mut ontologies = Vec::new();
        for subject in graph.subjects(vocab::RDF_TYPE, &ontology_term) {
            let Some(iri) = subject.as_iri() else { continue };
            let Some(ontology_titles) = titles.get(iri) else {
                continue;
            };
            ontologies.push(MetaOntology {
                iri: iri.to_string(),
                titles: ontology_titles.clone(),
            });
        }

        let mut props = HashMap::new();
        for prop in vocab::all_known_props() {
            let prop_titles = match titles.get(prop) {
                Some(found) if !found.is_empty() => found.clone(),
                _ => vec![Literal::new(
                    title_from_iri(prop).unwrap_or_else(|| prop.to_string()),
                )],
            };
            props.insert(
                prop.to_string(),
                MetaProperty {
                    iri: prop.to_string(),
                    titles: prop_titles,
                    descriptions: descriptions.get(prop).cloned().unwrap_or_default(),
                    ontologies: ontologies
                        .iter()
                        .filter(|ontology| ontology.defines(prop))
                        .cloned()
                        .collect(),
                },
            );
        }

        Self {
            types,
            titles,
            descriptions,
            ontologies,
            props,
        }
    }

    /// Display data for a predicate. Unknown predicates get an
    /// auto-generated title from their IRI.
    pub fn property(&self, iri: &str) -> MetaProperty {
        if let Some(found) = self.props.get(iri) {
            return found.clone();
        }
        MetaProperty {
            iri: iri.to_string(),
            titles: vec![Literal::new(
                title_from_iri(iri).unwrap_or_else(|| iri.to_string()),
            )],
            descriptions: Vec::new(),
            ontologies: Vec::new(),
        }
    }

    /// The first known title for an IRI, if the bundled vocabularies
    /// describe it.
    pub fn title_of(&self, iri: &str) -> Option<&Literal> {
        self.titles.get(iri)?.first()
    }

    pub fn description_of(&self, iri: &str) -> Option<&Literal> {
        self.descriptions.get(iri)?.first()
    }

    pub fn types_of(&self, iri: &str) -> &[String] {
        self.types.get(iri).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn ontologies(&self) -> &[MetaOntology] {
        &self.ontologies
    }
}

/// Make a human-readable title from an IRI's final segment.
///
/// CamelCase splits into words; the result is title-cased when the
/// segment starts uppercase (a class) and lowercased otherwise.
pub fn title_from_iri(iri: &str) -> Option<String> {
    let segments: Vec<&str> = iri.split('/').collect();
    let last = *segments.last()?;
    if last.is_empty() || segments.len() < 4 || last.ends_with('#') {
        return None;
    }
    let identifier = last.split('#').next_back()?;
    if identifier.is_empty() {
        return None;
    }

    let words = split_camel_case(identifier);
    let first_upper = identifier.chars().next().is_some_and(char::is_uppercase);
    let joined = if first_upper {
        words
            .iter()
            .map(|word| crate::model::title_case(word))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        words.join(" ").to_lowercase()
    };
    Some(joined)
}

/// Split camelCase / PascalCase identifiers into words.
fn split_camel_case(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !current.is_empty() && c.is_uppercase() {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || (chars[i - 1].is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_predicate_has_bundled_title() {
        let prop = meta().property(vocab::DCTERMS_TITLE);
        assert_eq!(prop.titles[0].lexical, "title");
        assert!(!prop.descriptions.is_empty());
    }

    #[test]
    fn known_predicate_names_its_defining_ontology() {
        let prop = meta().property(vocab::DCTERMS_CREATOR);
        assert_eq!(prop.ontologies.len(), 1);
        assert_eq!(prop.ontologies[0].titles[0].lexical, "DCMI Metadata Terms");
    }

    #[test]
    fn unknown_predicate_gets_auto_title() {
        let prop = meta().property("http://example.org/ns/hasWidgetCount");
        assert_eq!(prop.titles[0].lexical, "has widget count");
        assert!(prop.descriptions.is_empty());
    }

    #[test]
    fn types_are_recorded() {
        let types = meta().types_of(vocab::DCTERMS_TITLE);
        assert!(types.iter().any(|t| t == vocab::RDF_PROPERTY));
    }

    #[test]
    fn every_known_prop_is_prepared() {
        for prop in vocab::all_known_props() {
            let found = meta().property(prop);
            assert!(!found.titles.is_empty(), "{prop} has no title");
        }
    }

    #[test]
    fn title_from_iri_splits_camel_case() {
        assert_eq!(
            title_from_iri("http://example.org/ns/subClassOf").as_deref(),
            Some("sub class of")
        );
        assert_eq!(
            title_from_iri("http://example.org/ns/PersonRecord").as_deref(),
            Some("Person Record")
        );
    }

    #[test]
    fn title_from_iri_rejects_bare_domains() {
        assert_eq!(title_from_iri("http://example.org/"), None);
        assert_eq!(title_from_iri("http://example.org"), None);
    }
}
