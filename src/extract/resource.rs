//! Turns RDF object nodes into their tagged render representations.

use crate::graph::{Literal, OntGraph, Term};
use crate::meta::Meta;
use crate::model::{
    Affiliation, AgentResource, BlankNodeResource, Cardinality, LiteralResource, NumericBound,
    RdfResources, ReferenceBound, Resource, ResourceReference, RestrictionResource, SetClassKind,
    SetClassResource,
};
use crate::vocab;

/// Extracts information about single resources from an ontology graph.
pub struct ResourceExtractor<'a> {
    graph: &'a OntGraph,
    meta: &'static Meta,
}

impl<'a> ResourceExtractor<'a> {
    pub fn new(graph: &'a OntGraph) -> Self {
        Self {
            graph,
            meta: crate::meta::meta(),
        }
    }

    /// Extract every object appearing under the given predicate.
    pub fn extract_all(&self, objects: &[Term], prop: Option<&str>) -> RdfResources {
        RdfResources {
            resources: objects.iter().map(|obj| self.extract(obj, prop)).collect(),
        }
    }

    fn extract(&self, object: &Term, prop: Option<&str>) -> Resource {
        match object {
            Term::Iri(iri) => self.extract_iri(iri),
            Term::Blank(_) => self.extract_blank(object),
            Term::Literal(literal) => self.extract_literal(literal, prop),
        }
    }

    fn extract_blank(&self, node: &Term) -> Resource {
        if self.graph.has_type(node, vocab::PROV_AGENT) {
            return Resource::Agent(self.extract_agent(node));
        }
        if self.graph.has_type(node, vocab::OWL_RESTRICTION) {
            return Resource::Restriction(self.extract_restriction(node));
        }
        if self.graph.has_type(node, vocab::OWL_CLASS) {
            return Resource::SetClass(self.extract_set_class(node));
        }
        let Term::Blank(id) = node else {
            unreachable!("extract_blank is only called for blank nodes");
        };
        Resource::Blank(BlankNodeResource { id: id.clone() })
    }

    fn extract_iri(&self, iri: &str) -> Resource {
        let term = Term::iri(iri);
        if self.graph.has_type(&term, vocab::PROV_AGENT) {
            return Resource::Agent(self.extract_agent(&term));
        }

        // title from the meta-ontologies, from the graph itself, or the
        // IRI as a last resort
        let title = self
            .meta
            .title_of(iri)
            .cloned()
            .or_else(|| {
                self.graph
                    .value(&term, vocab::DCTERMS_TITLE)
                    .and_then(|o| o.as_literal().cloned())
            })
            .unwrap_or_else(|| match self.graph.qname(iri) {
                Ok((_, ns, local)) => Literal::typed(format!("{ns}{local}"), vocab::XSD_ANY_URI),
                Err(_) => Literal::typed(iri, vocab::XSD_ANY_URI),
            });

        Resource::Reference(ResourceReference {
            iri: iri.to_string(),
            title,
        })
    }

    fn extract_literal(&self, literal: &Literal, prop: Option<&str>) -> Resource {
        if self.looks_like_iri(&literal.lexical) {
            return self.extract_iri(&literal.lexical);
        }
        Resource::Literal(LiteralResource {
            is_example: prop == Some(vocab::SKOS_EXAMPLE),
            literal: literal.clone(),
        })
    }

    /// A literal is re-extracted as an IRI when it starts with `http`
    /// and a qname can be computed for it.
    fn looks_like_iri(&self, value: &str) -> bool {
        value.starts_with("http") && self.graph.qname(value).is_ok()
    }

    fn extract_restriction(&self, node: &Term) -> RestrictionResource {
        let mut properties = Vec::new();
        let mut cardinalities = Vec::new();

        for (predicate, object) in self.graph.predicate_objects(node) {
            let Some(predicate) = predicate.as_iri() else {
                continue;
            };
            if predicate == vocab::RDF_TYPE {
                continue;
            }

            if predicate == vocab::OWL_ON_PROPERTY {
                let Some(iri) = object.as_iri() else { continue };
                if let Resource::Reference(reference) = self.extract_iri(iri) {
                    properties.push(reference);
                }
                continue;
            }

            if vocab::NUMERIC_CARDINALITIES.contains(&predicate) {
                cardinalities.push(Cardinality::Numeric {
                    bound: numeric_bound(predicate),
                    value: term_display(&object),
                });
                continue;
            }

            let in_restriction = vocab::RESTRICTION_TYPES.contains(&predicate)
                || vocab::OWL_SET_TYPES.contains(&predicate);
            if in_restriction {
                let Some(iri) = object.as_iri() else { continue };
                let Some(bound) = reference_bound(predicate) else {
                    continue;
                };
                if let Resource::Reference(target) = self.extract_iri(iri) {
                    cardinalities.push(Cardinality::Reference { bound, target });
                }
            }
        }

        RestrictionResource {
            properties,
            cardinalities,
        }
    }

    fn extract_set_class(&self, node: &Term) -> SetClassResource {
        let kind = if !self.graph.objects(node, vocab::OWL_UNION_OF).is_empty() {
            Some(SetClassKind::Union)
        } else if !self.graph.objects(node, vocab::OWL_INTERSECTION_OF).is_empty() {
            Some(SetClassKind::Intersection)
        } else {
            None
        };

        let mut resources = Vec::new();
        for set_type in vocab::OWL_SET_TYPES {
            for head in self.graph.objects(node, set_type) {
                for member in self.graph.list_items(&head) {
                    resources.push(self.extract(&member, None));
                }
            }
        }

        SetClassResource { kind, resources }
    }

    fn extract_agent(&self, node: &Term) -> AgentResource {
        let mut names = Vec::new();
        let mut prefixes = Vec::new();
        let mut identifiers = Vec::new();
        let mut urls = Vec::new();
        let mut emails = Vec::new();
        let mut affiliations = Vec::new();

        for (predicate, object) in self.graph.predicate_objects(node) {
            let Some(predicate) = predicate.as_iri() else {
                continue;
            };
            if !vocab::AGENT_PROPS.contains(&predicate) {
                continue;
            }

            match predicate {
                vocab::SDO_NAME => {
                    if let Some(literal) = object.as_literal() {
                        names.push(literal.clone());
                    }
                }
                vocab::SDO_HONORIFIC_PREFIX => {
                    if let Some(literal) = object.as_literal() {
                        prefixes.push(literal.clone());
                    }
                }
                vocab::SDO_IDENTIFIER => identifiers.push(term_display(&object)),
                vocab::SDO_URL => urls.push(term_display(&object)),
                vocab::SDO_EMAIL => emails.push(term_display(&object)),
                vocab::SDO_AFFILIATION => affiliations.push(self.extract_affiliation(&object)),
                _ => {}
            }
        }

        AgentResource {
            node: term_display(node),
            names,
            prefixes,
            identifiers,
            urls,
            emails,
            affiliations,
        }
    }

    /// Affiliations recurse one level: name and url only.
    fn extract_affiliation(&self, node: &Term) -> Affiliation {
        let mut names = Vec::new();
        let mut urls = Vec::new();
        for (predicate, object) in self.graph.predicate_objects(node) {
            let Some(predicate) = predicate.as_iri() else {
                continue;
            };
            match predicate {
                vocab::SDO_NAME => {
                    if let Some(literal) = object.as_literal() {
                        names.push(literal.clone());
                    }
                }
                vocab::SDO_URL => urls.push(term_display(&object)),
                _ => {}
            }
        }
        Affiliation { names, urls }
    }
}

fn numeric_bound(predicate: &str) -> NumericBound {
    match predicate {
        vocab::OWL_MIN_CARDINALITY | vocab::OWL_MIN_QUALIFIED_CARDINALITY => NumericBound::Min,
        vocab::OWL_MAX_CARDINALITY | vocab::OWL_MAX_QUALIFIED_CARDINALITY => NumericBound::Max,
        _ => NumericBound::Exactly,
    }
}

fn reference_bound(predicate: &str) -> Option<ReferenceBound> {
    match predicate {
        vocab::OWL_ALL_VALUES_FROM => Some(ReferenceBound::Only),
        vocab::OWL_SOME_VALUES_FROM => Some(ReferenceBound::Some),
        vocab::OWL_HAS_VALUE => Some(ReferenceBound::Value),
        vocab::OWL_UNION_OF => Some(ReferenceBound::Union),
        vocab::OWL_INTERSECTION_OF => Some(ReferenceBound::Intersection),
        _ => None,
    }
}

/// A display string for any term kind.
fn term_display(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.clone(),
        Term::Blank(id) => id.clone(),
        Term::Literal(literal) => literal.lexical.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_turtle;

    fn graph(turtle: &str) -> OntGraph {
        parse_turtle(turtle).unwrap()
    }

    #[test]
    fn plain_iri_becomes_reference_with_iri_title() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            ex:s ex:p ex:o .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let resources =
            extractor.extract_all(&[Term::iri("http://example.org/ns/o")], None);
        let Resource::Reference(reference) = &resources.resources[0] else {
            panic!("expected a reference");
        };
        assert_eq!(reference.iri, "http://example.org/ns/o");
        assert_eq!(reference.title.lexical, "http://example.org/ns/o");
        assert_eq!(reference.title.datatype.as_deref(), Some(vocab::XSD_ANY_URI));
    }

    #[test]
    fn known_predicate_iri_gets_meta_title() {
        let g = graph("@prefix ex: <http://example.org/> . ex:s ex:p ex:o .");
        let extractor = ResourceExtractor::new(&g);
        let resources = extractor.extract_all(&[Term::iri(vocab::DCTERMS_TITLE)], None);
        let Resource::Reference(reference) = &resources.resources[0] else {
            panic!("expected a reference");
        };
        assert_eq!(reference.title.lexical, "title");
    }

    #[test]
    fn iri_titled_in_graph_uses_that_title() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            @prefix dcterms: <http://purl.org/dc/terms/> .
            ex:o dcterms:title "The Object" .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let resources =
            extractor.extract_all(&[Term::iri("http://example.org/ns/o")], None);
        let Resource::Reference(reference) = &resources.resources[0] else {
            panic!("expected a reference");
        };
        assert_eq!(reference.title.lexical, "The Object");
    }

    #[test]
    fn http_literal_is_reextracted_as_iri() {
        let g = graph("@prefix ex: <http://example.org/ns/> . ex:s ex:p ex:o .");
        let extractor = ResourceExtractor::new(&g);
        let resources = extractor.extract_all(
            &[Term::Literal(Literal::new("http://example.org/ns/target"))],
            None,
        );
        assert!(matches!(resources.resources[0], Resource::Reference(_)));
    }

    #[test]
    fn non_uri_literal_stays_literal() {
        let g = graph("@prefix ex: <http://example.org/> . ex:s ex:p ex:o .");
        let extractor = ResourceExtractor::new(&g);
        let resources =
            extractor.extract_all(&[Term::Literal(Literal::new("just text"))], None);
        assert!(matches!(
            &resources.resources[0],
            Resource::Literal(LiteralResource { is_example: false, .. })
        ));
    }

    #[test]
    fn example_literal_is_flagged() {
        let g = graph("@prefix ex: <http://example.org/> . ex:s ex:p ex:o .");
        let extractor = ResourceExtractor::new(&g);
        let resources = extractor.extract_all(
            &[Term::Literal(Literal::new("ex:a ex:b ex:c ."))],
            Some(vocab::SKOS_EXAMPLE),
        );
        assert!(matches!(
            &resources.resources[0],
            Resource::Literal(LiteralResource { is_example: true, .. })
        ));
    }

    #[test]
    fn restriction_blank_node_is_extracted() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            @prefix owl: <http://www.w3.org/2002/07/owl#> .
            ex:C ex:on [
                a owl:Restriction ;
                owl:onProperty ex:hasPart ;
                owl:minCardinality 1 ;
                owl:someValuesFrom ex:Part
            ] .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let node = g
            .objects(&Term::iri("http://example.org/ns/C"), "http://example.org/ns/on")
            .remove(0);
        let resources = extractor.extract_all(&[node], None);
        let Resource::Restriction(restriction) = &resources.resources[0] else {
            panic!("expected a restriction, got {:?}", resources.resources[0]);
        };
        assert_eq!(restriction.properties.len(), 1);
        assert_eq!(restriction.properties[0].iri, "http://example.org/ns/hasPart");
        assert_eq!(restriction.cardinalities.len(), 2);
        assert!(restriction.cardinalities.iter().any(|c| matches!(
            c,
            Cardinality::Numeric { bound: NumericBound::Min, value } if value == "1"
        )));
        assert!(restriction.cardinalities.iter().any(|c| matches!(
            c,
            Cardinality::Reference { bound: ReferenceBound::Some, .. }
        )));
    }

    #[test]
    fn union_class_walks_the_list() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            @prefix owl: <http://www.w3.org/2002/07/owl#> .
            ex:C ex:eq [ a owl:Class ; owl:unionOf ( ex:A ex:B ) ] .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let node = g
            .objects(&Term::iri("http://example.org/ns/C"), "http://example.org/ns/eq")
            .remove(0);
        let resources = extractor.extract_all(&[node], None);
        let Resource::SetClass(set) = &resources.resources[0] else {
            panic!("expected a set class, got {:?}", resources.resources[0]);
        };
        assert_eq!(set.kind, Some(SetClassKind::Union));
        assert_eq!(set.resources.len(), 2);
    }

    #[test]
    fn agent_fields_are_collected() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            @prefix prov: <http://www.w3.org/ns/prov#> .
            @prefix sdo: <https://schema.org/> .
            ex:ada a prov:Agent ;
                sdo:name "Ada Lovelace" ;
                sdo:email "mailto:ada@example.org" ;
                sdo:url "http://example.org/ada" ;
                sdo:affiliation [ sdo:name "Analytical Engines" ; sdo:url "http://engines.example/" ] .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let resources =
            extractor.extract_all(&[Term::iri("http://example.org/ns/ada")], None);
        let Resource::Agent(agent) = &resources.resources[0] else {
            panic!("expected an agent");
        };
        assert_eq!(agent.names[0].lexical, "Ada Lovelace");
        assert_eq!(agent.emails, vec!["mailto:ada@example.org".to_string()]);
        assert_eq!(agent.urls, vec!["http://example.org/ada".to_string()]);
        assert_eq!(agent.affiliations.len(), 1);
        assert_eq!(agent.affiliations[0].names[0].lexical, "Analytical Engines");
        assert_eq!(agent.affiliations[0].urls[0], "http://engines.example/");
    }

    #[test]
    fn untyped_blank_node_falls_back() {
        let g = graph(
            r#"
            @prefix ex: <http://example.org/ns/> .
            ex:s ex:p [ ex:q ex:o ] .
            "#,
        );
        let extractor = ResourceExtractor::new(&g);
        let node = g
            .objects(&Term::iri("http://example.org/ns/s"), "http://example.org/ns/p")
            .remove(0);
        let resources = extractor.extract_all(&[node], None);
        assert!(matches!(resources.resources[0], Resource::Blank(_)));
    }
}
