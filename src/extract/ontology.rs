//! Whole-ontology extraction: inference, metadata, sections, namespaces
//! and the schema.org projection.

use std::collections::HashMap;

use crate::graph::{OntGraph, Term};
use crate::model::{
    Definiendum, Ontology, OntologyDefinienda, PropertyResourcePair, TypeDefinienda,
};
use crate::vocab::{self, IndexedProperty};

use super::{ExtractError, ResourceExtractor};

/// The `rdf:type` objects that identify the ontology subject itself.
const ONTOLOGY_TYPES: &[&str] = &[
    vocab::OWL_ONTOLOGY,
    vocab::SKOS_CONCEPT_SCHEME,
    vocab::PROF_PROFILE,
];

/// Extracts the complete value tree for a single ontology.
///
/// The input graph is sorted into a fixed iteration order before the
/// inference pass, which keeps fragment allocation deterministic for a
/// given input.
pub struct OntologyExtractor {
    graph: OntGraph,
}

impl OntologyExtractor {
    pub fn new(source: &OntGraph) -> Self {
        let mut graph = source.sorted();
        ontdoc_inference(&mut graph);
        Self { graph }
    }

    /// The inferred graph this extractor works on.
    pub fn graph(&self) -> &OntGraph {
        &self.graph
    }

    pub fn extract(&self) -> Result<Ontology, ExtractError> {
        let metadata = self.metadata()?;
        let sections = self.sections();
        let namespaces = self.namespaces();
        let schema_json = self.schema_json()?;
        Ok(Ontology::new(schema_json, metadata, sections, namespaces))
    }

    /// Subjects declaring the ontology itself, in graph order.
    fn ontology_subjects(&self) -> Vec<Term> {
        let mut subjects = Vec::new();
        for typ in ONTOLOGY_TYPES {
            for subject in self.graph.subjects(vocab::RDF_TYPE, &Term::iri(*typ)) {
                if matches!(subject, Term::Iri(_)) && !subjects.contains(&subject) {
                    subjects.push(subject);
                }
            }
        }
        subjects
    }

    fn metadata(&self) -> Result<OntologyDefinienda, ExtractError> {
        let resources = ResourceExtractor::new(&self.graph);
        let meta = crate::meta::meta();

        let mut iri = None;
        let mut collected: HashMap<&str, Vec<Term>> = HashMap::new();
        for subject in self.ontology_subjects() {
            let Term::Iri(subject_iri) = &subject else {
                continue;
            };
            iri = Some(subject_iri.clone());
            for (predicate, object) in self.graph.predicate_objects(&subject) {
                let Some(predicate) = predicate.as_iri() else {
                    continue;
                };
                if let Some(known) = vocab::ONT_PROPS.iter().copied().find(|p| *p == predicate) {
                    collected.entry(known).or_default().push(object);
                }
            }
        }
        let iri = iri.ok_or(ExtractError::NoOntology)?;

        let titles = collected
            .get(vocab::DCTERMS_TITLE)
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|o| o.as_literal().cloned())
                    .collect()
            })
            .unwrap_or_default();

        let mut properties = Vec::new();
        for prop in vocab::ONT_PROPS.iter().copied() {
            let Some(objects) = collected.get(prop) else {
                continue;
            };
            properties.push(PropertyResourcePair {
                prop: meta.property(prop),
                resources: resources.extract_all(objects, Some(prop)),
            });
        }

        Ok(OntologyDefinienda {
            iri,
            titles,
            properties,
        })
    }

    fn sections(&self) -> Vec<TypeDefinienda> {
        IndexedProperty::ALL
            .iter()
            .filter(|kind| {
                !self
                    .graph
                    .subjects(vocab::RDF_TYPE, &Term::iri(kind.iri()))
                    .is_empty()
            })
            .map(|kind| self.section(*kind))
            .collect()
    }

    fn section(&self, kind: IndexedProperty) -> TypeDefinienda {
        let resources = ResourceExtractor::new(&self.graph);
        let meta = crate::meta::meta();
        let wanted = kind.properties();

        let mut definienda = Vec::new();
        for subject in self.graph.subjects(vocab::RDF_TYPE, &Term::iri(kind.iri())) {
            let Term::Iri(subject_iri) = &subject else {
                continue;
            };

            // a subject also typed as one of the specializations is
            // listed under the more specific kind only
            let specialized = kind
                .specializations()
                .iter()
                .any(|special| self.graph.has_type(&subject, special));
            if specialized {
                continue;
            }

            let mut collected: HashMap<&str, Vec<Term>> = HashMap::new();
            for (predicate, object) in self.graph.predicate_objects(&subject) {
                let Some(predicate) = predicate.as_iri() else {
                    continue;
                };
                let Some(known) = wanted.iter().copied().find(|p| *p == predicate) else {
                    continue;
                };

                // restrictions referenced via rdfs:subClassOf render
                // under their own predicate
                let is_restriction_value = known == vocab::RDFS_SUB_CLASS_OF
                    && self.graph.has_type(&object, vocab::OWL_RESTRICTION);
                let key = if is_restriction_value {
                    vocab::ONTDOC_RESTRICTION
                } else {
                    known
                };
                collected.entry(key).or_default().push(object);
            }

            let mut properties = Vec::new();
            for prop in wanted.iter().copied() {
                let Some(objects) = collected.get(prop) else {
                    continue;
                };
                properties.push(PropertyResourcePair {
                    prop: meta.property(prop),
                    resources: resources.extract_all(objects, Some(prop)),
                });
            }

            definienda.push(Definiendum {
                iri: subject_iri.clone(),
                kind,
                properties,
            });
        }

        TypeDefinienda { kind, definienda }
    }

    fn namespaces(&self) -> Vec<(String, String)> {
        let mut namespaces = self.graph.used_namespaces(&[]);
        namespaces.sort_by(|(a, _), (b, _)| a.cmp(b));
        namespaces
    }

    /// A schema.org description of the ontology metadata, as sorted
    /// JSON-LD.
    fn schema_json(&self) -> Result<String, ExtractError> {
        let schema = self.schema_graph();
        let raw = crate::parse::serialize(&schema, "json-ld")
            .map_err(|e| ExtractError::Schema(e.to_string()))?;
        crate::jsonld::sort_document(&raw).map_err(|e| ExtractError::Schema(e.to_string()))
    }

    fn schema_graph(&self) -> OntGraph {
        let mut schema = OntGraph::new();
        let agent_mapped = [
            (vocab::DCTERMS_PUBLISHER, vocab::SDO_PUBLISHER),
            (vocab::DCTERMS_CREATOR, vocab::SDO_CREATOR),
            (vocab::DCTERMS_CONTRIBUTOR, vocab::SDO_CONTRIBUTOR),
        ];
        let direct_mapped = [
            (vocab::DCTERMS_TITLE, vocab::SDO_NAME),
            (vocab::DCTERMS_DESCRIPTION, vocab::SDO_DESCRIPTION),
            (vocab::DCTERMS_CREATED, vocab::SDO_DATE_CREATED),
            (vocab::DCTERMS_MODIFIED, vocab::SDO_DATE_MODIFIED),
            (vocab::DCTERMS_ISSUED, vocab::SDO_DATE_ISSUED),
            (vocab::DCTERMS_LICENSE, vocab::SDO_LICENSE),
            (vocab::DCTERMS_RIGHTS, vocab::SDO_COPYRIGHT_NOTICE),
        ];

        for subject in self.ontology_subjects() {
            schema.insert(
                subject.clone(),
                Term::iri(vocab::RDF_TYPE),
                Term::iri(vocab::SDO_DEFINED_TERM_SET),
            );

            for (predicate, object) in self.graph.predicate_objects(&subject) {
                let Some(predicate) = predicate.as_iri() else {
                    continue;
                };

                if let Some((_, mapped)) =
                    direct_mapped.iter().find(|(from, _)| *from == predicate)
                {
                    schema.insert(subject.clone(), Term::iri(*mapped), object);
                    continue;
                }

                let Some((_, mapped)) =
                    agent_mapped.iter().find(|(from, _)| *from == predicate)
                else {
                    continue;
                };
                schema.insert(subject.clone(), Term::iri(*mapped), object.clone());
                if object.as_literal().is_some() {
                    continue;
                }
                // copy agent details through for non-literal values
                for (agent_predicate, agent_object) in self.graph.predicate_objects(&object) {
                    let Some(agent_predicate_iri) = agent_predicate.as_iri() else {
                        continue;
                    };
                    if vocab::AGENT_PROPS.contains(&agent_predicate_iri) {
                        schema.insert(object.clone(), agent_predicate, agent_object);
                    }
                }
            }
        }

        schema
    }
}

/// Expand the graph with the fixed OntDoc rewrites so downstream code
/// only needs to look for one predicate per concept.
fn ontdoc_inference(graph: &mut OntGraph) {
    let rdf_type = Term::iri(vocab::RDF_TYPE);

    // rdfs:Class counts as owl:Class
    for subject in graph.subjects(vocab::RDF_TYPE, &Term::iri(vocab::RDFS_CLASS)) {
        graph.insert(subject, rdf_type.clone(), Term::iri(vocab::OWL_CLASS));
    }

    // unify the title, description, source and license spellings
    let copies = [
        (vocab::DC_TITLE, vocab::DCTERMS_TITLE),
        (vocab::RDFS_LABEL, vocab::DCTERMS_TITLE),
        (vocab::SKOS_PREF_LABEL, vocab::DCTERMS_TITLE),
        (vocab::SDO_NAME, vocab::DCTERMS_TITLE),
        (vocab::DC_DESCRIPTION, vocab::DCTERMS_DESCRIPTION),
        (vocab::RDFS_COMMENT, vocab::DCTERMS_DESCRIPTION),
        (vocab::SKOS_DEFINITION, vocab::DCTERMS_DESCRIPTION),
        (vocab::SDO_DESCRIPTION, vocab::DCTERMS_DESCRIPTION),
        (vocab::DC_SOURCE, vocab::DCTERMS_SOURCE),
        (vocab::SDO_LICENSE, vocab::DCTERMS_LICENSE),
    ];
    for (from, to) in copies {
        for (subject, object) in graph.subject_objects(from) {
            graph.insert(subject, Term::iri(to), object);
        }
    }

    // blank node types
    for subject in graph.subjects_with(vocab::OWL_ON_PROPERTY) {
        graph.insert(subject, rdf_type.clone(), Term::iri(vocab::OWL_RESTRICTION));
    }
    for set_type in vocab::OWL_SET_TYPES {
        for subject in graph.subjects_with(set_type) {
            graph.insert(subject, rdf_type.clone(), Term::iri(vocab::OWL_CLASS));
        }
    }

    // inverse relations
    let inverses = [
        (vocab::RDFS_SUB_CLASS_OF, vocab::ONTDOC_SUPER_CLASS_OF),
        (vocab::RDFS_SUB_PROPERTY_OF, vocab::ONTDOC_SUPER_PROPERTY_OF),
        (vocab::RDFS_DOMAIN, vocab::ONTDOC_IN_DOMAIN_OF),
        (vocab::SDO_DOMAIN_INCLUDES, vocab::ONTDOC_IN_DOMAIN_INCLUDES_OF),
        (vocab::RDFS_RANGE, vocab::ONTDOC_IN_RANGE_OF),
        (vocab::SDO_RANGE_INCLUDES, vocab::ONTDOC_IN_RANGE_INCLUDES_OF),
        (vocab::RDF_TYPE, vocab::ONTDOC_HAS_MEMBER),
    ];
    for (from, to) in inverses {
        for (subject, object) in graph.subject_objects(from) {
            graph.insert(object, Term::iri(to), subject);
        }
    }

    // canonicalize the agent predicates to dcterms
    let agent_rewrites: [(&[&str], &str); 3] = [
        (
            &[vocab::DC_CREATOR, vocab::SDO_CREATOR, vocab::SDO_AUTHOR],
            vocab::DCTERMS_CREATOR,
        ),
        (
            &[vocab::DC_CONTRIBUTOR, vocab::SDO_CONTRIBUTOR],
            vocab::DCTERMS_CONTRIBUTOR,
        ),
        (
            &[vocab::DC_PUBLISHER, vocab::SDO_PUBLISHER],
            vocab::DCTERMS_PUBLISHER,
        ),
    ];
    for (sources, target) in agent_rewrites {
        for source in sources {
            for (subject, object) in graph.subject_objects(source) {
                graph.remove(&(subject.clone(), Term::iri(*source), object.clone()));
                graph.insert(subject, Term::iri(target), object);
            }
        }
    }

    // mark creator/contributor/publisher values as agents
    for predicate in [
        vocab::DCTERMS_PUBLISHER,
        vocab::DCTERMS_CREATOR,
        vocab::DCTERMS_CONTRIBUTOR,
    ] {
        for object in graph.objects_with(predicate) {
            graph.insert(object, rdf_type.clone(), Term::iri(vocab::PROV_AGENT));
        }
    }

    // agent annotations from foaf / org
    let agent_copies = [
        (vocab::FOAF_NAME, vocab::SDO_NAME),
        (vocab::FOAF_MBOX, vocab::SDO_EMAIL),
        (vocab::ORG_MEMBER_OF, vocab::SDO_AFFILIATION),
    ];
    for (from, to) in agent_copies {
        for (subject, object) in graph.subject_objects(from) {
            graph.insert(subject, Term::iri(to), object);
        }
    }
}
