//! Extraction of the renderable value tree from an RDF graph.

mod ontology;
mod resource;

pub use ontology::OntologyExtractor;
pub use resource::ResourceExtractor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("graph contains no owl:Ontology, skos:ConceptScheme or prof:Profile subject")]
    NoOntology,
    #[error("schema.org projection failed: {0}")]
    Schema(String),
}
