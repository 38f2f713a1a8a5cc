//! The in-memory value tree an ontology is rendered from.
//!
//! Extraction (see [`crate::extract`]) turns the RDF graph into this tree
//! of plain owned values; rendering walks the tree with a
//! [`RenderContext`] and never touches the graph again.

mod context;
mod meta;
mod ontology;
mod resource;

pub use context::{ContentRendering, RenderContext, RenderError};
pub use meta::{MetaOntology, MetaProperty, title_case};
pub use ontology::{Definiendum, Ontology, OntologyDefinienda, PropertyResourcePair, TypeDefinienda};
pub use resource::{
    Affiliation, AgentResource, BlankNodeResource, Cardinality, LiteralResource, NumericBound,
    RdfResources, ReferenceBound, Resource, ResourceReference, RestrictionResource, SetClassKind,
    SetClassResource,
};
