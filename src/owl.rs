//! Builds the storable form of an ontology: every serialization, the
//! documentation page, and the definienda index that makes IRIs
//! dereferenceable.

use thiserror::Error;

use crate::extract::{ExtractError, OntologyExtractor};
use crate::graph::{OntGraph, Term};
use crate::media;
use crate::model::{RenderContext, RenderError};
use crate::parse::SerializeError;
use crate::vocab;

#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("graph contains no owl:Ontology subject")]
    NotAnOntology,
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// An ontology ready for the indexer: identifying IRIs, one blob per
/// media type, and the fragment of every defined term.
#[derive(Debug, Clone)]
pub struct OntologyRecord {
    /// The ontology's canonical IRI.
    pub uri: String,
    /// Additional IRIs declaring the same ontology (version IRIs).
    pub alternate_uris: Vec<String>,
    /// (media type, content) pairs.
    pub encodings: Vec<(String, Vec<u8>)>,
    /// (term IRI, in-document fragment) pairs.
    pub definienda: Vec<(String, String)>,
}

impl OntologyRecord {
    /// All identifying IRIs, canonical first.
    pub fn uris(&self) -> impl Iterator<Item = (&str, bool)> {
        std::iter::once((self.uri.as_str(), true))
            .chain(self.alternate_uris.iter().map(|uri| (uri.as_str(), false)))
    }

    /// All (IRI, fragment, canonical) rows, including the rows obtained
    /// by rewriting term IRIs onto each alternate ontology IRI.
    pub fn all_definienda(&self) -> Vec<(String, String, bool)> {
        let mut rows = Vec::new();
        for (iri, fragment) in &self.definienda {
            rows.push((iri.clone(), fragment.clone(), true));

            let Some(relative) = iri.strip_prefix(&self.uri) else {
                continue;
            };
            for base in &self.alternate_uris {
                rows.push((format!("{base}{relative}"), fragment.clone(), false));
            }
        }
        rows
    }
}

/// Build the storable record for a parsed graph.
///
/// The raw graph is serialized in every RDF format; a copy with
/// sanitized literals and restricted languages feeds the documentation
/// renderer. The fragments persisted here come from the same render
/// context that produced the HTML, so in-document anchors and the
/// definienda index always agree.
pub fn build_ontology(
    graph: &OntGraph,
    languages: &[String],
) -> Result<OntologyRecord, OntologyError> {
    let uri = graph
        .subjects(vocab::RDF_TYPE, &Term::iri(vocab::OWL_ONTOLOGY))
        .into_iter()
        .filter_map(|s| s.as_iri().map(str::to_string))
        .next_back()
        .ok_or(OntologyError::NotAnOntology)?;

    let mut encodings = Vec::new();
    for (extension, media_type) in media::media_types() {
        encodings.push((media_type.to_string(), crate::parse::serialize(graph, extension)?));
    }

    let mut document = graph.clone();
    document.rewrite_literals(|literal| Some(crate::markdown::sanitize(&literal.lexical)));
    if !languages.is_empty() {
        document.restrict_languages(languages);
    }

    let extractor = OntologyExtractor::new(&document);
    let ontology = extractor.extract()?;

    let mut ctx = RenderContext::new(&ontology);
    let html = ontology.to_html(&mut ctx)?.render();
    encodings.push((media::HTML.to_string(), html.into_bytes()));

    let mut definienda = Vec::new();
    for definiendum in ontology.iter() {
        let fragment = ctx.fragment(&definiendum.iri)?;
        definienda.push((definiendum.iri.clone(), fragment));
    }

    Ok(OntologyRecord {
        uri,
        alternate_uris: alternate_uris(graph),
        encodings,
        definienda,
    })
}

/// The version IRIs of the first subject declaring the ontology.
fn alternate_uris(graph: &OntGraph) -> Vec<String> {
    for typ in [
        vocab::OWL_ONTOLOGY,
        vocab::PROF_PROFILE,
        vocab::SKOS_CONCEPT_SCHEME,
    ] {
        let subjects = graph.subjects(vocab::RDF_TYPE, &Term::iri(typ));
        let Some(subject) = subjects.first() else {
            continue;
        };
        return graph
            .objects(subject, vocab::OWL_VERSION_IRI)
            .into_iter()
            .filter_map(|o| o.as_iri().map(str::to_string))
            .collect();
    }
    Vec::new()
}
