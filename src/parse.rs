//! The boundary to the RDF parser and serializers.
//!
//! Files are parsed with sophia into a [`FastGraph`], then converted into
//! the owned [`OntGraph`] model everything downstream works on. The same
//! module serializes an [`OntGraph`] back out in every supported format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sophia::api::MownStr;
use sophia::api::parser::TripleParser;
use sophia::api::prelude::*;
use sophia::api::serializer::{QuadSerializer, TripleSerializer};
use sophia::api::term::{BnodeId, SimpleTerm, TermKind};
use sophia::inmem::graph::FastGraph;
use sophia::iri::IriRef;
use thiserror::Error;

use crate::graph::{Literal, OntGraph, Term};
use crate::vocab;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Syntax { path: String, message: String },
}

#[derive(Debug, Error)]
#[error("failed to serialize as {extension}: {message}")]
pub struct SerializeError {
    pub extension: String,
    pub message: String,
}

/// Parse the RDF file at `path`, dispatching on its extension.
///
/// Turtle is the default for unknown extensions; `nt` and `rdf`/`xml`/
/// `owl` get their dedicated parsers.
pub fn parse_path(path: &Path) -> Result<OntGraph, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let syntax = |message: String| ParseError::Syntax {
        path: path.display().to_string(),
        message,
    };

    let fast: FastGraph = match extension.as_str() {
        "nt" | "ntriples" => sophia::turtle::parser::nt::parse_bufread(reader)
            .collect_triples()
            .map_err(|e| syntax(e.to_string()))?,
        "rdf" | "xml" | "owl" => sophia::xml::parser::RdfXmlParser::default()
            .parse(reader)
            .collect_triples()
            .map_err(|e| syntax(e.to_string()))?,
        _ => sophia::turtle::parser::turtle::parse_bufread(reader)
            .collect_triples()
            .map_err(|e| syntax(e.to_string()))?,
    };

    let mut graph = convert(&fast);

    // sophia's parsers do not surface the prefix map, so recover the
    // bindings from the source text for the turtle-family formats.
    if matches!(extension.as_str(), "" | "ttl" | "turtle" | "n3" | "nt" | "ntriples") {
        let file = File::open(path).map_err(|source| ParseError::Open {
            path: path.display().to_string(),
            source,
        })?;
        for (prefix, ns) in scan_prefixes(BufReader::new(file)) {
            graph.bind(prefix, ns);
        }
    }

    Ok(graph)
}

/// Parse a Turtle document from a string (bundled assets, tests).
pub fn parse_turtle(source: &str) -> Result<OntGraph, ParseError> {
    let fast: FastGraph = sophia::turtle::parser::turtle::parse_str(source)
        .collect_triples()
        .map_err(|e| ParseError::Syntax {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;

    let mut graph = convert(&fast);
    for (prefix, ns) in scan_prefixes(source.as_bytes()) {
        graph.bind(prefix, ns);
    }
    Ok(graph)
}

/// Serialize a graph in the format named by its canonical extension
/// (see [`crate::media`]).
pub fn serialize(graph: &OntGraph, extension: &str) -> Result<Vec<u8>, SerializeError> {
    let fast = to_fast_graph(graph);
    let fail = |message: String| SerializeError {
        extension: extension.to_string(),
        message,
    };

    let mut out = Vec::new();
    match extension {
        "turtle" => {
            use sophia::turtle::serializer::turtle::TurtleSerializer;
            let mut ser = TurtleSerializer::new(&mut out);
            ser.serialize_graph(&fast).map_err(|e| fail(e.to_string()))?;
        }
        "nt" => {
            use sophia::turtle::serializer::nt::NtSerializer;
            let mut ser = NtSerializer::new(&mut out);
            ser.serialize_graph(&fast).map_err(|e| fail(e.to_string()))?;
        }
        "trig" => {
            use sophia::turtle::serializer::trig::TrigSerializer;
            let dataset = fast.as_dataset();
            let mut ser = TrigSerializer::new(&mut out);
            ser.serialize_dataset(&dataset)
                .map_err(|e| fail(e.to_string()))?;
        }
        "xml" => {
            use sophia::xml::serializer::RdfXmlSerializer;
            let mut ser = RdfXmlSerializer::new(&mut out);
            ser.serialize_graph(&fast).map_err(|e| fail(e.to_string()))?;
        }
        "json-ld" => {
            use sophia::jsonld::serializer::JsonLdSerializer;
            let dataset = fast.as_dataset();
            let mut ser = JsonLdSerializer::new(&mut out);
            ser.serialize_dataset(&dataset)
                .map_err(|e| fail(e.to_string()))?;
        }
        other => {
            return Err(fail(format!("unknown serialization {other:?}")));
        }
    }
    Ok(out)
}

/// Convert a parsed sophia graph into the owned model, with the core
/// vocabulary prefixes bound.
fn convert(fast: &FastGraph) -> OntGraph {
    let mut graph = OntGraph::with_core_bindings();
    for triple in fast.triples().filter_map(Result::ok) {
        let (Some(s), Some(p), Some(o)) = (
            to_term(triple.s()),
            to_term(triple.p()),
            to_term(triple.o()),
        ) else {
            continue;
        };
        graph.insert(s, p, o);
    }
    graph
}

fn to_term<T: sophia::api::term::Term>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => Some(Term::Iri(term.iri()?.as_str().to_string())),
        TermKind::BlankNode => Some(Term::Blank(term.bnode_id()?.as_str().to_string())),
        TermKind::Literal => {
            let lexical = term.lexical_form()?.to_string();
            if let Some(tag) = term.language_tag() {
                return Some(Term::Literal(Literal::lang(lexical, tag.as_str())));
            }
            let datatype = term
                .datatype()
                .map(|dt| dt.as_str().to_string())
                .filter(|dt| dt != vocab::XSD_STRING);
            Some(Term::Literal(Literal {
                lexical,
                language: None,
                datatype,
            }))
        }
        _ => None,
    }
}

/// Rebuild a sophia graph from the owned model for serialization.
pub(crate) fn to_fast_graph(graph: &OntGraph) -> FastGraph {
    let mut fast = FastGraph::new();
    for (s, p, o) in graph.triples() {
        let _ = fast.insert(from_term(s), from_term(p), from_term(o));
    }
    fast
}

fn from_term(term: &Term) -> SimpleTerm<'_> {
    match term {
        Term::Iri(iri) => SimpleTerm::Iri(IriRef::new_unchecked(MownStr::from_ref(iri))),
        Term::Blank(id) => SimpleTerm::BlankNode(BnodeId::new_unchecked(MownStr::from_ref(id))),
        Term::Literal(lit) => match &lit.language {
            Some(lang) => SimpleTerm::LiteralLanguage(
                MownStr::from_ref(&lit.lexical),
                sophia::api::term::LanguageTag::new_unchecked(MownStr::from_ref(lang)),
            ),
            None => {
                let datatype = lit.datatype.as_deref().unwrap_or(vocab::XSD_STRING);
                SimpleTerm::LiteralDatatype(
                    MownStr::from_ref(&lit.lexical),
                    IriRef::new_unchecked(MownStr::from_ref(datatype)),
                )
            }
        },
    }
}

/// Recover `@prefix` / `PREFIX` bindings from the source text.
fn scan_prefixes<R: BufRead>(reader: R) -> Vec<(String, String)> {
    let mut prefixes = Vec::new();

    for line in reader.lines() {
        let Ok(line) = line else { break };
        let trimmed = line.trim();
        if !(trimmed.starts_with("@prefix") || trimmed.to_uppercase().starts_with("PREFIX")) {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }

        // Format: @prefix ns: <iri> .
        let prefix = parts[1].trim_end_matches(':').to_string();
        let iri = parts[2]
            .trim_start_matches('<')
            .trim_end_matches('.')
            .trim_end_matches('>')
            .to_string();

        prefixes.push((prefix, iri));
    }

    prefixes
}
