//! Per-render mutable state: fragment identifiers and IRI formatting.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::graph::Literal;
use crate::html::{Node, div, sup};
use crate::markdown;

use super::Ontology;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("exceeded {max} attempts generating a fragment identifier for {iri:?}")]
    FragmentOverflow { iri: String, max: usize },
}

/// How literal content is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentRendering {
    /// Plain escaped text.
    Text,
    /// Markdown, filtered against the tag allow-list.
    #[default]
    SanitizedMarkdown,
    /// Markdown emitted as-is.
    RawMarkdown,
}

/// Context owned by one HTML serialization pass.
///
/// Fragment identifiers are unique per context; two IRIs in the same
/// group never share one. The identifiers persisted alongside the HTML
/// must come from the same context that rendered it.
pub struct RenderContext<'a> {
    ontology: &'a Ontology,
    content: ContentRendering,
    fragments: HashMap<(String, String), String>,
    used: HashSet<String>,
    iri_cache: HashMap<String, String>,
}

impl<'a> RenderContext<'a> {
    const MAX_FRAGMENT_TRIES: usize = 1000;

    pub fn new(ontology: &'a Ontology) -> Self {
        Self::with_content(ontology, ContentRendering::default())
    }

    pub fn with_content(ontology: &'a Ontology, content: ContentRendering) -> Self {
        Self {
            ontology,
            content,
            fragments: HashMap::new(),
            used: HashSet::new(),
            iri_cache: HashMap::new(),
        }
    }

    pub fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// Render a literal's content according to the configured mode.
    pub fn render_content(&self, literal: &Literal) -> Node {
        let lang_sup = literal
            .language
            .as_deref()
            .map(|language| sup().class("sup-lang").attr("lang", "en").text(language));

        let inner = match self.content {
            ContentRendering::Text => div()
                .attr_opt("lang", literal.language.clone())
                .text(&literal.lexical),
            ContentRendering::SanitizedMarkdown => div()
                .attr_opt("lang", literal.language.clone())
                .child(Node::raw(markdown::sanitized_markdown(&literal.lexical))),
            ContentRendering::RawMarkdown => div()
                .attr_opt("lang", literal.language.clone())
                .child(Node::raw(markdown::markdown_to_html(&literal.lexical))),
        };

        div().child_opt(lang_sup).child(inner).into()
    }

    /// Format an IRI as `prefix:local` using the longest matching bound
    /// namespace, falling back to the full IRI. Cached per context.
    pub fn format_iri(&mut self, iri: &str) -> String {
        if let Some(short) = self.iri_cache.get(iri) {
            return short.clone();
        }

        let mut longest: Option<&(String, String)> = None;
        for binding in &self.ontology.namespaces {
            let (_, ns) = binding;
            if !iri.starts_with(ns.as_str()) {
                continue;
            }
            if longest.is_none_or(|(_, best)| ns.len() > best.len()) {
                longest = Some(binding);
            }
        }

        let short = match longest {
            Some((prefix, ns)) => format!("{prefix}:{}", &iri[ns.len()..]),
            None => iri.to_string(),
        };
        self.iri_cache.insert(iri.to_string(), short.clone());
        short
    }

    /// A fragment identifier for an IRI, in the unnamed group.
    pub fn fragment(&mut self, iri: &str) -> Result<String, RenderError> {
        self.fragment_in("", iri)
    }

    /// A fragment identifier for an IRI within a group.
    ///
    /// Identifiers for two IRIs are identical exactly when IRI and group
    /// both match. Collisions get numeric suffixes; generation gives up
    /// after a bounded number of tries.
    pub fn fragment_in(&mut self, group: &str, iri: &str) -> Result<String, RenderError> {
        let key = (group.to_string(), iri.to_string());
        if let Some(existing) = self.fragments.get(&key) {
            return Ok(existing.clone());
        }

        let mut chosen = None;
        for (count, candidate) in candidates(iri).enumerate() {
            if count == Self::MAX_FRAGMENT_TRIES {
                return Err(RenderError::FragmentOverflow {
                    iri: iri.to_string(),
                    max: Self::MAX_FRAGMENT_TRIES,
                });
            }
            let qualified = if group.is_empty() {
                candidate
            } else {
                format!("{group}_{candidate}")
            };
            if !self.used.contains(&qualified) {
                chosen = Some(qualified);
                break;
            }
        }

        // candidates() is infinite, so the loop only exits via the two
        // branches above
        let fragment = chosen.expect("candidate stream is unbounded");
        self.used.insert(fragment.clone());
        self.fragments.insert(key, fragment.clone());
        Ok(fragment)
    }
}

/// Candidate fragment identifiers for an IRI: the extractable final
/// segment (or an MD5 digest when none exists), then the same with
/// increasing numeric suffixes.
fn candidates(iri: &str) -> impl Iterator<Item = String> + use<> {
    let base = pure_identifier(iri)
        .unwrap_or_else(|| format!("{:x}", md5::compute(iri.as_bytes())));

    let first = std::iter::once(base.clone());
    let suffixed = (2usize..).map(move |suffix| format!("{base}_{suffix}"));
    first.chain(suffixed)
}

/// The final path segment of an IRI, if one is extractable.
fn pure_identifier(iri: &str) -> Option<String> {
    let segments: Vec<&str> = iri.split('/').collect();
    let last = *segments.last()?;

    if last.is_empty() {
        return None;
    }
    // plain domains ["http:", "", "example.org"] have no segment
    if segments.len() < 4 {
        return None;
    }
    if last.ends_with('#') {
        return None;
    }

    let identifier = last.split('#').next_back()?;
    if identifier.is_empty() {
        return None;
    }
    Some(identifier.to_string())
}
