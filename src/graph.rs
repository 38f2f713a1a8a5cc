//! An owned, order-preserving triple store the extraction pipeline works on.
//!
//! Parsed RDF is converted into this model right after parsing (see
//! [`crate::parse`]); everything downstream — inference, extraction,
//! rendering — iterates plain owned terms instead of borrowing from the
//! parser. The renderer never follows an RDF edge directly: references
//! between extracted resources are IRIs resolved through the ontology
//! value.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

/// A literal value with optional language tag or datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    /// A plain string literal.
    pub fn new(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// A datatyped literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }
}

/// A single RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank(id.into())
    }

    /// The IRI of this term, if it is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Whether this term is exactly the given IRI.
    pub fn is(&self, iri: &str) -> bool {
        matches!(self, Term::Iri(i) if i == iri)
    }
}

pub type Triple = (Term, Term, Term);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QnameError {
    #[error("cannot split {0:?} into a namespace and local name")]
    NoSplit(String),
    #[error("no prefix bound for namespace {0:?}")]
    Unbound(String),
}

/// An in-memory RDF graph with insertion-ordered iteration and prefix
/// bindings.
#[derive(Debug, Clone, Default)]
pub struct OntGraph {
    triples: Vec<Triple>,
    present: HashSet<Triple>,
    bindings: Vec<(String, String)>,
}

impl OntGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with the well-known core vocabulary prefixes bound.
    pub fn with_core_bindings() -> Self {
        let mut graph = Self::new();
        for (prefix, ns) in crate::vocab::CORE_BINDINGS {
            graph.bind(*prefix, *ns);
        }
        graph
    }

    /// Bind a prefix to a namespace, replacing any previous binding for
    /// the same prefix.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        if let Some(entry) = self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            entry.1 = namespace;
        } else {
            self.bindings.push((prefix, namespace));
        }
    }

    /// All bound (prefix, namespace) pairs, in binding order.
    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Insert a triple; returns false if it was already present.
    pub fn insert(&mut self, s: Term, p: Term, o: Term) -> bool {
        let triple = (s, p, o);
        if self.present.contains(&triple) {
            return false;
        }
        self.present.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Remove a triple; returns false if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.present.remove(triple) {
            return false;
        }
        self.triples.retain(|t| t != triple);
        true
    }

    pub fn contains(&self, s: &Term, p: &str, o: &Term) -> bool {
        self.present
            .contains(&(s.clone(), Term::iri(p), o.clone()))
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Subjects of all triples with the given predicate and object.
    pub fn subjects(&self, predicate: &str, object: &Term) -> Vec<Term> {
        self.triples
            .iter()
            .filter(|(_, p, o)| p.is(predicate) && o == object)
            .map(|(s, _, _)| s.clone())
            .collect()
    }

    /// Subjects of all triples with the given predicate, any object.
    pub fn subjects_with(&self, predicate: &str) -> Vec<Term> {
        self.triples
            .iter()
            .filter(|(_, p, _)| p.is(predicate))
            .map(|(s, _, _)| s.clone())
            .collect()
    }

    /// Objects of all triples with the given subject and predicate.
    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<Term> {
        self.triples
            .iter()
            .filter(|(s, p, _)| s == subject && p.is(predicate))
            .map(|(_, _, o)| o.clone())
            .collect()
    }

    /// Objects of all triples with the given predicate, any subject.
    pub fn objects_with(&self, predicate: &str) -> Vec<Term> {
        self.triples
            .iter()
            .filter(|(_, p, _)| p.is(predicate))
            .map(|(_, _, o)| o.clone())
            .collect()
    }

    /// The first object for (subject, predicate), if any.
    pub fn value(&self, subject: &Term, predicate: &str) -> Option<Term> {
        self.triples
            .iter()
            .find(|(s, p, _)| s == subject && p.is(predicate))
            .map(|(_, _, o)| o.clone())
    }

    /// All (subject, object) pairs for the given predicate.
    pub fn subject_objects(&self, predicate: &str) -> Vec<(Term, Term)> {
        self.triples
            .iter()
            .filter(|(_, p, _)| p.is(predicate))
            .map(|(s, _, o)| (s.clone(), o.clone()))
            .collect()
    }

    /// All (predicate, object) pairs for the given subject.
    pub fn predicate_objects(&self, subject: &Term) -> Vec<(Term, Term)> {
        self.triples
            .iter()
            .filter(|(s, _, _)| s == subject)
            .map(|(_, p, o)| (p.clone(), o.clone()))
            .collect()
    }

    /// Whether the subject carries `rdf:type` of the given class IRI.
    pub fn has_type(&self, subject: &Term, class_iri: &str) -> bool {
        self.contains(subject, crate::vocab::RDF_TYPE, &Term::iri(class_iri))
    }

    /// Walk an RDF collection (`rdf:first` / `rdf:rest`) into its items.
    pub fn list_items(&self, head: &Term) -> Vec<Term> {
        let mut items = Vec::new();
        let mut cursor = head.clone();
        let mut seen = HashSet::new();
        while !cursor.is(crate::vocab::RDF_NIL) {
            if !seen.insert(cursor.clone()) {
                break;
            }
            if let Some(first) = self.value(&cursor, crate::vocab::RDF_FIRST) {
                items.push(first);
            }
            match self.value(&cursor, crate::vocab::RDF_REST) {
                Some(rest) => cursor = rest,
                None => break,
            }
        }
        items
    }

    /// A copy of this graph iterating in a fixed, sorted triple order.
    pub fn sorted(&self) -> OntGraph {
        let mut sorted: Vec<Triple> = self.triples.clone();
        sorted.sort();
        OntGraph {
            present: self.present.clone(),
            triples: sorted,
            bindings: self.bindings.clone(),
        }
    }

    /// Split an IRI into (namespace, local name) at the last `#` or `/`.
    fn split_iri(iri: &str) -> Option<(&str, &str)> {
        let split_at = iri.rfind('#').or_else(|| iri.rfind('/'))?;
        let (ns, local) = iri.split_at(split_at + 1);
        if local.is_empty() {
            return None;
        }
        Some((ns, local))
    }

    fn qname_once(&self, iri: &str) -> Result<(String, String, String), QnameError> {
        let (ns, local) =
            Self::split_iri(iri).ok_or_else(|| QnameError::NoSplit(iri.to_string()))?;
        let prefix = self
            .bindings
            .iter()
            .find(|(_, bound)| bound == ns)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| QnameError::Unbound(ns.to_string()))?;
        Ok((prefix, ns.to_string(), local.to_string()))
    }

    /// Compute (prefix, namespace, local name) for an IRI.
    ///
    /// IRIs ending in `/` cannot be split; those are retried once with
    /// the trailing slashes stripped. All other failures propagate.
    pub fn qname(&self, iri: &str) -> Result<(String, String, String), QnameError> {
        match self.qname_once(iri) {
            Ok(parts) => Ok(parts),
            Err(err) => {
                if !iri.ends_with('/') {
                    return Err(err);
                }
                self.qname_once(iri.trim_end_matches('/'))
            }
        }
    }

    /// Format an IRI as `prefix:local`, with the same trailing-slash
    /// tolerance as [`OntGraph::qname`].
    pub fn normalize(&self, iri: &str) -> Result<String, QnameError> {
        let (prefix, _, local) = self.qname(iri)?;
        Ok(format!("{prefix}:{local}"))
    }

    /// Every bound (prefix, namespace) pair whose namespace prefixes at
    /// least one IRI actually used in the graph, unioned with the
    /// prefixes named in `always`.
    pub fn used_namespaces(&self, always: &[&str]) -> Vec<(String, String)> {
        let mut used = Vec::new();
        for (prefix, ns) in &self.bindings {
            let wanted = always.contains(&prefix.as_str())
                || self.triples.iter().any(|(s, p, o)| {
                    [s, p, o]
                        .into_iter()
                        .filter_map(Term::as_iri)
                        .any(|iri| iri.starts_with(ns.as_str()))
                });
            if wanted {
                used.push((prefix.clone(), ns.clone()));
            }
        }
        used
    }

    /// Replace every literal object via `rewrite`, preserving language
    /// and datatype. `rewrite` returns `None` to leave a literal as-is.
    pub fn rewrite_literals(&mut self, rewrite: impl Fn(&Literal) -> Option<String>) {
        let mut replacements = Vec::new();
        for triple in &self.triples {
            let (s, p, o) = triple;
            let Term::Literal(lit) = o else { continue };
            let Some(lexical) = rewrite(lit) else {
                continue;
            };
            if lexical == lit.lexical {
                continue;
            }
            let cleaned = Literal {
                lexical,
                language: lit.language.clone(),
                datatype: lit.datatype.clone(),
            };
            replacements.push((
                triple.clone(),
                (s.clone(), p.clone(), Term::Literal(cleaned)),
            ));
        }
        for (old, new) in replacements {
            self.remove(&old);
            self.insert(new.0, new.1, new.2);
        }
    }

    /// For each (subject, predicate) with several language-tagged literal
    /// objects, keep only the literals in the best available language.
    ///
    /// The best language is the first entry of `preferences` present
    /// among the tags, falling back to the lexicographically smallest
    /// tag. Untagged literals are always retained. Applying this twice
    /// yields the same graph as applying it once.
    pub fn restrict_languages(&mut self, preferences: &[String]) {
        let mut tags: HashMap<(Term, Term), BTreeSet<String>> = HashMap::new();
        for (s, p, o) in &self.triples {
            if let Term::Literal(lit) = o {
                if let Some(language) = &lit.language {
                    tags.entry((s.clone(), p.clone()))
                        .or_default()
                        .insert(language.clone());
                }
            }
        }

        let mut doomed = Vec::new();
        for (key, languages) in &tags {
            let best = preferences
                .iter()
                .find(|pref| languages.contains(*pref))
                .cloned()
                .or_else(|| languages.iter().next().cloned());
            let Some(best) = best else { continue };
            for triple in &self.triples {
                let (s, p, o) = triple;
                if (s, p) != (&key.0, &key.1) {
                    continue;
                }
                if let Term::Literal(lit) = o {
                    if lit.language.as_deref().is_some_and(|lang| lang != best) {
                        doomed.push(triple.clone());
                    }
                }
            }
        }
        for triple in doomed {
            self.remove(&triple);
        }
    }
}

/// Which object terms a [`subject_object_map`] query collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    Iris,
    Literals,
}

/// Map each subject IRI to its objects across the given predicates,
/// filtered by term kind and preserving triple order.
pub fn subject_object_map(
    graph: &OntGraph,
    predicates: &[&str],
    filter: ObjectFilter,
) -> HashMap<String, Vec<Term>> {
    let mut map: HashMap<String, Vec<Term>> = HashMap::new();
    for (s, p, o) in graph.triples() {
        let Some(subject) = s.as_iri() else { continue };
        let Some(p_iri) = p.as_iri() else { continue };
        if !predicates.contains(&p_iri) {
            continue;
        }
        let keep = match filter {
            ObjectFilter::Iris => matches!(o, Term::Iri(_)),
            ObjectFilter::Literals => matches!(o, Term::Literal(_)),
        };
        if keep {
            map.entry(subject.to_string()).or_default().push(o.clone());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    fn example(local: &str) -> Term {
        Term::iri(format!("http://example.org/{local}"))
    }

    #[test]
    fn insert_deduplicates() {
        let mut g = OntGraph::new();
        assert!(g.insert(example("s"), example("p"), example("o")));
        assert!(!g.insert(example("s"), example("p"), example("o")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn remove_drops_triple() {
        let mut g = OntGraph::new();
        g.insert(example("s"), example("p"), example("o"));
        assert!(g.remove(&(example("s"), example("p"), example("o"))));
        assert!(g.is_empty());
        assert!(!g.remove(&(example("s"), example("p"), example("o"))));
    }

    #[test]
    fn sorted_is_deterministic() {
        let mut a = OntGraph::new();
        a.insert(example("b"), example("p"), example("o"));
        a.insert(example("a"), example("p"), example("o"));

        let mut b = OntGraph::new();
        b.insert(example("a"), example("p"), example("o"));
        b.insert(example("b"), example("p"), example("o"));

        let left: Vec<_> = a.sorted().triples().cloned().collect();
        let right: Vec<_> = b.sorted().triples().cloned().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn qname_uses_bound_prefix() {
        let g = OntGraph::with_core_bindings();
        assert_eq!(
            g.normalize(vocab::OWL_CLASS).unwrap(),
            "owl:Class".to_string()
        );
    }

    #[test]
    fn qname_retries_trailing_slash() {
        let mut g = OntGraph::new();
        g.bind("ex", "http://example.org/");
        assert_eq!(
            g.normalize("http://example.org/thing/").unwrap(),
            "ex:thing"
        );
    }

    #[test]
    fn qname_propagates_unbound() {
        let g = OntGraph::new();
        assert!(matches!(
            g.qname("http://example.org/thing"),
            Err(QnameError::Unbound(_))
        ));
    }

    #[test]
    fn qname_rejects_unsplittable() {
        let g = OntGraph::new();
        assert!(matches!(
            g.qname("urn-like-thing"),
            Err(QnameError::NoSplit(_))
        ));
    }

    #[test]
    fn used_namespaces_requires_usage() {
        let mut g = OntGraph::new();
        g.bind("ex", "http://example.org/");
        g.bind("unused", "http://unused.example/");
        g.insert(example("s"), example("p"), example("o"));

        let used = g.used_namespaces(&[]);
        assert_eq!(used, vec![("ex".to_string(), "http://example.org/".to_string())]);

        let with_always = g.used_namespaces(&["unused"]);
        assert_eq!(with_always.len(), 2);
    }

    #[test]
    fn list_items_walks_collection() {
        let mut g = OntGraph::new();
        let head = Term::blank("l0");
        let tail = Term::blank("l1");
        g.insert(head.clone(), Term::iri(vocab::RDF_FIRST), example("a"));
        g.insert(head.clone(), Term::iri(vocab::RDF_REST), tail.clone());
        g.insert(tail.clone(), Term::iri(vocab::RDF_FIRST), example("b"));
        g.insert(tail, Term::iri(vocab::RDF_REST), Term::iri(vocab::RDF_NIL));

        assert_eq!(g.list_items(&head), vec![example("a"), example("b")]);
    }

    #[test]
    fn restrict_languages_prefers_listed_language() {
        let mut g = OntGraph::new();
        let p = example("label");
        g.insert(example("s"), p.clone(), Term::Literal(Literal::lang("Haus", "de")));
        g.insert(example("s"), p.clone(), Term::Literal(Literal::lang("house", "en")));
        g.insert(example("s"), p.clone(), Term::Literal(Literal::new("untagged")));

        g.restrict_languages(&["en".to_string()]);

        let objects = g.objects(&example("s"), "http://example.org/label");
        assert_eq!(objects.len(), 2);
        assert!(objects.contains(&Term::Literal(Literal::lang("house", "en"))));
        assert!(objects.contains(&Term::Literal(Literal::new("untagged"))));
    }

    #[test]
    fn restrict_languages_falls_back_to_smallest_tag() {
        let mut g = OntGraph::new();
        let p = example("label");
        g.insert(example("s"), p.clone(), Term::Literal(Literal::lang("maison", "fr")));
        g.insert(example("s"), p.clone(), Term::Literal(Literal::lang("Haus", "de")));

        g.restrict_languages(&[]);

        let objects = g.objects(&example("s"), "http://example.org/label");
        assert_eq!(objects, vec![Term::Literal(Literal::lang("Haus", "de"))]);
    }

    #[test]
    fn restrict_languages_is_idempotent() {
        let mut once = OntGraph::new();
        let p = example("label");
        once.insert(example("s"), p.clone(), Term::Literal(Literal::lang("a", "en")));
        once.insert(example("s"), p.clone(), Term::Literal(Literal::lang("b", "de")));
        once.insert(example("t"), p.clone(), Term::Literal(Literal::new("plain")));

        let prefs = vec!["en".to_string()];
        once.restrict_languages(&prefs);
        let mut twice = once.clone();
        twice.restrict_languages(&prefs);

        let left: Vec<_> = once.triples().cloned().collect();
        let right: Vec<_> = twice.triples().cloned().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn rewrite_literals_preserves_language_and_datatype() {
        let mut g = OntGraph::new();
        g.insert(
            example("s"),
            example("p"),
            Term::Literal(Literal::lang("<script>x</script>", "en")),
        );
        g.rewrite_literals(|lit| Some(lit.lexical.replace("<script>", "")));

        let objects = g.objects(&example("s"), "http://example.org/p");
        let Term::Literal(lit) = &objects[0] else {
            panic!("expected a literal");
        };
        assert_eq!(lit.lexical, "x</script>");
        assert_eq!(lit.language.as_deref(), Some("en"));
    }

    #[test]
    fn subject_object_map_filters_and_orders() {
        let mut g = OntGraph::new();
        g.insert(example("s"), Term::iri(vocab::RDF_TYPE), example("B"));
        g.insert(example("s"), Term::iri(vocab::RDF_TYPE), example("A"));
        g.insert(
            example("s"),
            Term::iri(vocab::RDF_TYPE),
            Term::Literal(Literal::new("not this")),
        );

        let map = subject_object_map(&g, &[vocab::RDF_TYPE], ObjectFilter::Iris);
        assert_eq!(
            map.get("http://example.org/s").unwrap(),
            &vec![example("B"), example("A")]
        );
    }
}
