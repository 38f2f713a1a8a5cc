//! Tagged representations of the RDF nodes a property can point at.
//!
//! References between resources are plain IRIs resolved through the
//! owning [`super::Ontology`] at render time.

use crate::graph::Literal;
use crate::html::{Node, a, br, code, div, em, intersperse, li, pre, span, sup, ul};

use super::context::{RenderContext, RenderError};

/// An ordered sequence of extracted resources, rendered as-is when
/// singular and as a list otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RdfResources {
    pub resources: Vec<Resource>,
}

impl RdfResources {
    pub fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        match self.resources.as_slice() {
            [] => Ok(Node::text("")),
            [single] => single.to_html(ctx),
            many => {
                let mut list = ul();
                for resource in many {
                    list = list.child(li().child(resource.to_html(ctx)?));
                }
                Ok(list.into())
            }
        }
    }
}

/// How a single RDF node is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Literal(LiteralResource),
    Reference(ResourceReference),
    Agent(AgentResource),
    Restriction(RestrictionResource),
    SetClass(SetClassResource),
    Blank(BlankNodeResource),
}

impl Resource {
    pub fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        match self {
            Resource::Literal(literal) => Ok(literal.to_html(ctx)),
            Resource::Reference(reference) => reference.to_html(ctx),
            Resource::Agent(agent) => Ok(agent.to_html(ctx)),
            Resource::Restriction(restriction) => restriction.to_html(ctx),
            Resource::SetClass(set) => set.to_html(ctx),
            Resource::Blank(blank) => Ok(blank.to_html()),
        }
    }
}

/// A literal object node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralResource {
    /// `skos:example` values render preformatted instead of as content.
    pub is_example: bool,
    pub literal: Literal,
}

impl LiteralResource {
    fn to_html(&self, ctx: &RenderContext) -> Node {
        if self.is_example {
            return pre().text(&self.literal.lexical).into();
        }
        ctx.render_content(&self.literal)
    }
}

/// Reference to a resource by IRI; resolves to an in-document fragment
/// when the ontology defines the target, an external link otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub iri: String,
    /// Shown when the target is not defined locally.
    pub title: Literal,
}

impl ResourceReference {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let Some(definiendum) = ctx.ontology().definiendum(&self.iri) else {
            return Ok(a()
                .attr("href", &self.iri)
                .attr("target", "_blank")
                .attr("rel", "noreferrer noopener")
                .text(&self.title.lexical)
                .into());
        };

        let kind = definiendum.kind;
        let fragment = ctx.fragment(&self.iri)?;
        let short = ctx.format_iri(&self.iri);
        Ok(div()
            .class("resource-ref")
            .child(
                a().attr("title", &self.iri)
                    .attr("href", format!("#{fragment}"))
                    .child(code().text(short)),
            )
            .child(
                sup()
                    .class(format!("sup-{}", kind.abbrev()))
                    .attr("title", kind.inline_title())
                    .text(kind.abbrev()),
            )
            .into())
    }
}

/// An agent (creator, contributor, publisher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResource {
    /// The IRI or blank-node label of the agent node, shown when no
    /// name is known.
    pub node: String,
    pub names: Vec<Literal>,
    pub prefixes: Vec<Literal>,
    pub identifiers: Vec<String>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub affiliations: Vec<Affiliation>,
}

impl AgentResource {
    fn to_html(&self, _ctx: &RenderContext) -> Node {
        if self.names.is_empty() {
            return span().text(&self.node).into();
        }

        let mut agent = span();

        let name_spans: Vec<Node> = partition_by_language(
            self.prefixes.iter().chain(self.names.iter()),
        )
        .into_iter()
        .map(|(language, literals)| {
            let mut name = span().attr_opt("lang", language);
            for literal in literals {
                name = name.text(&literal.lexical);
            }
            name.into()
        })
        .collect();

        let name_nodes = intersperse(name_spans, br().into());
        if let Some(url) = self.urls.first() {
            agent = agent.child(
                a().attr("href", url)
                    .attr("target", "_blank")
                    .attr("rel", "noreferrer noopener")
                    .children(name_nodes),
            );
        } else {
            agent = agent.children(name_nodes);
        }

        for identifier in &self.identifiers {
            agent = agent.child(a().attr("href", identifier).child(pre().text(identifier)));
        }

        if !self.emails.is_empty() {
            let links: Vec<Node> = self
                .emails
                .iter()
                .map(|email| {
                    let address = email.trim_start_matches("mailto:");
                    a().attr("href", format!("mailto:{address}")).text(address).into()
                })
                .collect();
            agent = agent.text("(");
            agent = agent.children(intersperse(links, Node::text(",")));
            agent = agent.text(")");
        }

        for affiliation in &self.affiliations {
            agent = agent.child(affiliation.to_html());
        }

        agent.into()
    }
}

/// Affiliation of an agent; only name and url are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affiliation {
    pub names: Vec<Literal>,
    pub urls: Vec<String>,
}

impl Affiliation {
    fn to_html(&self) -> Node {
        let url = self.urls.first();

        if self.names.is_empty() {
            return match url {
                Some(url) => span()
                    .child(em().text(" of ").child(a().attr("href", url).text(url)))
                    .into(),
                None => span().into(),
            };
        }

        let mut out = span();
        for (language, names) in partition_by_language(self.names.iter()) {
            let linked: Vec<Node> = names
                .into_iter()
                .map(|name| match url {
                    Some(url) => a().attr("href", url).text(&name.lexical).into(),
                    None => Node::text(&name.lexical),
                })
                .collect();
            out = out.child(
                em().text(" of ").child(
                    span()
                        .attr_opt("lang", language)
                        .children(intersperse(linked, Node::text(","))),
                ),
            );
        }
        out.into()
    }
}

/// An `owl:Restriction` blank node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionResource {
    pub properties: Vec<ResourceReference>,
    pub cardinalities: Vec<Cardinality>,
}

impl RestrictionResource {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        if self.properties.is_empty() && self.cardinalities.is_empty() {
            return Ok(Node::text("None"));
        }

        let mut out = span();
        for property in &self.properties {
            out = out.child(property.to_html(ctx)?);
        }
        for cardinality in &self.cardinalities {
            out = out.child(cardinality.to_html(ctx)?);
        }
        if !self.properties.is_empty() && !self.cardinalities.is_empty() {
            out = out.child(br());
        }
        Ok(out.into())
    }
}

/// A union or intersection class expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetClassKind {
    Union,
    Intersection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClassResource {
    pub kind: Option<SetClassKind>,
    pub resources: Vec<Resource>,
}

impl SetClassResource {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let joining_word = match self.kind {
            Some(SetClassKind::Union) => "or",
            Some(SetClassKind::Intersection) => "and",
            None => ",",
        };

        let mut rendered = Vec::with_capacity(self.resources.len());
        for resource in &self.resources {
            rendered.push(resource.to_html(ctx)?);
        }
        let joined = intersperse(rendered, span().class("cardinality").text(joining_word).into());
        Ok(span().children(joined).into())
    }
}

/// A blank node of no recognized shape; rendered by label as a last
/// resort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankNodeResource {
    pub id: String,
}

impl BlankNodeResource {
    fn to_html(&self) -> Node {
        pre().text(&self.id).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericBound {
    Min,
    Max,
    Exactly,
}

impl NumericBound {
    pub fn label(self) -> &'static str {
        match self {
            NumericBound::Min => "min",
            NumericBound::Max => "max",
            NumericBound::Exactly => "exactly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceBound {
    Only,
    Some,
    Value,
    Union,
    Intersection,
}

impl ReferenceBound {
    pub fn label(self) -> &'static str {
        match self {
            ReferenceBound::Only => "only",
            ReferenceBound::Some => "some",
            ReferenceBound::Value => "value",
            ReferenceBound::Union => "union",
            ReferenceBound::Intersection => "intersection",
        }
    }
}

/// A cardinality clause inside a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cardinality {
    Numeric { bound: NumericBound, value: String },
    Reference { bound: ReferenceBound, target: ResourceReference },
}

impl Cardinality {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        match self {
            Cardinality::Numeric { bound, value } => Ok(span()
                .child(span().class("cardinality").text(bound.label()))
                .child(span().text(value))
                .into()),
            Cardinality::Reference { bound, target } => Ok(span()
                .child(span().class("cardinality").text(bound.label()))
                .child(span().child(target.to_html(ctx)?))
                .into()),
        }
    }
}

/// Group literals by language tag, preserving encounter order both
/// across and within groups.
fn partition_by_language<'a>(
    literals: impl Iterator<Item = &'a Literal>,
) -> Vec<(Option<String>, Vec<&'a Literal>)> {
    let mut groups: Vec<(Option<String>, Vec<&'a Literal>)> = Vec::new();
    for literal in literals {
        match groups.iter_mut().find(|(lang, _)| *lang == literal.language) {
            Some((_, members)) => members.push(literal),
            None => groups.push((literal.language.clone(), vec![literal])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definiendum, Ontology, OntologyDefinienda, TypeDefinienda};
    use crate::vocab::IndexedProperty;

    fn ontology_with_thing() -> Ontology {
        Ontology::new(
            String::new(),
            OntologyDefinienda {
                iri: "http://example.org/o".to_string(),
                titles: Vec::new(),
                properties: Vec::new(),
            },
            vec![TypeDefinienda {
                kind: IndexedProperty::Class,
                definienda: vec![Definiendum {
                    iri: "http://example.org/o/Thing".to_string(),
                    kind: IndexedProperty::Class,
                    properties: Vec::new(),
                }],
            }],
            vec![("ex".to_string(), "http://example.org/".to_string())],
        )
    }

    #[test]
    fn local_reference_links_to_fragment() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let reference = ResourceReference {
            iri: "http://example.org/o/Thing".to_string(),
            title: Literal::new("Thing"),
        };
        let html = reference.to_html(&mut ctx).unwrap().render();
        assert!(html.contains(r##"href="#Thing""##));
        assert!(html.contains("sup-c"));
    }

    #[test]
    fn external_reference_opens_new_tab() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let reference = ResourceReference {
            iri: "http://elsewhere.example/X".to_string(),
            title: Literal::new("X elsewhere"),
        };
        let html = reference.to_html(&mut ctx).unwrap().render();
        assert!(html.contains(r#"href="http://elsewhere.example/X""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("X elsewhere"));
    }

    #[test]
    fn example_literals_render_preformatted() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let resource = Resource::Literal(LiteralResource {
            is_example: true,
            literal: Literal::new("ex:Thing a owl:Class ."),
        });
        let html = resource.to_html(&mut ctx).unwrap().render();
        assert!(html.starts_with("<pre>"));
    }

    #[test]
    fn nameless_agent_renders_node_label() {
        let ontology = ontology_with_thing();
        let ctx = RenderContext::new(&ontology);
        let agent = AgentResource {
            node: "http://orcid.org/0000-0001".to_string(),
            names: Vec::new(),
            prefixes: Vec::new(),
            identifiers: Vec::new(),
            urls: Vec::new(),
            emails: Vec::new(),
            affiliations: Vec::new(),
        };
        let html = agent.to_html(&ctx).render();
        assert_eq!(html, "<span>http://orcid.org/0000-0001</span>");
    }

    #[test]
    fn agent_with_name_and_email_links_both() {
        let ontology = ontology_with_thing();
        let ctx = RenderContext::new(&ontology);
        let agent = AgentResource {
            node: "_:b0".to_string(),
            names: vec![Literal::new("Ada Lovelace")],
            prefixes: Vec::new(),
            identifiers: Vec::new(),
            urls: vec!["http://example.org/ada".to_string()],
            emails: vec!["mailto:ada@example.org".to_string()],
            affiliations: Vec::new(),
        };
        let html = agent.to_html(&ctx).render();
        assert!(html.contains(r#"href="http://example.org/ada""#));
        assert!(html.contains(r#"href="mailto:ada@example.org""#));
        assert!(html.contains("Ada Lovelace"));
    }

    #[test]
    fn empty_restriction_renders_none() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let restriction = RestrictionResource {
            properties: Vec::new(),
            cardinalities: Vec::new(),
        };
        assert_eq!(restriction.to_html(&mut ctx).unwrap().render(), "None");
    }

    #[test]
    fn union_set_class_joins_with_or() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let set = SetClassResource {
            kind: Some(SetClassKind::Union),
            resources: vec![
                Resource::Reference(ResourceReference {
                    iri: "http://elsewhere.example/A".to_string(),
                    title: Literal::new("A"),
                }),
                Resource::Reference(ResourceReference {
                    iri: "http://elsewhere.example/B".to_string(),
                    title: Literal::new("B"),
                }),
            ],
        };
        let html = set.to_html(&mut ctx).unwrap().render();
        assert!(html.contains(">or</span>"));
    }

    #[test]
    fn multiple_resources_render_as_list() {
        let ontology = ontology_with_thing();
        let mut ctx = RenderContext::new(&ontology);
        let resources = RdfResources {
            resources: vec![
                Resource::Blank(BlankNodeResource { id: "b0".to_string() }),
                Resource::Blank(BlankNodeResource { id: "b1".to_string() }),
            ],
        };
        let html = resources.to_html(&mut ctx).unwrap().render();
        assert!(html.starts_with("<ul>"));
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn partition_by_language_preserves_order() {
        let en1 = Literal::lang("one", "en");
        let de = Literal::lang("eins", "de");
        let en2 = Literal::lang("two", "en");
        let groups = partition_by_language(vec![&en1, &de, &en2].into_iter());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.as_deref(), Some("en"));
        assert_eq!(groups[0].1.len(), 2);
    }
}
