//! The extracted ontology and its rendering into a complete HTML page.

use std::collections::HashMap;

use crate::graph::Literal;
use crate::html::{
    Node, a, body, code, dd, div, dl, dt, h1, h2, h3, h4, head, html, li, meta, script, section,
    span, style, sup, table, td, th, title, tr, ul,
};
use crate::vocab::{IndexedProperty, ONTOD_LEGEND, ONTOD_METADATA, ONTOD_NAMESPACES};

use super::context::{RenderContext, RenderError};
use super::meta::MetaProperty;
use super::resource::RdfResources;

/// Stylesheet embedded into every generated page.
const STYLE: &str = include_str!("../../assets/style.css");

/// A predicate together with the extracted values it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyResourcePair {
    pub prop: MetaProperty,
    pub resources: RdfResources,
}

impl PropertyResourcePair {
    fn to_table_row(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        Ok(tr()
            .child(th().child(self.prop.to_html()))
            .child(td().child(self.resources.to_html(ctx)?))
            .into())
    }
}

/// A term the ontology defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definiendum {
    pub iri: String,
    pub kind: IndexedProperty,
    pub properties: Vec<PropertyResourcePair>,
}

impl Definiendum {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let fragment = ctx.fragment(&self.iri)?;
        let short = ctx.format_iri(&self.iri);

        let mut properties = table().child(
            tr().child(th().text("IRI"))
                .child(td().child(code().text(&self.iri))),
        );
        for pair in &self.properties {
            properties = properties.child(pair.to_table_row(ctx)?);
        }

        Ok(div()
            .id(fragment)
            .class("property entity")
            .child(
                h3().child(span().child(code().text(short)))
                    .text(" ")
                    .child(
                        sup()
                            .class(format!("sup-{}", self.kind.abbrev()))
                            .attr("title", self.kind.inline_title())
                            .text(self.kind.abbrev()),
                    ),
            )
            .child(properties)
            .into())
    }
}

/// Metadata about the ontology as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyDefinienda {
    pub iri: String,
    pub titles: Vec<Literal>,
    pub properties: Vec<PropertyResourcePair>,
}

impl OntologyDefinienda {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let metadata_id = ctx.fragment_in("section", ONTOD_METADATA)?;

        let mut definitions = dl().child(
            div()
                .child(dt().child(crate::html::strong().text("IRI")))
                .child(dd().child(code().text(&self.iri))),
        );
        for pair in &self.properties {
            definitions = definitions.child(
                div()
                    .child(dt().child(pair.prop.to_html()))
                    .child(dd().child(pair.resources.to_html(ctx)?)),
            );
        }

        Ok(div()
            .id(metadata_id)
            .class("section metadata")
            .child(h1().text(&self.iri))
            .child(h2().text("Metadata"))
            .child(definitions)
            .into())
    }
}

/// All definienda of one kind, rendered as one page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinienda {
    pub kind: IndexedProperty,
    pub definienda: Vec<Definiendum>,
}

impl TypeDefinienda {
    fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let section_id = ctx.fragment_in("section", self.kind.iri())?;
        let mut out = section()
            .id(section_id)
            .class("section classes")
            .child(h2().text(self.kind.plural_title()));
        for definiendum in &self.definienda {
            out = out.child(definiendum.to_html(ctx)?);
        }
        Ok(out.into())
    }
}

/// Everything known about one extracted ontology.
#[derive(Debug, Clone)]
pub struct Ontology {
    /// schema.org projection of the metadata, as JSON-LD.
    pub schema_json: String,
    pub metadata: OntologyDefinienda,
    pub sections: Vec<TypeDefinienda>,
    /// (prefix, namespace) pairs actually used by the graph, ordered by
    /// prefix.
    pub namespaces: Vec<(String, String)>,
    by_iri: HashMap<String, (usize, usize)>,
}

impl Ontology {
    pub fn new(
        schema_json: String,
        metadata: OntologyDefinienda,
        sections: Vec<TypeDefinienda>,
        namespaces: Vec<(String, String)>,
    ) -> Self {
        let mut by_iri = HashMap::new();
        for (section_index, section) in sections.iter().enumerate() {
            for (index, definiendum) in section.definienda.iter().enumerate() {
                by_iri
                    .entry(definiendum.iri.clone())
                    .or_insert((section_index, index));
            }
        }
        Self {
            schema_json,
            metadata,
            sections,
            namespaces,
            by_iri,
        }
    }

    /// The first definiendum for an IRI, if the ontology defines it.
    pub fn definiendum(&self, iri: &str) -> Option<&Definiendum> {
        let (section, index) = self.by_iri.get(iri)?;
        Some(&self.sections[*section].definienda[*index])
    }

    /// Iterate all definienda in section order.
    pub fn iter(&self) -> impl Iterator<Item = &Definiendum> {
        self.sections.iter().flat_map(|s| s.definienda.iter())
    }

    /// Render the complete, self-contained documentation page.
    pub fn to_html(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let mut content = div().id("content").child(self.metadata.to_html(ctx)?);
        for section in &self.sections {
            content = content.child(section.to_html(ctx)?);
        }
        content = content
            .child_opt(self.namespaces_block(ctx)?)
            .child_opt(self.legend_block(ctx)?)
            .child(self.toc_block(ctx)?);

        Ok(html()
            .child(
                head()
                    .child(title().text(&self.metadata.iri))
                    .child(style().child(Node::raw(format!("\n{STYLE}\n"))))
                    .child(
                        meta()
                            .attr("http-equiv", "Content-Type")
                            .attr("content", "text/html; charset=utf-8"),
                    )
                    .child(
                        script()
                            .attr("type", "application/ld+json")
                            .id("schema.org")
                            .child(Node::raw(format!("\n{}\n", self.schema_json))),
                    ),
            )
            .child(body().child(content))
            .into())
    }

    fn namespaces_block(&self, ctx: &mut RenderContext) -> Result<Option<Node>, RenderError> {
        if self.namespaces.is_empty() {
            return Ok(None);
        }
        let namespace_id = ctx.fragment_in("section", ONTOD_NAMESPACES)?;

        let mut listing = dl();
        for (prefix, ns) in &self.namespaces {
            let shown = if prefix.is_empty() { ":" } else { prefix.as_str() };
            listing = listing
                .child(dt().text(shown))
                .child(dd().child(code().text(ns)));
        }

        Ok(Some(
            div()
                .id(namespace_id)
                .child(h2().text("Namespaces"))
                .child(listing)
                .into(),
        ))
    }

    fn legend_block(&self, ctx: &mut RenderContext) -> Result<Option<Node>, RenderError> {
        if self.sections.is_empty() {
            return Ok(None);
        }
        let legend_id = ctx.fragment_in("section", ONTOD_LEGEND)?;

        let mut rows = table().class("entity");
        for section in &self.sections {
            if section.definienda.is_empty() {
                continue;
            }
            rows = rows.child(
                tr().child(
                    td().child(
                        sup()
                            .class(format!("sup-{}", section.kind.abbrev()))
                            .attr("title", section.kind.inline_title())
                            .text(section.kind.abbrev()),
                    ),
                )
                .child(td().text(section.kind.plural_title())),
            );
        }

        Ok(Some(
            div()
                .class("legend")
                .child(h2().id(legend_id).text("Legend"))
                .child(rows)
                .into(),
        ))
    }

    fn toc_block(&self, ctx: &mut RenderContext) -> Result<Node, RenderError> {
        let metadata_id = ctx.fragment_in("section", ONTOD_METADATA)?;
        let mut entries = ul().class("first").child(
            li().child(h4().child(a().attr("href", format!("#{metadata_id}")).text("Metadata"))),
        );

        for section in &self.sections {
            if section.definienda.is_empty() {
                continue;
            }

            let mut listing = ul().class("second");
            for definiendum in &section.definienda {
                let fragment = ctx.fragment(&definiendum.iri)?;
                let short = ctx.format_iri(&definiendum.iri);
                listing = listing
                    .child(li().child(a().attr("href", format!("#{fragment}")).text(short)));
            }

            let section_id = ctx.fragment_in("section", section.kind.iri())?;
            entries = entries.child(
                li().child(
                    h4().child(
                        a().attr("href", format!("#{section_id}"))
                            .text(section.kind.plural_title()),
                    ),
                )
                .child(listing),
            );
        }

        if !self.namespaces.is_empty() {
            let namespace_id = ctx.fragment_in("section", ONTOD_NAMESPACES)?;
            entries = entries.child(
                li().child(
                    h4().child(a().attr("href", format!("#{namespace_id}")).text("Namespaces")),
                ),
            );
        }
        if !self.sections.is_empty() {
            let legend_id = ctx.fragment_in("section", ONTOD_LEGEND)?;
            entries = entries.child(
                li().child(h4().child(a().attr("href", format!("#{legend_id}")).text("Legend"))),
            );
        }

        Ok(div()
            .class("toc")
            .child(h3().text("Table of Contents"))
            .child(entries)
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RenderContext;

    fn sample() -> Ontology {
        Ontology::new(
            r#"{"@id": "http://example.org/o"}"#.to_string(),
            OntologyDefinienda {
                iri: "http://example.org/o".to_string(),
                titles: vec![Literal::new("Example Ontology")],
                properties: Vec::new(),
            },
            vec![TypeDefinienda {
                kind: IndexedProperty::Class,
                definienda: vec![
                    Definiendum {
                        iri: "http://example.org/o/Thing".to_string(),
                        kind: IndexedProperty::Class,
                        properties: Vec::new(),
                    },
                    Definiendum {
                        iri: "http://example.org/o/Other".to_string(),
                        kind: IndexedProperty::Class,
                        properties: Vec::new(),
                    },
                ],
            }],
            vec![("ex".to_string(), "http://example.org/".to_string())],
        )
    }

    #[test]
    fn definiendum_lookup_finds_terms() {
        let ontology = sample();
        assert!(ontology.definiendum("http://example.org/o/Thing").is_some());
        assert!(ontology.definiendum("http://example.org/o/Missing").is_none());
    }

    #[test]
    fn iter_walks_sections_in_order() {
        let ontology = sample();
        let iris: Vec<_> = ontology.iter().map(|d| d.iri.as_str()).collect();
        assert_eq!(
            iris,
            vec!["http://example.org/o/Thing", "http://example.org/o/Other"]
        );
    }

    #[test]
    fn page_contains_definition_blocks() {
        let ontology = sample();
        let mut ctx = RenderContext::new(&ontology);
        let page = ontology.to_html(&mut ctx).unwrap().render();

        assert!(page.starts_with("<html>"));
        assert!(page.contains("<title>http://example.org/o</title>"));
        assert!(page.contains(r#"id="Thing""#));
        assert!(page.contains(r#"id="Other""#));
        assert!(page.contains("Table of Contents"));
        assert!(page.contains("Legend"));
        assert!(page.contains("Namespaces"));
        assert!(page.contains(r#"<script type="application/ld+json" id="schema.org">"#));
    }

    #[test]
    fn page_fragments_match_context_fragments() {
        let ontology = sample();
        let mut ctx = RenderContext::new(&ontology);
        let page = ontology.to_html(&mut ctx).unwrap().render();

        for definiendum in ontology.iter() {
            let fragment = ctx.fragment(&definiendum.iri).unwrap();
            let needle = format!(r#"id="{fragment}""#);
            assert_eq!(page.matches(&needle).count(), 1, "{needle} not unique");
        }
    }

    #[test]
    fn empty_ontology_skips_optional_blocks() {
        let ontology = Ontology::new(
            String::new(),
            OntologyDefinienda {
                iri: "http://example.org/o".to_string(),
                titles: Vec::new(),
                properties: Vec::new(),
            },
            Vec::new(),
            Vec::new(),
        );
        let mut ctx = RenderContext::new(&ontology);
        let page = ontology.to_html(&mut ctx).unwrap().render();
        assert!(!page.contains("Legend"));
        assert!(!page.contains("Namespaces"));
    }
}
