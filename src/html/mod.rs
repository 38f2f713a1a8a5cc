//! A minimal typed HTML tree.
//!
//! Three node kinds: escaped text, raw (unescaped) markup, and elements.
//! Rendering is a streaming pre-order walk; text content is HTML-escaped,
//! raw content is emitted verbatim. Void elements render without a close
//! tag.

/// Tags that never take children and render without a close tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// A node in the HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Escaped text content.
    Text(String),
    /// Unescaped markup, emitted verbatim.
    Raw(String),
    Element(Element),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        Node::Raw(markup.into())
    }

    /// Render this node into an HTML string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Raw(markup) => out.push_str(markup),
            Node::Element(element) => element.write(out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// An HTML element with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(String, Option<String>)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute with a value.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), Some(value.into())));
        self
    }

    /// Set a value-less (boolean) attribute.
    pub fn flag(mut self, name: &str) -> Self {
        self.attributes.push((name.to_string(), None));
        self
    }

    /// Set an attribute only when a value is present.
    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn child_opt(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::Text(content.into()))
    }

    pub fn render(&self) -> String {
        Node::Element(self.clone()).render()
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write(out);
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape attribute values (`&`, `<`, `>`, `"`).
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Join nodes with a separator node between consecutive entries.
pub fn intersperse(nodes: Vec<Node>, separator: Node) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() * 2);
    for node in nodes {
        if !out.is_empty() {
            out.push(separator.clone());
        }
        out.push(node);
    }
    out
}

macro_rules! elements {
    ($($name:ident => $tag:literal),* $(,)?) => {
        $(
            pub fn $name() -> Element {
                Element::new($tag)
            }
        )*
    };
}

elements! {
    html => "html",
    head => "head",
    title => "title",
    style => "style",
    meta => "meta",
    script => "script",
    body => "body",
    div => "div",
    section => "section",
    span => "span",
    a => "a",
    h1 => "h1",
    h2 => "h2",
    h3 => "h3",
    h4 => "h4",
    p => "p",
    pre => "pre",
    code => "code",
    em => "em",
    strong => "strong",
    sup => "sup",
    br => "br",
    ul => "ul",
    li => "li",
    dl => "dl",
    dt => "dt",
    dd => "dd",
    table => "table",
    tr => "tr",
    th => "th",
    td => "td",
    fieldset => "fieldset",
    legend => "legend",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements() {
        let node = div()
            .id("content")
            .child(span().text("hello"))
            .child(span().text("world"));
        assert_eq!(
            node.render(),
            r#"<div id="content"><span>hello</span><span>world</span></div>"#
        );
    }

    #[test]
    fn escapes_text_content() {
        let node = p().text("a < b & c > d");
        assert_eq!(node.render(), "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn escapes_attribute_values() {
        let node = a().attr("href", r#"http://example.org/?q="x"&y=1"#).text("x");
        assert_eq!(
            node.render(),
            r#"<a href="http://example.org/?q=&quot;x&quot;&amp;y=1">x</a>"#
        );
    }

    #[test]
    fn raw_content_is_not_escaped() {
        let node = div().child(Node::raw("<b>bold</b>"));
        assert_eq!(node.render(), "<div><b>bold</b></div>");
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        assert_eq!(br().render(), "<br>");
        let node = meta().attr("charset", "utf-8");
        assert_eq!(node.render(), r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn flag_attributes_have_no_value() {
        let node = Element::new("option").flag("selected").text("x");
        assert_eq!(node.render(), "<option selected>x</option>");
    }

    #[test]
    fn attr_opt_skips_none() {
        let node = a().attr_opt("title", None::<String>).text("x");
        assert_eq!(node.render(), "<a>x</a>");
    }

    #[test]
    fn intersperse_separates() {
        let joined = intersperse(
            vec![Node::text("a"), Node::text("b"), Node::text("c")],
            Node::text(", "),
        );
        let out: String = joined.iter().map(Node::render).collect();
        assert_eq!(out, "a, b, c");
    }

    #[test]
    fn intersperse_of_single_node_adds_nothing() {
        let joined = intersperse(vec![Node::text("a")], Node::text(","));
        assert_eq!(joined.len(), 1);
    }
}
