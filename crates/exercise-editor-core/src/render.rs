//! Rendering of exercise trees to markup.
//!
//! The renderer produces a small element tree rather than writing to a
//! platform directly, so the browser layer can build real DOM nodes from it
//! and tests can inspect it natively. Every container that stands for a tree
//! position carries `data-path`; containers for tagged nodes also carry
//! `data-type`. Those two attributes are the only link between the DOM and the
//! document model.

use std::convert::Infallible;
use std::fmt;

use markdown_weaver_escape::{StrWrite, escape_html};
use smol_str::SmolStr;

use crate::node::{Node, NodeKind};
use crate::path::{ANSWER, Path, SOLUTIONS, TITLE};

/// Attribute holding the JSON-serialized path of an element.
pub const DATA_PATH: &str = "data-path";
/// Attribute holding the node discriminant of an element.
pub const DATA_TYPE: &str = "data-type";

/// Rendered output: an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(MarkupElement),
    Text(String),
}

/// A rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub tag: SmolStr,
    pub attributes: Vec<(SmolStr, String)>,
    pub children: Vec<Markup>,
    /// Structured form of the `data-path` attribute, when present.
    pub path: Option<Path>,
    /// Discriminant written to `data-type`, when present.
    pub kind: Option<NodeKind>,
}

impl MarkupElement {
    fn new(tag: &str) -> Self {
        Self {
            tag: SmolStr::new(tag),
            attributes: Vec::new(),
            children: Vec::new(),
            path: None,
            kind: None,
        }
    }

    fn with_path(mut self, path: &Path) -> Self {
        self.attributes
            .push((SmolStr::new_static(DATA_PATH), path.to_attribute()));
        self.path = Some(path.clone());
        self
    }

    fn with_kind(mut self, kind: NodeKind) -> Self {
        self.attributes
            .push((SmolStr::new_static(DATA_TYPE), kind.as_str().to_string()));
        self.kind = Some(kind);
        self
    }

    fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((SmolStr::new(name), value.into()));
        self
    }

    fn with_child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn is_void(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "br" | "hr" | "img")
    }
}

fn collect_text(children: &[Markup], out: &mut String) {
    for child in children {
        match child {
            Markup::Text(text) => out.push_str(text),
            Markup::Element(el) => collect_text(&el.children, out),
        }
    }
}

impl Markup {
    pub fn as_element(&self) -> Option<&MarkupElement> {
        match self {
            Markup::Element(el) => Some(el),
            Markup::Text(_) => None,
        }
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut writer = HtmlWriter::default();
        let Ok(()) = writer.write_markup(self);
        writer.out
    }

    /// All path-tagged elements in document order.
    pub fn tagged_elements(&self) -> Vec<(&Path, &MarkupElement)> {
        let mut out = Vec::new();
        self.walk(&mut |el| {
            if let Some(path) = el.path.as_ref() {
                out.push((path, el));
            }
        });
        out
    }

    /// Visit every element in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MarkupElement)) {
        if let Markup::Element(el) = self {
            visit(el);
            for child in &el.children {
                child.walk(visit);
            }
        }
    }

    /// The element whose `data-path` equals `path`.
    pub fn find_path(&self, path: &Path) -> Option<&MarkupElement> {
        self.tagged_elements()
            .into_iter()
            .find(|(p, _)| *p == path)
            .map(|(_, el)| el)
    }
}

#[derive(Default)]
struct HtmlWriter {
    out: String,
}

/// Writes into a `String`, which cannot fail.
impl StrWrite for HtmlWriter {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.out.push_str(s);
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Infallible> {
        self.out.push_str(&fmt::format(args));
        Ok(())
    }
}

impl HtmlWriter {
    fn write_markup(&mut self, markup: &Markup) -> Result<(), Infallible> {
        match markup {
            Markup::Text(text) => escape_html(&mut *self, text),
            Markup::Element(el) => {
                self.out.push('<');
                self.out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    self.out.push(' ');
                    self.out.push_str(name);
                    self.out.push_str("=\"");
                    escape_html(&mut *self, value)?;
                    self.out.push('"');
                }
                self.out.push('>');
                if el.is_void() {
                    return Ok(());
                }
                for child in &el.children {
                    self.write_markup(child)?;
                }
                self.out.push_str("</");
                self.out.push_str(&el.tag);
                self.out.push('>');
                Ok(())
            }
        }
    }
}

/// Render `node`, located at `path`, to markup.
pub fn render(node: &Node, path: &Path) -> Markup {
    let element = match node {
        Node::Exercise { title, solutions } => {
            let heading = MarkupElement::new("h2").with_child(render(title, &path.child(TITLE)));

            let solutions_path = path.child(SOLUTIONS);
            let list = solutions.iter().enumerate().fold(
                MarkupElement::new("ol").with_path(&solutions_path),
                |list, (index, solution)| {
                    list.with_child(render(solution, &solutions_path.child(index)))
                },
            );

            MarkupElement::new("div")
                .with_path(path)
                .with_kind(NodeKind::Exercise)
                .with_child(Markup::Element(heading))
                .with_child(Markup::Element(list))
        }
        Node::Solution { answer, correct } => {
            let mut checkbox = MarkupElement::new("input")
                .with_attribute("type", "checkbox")
                .with_attribute("contenteditable", "false");
            if *correct {
                checkbox = checkbox.with_attribute("checked", "");
            }

            MarkupElement::new("li")
                .with_path(path)
                .with_kind(NodeKind::Solution)
                .with_child(Markup::Element(checkbox))
                .with_child(render(answer, &path.child(ANSWER)))
        }
        Node::Text { value } => MarkupElement::new("span")
            .with_path(path)
            .with_kind(NodeKind::Text)
            .with_child(Markup::Text(value.clone())),
    };
    Markup::Element(element)
}

/// Render a whole document from its root.
pub fn render_document(root: &Node) -> Markup {
    render(root, &Path::root())
}


#[cfg(test)]
mod proptests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::lens;

    proptest! {
        #[test]
        fn every_tagged_path_resolves_to_its_node(
            title in "\\PC{0,8}",
            answers in prop::collection::vec(("\\PC{0,8}", any::<bool>()), 0..6),
        ) {
            let count = answers.len();
            let root = Arc::new(Node::exercise(
                title,
                answers.into_iter().map(|(a, c)| Node::solution(a, c)),
            ));
            let markup = render_document(&root);
            let tagged = markup.tagged_elements();
            prop_assert_eq!(tagged.len(), 3 + 2 * count);

            for (path, element) in tagged {
                let focus = lens::get(&root, path.keys()).unwrap();
                match focus.node() {
                    Some(node) => {
                        prop_assert_eq!(Some(node.kind()), element.kind);
                        let rendered = render(node, path);
                        prop_assert_eq!(rendered.as_element(), Some(element));
                    }
                    None => {
                        prop_assert_eq!(focus.list().map(<[_]>::len), Some(count));
                        prop_assert_eq!(element.tag.as_str(), "ol");
                    }
                }
            }
        }
    }
}
