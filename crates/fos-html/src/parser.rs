//! HTML5 Parser implementation
//!
//! Uses html5ever's build-in RcDom and converts to our DOM format.

use fos_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    keep_whitespace: bool,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep whitespace-only text nodes when parsing whole documents
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_rcdom(html)?;
        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_children(&dom.document, &mut tree, root, self.keep_whitespace)?;

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(Document::from_tree(url, tree))
    }

    /// Parse a markup fragment into detached nodes owned by `doc`.
    ///
    /// The fragment is parsed as a document body; anything the tree
    /// builder hoists into `<head>` comes first, followed by the body
    /// content. Whitespace is preserved.
    pub fn parse_fragment(&self, doc: &Document, html: &str) -> Result<Vec<NodeId>, HtmlError> {
        let dom = parse_rcdom(html)?;
        let mut tree = doc.tree_mut();

        let mut nodes = Vec::new();
        for section in fragment_sections(&dom.document) {
            for child in section.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, &mut tree, true)? {
                    nodes.push(id);
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "parsed fragment");
        Ok(nodes)
    }

    fn convert_children(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
        keep_whitespace: bool,
    ) -> Result<(), HtmlError> {
        for child in handle.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree, keep_whitespace)? {
                tree.append_child(parent, id)?;
            }
        }
        Ok(())
    }

    /// Convert an RcDom node into a detached subtree
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        keep_whitespace: bool,
    ) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !keep_whitespace && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                let element = tree.element_mut(id)?;
                for attr in attrs.borrow().iter() {
                    element.set_attr(&attr.name.local, &attr.value);
                }
                self.convert_children(handle, tree, id, keep_whitespace)?;
                id
            }
            // No node kind for these
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };
        Ok(Some(id))
    }
}

fn parse_rcdom(html: &str) -> Result<RcDom, HtmlError> {
    Ok(parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?)
}

/// `<head>` and `<body>` of a parsed document, in that order
fn fragment_sections(document: &Handle) -> Vec<Handle> {
    let Some(html) = document
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "html"))
        .cloned()
    else {
        return Vec::new();
    };

    let children = html.children.borrow();
    ["head", "body"]
        .iter()
        .filter_map(|tag| children.iter().find(|child| is_element(child, tag)).cloned())
        .collect()
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        let title = doc.query_selector("head > title").unwrap().unwrap();
        assert_eq!(doc.text_content(title).unwrap(), "Test");
        let p = doc.query_selector("body > p").unwrap().unwrap();
        assert_eq!(doc.text_content(p).unwrap(), "Hello");
    }

    #[test]
    fn test_parse_wraps_fragments() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        assert!(doc.body().is_some());
        assert!(doc.query_selector("body > div > span").unwrap().is_some());
    }

    #[test]
    fn test_whitespace_only_text_dropped_by_default() {
        let html = "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>";
        let doc = HtmlParser::new().parse(html).unwrap();
        let ul = doc.query_selector("ul").unwrap().unwrap();
        assert_eq!(doc.children(ul).len(), 2);

        let doc = HtmlParser::new().keep_whitespace(true).parse(html).unwrap();
        let ul = doc.query_selector("ul").unwrap().unwrap();
        assert_eq!(doc.children(ul).len(), 5);
    }

    #[test]
    fn test_attributes_preserved() {
        let doc = HtmlParser::new()
            .parse(r#"<a href="/x" class="btn primary" data-user-id="7">go</a>"#)
            .unwrap();
        let a = doc.query_selector("a.btn.primary").unwrap().unwrap();
        assert_eq!(doc.attribute(a, "href").unwrap().as_deref(), Some("/x"));
        assert_eq!(doc.data(a, "userId").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_parse_fragment_nodes_are_detached() {
        let doc = Document::default();
        let nodes = HtmlParser::new()
            .parse_fragment(&doc, "<b>bold</b> and <i>italic</i>")
            .unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|&n| doc.parent(n).is_none()));
        assert_eq!(doc.text_content(nodes[1]).unwrap(), " and ");
    }
}
