//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, plus the serializer behind
//! `innerHTML`/`outerHTML`.

mod parser;
mod serializer;

use fos_dom::{Document, DomError, NodeId};

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

/// Parse an HTML document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Serialized children of `node`
pub fn inner_html(doc: &Document, node: NodeId) -> Result<String, HtmlError> {
    let tree = doc.tree();
    tree.node(node)?;
    Ok(HtmlSerializer::new().serialize_inner(&tree, node))
}

/// Serialized `node` including itself
pub fn outer_html(doc: &Document, node: NodeId) -> Result<String, HtmlError> {
    let tree = doc.tree();
    tree.node(node)?;
    Ok(HtmlSerializer::new().serialize_outer(&tree, node))
}

/// Replace the children of `node` with the parsed `html` fragment.
///
/// The fragment is parsed before anything is removed, so a rejected call
/// leaves the element untouched.
pub fn set_inner_html(doc: &Document, node: NodeId, html: &str) -> Result<(), HtmlError> {
    doc.tree().element(node)?;
    let nodes = HtmlParser::new().parse_fragment(doc, html)?;
    let mut tree = doc.tree_mut();
    tree.remove_children(node)?;
    for child in nodes {
        tree.append_child(node, child)?;
    }
    Ok(())
}

/// HTML layer errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}
