//! XHTML loading and output
//!
//! Builds a [`Document`] from well-formed XHTML and writes it back out.
//! Elements matching the configured [`MarkerSpec`] are read as marker
//! containers, so a document saved with highlights still resolves the same
//! paths as the original.

use std::fs;
use std::path::Path;

use crate::config::MarkerSpec;
use crate::dom::{Document, DocumentTree, NodeId, NodeKind};
use crate::error::Result;

/// Parse XHTML; the root element becomes the document root
pub fn parse(source: &str, marker: &MarkerSpec) -> Result<Document> {
    let xml = roxmltree::Document::parse(source)?;
    let root = xml.root_element();

    let mut doc = Document::with_root(element_kind(root));
    let doc_root = doc.root();
    append_children(&mut doc, doc_root, root, marker);
    Ok(doc)
}

/// Read and parse an XHTML file
pub fn read_file(path: impl AsRef<Path>, marker: &MarkerSpec) -> Result<Document> {
    let source = fs::read_to_string(path)?;
    parse(&source, marker)
}

fn element_kind(node: roxmltree::Node<'_, '_>) -> NodeKind {
    NodeKind::Element {
        tag: node.tag_name().name().to_string(),
        attributes: node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect(),
    }
}

fn append_children(
    doc: &mut Document,
    parent: NodeId,
    node: roxmltree::Node<'_, '_>,
    marker: &MarkerSpec,
) {
    for child in node.children() {
        if child.is_element() {
            let kind = if marker.matches(child.tag_name().name(), child.attribute("class")) {
                NodeKind::Marker
            } else {
                element_kind(child)
            };
            let id = doc.append(parent, kind);
            append_children(doc, id, child, marker);
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            doc.append_text(parent, text);
        }
    }
}

/// Write the document back out as XHTML
pub fn render(doc: &Document, marker: &MarkerSpec) -> String {
    let mut out = String::new();
    write_node(doc, doc.root(), marker, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, marker: &MarkerSpec, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
        NodeKind::Marker => {
            out.push_str(&format!(
                "<{} class=\"{}\">",
                marker.tag,
                html_escape::encode_double_quoted_attribute(&marker.class)
            ));
            for child in doc.children(node) {
                write_node(doc, child, marker, out);
            }
            out.push_str(&format!("</{}>", marker.tag));
        }
        NodeKind::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push_str(&format!(
                    " {}=\"{}\"",
                    name,
                    html_escape::encode_double_quoted_attribute(value)
                ));
            }

            let children = doc.children(node);
            if children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in children {
                write_node(doc, child, marker, out);
            }
            out.push_str(&format!("</{}>", tag));
        }
    }
}
