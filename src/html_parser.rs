// html_parser.rs
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document as parse_html};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::dom::{HtmlNode, HtmlTag};

/// Deepest element nesting carried into the render tree.
pub const MAX_DEPTH: usize = 256;

/// Parses markup the way a browser does: implied end tags, entity
/// decoding and the `html > head, body` skeleton are all applied.
pub fn parse_dom(input: &str) -> RcDom {
    parse_html(RcDom::default(), ParseOpts::default()).one(input)
}

/// The `<html>` element of a parsed document.
pub fn document_element(dom: &RcDom) -> Option<Handle> {
    dom.document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
}

/// Parse an HTML string into an `html > head, body` tree, discarding comments and doctype.
///
/// Text and attribute values come out entity-decoded. Elements nested more
/// than [`MAX_DEPTH`] levels deep are dropped.
pub fn parse_document(input: &str) -> HtmlNode {
    let dom = parse_dom(input);
    document_element(&dom)
        .and_then(|root| convert(&root, 0))
        .unwrap_or_else(|| {
            HtmlNode::new_element(
                HtmlTag::Html,
                Vec::new(),
                vec![
                    HtmlNode::new_element(HtmlTag::Head, Vec::new(), Vec::new()),
                    HtmlNode::new_element(HtmlTag::Body, Vec::new(), Vec::new()),
                ],
            )
        })
}

fn convert(handle: &Handle, depth: usize) -> Option<HtmlNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(HtmlNode::new_text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            if depth > MAX_DEPTH {
                debug!("dropping <{}> nested {} levels deep", name.local, depth);
                return None;
            }
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = handle
                .children
                .borrow()
                .iter()
                .filter_map(|child| convert(child, depth + 1))
                .collect();
            Some(HtmlNode::new_element(
                HtmlTag::from_name(&name.local),
                attributes,
                children,
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeType;
    use pretty_assertions::assert_eq;

    fn tags(node: &HtmlNode) -> Vec<&str> {
        node.children
            .iter()
            .filter_map(|child| child.tag().map(HtmlTag::name))
            .collect()
    }

    #[test]
    fn test_parses_full_document() {
        let html = "<!DOCTYPE html><html><head><title>Hi</title></head>\
                    <body><p class=\"intro\">Hello <b>world</b></p><!-- note --></body></html>";
        let root = parse_document(html);
        assert!(root.is_tag(&HtmlTag::Html));
        assert_eq!(tags(&root), ["head", "body"]);

        let body = root.get_body().expect("body");
        assert_eq!(body.children.len(), 1);
        let p = &body.children[0];
        assert_eq!(p.attr("class"), Some("intro"));
        assert_eq!(p.text_content(), "Hello world");
    }

    #[test]
    fn test_fragment_gets_head_and_body() {
        let root = parse_document("<link rel=stylesheet href=a.css><p>text</p>");
        assert_eq!(tags(root.get_head().expect("head")), ["link"]);
        assert_eq!(tags(root.get_body().expect("body")), ["p"]);
    }

    #[test]
    fn test_plain_text_lands_in_body() {
        let root = parse_document("just text");
        assert_eq!(root.get_body().expect("body").text_content(), "just text");
        assert!(parse_document("").get_body().is_some());
    }

    #[test]
    fn test_script_content_is_not_parsed() {
        let root = parse_document("<script>if (a < b) { x = '<b>'; }</script><p>x</p>");
        let script = root.find_first(&HtmlTag::Script).expect("script");
        assert_eq!(script.text_content(), "if (a < b) { x = '<b>'; }");
    }

    #[test]
    fn test_implied_end_tags_keep_siblings_flat() {
        let root = parse_document("<ul><li>one<li>two</ul><p>a<p>b");
        let body = root.get_body().expect("body");
        assert_eq!(tags(body), ["ul", "p", "p"]);
        assert_eq!(tags(&body.children[0]), ["li", "li"]);
    }

    #[test]
    fn test_many_unclosed_options_stay_shallow() {
        let html = format!("<select>{}</select><img src=\"/logo.png\">", "<option>x".repeat(300));
        let root = parse_document(&html);
        let select = root.find_first(&HtmlTag::Custom("select".to_string())).expect("select");
        assert_eq!(select.children.len(), 300);
        assert!(root.find_first(&HtmlTag::Img).is_some());
    }

    #[test]
    fn test_entities_are_decoded() {
        let root = parse_document("<p title=\"a &amp; b\">Tom &amp; Jerry&nbsp;1 &lt; 2</p>");
        let p = root.find_first(&HtmlTag::P).expect("p");
        assert_eq!(p.attr("title"), Some("a & b"));
        assert_eq!(p.text_content(), "Tom & Jerry\u{a0}1 < 2");
    }

    #[test]
    fn test_excessive_nesting_is_cut_off() {
        let html = "<div>".repeat(MAX_DEPTH + 10);
        let root = parse_document(&html);
        let mut depth = 0;
        let mut node = &root;
        while let Some(child) = node
            .children
            .iter()
            .find(|c| matches!(c.node_type, NodeType::Element(_)) && !c.is_tag(&HtmlTag::Head))
        {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, MAX_DEPTH);
    }
}
