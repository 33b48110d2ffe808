// rewrite.rs
use std::io;

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, serialize};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};
use tracing::{debug, warn};
use url::Url;

use crate::html_parser;

/// Attributes stripped from images so the browser cannot pick a
/// resolution other than the rewritten `src`.
const RESPONSIVE_HINTS: [&str; 2] = ["srcset", "sizes"];

/// Rewrites the URL-bearing attributes of `html` to absolute form against `base`
/// and returns the markup of the whole `<html>` element.
///
/// Best effort: if the document cannot be serialized the input is returned unchanged.
pub fn rewrite(html: &str, base: &Url) -> String {
    let dom = html_parser::parse_dom(html);
    let Some(root) = html_parser::document_element(&dom) else {
        warn!("serving {} unmodified: no document element", base);
        return html.to_string();
    };
    rewrite_tree(&root, base);
    outer_html(&root).unwrap_or_else(|e| {
        warn!("serving {} unmodified: {}", base, e);
        html.to_string()
    })
}

fn rewrite_tree(root: &Handle, base: &Url) {
    let mut pending = vec![root.clone()];
    while let Some(node) = pending.pop() {
        if let NodeData::Element { name, attrs, .. } = &node.data {
            let mut attrs = attrs.borrow_mut();
            let attribute = match &*name.local {
                "a" | "link" => Some("href"),
                "img" => {
                    attrs.retain(|attr| !RESPONSIVE_HINTS.contains(&&*attr.name.local));
                    Some("src")
                }
                "script" => Some("src"),
                _ => None,
            };
            if let Some(attribute) = attribute {
                absolutize(&mut attrs, attribute, base);
            }
        }
        pending.extend(node.children.borrow().iter().cloned());
    }
}

/// Resolves a single attribute in place when it holds a relative reference.
fn absolutize(attrs: &mut [Attribute], attribute: &str, base: &Url) {
    let Some(attr) = attrs
        .iter_mut()
        .find(|attr| &*attr.name.local == attribute)
    else {
        return;
    };
    let value = attr.value.trim().to_string();
    if value.is_empty() || is_data_uri(&value) || Url::parse(&value).is_ok() {
        return;
    }
    match base.join(&value) {
        Ok(absolute) => {
            debug!("{} -> {}", value, absolute);
            attr.value = StrTendril::from_slice(absolute.as_str());
        }
        Err(e) => warn!("failed to resolve {:?} against {}: {}", value, base, e),
    }
}

fn outer_html(root: &Handle) -> io::Result<String> {
    let mut bytes = Vec::new();
    serialize(
        &mut bytes,
        &SerializableHandle::from(root.clone()),
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn is_data_uri(value: &str) -> bool {
    value
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}
