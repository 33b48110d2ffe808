// dom.rs

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlTag {
    Html,
    Head,
    Body,
    Title,
    Meta,
    Base,
    Link,
    Style,
    Script,
    Noscript,
    Template,
    Div,
    Span,
    P, // Paragraph
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Strong,
    Em,
    Small,
    Big,
    Code,
    Pre,
    Blockquote,
    B,  // bold
    U,  // Underline
    I,  // italic
    S,  // strike through
    Br, // breakline
    Hr, // horizontal ruler
    A,  // Anchor tag
    Img,
    Ul,
    Ol,
    Li,
    Custom(String), // for arbitrary tags, lowercased
}

impl HtmlTag {
    /// Matches a tag name (case-insensitive) to a known tag.
    pub fn from_name(name: &str) -> HtmlTag {
        match name.to_ascii_lowercase().as_str() {
            "html" => HtmlTag::Html,
            "head" => HtmlTag::Head,
            "body" => HtmlTag::Body,
            "title" => HtmlTag::Title,
            "meta" => HtmlTag::Meta,
            "base" => HtmlTag::Base,
            "link" => HtmlTag::Link,
            "style" => HtmlTag::Style,
            "script" => HtmlTag::Script,
            "noscript" => HtmlTag::Noscript,
            "template" => HtmlTag::Template,
            "div" => HtmlTag::Div,
            "span" => HtmlTag::Span,
            "p" => HtmlTag::P,
            "h1" => HtmlTag::H1,
            "h2" => HtmlTag::H2,
            "h3" => HtmlTag::H3,
            "h4" => HtmlTag::H4,
            "h5" => HtmlTag::H5,
            "h6" => HtmlTag::H6,
            "strong" => HtmlTag::Strong,
            "em" => HtmlTag::Em,
            "small" => HtmlTag::Small,
            "big" => HtmlTag::Big,
            "code" => HtmlTag::Code,
            "pre" => HtmlTag::Pre,
            "blockquote" => HtmlTag::Blockquote,
            "b" => HtmlTag::B,
            "u" => HtmlTag::U,
            "i" => HtmlTag::I,
            "s" => HtmlTag::S,
            "br" => HtmlTag::Br,
            "hr" => HtmlTag::Hr,
            "a" => HtmlTag::A,
            "img" => HtmlTag::Img,
            "ul" => HtmlTag::Ul,
            "ol" => HtmlTag::Ol,
            "li" => HtmlTag::Li,
            other => HtmlTag::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HtmlTag::Html => "html",
            HtmlTag::Head => "head",
            HtmlTag::Body => "body",
            HtmlTag::Title => "title",
            HtmlTag::Meta => "meta",
            HtmlTag::Base => "base",
            HtmlTag::Link => "link",
            HtmlTag::Style => "style",
            HtmlTag::Script => "script",
            HtmlTag::Noscript => "noscript",
            HtmlTag::Template => "template",
            HtmlTag::Div => "div",
            HtmlTag::Span => "span",
            HtmlTag::P => "p",
            HtmlTag::H1 => "h1",
            HtmlTag::H2 => "h2",
            HtmlTag::H3 => "h3",
            HtmlTag::H4 => "h4",
            HtmlTag::H5 => "h5",
            HtmlTag::H6 => "h6",
            HtmlTag::Strong => "strong",
            HtmlTag::Em => "em",
            HtmlTag::Small => "small",
            HtmlTag::Big => "big",
            HtmlTag::Code => "code",
            HtmlTag::Pre => "pre",
            HtmlTag::Blockquote => "blockquote",
            HtmlTag::B => "b",
            HtmlTag::U => "u",
            HtmlTag::I => "i",
            HtmlTag::S => "s",
            HtmlTag::Br => "br",
            HtmlTag::Hr => "hr",
            HtmlTag::A => "a",
            HtmlTag::Img => "img",
            HtmlTag::Ul => "ul",
            HtmlTag::Ol => "ol",
            HtmlTag::Li => "li",
            HtmlTag::Custom(name) => name,
        }
    }

    /// Document metadata, never laid out.
    pub fn is_metadata(&self) -> bool {
        match self {
            HtmlTag::Title
            | HtmlTag::Meta
            | HtmlTag::Base
            | HtmlTag::Link
            | HtmlTag::Style
            | HtmlTag::Script
            | HtmlTag::Noscript
            | HtmlTag::Template => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Element(HtmlTag),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlNode {
    pub node_type: NodeType,
    /// Attribute name (lowercased) and decoded value, in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl HtmlNode {
    // Helper constructor for elements
    pub fn new_element(
        tag: HtmlTag,
        attributes: Vec<(String, String)>,
        children: Vec<HtmlNode>,
    ) -> Self {
        HtmlNode {
            node_type: NodeType::Element(tag),
            attributes,
            children,
        }
    }

    // Helper constructor for text
    pub fn new_text(text: String) -> Self {
        HtmlNode {
            node_type: NodeType::Text(text),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> Option<&HtmlTag> {
        match &self.node_type {
            NodeType::Element(tag) => Some(tag),
            NodeType::Text(_) => None,
        }
    }

    pub fn is_tag(&self, tag: &HtmlTag) -> bool {
        self.tag() == Some(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// First descendant (or self) with the given tag, depth-first.
    pub fn find_first(&self, tag: &HtmlTag) -> Option<&HtmlNode> {
        if self.is_tag(tag) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_first(tag))
    }

    pub fn get_head(&self) -> Option<&HtmlNode> {
        self.children.iter().find(|c| c.is_tag(&HtmlTag::Head))
    }

    pub fn get_body(&self) -> Option<&HtmlNode> {
        self.children.iter().find(|c| c.is_tag(&HtmlTag::Body))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.node_type {
            NodeType::Text(text) => out.push_str(text),
            NodeType::Element(_) => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(href: &str) -> HtmlNode {
        HtmlNode::new_element(
            HtmlTag::A,
            vec![("href".to_string(), href.to_string())],
            vec![
                HtmlNode::new_text("a ".to_string()),
                HtmlNode::new_element(
                    HtmlTag::B,
                    vec![],
                    vec![HtmlNode::new_text("link".to_string())],
                ),
            ],
        )
    }

    #[test]
    fn test_attribute_access() {
        let node = anchor("/x");
        assert_eq!(node.attr("HREF"), Some("/x"));
        assert!(node.has_attr("href"));
        assert!(!node.has_attr("title"));
    }

    #[test]
    fn test_text_and_lookup() {
        let node = anchor("/x");
        assert_eq!(node.text_content(), "a link");
        assert!(node.find_first(&HtmlTag::B).is_some());
        assert!(node.find_first(&HtmlTag::Img).is_none());
    }

    #[test]
    fn test_custom_tags_keep_their_name() {
        let tag = HtmlTag::from_name("My-Widget");
        assert_eq!(tag, HtmlTag::Custom("my-widget".to_string()));
        assert_eq!(tag.name(), "my-widget");
        assert!(HtmlTag::from_name("SCRIPT").is_metadata());
        assert!(!HtmlTag::from_name("p").is_metadata());
    }
}
