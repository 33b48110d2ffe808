// frame.rs
use eframe::egui;

use crate::dom::{HtmlNode, HtmlTag, NodeType};
use crate::html_parser;

// --- Constants for styling and layout ---
const BASE_SIZE: f32 = 16.0; // Default font size

/// Isolated rendering surface for a rewritten page.
///
/// Only structure, text, links and images are laid out. Script, style and
/// embedded browsing contexts are never executed or shown, and link activation
/// is reported to the caller instead of navigating.
pub struct Frame {
    document: HtmlNode,
}

impl Frame {
    pub fn new(markup: &str) -> Self {
        Self {
            document: html_parser::parse_document(markup),
        }
    }

    /// Text of the document's `<title>`, if any.
    pub fn title(&self) -> Option<String> {
        let head = self.document.get_head()?;
        let title = head.find_first(&HtmlTag::Title)?.text_content();
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        (!title.is_empty()).then_some(title)
    }

    /// Lays the page out and returns the href of a link activated this frame.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<String> {
        let mut activated = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(body) = self.document.get_body() {
                    render_node(ui, body, &mut RenderContext::default(), &mut activated);
                }
            });
        activated
    }
}

#[derive(Clone, Debug)]
struct RenderContext {
    font_size: f32,
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: bool,
    monospace: bool,
    preformatted: bool,
    href: Option<String>,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            font_size: BASE_SIZE,
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            monospace: false,
            preformatted: false,
            href: None,
        }
    }
}

/// Content that never reaches the screen.
fn is_hidden(node: &HtmlNode) -> bool {
    if node.has_attr("hidden") {
        return true;
    }
    match node.tag() {
        Some(tag) if tag.is_metadata() => true,
        Some(HtmlTag::Head) => true,
        Some(HtmlTag::Custom(name)) => matches!(
            name.as_str(),
            "iframe" | "frame" | "object" | "embed" | "svg" | "canvas" | "input" | "select"
                | "textarea" | "audio" | "video"
        ),
        _ => false,
    }
}

/// Decide which tags count as "inline" (i.e. should live
/// in a horizontal buffer). Raw text and phrasing tags are
/// inline; everything else is laid out as a block.
fn is_inline(node: &HtmlNode) -> bool {
    match &node.node_type {
        NodeType::Text(_) => true,
        NodeType::Element(tag) => match tag {
            HtmlTag::B
            | HtmlTag::I
            | HtmlTag::U
            | HtmlTag::S
            | HtmlTag::A
            | HtmlTag::Br
            | HtmlTag::Img
            | HtmlTag::Span
            | HtmlTag::Strong
            | HtmlTag::Em
            | HtmlTag::Small
            | HtmlTag::Big
            | HtmlTag::Code => true,
            HtmlTag::Custom(name) => matches!(
                name.as_str(),
                "abbr" | "cite" | "q" | "sub" | "sup" | "label" | "time" | "mark" | "kbd"
                    | "button" | "font" | "tt" | "var" | "samp" | "del" | "ins"
            ),
            _ => false,
        },
    }
}

fn heading_size(tag: &HtmlTag) -> Option<f32> {
    match tag {
        HtmlTag::H1 => Some(32.0),
        HtmlTag::H2 => Some(24.0),
        HtmlTag::H3 => Some(20.0),
        HtmlTag::H4 => Some(BASE_SIZE),
        HtmlTag::H5 => Some(14.0),
        HtmlTag::H6 => Some(12.0),
        _ => None,
    }
}

/// Applies the element's effect on the context, and draws leaf content.
fn set_node(
    ui: &mut egui::Ui,
    node: &HtmlNode,
    context: &mut RenderContext,
    activated: &mut Option<String>,
) {
    match &node.node_type {
        NodeType::Text(text) => draw_text(ui, text, context, activated),
        NodeType::Element(tag) => match tag {
            HtmlTag::Br => ui.end_row(),
            HtmlTag::Hr => {
                ui.separator();
            }
            HtmlTag::B | HtmlTag::Strong => context.bold = true,
            HtmlTag::I | HtmlTag::Em => context.italic = true,
            HtmlTag::S => context.strikethrough = true,
            HtmlTag::U => context.underline = true,
            HtmlTag::Code => context.monospace = true,
            HtmlTag::Pre => {
                context.monospace = true;
                context.preformatted = true;
            }
            HtmlTag::Small => context.font_size *= 0.85,
            HtmlTag::Big => context.font_size *= 1.2,
            HtmlTag::Li => {
                ui.label(egui::RichText::new("•").size(context.font_size));
            }
            HtmlTag::A => {
                if let Some(href) = node.attr("href").filter(|h| !h.is_empty()) {
                    context.underline = true;
                    context.href = Some(href.to_string());
                }
            }
            HtmlTag::Img => draw_image(ui, node, context, activated),
            other => {
                if let Some(size) = heading_size(other) {
                    context.font_size = size;
                    context.bold = true;
                }
            }
        },
    }
}

fn draw_text(
    ui: &mut egui::Ui,
    text: &str,
    context: &RenderContext,
    activated: &mut Option<String>,
) {
    let text = if context.preformatted {
        text.to_string()
    } else {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    };
    if text.is_empty() {
        return;
    }

    let mut rich = egui::RichText::new(text).size(context.font_size);
    if context.bold {
        rich = rich.strong();
    }
    if context.italic {
        rich = rich.italics();
    }
    if context.underline {
        rich = rich.underline();
    }
    if context.strikethrough {
        rich = rich.strikethrough();
    }
    if context.monospace {
        rich = rich.monospace();
    }

    if let Some(href) = &context.href {
        rich = rich.color(ui.visuals().hyperlink_color);
        let response = ui
            .add(egui::Label::new(rich).sense(egui::Sense::click()))
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .on_hover_text(href.as_str());
        if response.clicked() {
            *activated = Some(href.clone());
        }
    } else {
        ui.label(rich);
    }
}

fn draw_image(
    ui: &mut egui::Ui,
    node: &HtmlNode,
    context: &RenderContext,
    activated: &mut Option<String>,
) {
    let alt = node.attr("alt").unwrap_or_default();
    let src = node
        .attr("src")
        .filter(|src| src.starts_with("http://") || src.starts_with("https://"));
    let Some(src) = src else {
        if !alt.is_empty() {
            draw_text(ui, alt, context, activated);
        }
        return;
    };

    let image = egui::Image::new(src.to_string())
        .max_width(ui.available_width())
        .sense(egui::Sense::click());
    let mut response = ui.add(image);
    if !alt.is_empty() {
        response = response.on_hover_text(alt);
    }
    if let Some(href) = &context.href {
        if response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            *activated = Some(href.clone());
        }
    }
}

fn render_node(
    ui: &mut egui::Ui,
    node: &HtmlNode,
    context: &mut RenderContext,
    activated: &mut Option<String>,
) {
    if is_hidden(node) {
        return;
    }
    set_node(ui, node, context, activated);

    let mut i = 0;
    while i < node.children.len() {
        if is_inline(&node.children[i]) {
            let start = i;
            while i < node.children.len() && is_inline(&node.children[i]) {
                i += 1;
            }
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                for child in &node.children[start..i] {
                    let mut ctx = context.clone();
                    render_inline(ui, child, &mut ctx, activated);
                }
            });
        } else {
            let mut ctx = context.clone();
            render_node(ui, &node.children[i], &mut ctx, activated);
            i += 1;
        }
    }

    if matches!(node.tag(), Some(tag) if heading_size(tag).is_some() || *tag == HtmlTag::P) {
        ui.add_space(context.font_size * 0.5);
    }
}

fn render_inline(
    ui: &mut egui::Ui,
    node: &HtmlNode,
    context: &mut RenderContext,
    activated: &mut Option<String>,
) {
    if is_hidden(node) {
        return;
    }
    set_node(ui, node, context, activated);

    let mut i = 0;
    while i < node.children.len() {
        if is_inline(&node.children[i]) {
            let mut ctx = context.clone();
            render_inline(ui, &node.children[i], &mut ctx, activated);
            i += 1;
        } else {
            let start = i;
            while i < node.children.len() && !is_inline(&node.children[i]) {
                i += 1;
            }
            ui.vertical(|ui| {
                for child in &node.children[start..i] {
                    let mut ctx = context.clone();
                    render_node(ui, child, &mut ctx, activated);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite;
    use url::Url;

    fn run(ctx: &egui::Context, frame: &Frame, events: Vec<egui::Event>) -> Option<String> {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        };
        let mut activated = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                activated = frame.show(ui);
            });
        });
        activated
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn test_title_is_collapsed() {
        let frame = Frame::new("<title>\n  Example\n  Domain </title><p>x</p>");
        assert_eq!(frame.title().as_deref(), Some("Example Domain"));
    }

    #[test]
    fn test_missing_title_is_none() {
        assert!(Frame::new("not html").title().is_none());
        assert!(Frame::new("<title>  </title>").title().is_none());
    }

    #[test]
    fn test_active_content_is_hidden() {
        let root = html_parser::parse_document(
            "<script>alert(1)</script><iframe src=x></iframe><p hidden>h</p><p>shown</p>",
        );
        let body = root.get_body().expect("body");
        let visible: Vec<_> = body.children.iter().filter(|n| !is_hidden(n)).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text_content(), "shown");
        assert!(root.get_head().expect("head").children.iter().all(is_hidden));
    }

    #[test]
    fn test_layout_without_input_activates_nothing() {
        let frame = Frame::new("<p><a href=\"https://example.com/next\">next</a></p>");
        let ctx = egui::Context::default();
        for _ in 0..3 {
            assert_eq!(run(&ctx, &frame, Vec::new()), None);
        }
        let hover = egui::pos2(20.0, 16.0);
        assert_eq!(run(&ctx, &frame, vec![egui::Event::PointerMoved(hover)]), None);
    }

    #[test]
    fn test_clicking_a_link_reports_its_absolute_href() {
        let base = Url::parse("https://example.com/page").expect("base");
        let label = "next ".repeat(200);
        let markup = rewrite::rewrite(&format!("<a href=\"/s?a=1&amp;b=2\">{label}</a>"), &base);
        let frame = Frame::new(&markup);
        let ctx = egui::Context::default();
        let at = egui::pos2(200.0, 60.0);

        let mut activated = run(&ctx, &frame, Vec::new());
        activated = activated.or(run(
            &ctx,
            &frame,
            vec![egui::Event::PointerMoved(at), button(at, true)],
        ));
        activated = activated.or(run(&ctx, &frame, vec![button(at, false)]));

        assert_eq!(activated.as_deref(), Some("https://example.com/s?a=1&b=2"));
    }
}
