// app.rs
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32};
use egui_material_icons::icons::{
    ICON_ARROW_BACK, ICON_ARROW_FORWARD, ICON_CLOSE, ICON_HISTORY, ICON_OPEN_IN_NEW,
    ICON_SEARCH, ICON_SHARE,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::address;
use crate::config::Config;
use crate::frame::Frame;
use crate::relay::FetchError;
use crate::session::{LoadTicket, RenderState, Session};

pub const APP_TITLE: &str = "Relayview";
const NOTICE_TTL: Duration = Duration::from_secs(3);
const ERROR_FILL: Color32 = Color32::from_rgb(254, 226, 226);
const ERROR_TEXT: Color32 = Color32::from_rgb(185, 28, 28);

type FetchResult = (u64, Result<String, FetchError>);

/// User intents gathered while drawing, applied once the frame's borrows end.
#[derive(Debug, Clone)]
enum Action {
    Submit,
    Back,
    Forward,
    Clear,
    Load(String),
    OpenHistoryItem(String),
    ToggleHistory,
    CloseHistory,
    Share,
    OpenExternal,
}

pub struct ProxyApp {
    session: Session,
    share_base: Option<Url>,
    frame: Option<Frame>,
    notice: Option<(String, Instant)>,
    title: String,
    network_receiver: mpsc::Receiver<FetchResult>,
    network_sender: mpsc::Sender<FetchResult>,
}

impl ProxyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        session: Session,
        initial_url: Option<String>,
    ) -> Self {
        cc.egui_ctx.set_visuals(if config.ui.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        cc.egui_ctx.set_zoom_factor(config.ui.zoom);

        let (sender, receiver) = mpsc::channel();
        let mut app = Self {
            session,
            share_base: config.location.share_base_url(),
            frame: None,
            notice: None,
            title: APP_TITLE.to_string(),
            network_receiver: receiver,
            network_sender: sender,
        };

        if let Some(url) = initial_url.filter(|u| !u.trim().is_empty()) {
            app.session.input = url.clone();
            let ticket = app.session.load(&url);
            app.dispatch(&cc.egui_ctx, ticket);
        }
        app
    }

    /// Runs the fetch for `ticket` on a worker thread.
    fn dispatch(&mut self, ctx: &egui::Context, ticket: Option<LoadTicket>) {
        if !matches!(self.session.state(), RenderState::Loaded { .. }) {
            self.frame = None;
        }
        let Some(ticket) = ticket else {
            return;
        };
        let sender = self.network_sender.clone();
        let relay = self.session.relay().clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = relay.fetch(&ticket.target);
            if let Err(e) = sender.send((ticket.generation, result)) {
                warn!("failed to deliver load result: {}", e);
            }
            ctx.request_repaint();
        });
    }

    fn receive(&mut self, ctx: &egui::Context) {
        while let Ok((generation, result)) = self.network_receiver.try_recv() {
            if !self.session.finish(generation, result) {
                continue;
            }
            self.frame = match self.session.state() {
                RenderState::Loaded { markup, .. } => Some(Frame::new(markup)),
                _ => None,
            };
        }
    }

    /// Keeps the window title on the loaded page, or the app name otherwise.
    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = window_title(self.frame.as_ref());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn apply(&mut self, ctx: &egui::Context, action: Action) {
        debug!("action {:?}", action);
        let ticket = match action {
            Action::Submit => self.session.submit(),
            Action::Back => self.session.back(),
            Action::Forward => self.session.forward(),
            Action::Load(url) => self.session.load(&url),
            Action::OpenHistoryItem(url) => self.session.open_history_item(&url),
            Action::Clear => {
                self.session.clear();
                self.frame = None;
                return;
            }
            Action::ToggleHistory => {
                self.session.toggle_history();
                return;
            }
            Action::CloseHistory => {
                self.session.close_history();
                return;
            }
            Action::Share => {
                self.share(ctx);
                return;
            }
            Action::OpenExternal => {
                self.open_external();
                return;
            }
        };
        // Invalid input still replaces whatever was shown.
        self.dispatch(ctx, ticket);
    }

    /// There is no native share sheet on the desktop, so the link goes to the clipboard.
    fn share(&mut self, ctx: &egui::Context) {
        let link = self
            .share_base
            .as_ref()
            .and_then(|base| self.session.location(base));
        match link {
            Some(link) => {
                ctx.copy_text(link.to_string());
                self.notify("URL copied to clipboard!");
            }
            None => self.notify("Nothing to share yet"),
        }
    }

    /// Opens the unrewritten page, or the typed address when nothing is loaded yet.
    fn open_external(&mut self) {
        let url = match self.session.current() {
            Some(target) => target.to_string(),
            None => match address::normalize(&self.session.input) {
                Ok(target) => target.to_string(),
                Err(_) => return,
            },
        };
        info!("opening {} externally", url);
        if let Err(e) = open::that(&url) {
            warn!("failed to open {}: {}", url, e);
            self.notify(format!("Could not open {}", url));
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    fn header(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Web Proxy");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(ICON_HISTORY)
                    .on_hover_text("Toggle history")
                    .clicked()
                {
                    actions.push(Action::ToggleHistory);
                }
                if !self.session.input.is_empty() {
                    if ui.button(ICON_SHARE).on_hover_text("Share URL").clicked() {
                        actions.push(Action::Share);
                    }
                    if ui
                        .button(ICON_OPEN_IN_NEW)
                        .on_hover_text("Open in browser")
                        .clicked()
                    {
                        actions.push(Action::OpenExternal);
                    }
                }
            });
        });

        ui.horizontal(|ui| {
            let navigation = self.session.navigation();
            if ui
                .add_enabled(navigation.can_go_back(), egui::Button::new(ICON_ARROW_BACK))
                .on_hover_text("Go back")
                .clicked()
            {
                actions.push(Action::Back);
            }
            if ui
                .add_enabled(
                    navigation.can_go_forward(),
                    egui::Button::new(ICON_ARROW_FORWARD),
                )
                .on_hover_text("Go forward")
                .clicked()
            {
                actions.push(Action::Forward);
            }

            ui.label(ICON_SEARCH);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Proxy").clicked() {
                    actions.push(Action::Submit);
                }
                if !self.session.input.is_empty()
                    && ui.button(ICON_CLOSE).on_hover_text("Clear").clicked()
                {
                    actions.push(Action::Clear);
                }
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.session.input)
                        .hint_text("Enter URL to proxy...")
                        .desired_width(f32::INFINITY),
                );
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    actions.push(Action::Submit);
                }
            });
        });
        ui.add_space(4.0);
    }

    fn history_drawer(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.strong("Browsing History");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(ICON_CLOSE).on_hover_text("Close history").clicked() {
                    actions.push(Action::CloseHistory);
                }
            });
        });
        ui.separator();

        let groups = self.session.history().grouped();
        if groups.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.weak("No browsing history yet");
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for group in groups {
                ui.add_space(6.0);
                ui.weak(group.date.format("%A, %B %-d, %Y").to_string());
                for item in group.items {
                    let response = ui
                        .group(|ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.strong(&item.title);
                                    ui.small(&item.url);
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Min),
                                    |ui| {
                                        ui.small(item.time_label());
                                    },
                                );
                            });
                        })
                        .response
                        .interact(egui::Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand)
                        .on_hover_text(item.timestamp_iso());
                    if response.clicked() {
                        actions.push(Action::OpenHistoryItem(item.url.clone()));
                    }
                }
            }
        });
    }

    fn content(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        match self.session.state() {
            RenderState::Idle => welcome(ui),
            RenderState::Loading { target } => {
                let via = self
                    .session
                    .relay_url()
                    .map(|url| url.to_string())
                    .unwrap_or_default();
                ui.centered_and_justified(|ui| {
                    ui.spinner()
                        .on_hover_text(format!("Loading {}...\n{}", target, via));
                });
            }
            RenderState::Error(err) => {
                egui::Frame::new()
                    .fill(ERROR_FILL)
                    .stroke(egui::Stroke::new(1.0, ERROR_TEXT))
                    .corner_radius(6.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        if let Some(note) = err.note() {
                            ui.label(
                                egui::RichText::new("Error loading content")
                                    .strong()
                                    .color(ERROR_TEXT),
                            );
                            ui.colored_label(ERROR_TEXT, err.to_string());
                            ui.add_space(6.0);
                            ui.colored_label(ERROR_TEXT, egui::RichText::new(note).small());
                        } else {
                            ui.colored_label(ERROR_TEXT, err.to_string());
                        }
                    });
            }
            RenderState::Loaded { .. } => {
                if let Some(href) = self.frame.as_ref().and_then(|frame| frame.show(ui)) {
                    actions.push(Action::Load(href));
                }
            }
        }
    }
}

fn window_title(frame: Option<&Frame>) -> String {
    frame
        .and_then(Frame::title)
        .unwrap_or_else(|| APP_TITLE.to_string())
}

fn welcome(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.heading("Welcome to Web Proxy");
        ui.add_space(8.0);
        ui.label(
            "Enter a URL in the search bar above to browse websites through the relay. \
             This can help bypass certain restrictions or browse anonymously.",
        );
        ui.add_space(16.0);
        ui.columns(3, |columns| {
            let cards = [
                (
                    "Bypass Restrictions",
                    "Access websites that might be blocked on your network.",
                ),
                (
                    "Privacy",
                    "Browse websites with an additional layer of privacy.",
                ),
                (
                    "Simple to Use",
                    "Just enter any URL and click the Proxy button to get started.",
                ),
            ];
            for (column, (title, body)) in columns.iter_mut().zip(cards) {
                column.group(|ui| {
                    ui.strong(title);
                    ui.small(body);
                });
            }
        });
    });
}

impl eframe::App for ProxyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.header(ui, &mut actions);
        });

        if self
            .notice
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }
        if let Some((message, _)) = &self.notice {
            egui::TopBottomPanel::bottom("notice").show(ctx, |ui| {
                ui.label(message.as_str());
            });
            ctx.request_repaint_after(NOTICE_TTL);
        }

        if self.session.show_history() {
            egui::SidePanel::right("history")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| {
                    self.history_drawer(ui, &mut actions);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.content(ui, &mut actions);
        });

        for action in actions {
            self.apply(ctx, action);
        }
        self.sync_title(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title_follows_page() {
        let page = Frame::new("<title>Example Domain</title><p>x</p>");
        assert_eq!(window_title(Some(&page)), "Example Domain");
    }

    #[test]
    fn test_window_title_resets_without_page() {
        assert_eq!(window_title(None), APP_TITLE);
        let untitled = Frame::new("<p>no title</p>");
        assert_eq!(window_title(Some(&untitled)), APP_TITLE);
    }
}
