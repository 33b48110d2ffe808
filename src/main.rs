// main.rs
mod address;
mod app;
mod config;
mod dom;
mod frame;
mod history;
mod html_parser;
mod navigation;
mod relay;
mod rewrite;
mod session;

use std::env;

use anyhow::anyhow;
use app::ProxyApp;
use config::Config;
use eframe::egui;
use relay::Relay;
use session::Session;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let default_level = "relayview=info";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = Config::create_default() {
        warn!("could not write default config: {}", e);
    }
    let config = Config::load();

    // First argument is either a page address or a shared location link.
    let initial_url = env::args()
        .nth(1)
        .map(|arg| address::target_from_location(&arg).unwrap_or(arg));

    let relay = Relay::new(&config.relay)?;
    info!("using relay {}", config.relay.endpoint);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title(app::APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        app::APP_TITLE,
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            egui_material_icons::initialize(&cc.egui_ctx);
            Ok(Box::new(ProxyApp::new(
                cc,
                &config,
                Session::new(relay),
                initial_url,
            )))
        }),
    )
    .map_err(|e| anyhow!("failed to start window: {e}"))
}
