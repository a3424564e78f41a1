mod app;
mod state;
mod ui;

use anyhow::{Context, anyhow};
use app::BioinkApp;
use bioink_dash::config::CliArgs;
use bioink_dash::pages::{self, Page};
use clap::Parser;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = CliArgs::parse();
    let config = cli.resolve_config()?;

    if let Some(slug) = &cli.dump {
        let page = Page::from_slug(slug).with_context(|| {
            let known: Vec<_> = Page::ALL.iter().map(|p| p.slug()).collect();
            format!("unknown page '{slug}' (expected one of {known:?})")
        })?;
        println!("{}", pages::dump(page, &config)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Proyecto Biotintas",
        options,
        Box::new(|_cc| Ok(Box::new(BioinkApp::new(config)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
