//! Atelier - asset pipeline driver for the portfolio experience
//!
//! Walks the asset manifest, loads every entry through the safe loader,
//! runs the batch remediation pass, and prints the diagnostic report. The
//! scene itself consumes the resulting asset map; this binary is the
//! loading half of the experience.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atelier_assets::{
    base_manifest, GlbFileLoader, ImageFileLoader, Ktx2FileLoader, LoadedAsset, ResourceLoader,
    TextureRepair,
};
use atelier_core::AssetKind;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let mut base = PathBuf::from("static");
    let mut json_report = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_report = true,
            path => base = PathBuf::from(path),
        }
    }

    info!("Starting Atelier asset pipeline...");
    info!("Asset root: {}", base.display());

    let image_loader = ImageFileLoader::new(&base);
    let ktx2_loader = Ktx2FileLoader::new(&base);
    let model_loader = GlbFileLoader::new(&base);

    let manifest = base_manifest();
    info!(
        "Loading scene '{}' ({} assets)",
        manifest.name,
        manifest.items.len()
    );

    let mut repair = TextureRepair::new();
    let mut assets: HashMap<String, LoadedAsset> = HashMap::new();

    for item in &manifest.items {
        let loader: &dyn ResourceLoader = match item.kind {
            AssetKind::Model => &model_loader,
            AssetKind::Texture if item.source.ends_with(".ktx2") => &ktx2_loader,
            AssetKind::Texture => &image_loader,
        };
        let asset = repair
            .load_safe(&item.name, &item.source, item.kind, loader)
            .await;
        assets.insert(item.name.clone(), asset);
    }

    let summary = repair.fix_all(&mut assets);
    info!(
        "Remediation pass: {} fixed, {} refused",
        summary.fixed.len(),
        summary.failed.len()
    );

    repair.print_report();

    if json_report {
        let rendered = serde_json::to_string_pretty(&repair.report())
            .context("Failed to serialize report")?;
        println!("{rendered}");
    }

    Ok(())
}
