//! Lumen binary entry point
//!
//! Wires the settings, plugin registry, and action table into an engine,
//! then drives it from a line-oriented front end: each line is a query,
//! `:detail N` shows the resolved details of the Nth result, `:copy N`
//! copies it.

use anyhow::Result;
use lumen::actions::{ActionRegistry, COPY_ACTION};
use lumen::plugins::static_items::StaticItemsProvider;
use lumen::{Engine, EngineHandle, PluginRegistry, ResultItem, Settings};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings()?;

    FmtSubscriber::builder()
        .with_max_level(if settings.general.debug {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .init();

    info!("starting lumen v{}", lumen::VERSION);

    let registry = build_registry(&settings);
    info!("loaded {} plugin(s)", registry.len());

    let engine = Engine::new(Arc::new(registry), &settings, build_actions());
    let handle = engine.start();

    repl(handle).await
}

/// Register providers from the configured static manifests
fn build_registry(settings: &Settings) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    for manifest in &settings.plugins.static_manifests {
        match StaticItemsProvider::from_file(manifest) {
            Ok(provider) => registry.register(Arc::new(provider)),
            Err(e) => warn!("skipping manifest {}: {e}", manifest.display()),
        }
    }
    registry
}

/// Default host actions: print what a GUI host would hand to the OS
fn build_actions() -> ActionRegistry {
    let mut actions = ActionRegistry::new();
    actions.register("open", |arg: &Value| {
        println!("open: {arg}");
    });
    actions.register(COPY_ACTION, |arg: &Value| {
        println!("copy: {arg}");
    });
    actions
}

async fn repl(handle: EngineHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_results: Vec<ResultItem> = Vec::new();

    println!("type a query; ':detail N' or ':copy N' acts on the Nth result");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(":detail ") {
            if let Some(item) = nth(&last_results, rest) {
                match handle.item_details(item).await {
                    Ok(detail) => println!("{detail}"),
                    Err(e) => println!("detail error: {e}"),
                }
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix(":copy ") {
            if let Some(item) = nth(&last_results, rest) {
                handle.copy_item(item)?;
            }
            continue;
        }

        match handle.query(line).await {
            Ok(results) => {
                for (index, item) in results.iter().enumerate() {
                    match &item.subtitle {
                        Some(subtitle) => println!("{index}: {} ({subtitle})", item.title),
                        None => println!("{index}: {}", item.title),
                    }
                }
                if results.is_empty() {
                    println!("(no results)");
                }
                last_results = results;
            }
            Err(e) => println!("query error: {e}"),
        }
    }
    Ok(())
}

fn nth(results: &[ResultItem], index: &str) -> Option<ResultItem> {
    let item = index
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| results.get(n).cloned());
    if item.is_none() {
        println!("no such result: {index}");
    }
    item
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    let paths = [
        PathBuf::from("lumen.yml"),
        PathBuf::from("config/lumen.yml"),
        dirs::config_dir()
            .map(|p| p.join("lumen/lumen.yml"))
            .unwrap_or_default(),
    ];

    if let Ok(path) = std::env::var("LUMEN_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    for path in paths.iter() {
        if path.exists() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
