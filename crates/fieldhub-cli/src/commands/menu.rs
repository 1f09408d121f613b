//! Menu block rendering.

use std::path::Path;
use std::sync::Arc;

use clap::Args;

use crate::output::{self, OutputFormat};
use fieldhub_core::config::AppConfig;
use fieldhub_core::error::AppError;
use fieldhub_core::types::Block;
use plugin_menu::{MemoryMenuRepository, MemoryResolutionCache, MenuBlockRenderer};

/// Arguments for the menu command
#[derive(Debug, Args)]
pub struct MenuArgs {
    /// JSON file with menus and links
    #[arg(long, default_value = "fixtures/menus.json")]
    pub fixture: String,

    /// Menu shown by the block
    #[arg(long)]
    pub delta: i64,

    /// Region the block sits in
    #[arg(long, default_value = "sidebar")]
    pub region: String,

    /// View mode; defaults to `[menu] default_view_mode`
    #[arg(long)]
    pub view_mode: Option<String>,
}

/// Render a menu block
pub fn execute(args: &MenuArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let view = super::ViewLayer::from_config(config)?;
    let menus = MemoryMenuRepository::from_file(Path::new(&args.fixture))?;

    let renderer = MenuBlockRenderer::from_config(
        &config.menu,
        view.templates.clone(),
        Arc::new(menus),
        Arc::new(MemoryResolutionCache::new()),
    );

    let block = Block {
        id: 0,
        delta: args.delta,
        region: args.region.clone(),
        title: String::new(),
    };
    let markup = renderer.display_block(&block, args.view_mode.as_deref())?;

    output::print_markup(&markup, format);
    Ok(())
}
