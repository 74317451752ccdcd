mod app;
mod commands;
mod event;
mod task;
mod ui;

use clap::Parser;
use color_eyre::Result;
use entab::{config, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "entab")]
#[command(about = "Browse and edit entity lists from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/entab/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Tab key to open first
  #[arg(short, long)]
  tab: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;

  // Logs go to a file; the terminal belongs to the UI
  let _guard = logging::init(&logging::default_log_dir()?)?;

  let mut app = app::App::new(config, args.tab.as_deref())?;
  app.run().await?;

  Ok(())
}
