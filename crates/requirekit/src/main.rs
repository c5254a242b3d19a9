//! Command-line entry point for requirekit.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use requirekit::ScriptRenderer;
use requirekit::config::{DEFAULT_SETTINGS_FILE, KitSettings};
use requirekit::core::{ConfigProvider, StaticPluginRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "requirekit", version)]
struct Cli {
    /// Path to a requirekit.json5 settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Plugin as name=path; repeat in merge order
    #[arg(long = "plugin", value_name = "NAME=PATH")]
    plugins: Vec<String>,
    /// Directory whose sub-directories are plugins, merged by name
    #[arg(long)]
    plugins_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the rendered runtime config script
    MainConfig {
        /// Re-render instead of serving a cached script
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the optimizer build config as JSON
    BuildConfig {
        /// Path of the runtime config script, relative to the web root
        runtime_config: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the merged config tree as JSON
    Merged,
    /// Drop cached config values
    ClearCache,
}

fn main() -> anyhow::Result<()> {
    requirekit::init_logging();
    let cli = Cli::parse();

    let settings = load_settings(cli.settings.as_deref())?;
    let registry = build_registry(&cli.plugins, cli.plugins_dir.as_deref())?;
    info!("using {} plugins", registry.len());
    let renderer = Arc::new(ScriptRenderer::with_template(settings.template.clone()));
    let provider = ConfigProvider::from_settings(&settings, Arc::new(registry), renderer)
        .context("failed to set up config provider")?;

    match cli.command {
        Command::MainConfig { no_cache } => {
            let script = if no_cache {
                provider.generate_main_config()
            } else {
                provider.get_main_config()
            }
            .context("failed to generate main config")?;
            print!("{script}");
        }
        Command::BuildConfig {
            runtime_config,
            output,
        } => {
            let artifact = provider
                .generate_build_config(&runtime_config)
                .context("failed to generate build config")?;
            let json = serde_json::to_string_pretty(&artifact)?;
            match output {
                Some(path) => {
                    fs::write(&path, format!("{json}\n"))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("wrote build config to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Merged => {
            let merged = provider
                .collect_configs()
                .context("failed to collect configs")?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Command::ClearCache => provider.clear_cache(),
    }
    Ok(())
}

/// Explicit settings file, else `requirekit.json5` in the cwd, else defaults.
fn load_settings(path: Option<&Path>) -> anyhow::Result<KitSettings> {
    if let Some(path) = path {
        return KitSettings::load_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }
    let default_path = PathBuf::from(DEFAULT_SETTINGS_FILE);
    if default_path.is_file() {
        return KitSettings::load_from_path(&default_path)
            .with_context(|| format!("failed to load settings from {}", default_path.display()));
    }
    Ok(KitSettings::default())
}

fn build_registry(
    plugins: &[String],
    plugins_dir: Option<&Path>,
) -> anyhow::Result<StaticPluginRegistry> {
    let mut registry = match plugins_dir {
        Some(dir) => StaticPluginRegistry::from_directory(dir)
            .with_context(|| format!("failed to scan plugins in {}", dir.display()))?,
        None => StaticPluginRegistry::new(),
    };
    for entry in plugins {
        let Some((name, path)) = entry.split_once('=') else {
            bail!("invalid --plugin value '{entry}', expected NAME=PATH");
        };
        if name.is_empty() || path.is_empty() {
            bail!("invalid --plugin value '{entry}', expected NAME=PATH");
        }
        registry.register(name, path);
    }
    Ok(registry)
}
