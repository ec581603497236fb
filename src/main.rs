//! Replay a snip-box session script and print the final editor state.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use snipbox::config::EditorConfig;
    use snipbox::session::SessionScript;

    #[derive(Parser)]
    #[command(name = "snipbox-replay", about = "Replay a snip-box editing session")]
    #[command(version)]
    struct Cli {
        /// Session script (JSON)
        script: PathBuf,

        /// Editor configuration file; defaults to the user config directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    }

    /// Resolve the editor configuration.
    ///
    /// An explicit `--config` must load. A broken file at the default path
    /// falls back to defaults and comes back as a warning to log once the
    /// logger is running.
    fn load_config(explicit: Option<&Path>) -> Result<(EditorConfig, Option<String>)> {
        if let Some(path) = explicit {
            let config = EditorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            return Ok((config, None));
        }
        let Some(path) = EditorConfig::default_path() else {
            return Ok((EditorConfig::default(), None));
        };
        match EditorConfig::load_if_present(&path) {
            Ok(config) => Ok((config.unwrap_or_default(), None)),
            Err(e) => Ok((
                EditorConfig::default(),
                Some(format!("Ignoring config file {}: {e}", path.display())),
            )),
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let (config, config_warning) = load_config(cli.config.as_deref())?;

        let level = if cli.verbose {
            log::LevelFilter::Debug
        } else {
            config.log_level.to_level_filter()
        };
        // RUST_LOG still overrides the configured level
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .init();

        if let Some(warning) = config_warning {
            log::warn!("{warning}");
        }

        let script = SessionScript::load(&cli.script)
            .with_context(|| format!("Failed to load session {}", cli.script.display()))?;
        let editor = script.replay(config);

        let snapshot = serde_json::to_string_pretty(&editor.snapshot())
            .context("Failed to serialize editor snapshot")?;
        println!("{snapshot}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

// No command line on the web
#[cfg(target_arch = "wasm32")]
fn main() {}
