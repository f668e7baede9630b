use anyhow::{Context, Result};
use spendlens_core::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_spendlens_home, spendlens_home};

pub fn config_path() -> Result<PathBuf> {
    Ok(spendlens_home()?.join("config.toml"))
}

/// `--config` wins; otherwise `~/.spendlens/config.toml` if it exists;
/// otherwise built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    if let Some(p) = explicit {
        return read_config(p);
    }
    let p = config_path()?;
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file, using defaults");
        return Ok(PipelineConfig::default());
    }
    read_config(&p)
}

fn read_config(path: &Path) -> Result<PipelineConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn render_config(cfg: &PipelineConfig) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn save_config(cfg: &PipelineConfig) -> Result<PathBuf> {
    let p = ensure_spendlens_home()?.join("config.toml");
    fs::write(&p, render_config(cfg)?).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&PipelineConfig::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
