//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::{ConfigAction, ConfigKey, OutputFormat, StyleMode};
use crate::config::{Config, WindowConfig};

fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::Source => "source",
        ConfigKey::Format => "format",
        ConfigKey::NoColor => "no_color",
        ConfigKey::Style => "style",
        ConfigKey::MinSize => "window.min_size",
        ConfigKey::ZoomStep => "window.zoom_step",
        ConfigKey::LargeZoomStep => "window.large_zoom_step",
        ConfigKey::DefaultSize => "window.default_size",
    }
}

/// Current value of a key, or `None` when unset.
pub fn get_value(config: &Config, key: ConfigKey) -> Option<String> {
    match key {
        ConfigKey::Source => config.source.clone(),
        ConfigKey::Format => config.format.clone(),
        ConfigKey::NoColor => Some(config.no_color.to_string()),
        ConfigKey::Style => config.style.clone(),
        ConfigKey::MinSize => Some(config.window.min_size.to_string()),
        ConfigKey::ZoomStep => Some(config.window.zoom_step.to_string()),
        ConfigKey::LargeZoomStep => Some(config.window.large_zoom_step.to_string()),
        ConfigKey::DefaultSize => Some(config.window.default_size.to_string()),
    }
}

fn parse_count(key: ConfigKey, value: &str) -> Result<usize> {
    let n: usize = value
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}'", key_name(key), value))?;
    if n == 0 {
        bail!("{} must be at least 1", key_name(key));
    }
    Ok(n)
}

/// Validate and store a value.
pub fn set_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::Source => config.source = Some(value.to_string()),
        ConfigKey::Format => {
            let format = OutputFormat::from_config(value)
                .with_context(|| format!("Invalid format '{}'. Use text, json, or csv", value))?;
            config.format = Some(format!("{:?}", format).to_lowercase());
        }
        ConfigKey::NoColor => {
            config.no_color = value
                .parse()
                .with_context(|| format!("Invalid value for no_color: '{}'", value))?;
        }
        ConfigKey::Style => {
            let style = StyleMode::from_config(value).with_context(|| {
                format!("Invalid style '{}'. Use minimal, rich, or plain", value)
            })?;
            config.style = Some(format!("{:?}", style).to_lowercase());
        }
        ConfigKey::MinSize => config.window.min_size = parse_count(key, value)?,
        ConfigKey::ZoomStep => config.window.zoom_step = parse_count(key, value)?,
        ConfigKey::LargeZoomStep => config.window.large_zoom_step = parse_count(key, value)?,
        ConfigKey::DefaultSize => config.window.default_size = parse_count(key, value)?,
    }
    Ok(())
}

/// Reset a key to its default.
pub fn unset_value(config: &mut Config, key: ConfigKey) {
    let defaults = WindowConfig::default();
    match key {
        ConfigKey::Source => config.source = None,
        ConfigKey::Format => config.format = None,
        ConfigKey::NoColor => config.no_color = false,
        ConfigKey::Style => config.style = None,
        ConfigKey::MinSize => config.window.min_size = defaults.min_size,
        ConfigKey::ZoomStep => config.window.zoom_step = defaults.zoom_step,
        ConfigKey::LargeZoomStep => config.window.large_zoom_step = defaults.large_zoom_step,
        ConfigKey::DefaultSize => config.window.default_size = defaults.default_size,
    }
}

pub fn cmd_config(action: ConfigAction, path: &Path, quiet: bool) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load_from(path);
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::Get { key } => match get_value(&Config::load_from(path), key) {
            Some(value) => println!("{}", value),
            None => {
                if !quiet {
                    eprintln!("{} is not set", key_name(key));
                }
            }
        },
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(path);
            set_value(&mut config, key, &value)?;
            config.save_to(path)?;
            if !quiet {
                eprintln!("Set {} = {}", key_name(key), value);
            }
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load_from(path);
            unset_value(&mut config, key);
            config.save_to(path)?;
            if !quiet {
                eprintln!("Unset {}", key_name(key));
            }
        }
        ConfigAction::Init => {
            if path.exists() {
                bail!("Config file already exists: {}", path.display());
            }
            Config::default().save_to(path)?;
            if !quiet {
                eprintln!("Created {}", path.display());
            }
        }
    }
    Ok(())
}
