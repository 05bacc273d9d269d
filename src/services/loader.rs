use crate::model::{parse_color, AppConfig};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "stepper.yaml";

/// Where the active configuration came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltIn,
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading config: {path:?}"))?;
    let cfg: AppConfig =
        serde_yaml::from_str(&s).with_context(|| format!("parsing config: {path:?}"))?;
    validate_config(&cfg).with_context(|| format!("validating config: {path:?}"))?;
    Ok(cfg)
}

/// Candidate files, in priority order, for a working directory and home.
pub(crate) fn config_candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut out = vec![cwd.join(CONFIG_FILE), cwd.join(".tui").join(CONFIG_FILE)];
    if let Some(home) = home {
        out.push(home.join(".tui").join(CONFIG_FILE));
    }
    out
}

pub fn load_config() -> Result<(AppConfig, ConfigSource)> {
    // 1) Explicit file wins and must exist
    if let Ok(explicit) = std::env::var("STEPPER_TUI_CONFIG") {
        let path = PathBuf::from(explicit);
        let cfg = load_config_from_path(&path)?;
        info!(path = %path.display(), "loaded stepper config");
        return Ok((cfg, ConfigSource::File(path)));
    }

    // 2) Discover from CWD, then ~/.tui
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    for p in config_candidates(&cwd, home.as_deref()) {
        if p.exists() {
            let cfg = load_config_from_path(&p)?;
            info!(path = %p.display(), "loaded stepper config");
            return Ok((cfg, ConfigSource::File(p)));
        }
    }

    info!("no stepper config found; using built-in demo");
    Ok((AppConfig::default(), ConfigSource::BuiltIn))
}

pub fn validate_config(cfg: &AppConfig) -> Result<()> {
    if cfg.steppers.is_empty() {
        bail!("config defines no steppers");
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for s in &cfg.steppers {
        let id = s.id.as_str();
        if id.trim().is_empty() {
            bail!("stepper with label {:?} has an empty id", s.label);
        }
        if !seen.insert(id) {
            bail!("duplicate stepper id: {id}");
        }
        for (name, bound) in [("minimum", s.minimum), ("maximum", s.maximum)] {
            if let Some(b) = bound {
                if b.is_nan() {
                    bail!("{id}: {name} is not a number");
                }
            }
        }
        if let (Some(lo), Some(hi)) = (s.minimum, s.maximum) {
            if lo > hi {
                bail!("{id}: minimum {lo} is greater than maximum {hi}");
            }
        }
        if !(s.increment.is_finite() && s.increment > 0.0) {
            bail!("{id}: increment must be a positive number, got {}", s.increment);
        }
        if let Some(v) = s.initial_value {
            if v.is_nan() {
                bail!("{id}: initial_value is not a number");
            }
        }
        let f = &s.format;
        if f.allows_floats && f.min_fraction_digits > f.max_fraction_digits {
            bail!(
                "{id}: format.min_fraction_digits ({}) exceeds max_fraction_digits ({})",
                f.min_fraction_digits,
                f.max_fraction_digits
            );
        }
        if f.grouping && f.grouping_separator == f.decimal_separator {
            bail!("{id}: grouping and decimal separators must differ");
        }
        for (name, raw) in [("indicator", &s.indicator), ("foreground", &s.foreground)] {
            if let Some(raw) = raw {
                if parse_color(raw).is_none() {
                    bail!("{id}: unknown {name} color {raw:?}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod loader_tests;
