// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine configuration

use crate::geometry::{NormalStrategy, RebuildOptions};
use crate::io::SaveOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "trimm.toml";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimmConfig {
    /// Vertex normal weighting
    pub normal_strategy: NormalStrategy,
    /// Compute vertex normals during every rebuild
    pub compute_normals: bool,
    /// Default number of subdivision steps
    pub subdivision_steps: u32,
    /// Deflate `.tmsh` snapshot archives
    pub compress_snapshots: bool,
    /// Log zero-area triangles during rebuild
    pub warn_on_degenerate: bool,
    /// Write STL files as ASCII
    pub ascii_stl: bool,
}

impl Default for TrimmConfig {
    fn default() -> Self {
        Self {
            normal_strategy: NormalStrategy::default(),
            compute_normals: true,
            subdivision_steps: 1,
            compress_snapshots: true,
            warn_on_degenerate: true,
            ascii_stl: false,
        }
    }
}

impl TrimmConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: TrimmConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `trimm.toml` when present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `TRIMM_*` overrides from a variable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(strategy) = lookup("TRIMM_NORMAL_STRATEGY") {
            self.normal_strategy = strategy
                .parse()
                .context("Invalid TRIMM_NORMAL_STRATEGY")?;
        }

        if let Some(compute) = lookup("TRIMM_COMPUTE_NORMALS") {
            self.compute_normals = compute.parse().unwrap_or(self.compute_normals);
        }

        if let Some(steps) = lookup("TRIMM_SUBDIVISION_STEPS") {
            self.subdivision_steps = steps
                .parse()
                .with_context(|| format!("Invalid TRIMM_SUBDIVISION_STEPS: {steps}"))?;
        }

        if let Some(compress) = lookup("TRIMM_COMPRESS_SNAPSHOTS") {
            self.compress_snapshots = compress.parse().unwrap_or(self.compress_snapshots);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn rebuild_options(&self) -> RebuildOptions {
        RebuildOptions {
            compute_normals: self.compute_normals,
            normal_strategy: self.normal_strategy,
            warn_on_degenerate: self.warn_on_degenerate,
        }
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            compress_snapshots: self.compress_snapshots,
            ascii_stl: self.ascii_stl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let config: TrimmConfig = toml::from_str("normal_strategy = \"area-weighted\"\n")?;
        assert_eq!(config.normal_strategy, NormalStrategy::AreaWeighted);
        assert!(config.compute_normals);
        assert_eq!(config.subdivision_steps, 1);
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let config = TrimmConfig {
            normal_strategy: NormalStrategy::SineEdgeLength,
            subdivision_steps: 3,
            compress_snapshots: false,
            ..TrimmConfig::default()
        };
        let file = NamedTempFile::new()?;
        config.save(file.path())?;
        assert_eq!(TrimmConfig::from_file(file.path())?, config);
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let vars: HashMap<&str, &str> = [
            ("TRIMM_NORMAL_STRATEGY", "uniform"),
            ("TRIMM_COMPUTE_NORMALS", "false"),
            ("TRIMM_SUBDIVISION_STEPS", "4"),
            ("TRIMM_COMPRESS_SNAPSHOTS", "not-a-bool"),
        ]
        .into_iter()
        .collect();

        let mut config = TrimmConfig::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()))?;
        assert_eq!(config.normal_strategy, NormalStrategy::Uniform);
        assert!(!config.compute_normals);
        assert_eq!(config.subdivision_steps, 4);
        // Unparseable booleans leave the value alone
        assert!(config.compress_snapshots);

        let options = config.rebuild_options();
        assert_eq!(options.normal_strategy, NormalStrategy::Uniform);
        assert!(!options.compute_normals);
        Ok(())
    }

    #[test]
    fn test_bad_strategy_is_an_error() {
        let mut config = TrimmConfig::default();
        let err = config
            .apply_env(|key| (key == "TRIMM_NORMAL_STRATEGY").then(|| "bogus".to_string()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("bogus"));
    }
}
