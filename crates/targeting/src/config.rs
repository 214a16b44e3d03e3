use serde::{Deserialize, Serialize};
use sightline_core::RegistryKey;
use sightline_world::{BlockDescriptor, Entity, FluidClip};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// How fluid surfaces take part in block targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidMode {
    /// Fluids are never targeted.
    None,
    /// Fluids are targeted only when the strict cast finds nothing.
    #[default]
    Fallback,
    /// Fluid surfaces always stop the ray.
    Any,
}

impl FluidMode {
    /// Fluid inclusion for the primary block cast.
    pub fn primary_clip(self) -> FluidClip {
        match self {
            FluidMode::None | FluidMode::Fallback => FluidClip::None,
            FluidMode::Any => FluidClip::Any,
        }
    }
}

/// Errors from loading or saving [`TargetingConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("failed to access targeting config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse targeting config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Serializing the config failed.
    #[error("failed to serialize targeting config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// `extended_reach` is negative, infinite or NaN.
    #[error("extended_reach must be a finite, non-negative distance (got {0})")]
    InvalidReach(f64),
}

/// User-tunable targeting settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Added to both interaction ranges.
    pub extended_reach: f64,
    /// Fluid participation.
    pub fluid_mode: FluidMode,
    /// Blocks never reported as targets.
    pub hidden_blocks: Vec<RegistryKey>,
    /// Entity types never reported as targets.
    pub hidden_entities: Vec<RegistryKey>,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            extended_reach: 0.0,
            fluid_mode: FluidMode::Fallback,
            hidden_blocks: vec![
                RegistryKey::builtin("barrier"),
                RegistryKey::builtin("light"),
            ],
            hidden_entities: Vec::new(),
        }
    }
}

impl TargetingConfig {
    /// Load from `path`, failing on I/O, parse or validation errors.
    pub fn try_load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values TOML accepts but targeting cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.extended_reach.is_finite() || self.extended_reach < 0.0 {
            return Err(ConfigError::InvalidReach(self.extended_reach));
        }
        Ok(())
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_from_path(path: &Path) -> Self {
        match Self::try_load_from_path(path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Targeting config not found at {}. Using defaults",
                    path.display()
                );
                Self::default()
            }
            Err(err) => {
                warn!("{err} ({}). Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write pretty TOML to `path`, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

/// Global "never a target" rules compiled from the config.
#[derive(Debug, Clone, Default)]
pub struct Suppression {
    blocks: BTreeSet<RegistryKey>,
    entities: BTreeSet<RegistryKey>,
}

impl Suppression {
    /// Compile the hide lists of `config`.
    pub fn from_config(config: &TargetingConfig) -> Self {
        Self {
            blocks: config.hidden_blocks.iter().cloned().collect(),
            entities: config.hidden_entities.iter().cloned().collect(),
        }
    }

    /// Whether cells of this block are never reported.
    pub fn hides_block(&self, block: &BlockDescriptor) -> bool {
        self.blocks.contains(&block.key)
    }

    /// Whether this entity's type is never reported.
    pub fn hides_entity(&self, entity: &Entity) -> bool {
        self.entities.contains(&entity.type_key)
    }
}
