//! Named configuration presets
//!
//! A preset is a [`PipelineConfig`] stored under a name. Stores are plain
//! repositories: callers load a config and hand it to the pipeline, which
//! never reaches into a store itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{CalibrationError, Result};

/// File extension used by [`DirectoryPresetStore`]
const PRESET_EXTENSION: &str = "json";

/// Load / save access to named presets
pub trait PresetStore {
    /// Names of all stored presets, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Load a preset by name
    fn load(&self, name: &str) -> Result<PipelineConfig>;

    /// Store a preset, replacing any preset with the same name
    fn save(&mut self, name: &str, config: &PipelineConfig) -> Result<()>;

    /// Remove a preset
    fn delete(&mut self, name: &str) -> Result<()>;

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|n| n == name))
    }
}

/// Validate a preset name to prevent path traversal.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(CalibrationError::InvalidPresetName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name cannot be empty");
    }
    if name.contains('/') || name.contains('\\') {
        return reject("name cannot contain path separators");
    }
    if name.contains("..") {
        return reject("name cannot contain '..'");
    }
    if name.starts_with('.') {
        return reject("name cannot start with '.'");
    }
    if name.contains('\0') {
        return reject("name cannot contain null bytes");
    }
    Ok(())
}

/// Presets stored as one JSON file per name in a directory
#[derive(Debug, Clone)]
pub struct DirectoryPresetStore {
    root: PathBuf,
}

impl DirectoryPresetStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            CalibrationError::io(
                format!("Failed to create presets directory {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_preset_name(name)?;
        Ok(self.root.join(format!("{name}.{PRESET_EXTENSION}")))
    }
}

impl PresetStore for DirectoryPresetStore {
    fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| CalibrationError::io("Failed to read presets directory", e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| CalibrationError::io("Failed to read directory entry", e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PRESET_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<PipelineConfig> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(CalibrationError::PresetNotFound {
                name: name.to_string(),
            });
        }
        PipelineConfig::from_json_file(&path)
    }

    fn save(&mut self, name: &str, config: &PipelineConfig) -> Result<()> {
        let path = self.path_for(name)?;
        config.validate()?;
        config.to_json_file(&path)?;
        tracing::debug!(preset = name, path = %path.display(), "saved preset");
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CalibrationError::PresetNotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(CalibrationError::io(
                format!("Failed to delete preset {name}"),
                e,
            )),
        }
    }
}

/// Presets kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPresetStore {
    presets: BTreeMap<String, PipelineConfig>,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresetStore for MemoryPresetStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.presets.keys().cloned().collect())
    }

    fn load(&self, name: &str) -> Result<PipelineConfig> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| CalibrationError::PresetNotFound {
                name: name.to_string(),
            })
    }

    fn save(&mut self, name: &str, config: &PipelineConfig) -> Result<()> {
        validate_preset_name(name)?;
        config.validate()?;
        self.presets.insert(name.to_string(), config.clone());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.presets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CalibrationError::PresetNotFound {
                name: name.to_string(),
            })
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.presets.contains_key(name))
    }
}
