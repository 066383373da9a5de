//! Workflow loader - reads definitions from YAML or JSON files
//!
//! Used to seed the engine at startup and by the `validate` command.

use super::engine::WorkflowEngine;
use super::types::WorkflowDefinition;
use super::validator::DefinitionValidator;
use crate::error::{Result, TransitError};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads workflow definitions from disk
pub struct WorkflowLoader;

impl WorkflowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a definition, picking the format from the file extension
    pub fn load_definition<P: AsRef<Path>>(&self, path: P) -> Result<WorkflowDefinition> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match extension(path).as_deref() {
            Some("json") => Self::parse_json(&content),
            Some("yaml") | Some("yml") => Self::parse_yaml(&content),
            _ => Err(TransitError::config(format!(
                "Unsupported definition file: {}",
                path.display()
            ))),
        }
    }

    /// Load every `.yaml`, `.yml` and `.json` file in `dir`, in file name order
    ///
    /// Files that fail to parse are returned as errors alongside their path so
    /// the caller decides whether to skip or abort.
    pub fn load_dir<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> Result<Vec<(PathBuf, Result<WorkflowDefinition>)>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && matches!(
                        extension(path).as_deref(),
                        Some("json") | Some("yaml") | Some("yml")
                    )
            })
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let loaded = self.load_definition(&path);
                (path, loaded)
            })
            .collect())
    }

    /// Load a single definition and run it through `validator`
    ///
    /// The id is checked in isolation; nothing is registered.
    pub fn check_definition<P: AsRef<Path>>(
        &self,
        path: P,
        validator: &DefinitionValidator,
    ) -> Result<WorkflowDefinition> {
        let def = self.load_definition(path)?;
        validator.validate(&def, |_| false)?;
        Ok(def)
    }

    /// Register every definition found in `dir` with `engine`
    ///
    /// Files that fail to parse or validate are logged and skipped. Returns
    /// the number of definitions registered.
    pub async fn seed<P: AsRef<Path>>(&self, engine: &WorkflowEngine, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        let mut registered = 0;

        for (path, loaded) in self.load_dir(dir)? {
            match loaded {
                Ok(def) => match engine.create_definition(def).await {
                    Ok(_) => registered += 1,
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Failed to load {}: {}", path.display(), e),
            }
        }

        log::info!(
            "Registered {} workflow definitions from {}",
            registered,
            dir.display()
        );
        Ok(registered)
    }

    /// Parse a definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<WorkflowDefinition> {
        let def: WorkflowDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Parse a definition from a JSON string
    pub fn parse_json(content: &str) -> Result<WorkflowDefinition> {
        let def: WorkflowDefinition = serde_json::from_str(content)?;
        Ok(def)
    }
}

impl Default for WorkflowLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
