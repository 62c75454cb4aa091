//! Experiment configuration: the groups under comparison and their target EC.
//!
//! An [`ExperimentConfig`] is an explicit value handed to the loaders and the
//! aggregator, so several configurations can coexist in one process.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::normalize::normalize_name;

/// One experimental cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Human-readable identifier, also used in file and sheet names.
    pub name: String,
    /// Target electrical conductivity of the nutrient solution.
    pub target_ec: f64,
    /// Optional display color (e.g. `"#2ca02c"`) for presentation layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Group {
    pub fn new(name: impl Into<String>, target_ec: f64) -> Self {
        Self {
            name: name.into(),
            target_ec,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// On-disk shape of an experiment file.
#[derive(Debug, Deserialize)]
struct ExperimentFile {
    groups: Vec<Group>,
}

/// Validated, ordered set of groups.
///
/// Group names are stored NFC-normalized and are unique after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentConfig {
    groups: Vec<Group>,
}

impl ExperimentConfig {
    /// Validate and normalize `groups`.
    ///
    /// Fails when the list is empty, a name is blank, a name repeats after
    /// normalization, or a target EC is not a positive finite number.
    pub fn new(groups: Vec<Group>) -> Result<Self> {
        if groups.is_empty() {
            return Err(DashboardError::Config(
                "experiment must define at least one group".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(groups.len());

        for mut group in groups {
            group.name = normalize_name(group.name.trim());
            if group.name.is_empty() {
                return Err(DashboardError::Config("group name is empty".to_string()));
            }
            if !(group.target_ec.is_finite() && group.target_ec > 0.0) {
                return Err(DashboardError::Config(format!(
                    "group '{}' has invalid target EC {}",
                    group.name, group.target_ec
                )));
            }
            if !seen.insert(group.name.clone()) {
                return Err(DashboardError::Config(format!(
                    "group '{}' is defined more than once",
                    group.name
                )));
            }
            normalized.push(group);
        }

        Ok(Self { groups: normalized })
    }

    /// Load an experiment definition from a JSON file.
    ///
    /// ```json
    /// { "groups": [ { "name": "송도고", "target_ec": 1.0, "color": "#1f77b4" } ] }
    /// ```
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| DashboardError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let file: ExperimentFile = serde_json::from_str(&content)?;
        Self::new(file.groups)
    }

    /// Groups in configuration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look up a group by name under NFC normalization.
    pub fn group(&self, name: &str) -> Option<&Group> {
        let key = normalize_name(name);
        self.groups.iter().find(|g| g.name == key)
    }

    pub fn target_ec(&self, name: &str) -> Option<f64> {
        self.group(name).map(|g| g.target_ec)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for ExperimentConfig {
    /// The four-school polar plant EC trial.
    fn default() -> Self {
        Self {
            groups: vec![
                Group::new("송도고", 1.0).with_color("#1f77b4"),
                Group::new("하늘고", 2.0).with_color("#2ca02c"),
                Group::new("아라고", 4.0).with_color("#ff7f0e"),
                Group::new("동산고", 8.0).with_color("#d62728"),
            ],
        }
    }
}
