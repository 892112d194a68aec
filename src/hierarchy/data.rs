//! Hierarchy snapshots as returned by the server.
//!
//! These are plain serde structures; [`HierarchyTree`](super::HierarchyTree)
//! turns them into browsable nodes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::HierarchyError;

/// Both hierarchies plus images outside any dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyData {
    #[serde(default)]
    pub projects: Vec<ProjectData>,

    #[serde(default)]
    pub category_groups: Vec<CategoryGroupData>,

    /// Images not contained in any dataset.
    #[serde(default)]
    pub orphan_images: Vec<ImageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub datasets: Vec<DatasetData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetData {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroupData {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<CategoryData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageData>,
}

impl HierarchyData {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, HierarchyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, HierarchyError> {
        let json = std::fs::read_to_string(path)?;
        let data = Self::from_json(&json)?;
        log::info!(
            "Loaded {} projects and {} category groups from {:?}",
            data.projects.len(),
            data.category_groups.len(),
            path
        );
        Ok(data)
    }

    /// Total number of nodes the snapshot produces.
    pub fn node_count(&self) -> usize {
        let projects: usize = self
            .projects
            .iter()
            .map(|p| 1 + p.datasets.iter().map(|d| 1 + d.images.len()).sum::<usize>())
            .sum();
        let groups: usize = self
            .category_groups
            .iter()
            .map(|g| 1 + g.categories.iter().map(|c| 1 + c.images.len()).sum::<usize>())
            .sum();
        projects + groups + self.orphan_images.len()
    }
}
