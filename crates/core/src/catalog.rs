//! Check catalog model and YAML loader.
//!
//! The catalog is read once per run and never mutated afterwards. It groups
//! [`CheckItem`]s under three sections (`os`, `kubernetes`, `services`);
//! missing or empty sections are simply empty.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;
use crate::evaluate::usage::UsageMetric;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Section a check item belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    #[serde(rename = "OS")]
    Os,
    Kubernetes,
    Services,
}

impl Category {
    /// All categories in run order.
    pub const ALL: [Category; 3] = [Category::Os, Category::Kubernetes, Category::Services];

    /// Display label, also used as the summary key.
    pub fn label(self) -> &'static str {
        match self {
            Self::Os => "OS",
            Self::Kubernetes => "Kubernetes",
            Self::Services => "Services",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CheckItem
// ---------------------------------------------------------------------------

/// Declared comparison mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// `name:available/desired` listing, see [`crate::evaluate::replica`].
    ReplicaMatch,
    /// Any value this engine does not know; routed as if absent.
    #[serde(other)]
    Unrecognized,
}

/// Declarative definition of one probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    /// Unique within its category, e.g. `K8S-002`.
    pub id: String,
    pub name: String,
    /// Stamped from the section the item was declared in.
    #[serde(skip)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    /// Opaque to the engine; handed to the probe runner as-is.
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub unit: String,
    /// Marker substring expected on every line of a listing.
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub check_type: Option<CheckType>,
    /// Marks the item as a per-node utilization report.
    #[serde(default)]
    pub usage_metric: Option<UsageMetric>,
}

impl CheckItem {
    /// Bare item with no comparison mode. Used mostly by tests and demo tooling.
    pub fn new(
        category: Category,
        id: impl Into<String>,
        name: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
            command: command.into(),
            threshold: None,
            unit: String::new(),
            expected: None,
            check_type: None,
            usage_metric: None,
        }
    }
}

// ---------------------------------------------------------------------------
// CheckCatalog
// ---------------------------------------------------------------------------

/// The three catalog sections, each in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSections {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub os: Vec<CheckItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kubernetes: Vec<CheckItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<CheckItem>,
}

/// Ordered-by-category list of check items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckCatalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    check_items: CatalogSections,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CheckCatalog {
    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut catalog: CheckCatalog = serde_yaml::from_str(yaml)?;
        catalog.stamp_categories();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            items = catalog.len(),
            "Loaded check catalog",
        );
        Ok(catalog)
    }

    /// Build a catalog from items that already carry their category.
    ///
    /// Items keep their relative order within each category.
    pub fn from_items(items: impl IntoIterator<Item = CheckItem>) -> Result<Self, CatalogError> {
        let mut sections = CatalogSections::default();
        for item in items {
            match item.category {
                Category::Os => sections.os.push(item),
                Category::Kubernetes => sections.kubernetes.push(item),
                Category::Services => sections.services.push(item),
            }
        }
        let catalog = Self {
            check_items: sections,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Items of one section.
    pub fn section(&self, category: Category) -> &[CheckItem] {
        match category {
            Category::Os => &self.check_items.os,
            Category::Kubernetes => &self.check_items.kubernetes,
            Category::Services => &self.check_items.services,
        }
    }

    /// All items: `os`, then `kubernetes`, then `services`.
    pub fn entries(&self) -> impl Iterator<Item = &CheckItem> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.section(category).iter())
    }

    pub fn len(&self) -> usize {
        Category::ALL
            .iter()
            .map(|category| self.section(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stamp_categories(&mut self) {
        let sections = &mut self.check_items;
        for (category, items) in [
            (Category::Os, &mut sections.os),
            (Category::Kubernetes, &mut sections.kubernetes),
            (Category::Services, &mut sections.services),
        ] {
            for item in items.iter_mut() {
                item.category = category;
            }
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for item in self.section(category) {
                if !seen.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateId {
                        category,
                        id: item.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
