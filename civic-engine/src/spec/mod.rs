//! Survey reference data: domains, axes and items.
//!
//! A [`SurveySpec`] is loaded once (from the bundled TOML or a file on disk),
//! validated, and then served read-only through a [`SpecRepository`].

mod model;
mod repository;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

pub use model::{Axis, AxisKey, AxisRange, Domain, GovernmentLevel, Item};
pub use repository::{SpecRepository, StaticSpecRepository};

use crate::error::{EngineError, Result};
use crate::types::{AxisId, DomainId, ItemId};

const BUNDLED_SURVEY: &str = include_str!("../../data/survey.toml");

/// On-disk layout of a survey spec, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
struct SpecDocument {
    #[serde(default)]
    domains: Vec<Domain>,
    #[serde(default)]
    axes: Vec<Axis>,
    #[serde(default)]
    items: Vec<Item>,
}

/// Validated survey reference data with ID lookups.
///
/// Declaration order is preserved; the selector uses it to break ties.
#[derive(Debug, Clone)]
pub struct SurveySpec {
    domains: Vec<Domain>,
    axes: Vec<Axis>,
    items: Vec<Item>,
    domain_index: HashMap<DomainId, usize>,
    axis_index: HashMap<AxisId, usize>,
    item_index: HashMap<ItemId, usize>,
}

impl SurveySpec {
    /// Build and validate a spec from its parts.
    pub fn new(domains: Vec<Domain>, axes: Vec<Axis>, items: Vec<Item>) -> Result<Self> {
        if domains.is_empty() {
            return Err(EngineError::InvalidSpec("no domains defined".into()));
        }

        let domain_index = index_unique(domains.iter().map(|d| &d.id), "domain")?;
        let axis_index = index_unique(axes.iter().map(|a| &a.id), "axis")?;
        let item_index = index_unique(items.iter().map(|i| &i.id), "item")?;

        for axis in &axes {
            if !domain_index.contains_key(&axis.domain_id) {
                return Err(EngineError::InvalidSpec(format!(
                    "axis {} references unknown domain {}",
                    axis.id, axis.domain_id
                )));
            }
            if !axis.range.is_valid() {
                return Err(EngineError::InvalidSpec(format!(
                    "axis {} has an empty range [{}, {}]",
                    axis.id, axis.range.min, axis.range.max
                )));
            }
        }

        for item in &items {
            if item.axes.is_empty() {
                return Err(EngineError::InvalidSpec(format!(
                    "item {} has no axes",
                    item.id
                )));
            }
            let mut seen = HashSet::new();
            for key in &item.axes {
                if !axis_index.contains_key(&key.axis_id) {
                    return Err(EngineError::InvalidSpec(format!(
                        "item {} references unknown axis {}",
                        item.id, key.axis_id
                    )));
                }
                if !seen.insert(&key.axis_id) {
                    return Err(EngineError::InvalidSpec(format!(
                        "item {} lists axis {} twice",
                        item.id, key.axis_id
                    )));
                }
                if !key.key.is_finite() || key.key == 0.0 {
                    return Err(EngineError::InvalidSpec(format!(
                        "item {} has an invalid key {} for axis {}",
                        item.id, key.key, key.axis_id
                    )));
                }
            }
        }

        Ok(Self {
            domains,
            axes,
            items,
            domain_index,
            axis_index,
            item_index,
        })
    }

    /// The survey shipped with the engine.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_SURVEY)
    }

    /// Parse and validate a spec from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let doc: SpecDocument = toml::from_str(contents)?;
        Self::try_from(doc)
    }

    /// Load and validate a spec from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn domain(&self, id: &DomainId) -> Option<&Domain> {
        self.domain_index.get(id).map(|&i| &self.domains[i])
    }

    pub fn axis(&self, id: &AxisId) -> Option<&Axis> {
        self.axis_index.get(id).map(|&i| &self.axes[i])
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.item_index.get(id).map(|&i| &self.items[i])
    }

    /// IDs of every domain, in declaration order.
    pub fn domain_ids(&self) -> Vec<DomainId> {
        self.domains.iter().map(|d| d.id.clone()).collect()
    }

    /// Axes belonging to `domain_id`, in declaration order.
    pub fn axes_in_domain<'a>(&'a self, domain_id: &'a DomainId) -> impl Iterator<Item = &'a Axis> {
        self.axes.iter().filter(move |a| &a.domain_id == domain_id)
    }

    /// Domain owning `axis_id`.
    pub fn domain_of_axis(&self, axis_id: &AxisId) -> Option<&DomainId> {
        self.axis(axis_id).map(|a| &a.domain_id)
    }

    /// Distinct domains touched by an item's axes, in the item's axis order.
    pub fn item_domains(&self, item: &Item) -> Vec<&DomainId> {
        let mut domains: Vec<&DomainId> = Vec::new();
        for key in &item.axes {
            if let Some(domain) = self.domain_of_axis(&key.axis_id)
                && !domains.contains(&domain)
            {
                domains.push(domain);
            }
        }
        domains
    }
}

impl TryFrom<SpecDocument> for SurveySpec {
    type Error = EngineError;

    fn try_from(doc: SpecDocument) -> Result<Self> {
        Self::new(doc.domains, doc.axes, doc.items)
    }
}

fn index_unique<'a, K>(ids: impl Iterator<Item = &'a K>, kind: &str) -> Result<HashMap<K, usize>>
where
    K: Clone + Eq + std::hash::Hash + std::fmt::Display + 'a,
{
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id.clone(), i).is_some() {
            return Err(EngineError::InvalidSpec(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(index)
}
