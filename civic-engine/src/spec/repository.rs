//! Read-only access to survey reference data.

use std::path::Path;

use super::{Item, SurveySpec};
use crate::error::Result;
use crate::types::ItemId;

/// Source of survey reference data.
///
/// The engine never writes through this trait; implementations may load
/// from disk, a database, or memory.
pub trait SpecRepository: Send + Sync {
    /// The full validated survey spec.
    fn spec(&self) -> &SurveySpec;

    /// Look up a single item.
    fn item_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.spec().item(id)
    }
}

/// Repository backed by a spec held in memory for the process lifetime.
#[derive(Debug, Clone)]
pub struct StaticSpecRepository {
    spec: SurveySpec,
}

impl StaticSpecRepository {
    pub fn new(spec: SurveySpec) -> Self {
        Self { spec }
    }

    /// Repository over the bundled survey.
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(SurveySpec::bundled()?))
    }

    /// Repository over a TOML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let spec = SurveySpec::from_path(path)?;
        tracing::info!(
            path = %path.display(),
            domains = spec.domains().len(),
            items = spec.items().len(),
            "Loaded survey spec"
        );
        Ok(Self::new(spec))
    }
}

impl SpecRepository for StaticSpecRepository {
    fn spec(&self) -> &SurveySpec {
        &self.spec
    }
}
