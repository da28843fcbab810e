pub mod serve;
pub mod simulate;
pub mod spec;

use std::path::Path;

use anyhow::{Context, Result};
use civic_engine::SurveySpec;

/// Load a survey spec from `path`, or the bundled survey when unset.
pub fn load_spec(path: Option<&Path>) -> Result<SurveySpec> {
    match path {
        Some(path) => SurveySpec::from_path(path)
            .with_context(|| format!("Failed to load survey spec from {}", path.display())),
        None => SurveySpec::bundled().context("Bundled survey spec is invalid"),
    }
}
