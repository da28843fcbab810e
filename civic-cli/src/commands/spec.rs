//! Survey spec commands.
//!
//! `show` prints the domain and axis catalogue, `check` validates a spec file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use civic_engine::{DomainId, SurveySpec};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::config::ConfigLoader;

/// Spec inspection arguments.
#[derive(Args, Debug)]
pub struct SpecArgs {
    #[command(subcommand)]
    pub command: SpecCommands,
}

/// Spec subcommands.
#[derive(Subcommand, Debug)]
pub enum SpecCommands {
    /// List domains and axes with item counts
    Show {
        /// Survey spec file (defaults to configured or bundled survey)
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Only show this domain
        #[arg(long)]
        domain: Option<String>,
    },
    /// Validate a survey spec file
    Check {
        /// Path to the spec file
        path: PathBuf,
    },
}

/// Run spec command.
pub fn run(args: SpecArgs) -> Result<()> {
    match args.command {
        SpecCommands::Show { spec, domain } => {
            let path = match spec {
                Some(path) => Some(path),
                None => ConfigLoader::load()?.spec.path,
            };
            let spec = super::load_spec(path.as_deref())?;
            show(&spec, domain.map(DomainId::from).as_ref())
        }
        SpecCommands::Check { path } => {
            let spec = super::load_spec(Some(path.as_path()))?;
            println!("{}", summary(&spec));
            Ok(())
        }
    }
}

fn summary(spec: &SurveySpec) -> String {
    format!(
        "OK: {} domains, {} axes, {} items",
        spec.domains().len(),
        spec.axes().len(),
        spec.items().len()
    )
}

fn show(spec: &SurveySpec, only: Option<&DomainId>) -> Result<()> {
    if let Some(id) = only
        && spec.domain(id).is_none()
    {
        bail!("Domain '{}' not found", id);
    }

    println!("{}", axis_table(spec, only));
    println!("{}", summary(spec));
    Ok(())
}

fn axis_table(spec: &SurveySpec, only: Option<&DomainId>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Domain").fg(Color::Cyan),
        Cell::new("Axis").fg(Color::Cyan),
        Cell::new("Low pole").fg(Color::Cyan),
        Cell::new("High pole").fg(Color::Cyan),
        Cell::new("Items").fg(Color::Cyan),
    ]);

    for domain in spec.domains() {
        if only.is_some_and(|id| id != &domain.id) {
            continue;
        }
        for axis in spec.axes_in_domain(&domain.id) {
            let items = spec
                .items()
                .iter()
                .filter(|item| item.touches_axis(&axis.id))
                .count();
            table.add_row(vec![
                Cell::new(&domain.name),
                Cell::new(&axis.name),
                Cell::new(&axis.pole_low),
                Cell::new(&axis.pole_high),
                Cell::new(items),
            ]);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_bundled_survey() {
        let spec = SurveySpec::bundled().unwrap();
        assert_eq!(summary(&spec), "OK: 6 domains, 12 axes, 42 items");
    }

    #[test]
    fn axis_table_filters_by_domain() {
        let spec = SurveySpec::bundled().unwrap();
        let econ = DomainId::from("econ");
        assert_eq!(axis_table(&spec, Some(&econ)).row_iter().count(), 2);
        assert_eq!(axis_table(&spec, None).row_iter().count(), 12);
    }

    #[test]
    fn show_rejects_unknown_domain() {
        let spec = SurveySpec::bundled().unwrap();
        assert!(show(&spec, Some(&DomainId::from("astrology"))).is_err());
    }

    #[test]
    fn check_rejects_invalid_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[[items]]\nid = \"x\"\ntext = \"t\"\naxes = []\n").unwrap();

        let result = run(SpecArgs {
            command: SpecCommands::Check { path },
        });
        assert!(result.is_err());
    }
}
