//! Scripted assessment runs.
//!
//! Drives a full session in-process, answering every question from a
//! repeating list of responses, then prints the final scores.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use civic_engine::{
    AssessmentManager, AssessmentSession, AxisScore, DomainId, EngineConfig, InMemorySessionStore,
    Response, SessionStore, SpecRepository, StaticSpecRepository, SurveySpec,
};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::config::ConfigLoader;

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Domains to assess (comma-separated; defaults to all)
    #[arg(long, value_delimiter = ',')]
    pub domains: Vec<String>,

    /// Responses to cycle through (strong_disagree, disagree, unsure, agree, strong_agree)
    #[arg(long, value_delimiter = ',', default_value = "agree")]
    pub responses: Vec<Response>,

    /// Survey spec file (defaults to configured or bundled survey)
    #[arg(long)]
    pub spec: Option<PathBuf>,

    /// Print each question as it is answered
    #[arg(long)]
    pub show_questions: bool,
}

/// A finished scripted run
#[derive(Debug)]
pub struct SimulationRun {
    pub session: AssessmentSession,
    pub scores: Vec<AxisScore>,
}

/// Run the simulate command
pub async fn run(args: SimulateArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let path = args.spec.clone().or(config.spec.path);
    let spec = super::load_spec(path.as_deref())?;
    let manager = build_manager(spec, config.engine);

    let domains: Vec<DomainId> = args
        .domains
        .iter()
        .map(|d| DomainId::from(d.as_str()))
        .collect();
    let run = simulate(&manager, &domains, &args.responses, args.show_questions).await?;

    println!("{}", score_table(&manager, &run.scores));
    let reason = run
        .session
        .completion_reason
        .map_or_else(|| "unknown".to_string(), |r| r.to_string());
    println!(
        "Completed after {} questions ({})",
        run.session.state.total_questions, reason
    );
    Ok(())
}

fn build_manager(spec: SurveySpec, config: EngineConfig) -> AssessmentManager {
    let spec: Arc<dyn SpecRepository> = Arc::new(StaticSpecRepository::new(spec));
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    AssessmentManager::new(spec, store, config)
}

/// Answer every question until the session completes
pub async fn simulate(
    manager: &AssessmentManager,
    domains: &[DomainId],
    responses: &[Response],
    show_questions: bool,
) -> Result<SimulationRun> {
    if responses.is_empty() {
        bail!("At least one response is required");
    }

    let selected = (!domains.is_empty()).then_some(domains);
    let started = manager.start_assessment(selected, None).await?;
    let session_id = started.session.id.clone();

    let mut question = started.first_question;
    let mut session = started.session;
    let mut answered = 0usize;
    while let Some(item) = question {
        let response = responses[answered % responses.len()];
        if show_questions {
            println!("{:>3}. [{}] {} -> {}", answered + 1, item.id, item.text, response);
        }
        let outcome = manager
            .submit_answer(&session_id, &item.id, response)
            .await?;
        answered += 1;
        question = outcome.next_question;
        session = outcome.session;
    }

    if session.is_in_progress() {
        bail!("Session {} has no questions to ask", session_id);
    }

    let scores = manager.session_scores(&session_id).await?;
    Ok(SimulationRun { session, scores })
}

fn score_table(manager: &AssessmentManager, scores: &[AxisScore]) -> Table {
    let spec = manager.spec();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Axis").fg(Color::Cyan),
        Cell::new("Leaning").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
        Cell::new("Confidence").fg(Color::Cyan),
        Cell::new("Answers").fg(Color::Cyan),
    ]);

    for score in scores {
        let Some(axis) = spec.axis(&score.axis_id) else {
            continue;
        };
        let leaning = if score.value > axis.range.midpoint() {
            axis.pole_high.as_str()
        } else if score.value < axis.range.midpoint() {
            axis.pole_low.as_str()
        } else {
            "Neutral"
        };
        table.add_row(vec![
            Cell::new(&axis.name),
            Cell::new(leaning),
            Cell::new(format!("{:+.2}", score.value)),
            Cell::new(format!("{:.0}%", score.confidence * 100.0)),
            Cell::new(score.n_answered),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_manager() -> AssessmentManager {
        build_manager(SurveySpec::bundled().unwrap(), EngineConfig::default())
    }

    #[tokio::test]
    async fn simulate_runs_to_completion() {
        let manager = bundled_manager();
        let domains = vec![DomainId::from("econ"), DomainId::from("health")];

        let run = simulate(&manager, &domains, &[Response::StrongAgree], false)
            .await
            .unwrap();

        assert!(run.session.is_completed());
        let total = run.session.state.total_questions;
        assert!((8..=15).contains(&total), "answered {total}");
        assert!(!run.scores.is_empty());
        assert_eq!(run.session.swipes.len(), total as usize);
    }

    #[tokio::test]
    async fn simulate_single_domain_completes() {
        let manager = bundled_manager();
        let domains = vec![DomainId::from("education")];

        let run = simulate(&manager, &domains, &[Response::Unsure], false)
            .await
            .unwrap();

        assert!(run.session.is_completed());
        assert!(run.session.completion_reason.is_some());
        assert!(run.session.state.total_questions <= 15);
    }

    #[tokio::test]
    async fn simulate_requires_responses() {
        let manager = bundled_manager();
        assert!(simulate(&manager, &[], &[], false).await.is_err());
    }

    #[test]
    fn score_table_has_row_per_score() {
        let manager = bundled_manager();
        let scores = vec![AxisScore {
            axis_id: "econ_markets".into(),
            value: 0.5,
            confidence: 0.4,
            n_answered: 2,
        }];
        assert_eq!(score_table(&manager, &scores).row_iter().count(), 1);
    }
}
