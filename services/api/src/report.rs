use crate::infra::{read_payload, InMemoryLeaderboardStore};
use chrono::{DateTime, Utc};
use clap::Args;
use gitproof::analysis::{ComparisonReport, ProfileAnalysis, ProfileAnalysisService};
use gitproof::config::AppConfig;
use gitproof::enrichment::NoopEnricher;
use gitproof::error::AppError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Upstream payload JSON (tagged with "source": "graphql" | "rest")
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Emit the full analysis as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// First upstream payload JSON
    #[arg(long)]
    pub(crate) first: PathBuf,
    /// Second upstream payload JSON
    #[arg(long)]
    pub(crate) second: PathBuf,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Emit the comparison as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

type CliService = ProfileAnalysisService<InMemoryLeaderboardStore, NoopEnricher>;

fn offline_service() -> Result<CliService, AppError> {
    let config = AppConfig::load()?;
    Ok(ProfileAnalysisService::from_config(
        &config,
        Arc::new(InMemoryLeaderboardStore::default()),
        Arc::new(NoopEnricher),
    ))
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let payload = read_payload(&args.input)?;
    let now = args.as_of.unwrap_or_else(Utc::now);
    let service = offline_service()?;

    let outcome = service.analyze(&payload, now).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.analysis)?);
    } else {
        print!("{}", AnalysisText(&outcome.analysis));
    }
    Ok(())
}

pub(crate) async fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let first = read_payload(&args.first)?;
    let second = read_payload(&args.second)?;
    let now = args.as_of.unwrap_or_else(Utc::now);
    let service = offline_service()?;

    let report = service.compare(&first, &second, now).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ComparisonText(&report));
    }
    Ok(())
}

/// Plain-text view of one analysis.
pub(crate) struct AnalysisText<'a>(pub(crate) &'a ProfileAnalysis);

impl fmt::Display for AnalysisText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        let scoring = &analysis.scoring;

        writeln!(f, "{} (@{})", analysis.full_name, analysis.username)?;
        writeln!(
            f,
            "- GitProof score {} | grade {} | percentile {}",
            scoring.score, scoring.grade, scoring.percentile
        )?;
        writeln!(
            f,
            "- {:.1} years on GitHub | {} repos | {} stars | {} followers",
            analysis.years_on_github, analysis.repositories, analysis.total_stars, analysis.followers
        )?;
        if !analysis.tech_stack.is_empty() {
            writeln!(f, "- Tech stack: {}", analysis.tech_stack.join(", "))?;
        }
        if analysis.top_repo.stars > 0 {
            writeln!(
                f,
                "- Top repository: {} ({} stars)",
                analysis.top_repo.name, analysis.top_repo.stars
            )?;
        }
        writeln!(f, "Metrics:")?;
        for metric in scoring.metrics.iter() {
            writeln!(f, "  - {}: {:.1} ({})", metric.label, metric.value, metric.rationale)?;
        }
        writeln!(f, "Summary: {}", analysis.summary)
    }
}

pub(crate) struct ComparisonText<'a>(pub(crate) &'a ComparisonReport);

impl fmt::Display for ComparisonText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let comparison = &report.comparison;

        writeln!(f, "{}", comparison.headline)?;
        writeln!(
            f,
            "- {}: {} ({}) vs {}: {} ({})",
            report.first.username,
            report.first.scoring.score,
            report.first.scoring.grade,
            report.second.username,
            report.second.scoring.score,
            report.second.scoring.grade
        )?;
        writeln!(f, "{}", comparison.reasoning)?;
        writeln!(f, "Key insights:")?;
        for insight in &comparison.insights {
            writeln!(f, "  - {insight}")?;
        }
        Ok(())
    }
}
