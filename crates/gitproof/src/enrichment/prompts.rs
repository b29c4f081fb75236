use super::EnrichmentError;
use crate::analysis::ProfileAnalysis;
use crate::comparison::ComparisonNarrative;
use serde::Deserialize;

pub fn profile_summary_prompt(analysis: &ProfileAnalysis) -> String {
    let scoring = &analysis.scoring;
    let metrics = &scoring.metrics;
    let acceptance = analysis
        .pull_requests
        .map(|stats| stats.acceptance_rate())
        .unwrap_or(0.0);

    format!(
        "Write a 2-sentence professional summary for a developer profile.\n\n\
         Developer: {name}\n\
         Calculated Score: {score}/10 (Grade: {grade})\n\
         Key Strength: {strength}\n\n\
         Bio: {bio}\n\
         Company: {company}\n\
         Top Languages: {languages}\n\n\
         Context:\n\
         - Endurance: {endurance}\n\
         - Productivity: {productivity}\n\
         - Reliability: {reliability} (PR Acceptance: {acceptance:.0}%)\n\
         - Impact: {impact}\n\
         - Mastery: {mastery}\n\n\
         Output JSON: {{ \"summary\": \"string\" }}",
        name = analysis.full_name,
        score = scoring.score,
        grade = scoring.grade,
        strength = metrics.strongest().kind,
        bio = analysis.bio,
        company = analysis.company.as_deref().unwrap_or("n/a"),
        languages = analysis.tech_stack.join(", "),
        endurance = metrics.endurance.value,
        productivity = metrics.productivity.value,
        reliability = metrics.reliability.value,
        acceptance = acceptance * 100.0,
        impact = metrics.impact.value,
        mastery = metrics.mastery.value,
    )
}

pub fn comparison_prompt(first: &ProfileAnalysis, second: &ProfileAnalysis) -> String {
    format!(
        "Compare these two GitHub developers head-to-head.\n\n\
         Developer 1: {}\n\n\
         Developer 2: {}\n\n\
         Task:\n\
         1. Write a headline naming the stronger developer.\n\
         2. Write a 2-3 sentence paragraph of reasoning.\n\
         3. Provide 4 bullet point \"Key Insights\" comparing specific data points.\n\n\
         Output JSON: {{ \"headline\": \"string\", \"reasoning\": \"string\", \"insights\": [\"string\"] }}",
        developer_block(first),
        developer_block(second),
    )
}

fn developer_block(analysis: &ProfileAnalysis) -> String {
    let scoring = &analysis.scoring;
    let metrics = &scoring.metrics;
    format!(
        "{} (@{})\n\
         - Score: {} ({})\n\
         - Metrics: endurance {}, productivity {}, impact {}, reliability {}, mastery {}\n\
         - Repos: {}, Followers: {}, Total Stars: {}\n\
         - Total Contributions (Year): {}, Streak: {}\n\
         - Top Languages: {}",
        analysis.full_name,
        analysis.username,
        scoring.score,
        scoring.grade,
        metrics.endurance.value,
        metrics.productivity.value,
        metrics.impact.value,
        metrics.reliability.value,
        metrics.mastery.value,
        analysis.repositories,
        analysis.followers,
        analysis.total_stars,
        optional_count(analysis.total_contributions),
        optional_count(analysis.longest_streak),
        analysis.tech_stack.join(", "),
    )
}

fn optional_count(value: Option<u64>) -> String {
    value
        .map(|count| count.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

#[derive(Deserialize)]
struct ComparisonResponse {
    headline: Option<String>,
    reasoning: Option<String>,
    insights: Option<Vec<String>>,
}

pub fn parse_summary(raw: &str) -> Result<String, EnrichmentError> {
    let response: SummaryResponse = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| EnrichmentError::Malformed(err.to_string()))?;
    non_blank(response.summary, "summary")
}

pub fn parse_comparison(raw: &str) -> Result<ComparisonNarrative, EnrichmentError> {
    let response: ComparisonResponse = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| EnrichmentError::Malformed(err.to_string()))?;

    let insights: Vec<String> = response
        .insights
        .unwrap_or_default()
        .into_iter()
        .map(|insight| insight.trim().to_string())
        .filter(|insight| !insight.is_empty())
        .collect();
    if insights.is_empty() {
        return Err(EnrichmentError::Malformed("missing insights".to_string()));
    }

    Ok(ComparisonNarrative {
        headline: non_blank(response.headline, "headline")?,
        reasoning: non_blank(response.reasoning, "reasoning")?,
        insights,
    })
}

fn non_blank(value: Option<String>, field: &str) -> Result<String, EnrichmentError> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| EnrichmentError::Malformed(format!("missing {field}")))
}

// Providers occasionally wrap JSON in a markdown fence.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|body| body.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
