//! Task-based model recommendation.
//!
//! [`analyze_prompt`] classifies a prompt; [`recommendations`] ranks the
//! catalog for that classification. Both are pure: the same input and
//! catalog always give the same ranked output.

mod analysis;
mod scoring;


pub use analysis::{analyze_prompt, TaskAnalysis};
pub use scoring::ExpectedSpeed;

use crate::constants::DEFAULT_RECOMMENDED_MODEL;
use crate::models::{ModelCatalog, ModelDescriptor};

/// A ranked catalog entry.
#[derive(Debug, Clone)]
pub struct Recommendation<'a> {
    pub model: &'a ModelDescriptor,
    /// Fitness in 0..=100.
    pub score: u8,
    /// One-line summary of the strongest reason.
    pub reason: String,
    pub tags: Vec<&'static str>,
    /// Estimated USD cost of a typical exchange of the analysed length.
    pub estimated_cost: f64,
    pub expected_speed: ExpectedSpeed,
    /// Every scoring contribution, e.g. "base 50, task fit +45".
    pub match_explanation: String,
}

/// Ranks the catalog for `analysis`, best first, at most `max_results` entries.
///
/// Ties keep catalog order.
pub fn recommendations<'a>(
    catalog: &'a ModelCatalog,
    analysis: &TaskAnalysis,
    max_results: usize,
) -> Vec<Recommendation<'a>> {
    let (prompt_tokens, completion_tokens) = scoring::expected_tokens(analysis.length);

    let mut ranked: Vec<Recommendation<'a>> = catalog
        .iter()
        .map(|model| {
            let (score, parts) = scoring::score_model(model, analysis);

            let mut tags: Vec<&'static str> = parts.iter().filter_map(|c| c.tag).collect();
            tags.dedup();

            let reason = parts
                .iter()
                .filter(|c| c.points > 0)
                .max_by_key(|c| c.points)
                .map(|c| format!("Best match on {} for {} tasks", c.label, scoring::task_tag(analysis.task)))
                .unwrap_or_else(|| "General-purpose option".to_string());

            let mut match_explanation = format!("base {}", scoring::BASE_SCORE);
            for c in &parts {
                match_explanation.push_str(&format!(", {} {:+}", c.label, c.points));
            }

            Recommendation {
                model,
                score,
                reason,
                tags,
                estimated_cost: crate::tokens::estimate_cost(model, prompt_tokens, completion_tokens),
                expected_speed: scoring::expected_speed(model.id),
                match_explanation,
            }
        })
        .collect();

    // Stable sort keeps catalog order among equal scores.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(max_results);
    ranked
}

/// The single best model id for `analysis`, or the default id when the
/// catalog is empty.
pub fn best_model_for_task<'a>(catalog: &'a ModelCatalog, analysis: &TaskAnalysis) -> &'a str {
    if catalog.is_empty() {
        return DEFAULT_RECOMMENDED_MODEL;
    }
    recommendations(catalog, analysis, 1)
        .first()
        .map_or(DEFAULT_RECOMMENDED_MODEL, |r| r.model.id)
}
