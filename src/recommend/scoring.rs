//! Heuristic fitness scoring of catalog models against a [`TaskAnalysis`].
//!
//! Every model starts at [`BASE_SCORE`] and collects additive bonuses from
//! marker substrings in its id. The final score is clamped to 0..=100.

use std::sync::LazyLock;

use regex::Regex;

use super::analysis::{Budget, Complexity, PromptLength, SpeedPreference, TaskAnalysis, TaskType};
use crate::models::ModelDescriptor;

pub(super) const BASE_SCORE: i32 = 50;

/// Marker → bonus for each task type. The largest matching bonus applies.
fn task_affinity(task: TaskType) -> &'static [(&'static str, i32)] {
    match task {
        TaskType::Code => &[
            ("codestral", 45),
            ("coder", 45),
            ("code", 40),
            ("claude", 30),
            ("deepseek", 25),
            ("gpt-4", 20),
            ("gpt-5", 20),
        ],
        TaskType::Creative => &[
            ("claude", 35),
            ("gpt-4o", 30),
            ("mistral-large", 30),
            ("llama", 20),
            ("gemini", 20),
        ],
        TaskType::Reasoning => &[
            ("deepseek-r1", 40),
            ("o3-", 40),
            ("o1", 40),
            ("gpt-5", 35),
            ("claude-3.7", 35),
            ("gemini-2.5-pro", 30),
            ("claude", 25),
        ],
        TaskType::Vision => &[
            ("vision", 40),
            ("gemini", 35),
            ("gpt-4o", 30),
            ("claude-3", 25),
        ],
        TaskType::Translation => &[
            ("gemini", 30),
            ("gpt-4o", 30),
            ("mistral", 25),
            ("qwen", 25),
            ("claude", 25),
        ],
        TaskType::Math => &[
            ("deepseek-r1", 40),
            ("o3-", 40),
            ("o1", 40),
            ("gpt-5", 30),
            ("qwen", 25),
            ("gpt-4", 20),
        ],
        TaskType::General => &[
            ("gpt-4o", 20),
            ("claude", 20),
            ("gemini", 15),
            ("deepseek-chat", 15),
            ("llama", 10),
        ],
    }
}

const FAST_MARKERS: &[&str] = &["flash", "mini", "haiku", "nano", "turbo", "7b", "8b"];
const QUALITY_MARKERS: &[&str] = &["pro", "opus", "large", "sonnet", "gpt-4o", "gpt-5", "70b"];
const CHEAP_MARKERS: &[&str] = &["mini", "flash", "haiku", "nano", "deepseek", "7b"];
const PREMIUM_MARKERS: &[&str] = &["opus", "pro", "large", "sonnet", "gpt-5", "gpt-4o"];
const TINY_MARKERS: &[&str] = &["mini", "nano", "haiku", "7b", "8b"];
const NEW_GENERATION_MARKERS: &[&str] = &["gpt-5", "gpt-4.1", "claude-3.7", "gemini-2.5", "gemini-2.0"];

const FREE_BONUS: i32 = 25;
const PREFERENCE_BONUS: i32 = 15;
const QUALITY_BONUS: i32 = 10;
const FRESHNESS_BONUS: i32 = 5;
const FRESHNESS_CAP: i32 = 10;
const SMALL_MODEL_PENALTY: i32 = -20;
const SMALL_MODEL_BONUS: i32 = 10;

/// Version-year markers such as `-2024-11-20` or `-2025`.
static YEAR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[-_:])202[4-9]").expect("valid year regex"));

fn has_any(id: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| id.contains(m))
}

/// How quickly a model is expected to respond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedSpeed {
    Fast,
    Medium,
    Slow,
}

pub(super) fn expected_speed(id: &str) -> ExpectedSpeed {
    if has_any(id, FAST_MARKERS) {
        ExpectedSpeed::Fast
    } else if has_any(id, &["opus", "o1", "o3-", "r1", "gpt-5", "pro"]) {
        ExpectedSpeed::Slow
    } else {
        ExpectedSpeed::Medium
    }
}

/// One scoring contribution, kept for the explanation text.
#[derive(Debug, Clone)]
pub(super) struct Contribution {
    pub points: i32,
    pub label: &'static str,
    pub tag: Option<&'static str>,
}

/// Scores one model. Returns the clamped score and every non-zero
/// contribution in the order it was applied.
pub(super) fn score_model(model: &ModelDescriptor, analysis: &TaskAnalysis) -> (u8, Vec<Contribution>) {
    let id = model.id.to_lowercase();
    let mut parts = Vec::new();
    let mut add = |points: i32, label: &'static str, tag: Option<&'static str>| {
        if points != 0 {
            parts.push(Contribution { points, label, tag });
        }
    };

    let affinity = task_affinity(analysis.task)
        .iter()
        .filter(|(marker, _)| id.contains(marker))
        .map(|(_, bonus)| *bonus)
        .max()
        .unwrap_or(0);
    add(affinity, "task fit", Some(task_tag(analysis.task)));

    match analysis.speed {
        SpeedPreference::Fast if has_any(&id, FAST_MARKERS) => {
            add(PREFERENCE_BONUS, "fast model", Some("fast"))
        }
        SpeedPreference::Quality if has_any(&id, QUALITY_MARKERS) => {
            add(QUALITY_BONUS, "quality model", Some("quality"))
        }
        _ => {}
    }

    match analysis.budget {
        Budget::Economy if id.contains(":free") => add(FREE_BONUS, "free tier", Some("free")),
        Budget::Economy if has_any(&id, CHEAP_MARKERS) => {
            add(PREFERENCE_BONUS, "low cost", Some("cheap"))
        }
        Budget::Premium if has_any(&id, PREMIUM_MARKERS) => {
            add(QUALITY_BONUS, "premium tier", Some("premium"))
        }
        _ => {}
    }

    let mut freshness = 0;
    if YEAR_MARKER.is_match(&id) {
        freshness += FRESHNESS_BONUS;
    }
    if has_any(&id, NEW_GENERATION_MARKERS) {
        freshness += FRESHNESS_BONUS;
    }
    add(freshness.min(FRESHNESS_CAP), "recent release", Some("latest"));

    if has_any(&id, TINY_MARKERS) {
        match analysis.complexity {
            Complexity::High => add(SMALL_MODEL_PENALTY, "too small for a complex task", None),
            Complexity::Low => add(SMALL_MODEL_BONUS, "right-sized for a simple task", None),
            Complexity::Medium => {}
        }
    }

    let total = BASE_SCORE + parts.iter().map(|c| c.points).sum::<i32>();
    (total.clamp(0, 100) as u8, parts)
}

pub(super) fn task_tag(task: TaskType) -> &'static str {
    match task {
        TaskType::Code => "code",
        TaskType::Creative => "creative",
        TaskType::Reasoning => "reasoning",
        TaskType::Vision => "vision",
        TaskType::General => "general",
        TaskType::Translation => "translation",
        TaskType::Math => "math",
    }
}

/// Rough (prompt, completion) token volume for a prompt of this length.
pub(super) fn expected_tokens(length: PromptLength) -> (u64, u64) {
    match length {
        PromptLength::Short => (500, 500),
        PromptLength::Medium => (1_500, 1_000),
        PromptLength::Long => (4_000, 2_000),
    }
}
