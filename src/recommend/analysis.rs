//! Keyword-based classification of a free-text prompt.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Code,
    Creative,
    Reasoning,
    Vision,
    General,
    Translation,
    Math,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Economy,
    Balanced,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreference {
    Fast,
    Balanced,
    Quality,
}

/// What a prompt asks for, derived only from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskAnalysis {
    #[serde(rename = "type")]
    pub task: TaskType,
    pub complexity: Complexity,
    pub length: PromptLength,
    pub budget: Budget,
    pub speed: SpeedPreference,
}

/// Task detection table. Earlier rows win.
///
/// A space in a marker anchors it to a word edge: `" code"` matches "codebase"
/// but not "decode".
const TASK_KEYWORDS: &[(TaskType, &[&str])] = &[
    (
        TaskType::Code,
        &[
            " code", "function", "python", "javascript", "typescript", " rust", " java ",
            "program", " script", "debug", " bug", "compile", "refactor", " sql", " api ",
            "regex", " class ",
        ],
    ),
    (
        TaskType::Vision,
        &["image", "picture", "photo", "screenshot", "diagram", "visual"],
    ),
    (
        TaskType::Math,
        &[
            "math", "equation", "calculate", "integral", "derivative", "algebra",
            "proof", "solve for",
        ],
    ),
    (
        TaskType::Translation,
        &["translate", "translation", "in french", "in spanish", "in german", "into english"],
    ),
    (
        TaskType::Creative,
        &["story", "poem", "creative", "fiction", "novel", "lyrics", "imagine", "song"],
    ),
    (
        TaskType::Reasoning,
        &["analyze", "analyse", "reason", "logic", "explain why", "compare", "evaluate", "strategy"],
    ),
];

const DEPTH_KEYWORDS: &[&str] = &[
    "complex", "detailed", "comprehensive", "in-depth", "advanced", "architecture",
    "step by step",
];

const ECONOMY_KEYWORDS: &[&str] = &["cheap", "free", "budget", "low cost", "inexpensive"];
const PREMIUM_KEYWORDS: &[&str] = &["best", "premium", "highest quality", "most accurate", "professional"];

const FAST_KEYWORDS: &[&str] = &["quick", "fast", "asap", "brief", "short answer"];
const QUALITY_KEYWORDS: &[&str] = &["thorough", "careful", "high quality", "accurate", "polished"];

/// Prompts shorter than this many characters are short.
const SHORT_PROMPT_CHARS: usize = 100;
/// Prompts shorter than this many characters are medium.
const MEDIUM_PROMPT_CHARS: usize = 500;

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classifies a prompt by its length and the keywords it contains.
pub fn analyze_prompt(text: &str) -> TaskAnalysis {
    // Punctuation becomes spaces and the ends are padded, so space-anchored
    // markers match next to punctuation and at the edges.
    let words: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect();
    let lower = format!(" {} ", words);
    let chars = text.trim().chars().count();

    let task = TASK_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(task, _)| *task)
        .unwrap_or(TaskType::General);

    let length = if chars < SHORT_PROMPT_CHARS {
        PromptLength::Short
    } else if chars < MEDIUM_PROMPT_CHARS {
        PromptLength::Medium
    } else {
        PromptLength::Long
    };

    let deep = contains_any(&lower, DEPTH_KEYWORDS);
    let complexity = match (length, deep) {
        (PromptLength::Long, _) | (_, true) => Complexity::High,
        (PromptLength::Short, false) => Complexity::Low,
        _ => Complexity::Medium,
    };

    let budget = if contains_any(&lower, ECONOMY_KEYWORDS) {
        Budget::Economy
    } else if contains_any(&lower, PREMIUM_KEYWORDS) {
        Budget::Premium
    } else {
        Budget::Balanced
    };

    let speed = if contains_any(&lower, FAST_KEYWORDS) {
        SpeedPreference::Fast
    } else if contains_any(&lower, QUALITY_KEYWORDS) {
        SpeedPreference::Quality
    } else {
        SpeedPreference::Balanced
    };

    TaskAnalysis {
        task,
        complexity,
        length,
        budget,
        speed,
    }
}
