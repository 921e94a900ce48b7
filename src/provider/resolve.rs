//! Provider resolution for model identifiers.
//!
//! Maps an opaque model id to the provider that should serve it. Directly
//! keyed providers are checked before the aggregator, so an id that matches
//! several rules goes to the first one in [`PROVIDER_RULES`].

use tracing::debug;

use super::kind::ProviderKind;

/// A single resolution rule: the id matches if it starts with any prefix
/// or contains any marker.
pub struct ProviderRule {
    pub prefixes: &'static [&'static str],
    pub markers: &'static [&'static str],
    pub provider: ProviderKind,
}

impl ProviderRule {
    fn matches(&self, model_id: &str) -> bool {
        self.prefixes.iter().any(|p| model_id.starts_with(p))
            || self.markers.iter().any(|m| model_id.contains(m))
    }
}

/// Resolution rules, evaluated in order. First match wins.
pub const PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        prefixes: &["openai/"],
        markers: &["gpt-4", "gpt-3", "o1", "gpt", "chatgpt"],
        provider: ProviderKind::OpenAI,
    },
    ProviderRule {
        prefixes: &["google/"],
        markers: &["gemini", "bard"],
        provider: ProviderKind::Gemini,
    },
    ProviderRule {
        prefixes: &["deepseek/"],
        markers: &["deepseek"],
        provider: ProviderKind::DeepSeek,
    },
    ProviderRule {
        prefixes: &["anthropic/"],
        markers: &["claude"],
        provider: ProviderKind::Claude,
    },
    ProviderRule {
        prefixes: &[
            "meta/",
            "mistralai/",
            "cohere/",
            "perplexity/",
            "nvidia/",
            "x-ai/",
        ],
        markers: &[],
        provider: ProviderKind::OpenRouter,
    },
];

/// Resolve which provider serves `model_id`.
///
/// Total: ids that match no rule go to OpenRouter.
pub fn resolve_provider(model_id: &str) -> ProviderKind {
    let provider = PROVIDER_RULES
        .iter()
        .find(|rule| rule.matches(model_id))
        .map(|rule| rule.provider)
        .unwrap_or(ProviderKind::OpenRouter);
    debug!(model = model_id, provider = %provider, "resolved provider");
    provider
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_routing() {
        assert_eq!(resolve_provider("openai/gpt-4o-mini"), ProviderKind::OpenAI);
        assert_eq!(resolve_provider("google/gemini-2.5-pro"), ProviderKind::Gemini);
        assert_eq!(resolve_provider("deepseek/deepseek-r1"), ProviderKind::DeepSeek);
        assert_eq!(resolve_provider("anthropic/claude-3-haiku"), ProviderKind::Claude);
        assert_eq!(resolve_provider("mistralai/codestral-2501"), ProviderKind::OpenRouter);
        assert_eq!(resolve_provider("x-ai/grok-2-1212"), ProviderKind::OpenRouter);
    }

    #[test]
    fn test_bare_names_use_markers() {
        assert_eq!(resolve_provider("chatgpt-4o-latest"), ProviderKind::OpenAI);
        assert_eq!(resolve_provider("o1-preview"), ProviderKind::OpenAI);
        assert_eq!(resolve_provider("gemini-1.5-flash"), ProviderKind::Gemini);
        assert_eq!(resolve_provider("bard"), ProviderKind::Gemini);
        assert_eq!(resolve_provider("deepseek-coder"), ProviderKind::DeepSeek);
        assert_eq!(resolve_provider("claude-3-opus"), ProviderKind::Claude);
    }

    #[test]
    fn test_openai_rule_runs_before_claude_rule() {
        assert_eq!(resolve_provider("openai/claude-like-name"), ProviderKind::OpenAI);
        assert_eq!(resolve_provider("claude-vs-gpt-bench"), ProviderKind::OpenAI);
    }

    #[test]
    fn test_aggregator_prefix_loses_to_keyword() {
        // Third-party route for a Gemini model still goes to Gemini.
        assert_eq!(resolve_provider("nvidia/gemini-distill"), ProviderKind::Gemini);
    }

    #[test]
    fn test_every_input_resolves() {
        for id in ["", "/", "unknown-model", "qwen/qwen-2.5-coder-32b-instruct", "🦀"] {
            let provider = resolve_provider(id);
            assert!(ProviderKind::ALL.contains(&provider));
        }
        assert_eq!(resolve_provider(""), ProviderKind::OpenRouter);
        assert_eq!(resolve_provider("unknown-model"), ProviderKind::OpenRouter);
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let mut endpoints: Vec<_> = ProviderKind::ALL.iter().map(|p| p.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), 5);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(ProviderKind::from_str("Anthropic").unwrap(), ProviderKind::Claude);
        assert_eq!(ProviderKind::from_str("google").unwrap(), ProviderKind::Gemini);
        assert!(ProviderKind::from_str("ollama").is_err());
    }
}
