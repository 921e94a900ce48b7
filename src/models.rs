//! Centralized model catalog for chatelix.
//!
//! Defines the known models with pricing and context window sizes. The
//! catalog is built once at startup and handed by reference to the
//! recommender, the fallback orchestrator and the CLI. It is never mutated.

use std::collections::HashSet;

use tracing::debug;

/// Per-token prices in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub prompt_per_token: f64,
    pub completion_per_token: f64,
}

/// Information about one invokable model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Namespaced identifier (e.g., "openai/gpt-4o-mini").
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Vendor display name.
    pub provider: &'static str,
    /// Display category ("Code", "Reasoning", ...).
    pub category: &'static str,
    pub pricing: Pricing,
    /// Context window size in tokens.
    pub context_length: u32,
}

/// An immutable, deduplicated list of models.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Builds a catalog, keeping the first entry for each id.
    pub fn new(entries: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let models = entries
            .into_iter()
            .filter(|m| {
                let fresh = seen.insert(m.id);
                if !fresh {
                    debug!(model = m.id, "dropping duplicate catalog entry");
                }
                fresh
            })
            .collect();
        Self { models }
    }

    /// The built-in catalog of popular models.
    pub fn popular() -> Self {
        Self::new(POPULAR_MODELS.iter().cloned())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

const fn per_million(prompt: f64, completion: f64) -> Pricing {
    Pricing {
        prompt_per_token: prompt / 1_000_000.0,
        completion_per_token: completion / 1_000_000.0,
    }
}

/// Popular models, roughly in the order they are offered to users.
///
/// `anthropic/claude-3.5-sonnet` appears twice; the live listing used to
/// return it under both its stable and dated alias.
const POPULAR_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "openai/gpt-4o-mini",
        name: "GPT-4o mini",
        provider: "OpenAI",
        category: "Fast",
        pricing: per_million(0.15, 0.60),
        context_length: 128_000,
    },
    ModelDescriptor {
        id: "openai/gpt-4o",
        name: "GPT-4o",
        provider: "OpenAI",
        category: "General",
        pricing: per_million(2.50, 10.00),
        context_length: 128_000,
    },
    ModelDescriptor {
        id: "openai/gpt-4.1",
        name: "GPT-4.1",
        provider: "OpenAI",
        category: "General",
        pricing: per_million(2.00, 8.00),
        context_length: 1_047_576,
    },
    ModelDescriptor {
        id: "openai/gpt-4.1-nano",
        name: "GPT-4.1 nano",
        provider: "OpenAI",
        category: "Fast",
        pricing: per_million(0.10, 0.40),
        context_length: 1_047_576,
    },
    ModelDescriptor {
        id: "openai/gpt-5",
        name: "GPT-5",
        provider: "OpenAI",
        category: "Reasoning",
        pricing: per_million(1.25, 10.00),
        context_length: 400_000,
    },
    ModelDescriptor {
        id: "openai/o3-mini",
        name: "o3-mini",
        provider: "OpenAI",
        category: "Reasoning",
        pricing: per_million(1.10, 4.40),
        context_length: 200_000,
    },
    ModelDescriptor {
        id: "mistralai/codestral-2501",
        name: "Codestral",
        provider: "Mistral",
        category: "Code",
        pricing: per_million(0.30, 0.90),
        context_length: 256_000,
    },
    ModelDescriptor {
        id: "qwen/qwen-2.5-coder-32b-instruct",
        name: "Qwen2.5 Coder 32B",
        provider: "Qwen",
        category: "Code",
        pricing: per_million(0.07, 0.16),
        context_length: 32_768,
    },
    ModelDescriptor {
        id: "anthropic/claude-3.5-sonnet",
        name: "Claude 3.5 Sonnet",
        provider: "Anthropic",
        category: "General",
        pricing: per_million(3.00, 15.00),
        context_length: 200_000,
    },
    ModelDescriptor {
        id: "anthropic/claude-3.7-sonnet",
        name: "Claude 3.7 Sonnet",
        provider: "Anthropic",
        category: "Reasoning",
        pricing: per_million(3.00, 15.00),
        context_length: 200_000,
    },
    ModelDescriptor {
        id: "anthropic/claude-3-haiku",
        name: "Claude 3 Haiku",
        provider: "Anthropic",
        category: "Fast",
        pricing: per_million(0.25, 1.25),
        context_length: 200_000,
    },
    ModelDescriptor {
        id: "anthropic/claude-3.5-sonnet",
        name: "Claude 3.5 Sonnet (2024-10-22)",
        provider: "Anthropic",
        category: "General",
        pricing: per_million(3.00, 15.00),
        context_length: 200_000,
    },
    ModelDescriptor {
        id: "google/gemini-2.0-flash-001",
        name: "Gemini 2.0 Flash",
        provider: "Google",
        category: "Fast",
        pricing: per_million(0.10, 0.40),
        context_length: 1_048_576,
    },
    ModelDescriptor {
        id: "google/gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        provider: "Google",
        category: "Vision",
        pricing: per_million(1.25, 10.00),
        context_length: 1_048_576,
    },
    ModelDescriptor {
        id: "deepseek/deepseek-chat",
        name: "DeepSeek V3",
        provider: "DeepSeek",
        category: "General",
        pricing: per_million(0.27, 1.10),
        context_length: 64_000,
    },
    ModelDescriptor {
        id: "deepseek/deepseek-r1",
        name: "DeepSeek R1",
        provider: "DeepSeek",
        category: "Reasoning",
        pricing: per_million(0.55, 2.19),
        context_length: 64_000,
    },
    ModelDescriptor {
        id: "mistralai/mistral-large-2411",
        name: "Mistral Large",
        provider: "Mistral",
        category: "Creative",
        pricing: per_million(2.00, 6.00),
        context_length: 128_000,
    },
    ModelDescriptor {
        id: "mistralai/mistral-7b-instruct:free",
        name: "Mistral 7B Instruct (free)",
        provider: "Mistral",
        category: "Fast",
        pricing: per_million(0.0, 0.0),
        context_length: 32_768,
    },
    ModelDescriptor {
        id: "meta-llama/llama-3.3-70b-instruct",
        name: "Llama 3.3 70B Instruct",
        provider: "Meta",
        category: "Creative",
        pricing: per_million(0.12, 0.30),
        context_length: 131_072,
    },
    ModelDescriptor {
        id: "meta-llama/llama-3.2-11b-vision-instruct",
        name: "Llama 3.2 11B Vision",
        provider: "Meta",
        category: "Vision",
        pricing: per_million(0.055, 0.055),
        context_length: 131_072,
    },
    ModelDescriptor {
        id: "x-ai/grok-2-1212",
        name: "Grok 2",
        provider: "xAI",
        category: "General",
        pricing: per_million(2.00, 10.00),
        context_length: 131_072,
    },
    ModelDescriptor {
        id: "perplexity/sonar",
        name: "Sonar",
        provider: "Perplexity",
        category: "General",
        pricing: per_million(1.00, 1.00),
        context_length: 127_072,
    },
];
