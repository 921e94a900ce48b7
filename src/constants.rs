//! Centralized constants for chatelix.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "chatelix";

/// Default model identifier when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token limit sent as both `max_tokens` and `max_completion_tokens`.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "chatelix.toml";

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// --- Backend ---

/// Default backend base URL (edge functions live under `/functions/v1/`).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";

/// Path segment under which the per-provider chat endpoints are mounted.
pub const FUNCTIONS_PATH: &str = "functions/v1";

/// Environment variable holding the caller's session token.
pub const AUTH_TOKEN_ENV: &str = "CHATELIX_AUTH_TOKEN";

/// Bearer token sent when no session token is available (demo usage).
pub const ANONYMOUS_TOKEN: &str = "anonymous";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// --- Fallback cascade ---

/// Stable GPT-4 generation model used when a newer OpenAI family fails.
pub const STABLE_GPT4_FALLBACK: &str = "openai/gpt-4o";

/// Universally available models tried, in order, as the terminal fallback.
pub const TERMINAL_FALLBACK_MODELS: &[&str] = &["openai/gpt-4o-mini", "google/gemini-2.0-flash-001"];

/// Trimmed length the latest message must exceed before the recommender is consulted.
pub const RECOMMEND_MIN_PROMPT_CHARS: usize = 10;

// --- Recommender ---

/// Model returned when the catalog yields no recommendation.
pub const DEFAULT_RECOMMENDED_MODEL: &str = "openai/gpt-4o-mini";

/// Default number of recommendations returned.
pub const DEFAULT_RECOMMENDATIONS: usize = 3;

// --- Token counting ---

/// Approximate token overhead per message (role markers, etc.).
pub const TOKENS_PER_MESSAGE_OVERHEAD: usize = 4;

/// Approximate token overhead for conversation framing.
pub const TOKENS_CONVERSATION_FRAMING: usize = 2;
