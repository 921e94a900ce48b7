//! Token counting and cost estimation for chatelix.
//!
//! Uses tiktoken-rs for BPE tokenization. OpenAI models get their exact
//! tokenizer; everything else is approximated with cl100k_base.

use anyhow::{anyhow, Result};
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::constants::{TOKENS_CONVERSATION_FRAMING, TOKENS_PER_MESSAGE_OVERHEAD};
use crate::message::Message;
use crate::models::ModelDescriptor;

/// Picks a tokenizer for a (possibly namespaced) model id.
fn bpe_for(model: &str) -> Result<CoreBPE> {
    let bare = model.rsplit_once('/').map_or(model, |(_, name)| name);
    get_bpe_from_model(bare)
        .or_else(|_| tiktoken_rs::cl100k_base())
        .map_err(|e| anyhow!("Failed to load tokenizer: {e}"))
}

/// Count tokens across all messages in a request.
/// Each message has ~4 tokens overhead for role markers.
pub fn count_conversation_tokens(messages: &[Message], model: &str) -> Result<usize> {
    let bpe = bpe_for(model)?;
    let mut total = TOKENS_CONVERSATION_FRAMING;
    for message in messages {
        total += TOKENS_PER_MESSAGE_OVERHEAD;
        total += bpe.encode_ordinary(message.text()).len();
    }
    Ok(total)
}

/// Estimated USD cost of an exchange with `model`.
pub fn estimate_cost(model: &ModelDescriptor, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    prompt_tokens as f64 * model.pricing.prompt_per_token
        + completion_tokens as f64 * model.pricing.completion_per_token
}

/// Format a USD amount for display. Sub-cent amounts keep four decimals.
pub fn format_cost(usd: f64) -> String {
    if usd == 0.0 {
        "free".to_string()
    } else if usd < 0.01 {
        format!("${usd:.4}")
    } else {
        format!("${usd:.2}")
    }
}
