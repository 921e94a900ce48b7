//! Provider routing for chatelix.
//!
//! Every model id resolves to exactly one [`ProviderKind`], and every
//! provider is served by one backend endpoint. Directly keyed providers take
//! priority; everything else goes through the OpenRouter aggregator.

mod kind;
mod resolve;

pub use kind::ProviderKind;
pub use resolve::resolve_provider;
