//! ContentGen LLM Integration
//!
//! Gemini client, retrying and multi-variant generation, response validation

mod client;
mod composer;
mod error;
mod llm_trait;
mod prompts;
mod retry;
mod session;
mod types;
mod validate;
mod variants;

pub use client::GeminiClient;
pub use composer::Composer;
pub use error::{GenerationError, UpstreamError};
pub use llm_trait::TextGenerator;
pub use prompts::{audience_label, audience_prompt, summary_prompt, template_prompt, SummaryLength};
pub use retry::{generate_with_retry, RetryPolicy};
pub use session::ChatSession;
pub use types::{
    Content, GenerationConfig, HarmBlockThreshold, HarmCategory, Part, Role, SafetySetting,
};
pub use validate::{categorize, categorize_message, categorize_upstream, validate, CategorizedError};
pub use variants::{
    generate_variant_slots, generate_variants, PromptFraming, VariantError, Variation, VariationSet,
};
