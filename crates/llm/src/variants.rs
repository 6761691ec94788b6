use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::llm_trait::TextGenerator;
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::session::ChatSession;
use crate::types::GenerationConfig;

/// Prompt wording applied to the same content to get a stylistic variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFraming {
    /// Short label, e.g. "formal"
    pub name: String,

    /// Instruction placed ahead of the content
    pub instruction: String,
}

impl PromptFraming {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }

    pub fn formal() -> Self {
        Self::new(
            "formal",
            "Create a more formal and professional version of this content",
        )
    }

    pub fn conversational() -> Self {
        Self::new(
            "conversational",
            "Create a more engaging and conversational version of this content",
        )
    }

    /// The A/B pair offered to users: formal first, conversational second
    pub fn ab_pair() -> Vec<Self> {
        vec![Self::formal(), Self::conversational()]
    }

    /// Full prompt for `content`
    pub fn apply(&self, content: &str) -> String {
        format!("{}:\n\n{}", self.instruction, content)
    }
}

/// One generated variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variation {
    pub framing: String,
    pub text: String,
}

/// Variants in framing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariationSet(Vec<Variation>);

impl VariationSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variation> {
        self.0.iter()
    }

    /// Texts in framing order
    pub fn into_texts(self) -> Vec<String> {
        self.0.into_iter().map(|v| v.text).collect()
    }
}

impl FromIterator<Variation> for VariationSet {
    fn from_iter<I: IntoIterator<Item = Variation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// First failed slot of an all-or-nothing variant run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("variant {index} ({framing}) failed: {source}")]
pub struct VariantError {
    pub index: usize,
    pub framing: String,
    #[source]
    pub source: GenerationError,
}

/// Generate one result per framing, concurrently.
///
/// Slot `i` always holds the outcome for `framings[i]`, whatever order the
/// calls finish in. Every branch gets a fresh session and its own retry loop;
/// all branches share `cancel`.
pub async fn generate_variant_slots<G>(
    generator: &G,
    content: &str,
    framings: &[PromptFraming],
    config: &GenerationConfig,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Vec<Result<String, GenerationError>>
where
    G: TextGenerator + ?Sized,
{
    info!("Generating {} variants - Content length: {}", framings.len(), content.len());

    let branches = framings.iter().enumerate().map(|(index, framing)| async move {
        let mut session = ChatSession::new();
        let prompt = framing.apply(content);
        let result =
            generate_with_retry(generator, &mut session, &prompt, config, policy, cancel).await;
        debug!(index, framing = %framing.name, ok = result.is_ok(), "Variant branch finished");
        result
    });

    join_all(branches).await
}

/// All-or-nothing variant generation.
///
/// Waits for every branch, then reports the lowest-index failure if any slot
/// failed.
pub async fn generate_variants<G>(
    generator: &G,
    content: &str,
    framings: &[PromptFraming],
    config: &GenerationConfig,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<VariationSet, VariantError>
where
    G: TextGenerator + ?Sized,
{
    let slots = generate_variant_slots(generator, content, framings, config, policy, cancel).await;

    framings
        .iter()
        .zip(slots)
        .enumerate()
        .map(|(index, (framing, slot))| match slot {
            Ok(text) => Ok(Variation {
                framing: framing.name.clone(),
                text,
            }),
            Err(source) => Err(VariantError {
                index,
                framing: framing.name.clone(),
                source,
            }),
        })
        .collect()
}
