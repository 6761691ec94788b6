//! Prompt templates

use serde::{Deserialize, Serialize};

/// Requested summary length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience presets offered by the content form
const AUDIENCES: &[(&str, &str)] = &[
    ("general", "General Audience"),
    ("tech", "Tech Enthusiasts"),
    ("business", "Business Professionals"),
    ("students", "Students"),
    ("academic", "Academic Researchers"),
    ("creative", "Creative Professionals"),
    ("marketing", "Marketing Professionals"),
    ("healthcare", "Healthcare Professionals"),
    ("legal", "Legal Professionals"),
    ("finance", "Finance Professionals"),
];

/// Display label for an audience preset; unknown values are used verbatim
pub fn audience_label(audience: &str) -> &str {
    AUDIENCES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(audience))
        .map(|(_, label)| *label)
        .unwrap_or(audience)
}

/// Prompt for summarization
pub fn summary_prompt(content: &str, length: SummaryLength) -> String {
    format!(
        "Please provide a {} summary of the following content. Make it concise and clear:\n\n{}",
        length, content
    )
}

/// Free-form prompt, optionally tailored to an audience
pub fn audience_prompt(prompt: &str, audience: Option<&str>) -> String {
    match audience.map(str::trim).filter(|a| !a.is_empty()) {
        Some(audience) => format!(
            "{}\n\nWrite for this target audience: {}.",
            prompt,
            audience_label(audience)
        ),
        None => prompt.to_string(),
    }
}

/// Prompt for a template form: serialized form fields, then the template's
/// own instruction
pub fn template_prompt(
    form: &serde_json::Map<String, serde_json::Value>,
    ai_prompt: &str,
    audience: Option<&str>,
) -> String {
    let fields = serde_json::Value::Object(form.clone()).to_string();
    audience_prompt(&format!("{}, {}", fields, ai_prompt), audience)
}
