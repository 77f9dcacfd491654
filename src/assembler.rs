use crate::classify::classifier::{classify_function, classify_use};
use crate::models::{AuthoritativeData, DataSource, EwgScore, Ingredient};

/// Reason shown when the lookup service had nothing for an ingredient.
pub const NO_DATA_REASON: &str = "Limited safety data available";

/// Build the final record for one candidate name.
///
/// Function and common use always come from the keyword classifier; the lookup
/// service only contributes the score and hazard text.
pub fn assemble(name: &str, authoritative: Option<AuthoritativeData>) -> Ingredient {
    let (score, reason, source) = match authoritative {
        Some(data) => {
            let reason = if data.concerns.trim().is_empty() {
                data.score.safety_level().default_concern().to_string()
            } else {
                data.concerns
            };
            (data.score, reason, DataSource::Lookup)
        }
        None => (
            EwgScore::UNKNOWN,
            NO_DATA_REASON.to_string(),
            DataSource::Fallback,
        ),
    };

    Ingredient::new(
        display_name(name),
        classify_function(name),
        classify_use(name),
        score,
        reason,
        source,
    )
}

/// Capitalize the first letter of each whitespace-separated word.
pub fn display_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
