use crate::classify::tables::{FUNCTION_TABLE, USE_TABLE};
use crate::models::{FunctionCategory, UseCategory};

/// Classify what an ingredient does, e.g. `"Sodium Laureth Sulfate"` → Surfactant.
pub fn classify_function(name: &str) -> FunctionCategory {
    first_match(FUNCTION_TABLE, name).unwrap_or(FunctionCategory::Other)
}

/// Classify where an ingredient is commonly used.
pub fn classify_use(name: &str) -> UseCategory {
    first_match(USE_TABLE, name).unwrap_or(UseCategory::Various)
}

fn first_match<C: Copy>(table: &[(C, &[&str])], name: &str) -> Option<C> {
    let lower = name.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
}
