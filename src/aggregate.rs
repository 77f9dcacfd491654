use crate::errors::AnalyzeError;
use crate::models::{AnalysisResult, Ingredient, LevelCounts, OverallVerdict, SafetyLevel};

// Verdict thresholds on the mean score. Coarser than the per-ingredient bands.

/// Highest mean still reported as [`OverallVerdict::Safe`].
pub const SAFE_MAX_MEAN: f64 = 2.0;
/// Highest mean still reported as [`OverallVerdict::ModeratelySafe`].
pub const MODERATELY_SAFE_MAX_MEAN: f64 = 4.0;
/// Highest mean still reported as [`OverallVerdict::UseWithCaution`].
pub const CAUTION_MAX_MEAN: f64 = 6.0;

/// Summarize a non-empty ingredient list into counts, mean score and verdict.
pub fn aggregate(ingredients: Vec<Ingredient>) -> Result<AnalysisResult, AnalyzeError> {
    if ingredients.is_empty() {
        return Err(AnalyzeError::NoIngredients);
    }

    let mut counts = LevelCounts::default();
    for ingredient in &ingredients {
        match ingredient.safety_level() {
            SafetyLevel::High => counts.high += 1,
            SafetyLevel::Moderate => counts.moderate += 1,
            SafetyLevel::Low => counts.low += 1,
        }
    }

    let total: u32 = ingredients
        .iter()
        .map(|i| u32::from(i.ewg_score().value()))
        .sum();
    let average_score = f64::from(total) / ingredients.len() as f64;

    Ok(AnalysisResult {
        verdict: verdict_for_mean(average_score),
        ingredients,
        counts,
        average_score,
    })
}

pub fn verdict_for_mean(mean: f64) -> OverallVerdict {
    if mean <= SAFE_MAX_MEAN {
        OverallVerdict::Safe
    } else if mean <= MODERATELY_SAFE_MAX_MEAN {
        OverallVerdict::ModeratelySafe
    } else if mean <= CAUTION_MAX_MEAN {
        OverallVerdict::UseWithCaution
    } else {
        OverallVerdict::PotentiallyUnsafe
    }
}
