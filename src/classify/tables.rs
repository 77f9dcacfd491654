use crate::models::{FunctionCategory, UseCategory};

/// Function keywords, scanned top to bottom. The first category with a
/// substring hit wins, so "glycerin" is an emollient, not a humectant.
pub const FUNCTION_TABLE: &[(FunctionCategory, &[&str])] = &[
    (
        FunctionCategory::Preservative,
        &["paraben", "phenoxyethanol", "benzoate", "sorbate"],
    ),
    (
        FunctionCategory::Surfactant,
        &["lauryl", "laureth", "sodium", "cocamide"],
    ),
    (
        FunctionCategory::Emollient,
        &["oil", "butter", "glycerin", "lanolin"],
    ),
    (
        FunctionCategory::Fragrance,
        &["fragrance", "parfum", "aroma"],
    ),
    (
        FunctionCategory::UvFilter,
        &["benzophenone", "avobenzone", "titanium dioxide"],
    ),
    (
        FunctionCategory::Antioxidant,
        &["tocopherol", "vitamin", "retinol"],
    ),
    (
        FunctionCategory::Humectant,
        &["glycerin", "hyaluronic", "urea"],
    ),
    (
        FunctionCategory::Emulsifier,
        &["cetyl", "stearic", "glyceryl"],
    ),
];

/// Common-use keywords, scanned top to bottom.
pub const USE_TABLE: &[(UseCategory, &[&str])] = &[
    (
        UseCategory::Moisturizing,
        &["glycerin", "oil", "butter", "hyaluronic"],
    ),
    (UseCategory::Cleansing, &["lauryl", "laureth", "cocamide"]),
    (
        UseCategory::PreservativeSystem,
        &["paraben", "phenoxyethanol", "benzoate"],
    ),
    (
        UseCategory::FragranceComponent,
        &["fragrance", "parfum", "aroma"],
    ),
    (
        UseCategory::SunProtection,
        &["benzophenone", "avobenzone", "titanium"],
    ),
    (
        UseCategory::AntioxidantProtection,
        &["tocopherol", "vitamin", "retinol"],
    ),
];
