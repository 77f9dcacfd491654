use serde::{Deserialize, Serialize};

/// Hazard score on the 0–10 scale used by the safety-data service. Lower is safer.
///
/// Construction clamps into range, so every score in the crate is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct EwgScore(u8);

impl EwgScore {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 10;

    /// Score used whenever no authoritative data exists.
    pub const UNKNOWN: EwgScore = EwgScore(5);

    pub fn new(value: i64) -> Self {
        EwgScore(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn safety_level(self) -> SafetyLevel {
        SafetyLevel::from_score(self)
    }
}

impl From<u8> for EwgScore {
    fn from(value: u8) -> Self {
        EwgScore::new(value as i64)
    }
}

impl From<EwgScore> for u8 {
    fn from(score: EwgScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for EwgScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-ingredient concern band, derived from an [`EwgScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyLevel {
    #[serde(rename = "Low Concern")]
    Low,
    #[serde(rename = "Moderate Concern")]
    Moderate,
    #[serde(rename = "High Concern")]
    High,
}

impl SafetyLevel {
    /// Highest score still reported as low concern.
    pub const LOW_MAX: u8 = 2;
    /// Highest score still reported as moderate concern.
    pub const MODERATE_MAX: u8 = 6;

    pub fn from_score(score: EwgScore) -> Self {
        match score.value() {
            s if s <= Self::LOW_MAX => SafetyLevel::Low,
            s if s <= Self::MODERATE_MAX => SafetyLevel::Moderate,
            _ => SafetyLevel::High,
        }
    }

    /// Generic explanation used when the lookup service lists no hazards.
    pub fn default_concern(self) -> &'static str {
        match self {
            SafetyLevel::Low => "Generally recognized as safe",
            SafetyLevel::Moderate => "Moderate safety concerns, more research needed",
            SafetyLevel::High => "High safety concerns, potential health risks",
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyLevel::Low => write!(f, "Low Concern"),
            SafetyLevel::Moderate => write!(f, "Moderate Concern"),
            SafetyLevel::High => write!(f, "High Concern"),
        }
    }
}

/// What an ingredient does in the formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionCategory {
    Preservative,
    Surfactant,
    Emollient,
    Fragrance,
    #[serde(rename = "UV Filter")]
    UvFilter,
    Antioxidant,
    Humectant,
    Emulsifier,
    #[serde(rename = "Other/Unknown")]
    Other,
}

impl std::fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionCategory::Preservative => write!(f, "Preservative"),
            FunctionCategory::Surfactant => write!(f, "Surfactant"),
            FunctionCategory::Emollient => write!(f, "Emollient"),
            FunctionCategory::Fragrance => write!(f, "Fragrance"),
            FunctionCategory::UvFilter => write!(f, "UV Filter"),
            FunctionCategory::Antioxidant => write!(f, "Antioxidant"),
            FunctionCategory::Humectant => write!(f, "Humectant"),
            FunctionCategory::Emulsifier => write!(f, "Emulsifier"),
            FunctionCategory::Other => write!(f, "Other/Unknown"),
        }
    }
}

/// Where an ingredient is typically used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseCategory {
    #[serde(rename = "Moisturizing agent")]
    Moisturizing,
    #[serde(rename = "Cleansing agent")]
    Cleansing,
    #[serde(rename = "Preservative system")]
    PreservativeSystem,
    #[serde(rename = "Fragrance component")]
    FragranceComponent,
    #[serde(rename = "Sun protection")]
    SunProtection,
    #[serde(rename = "Antioxidant protection")]
    AntioxidantProtection,
    #[serde(rename = "Various applications")]
    Various,
}

impl std::fmt::Display for UseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCategory::Moisturizing => write!(f, "Moisturizing agent"),
            UseCategory::Cleansing => write!(f, "Cleansing agent"),
            UseCategory::PreservativeSystem => write!(f, "Preservative system"),
            UseCategory::FragranceComponent => write!(f, "Fragrance component"),
            UseCategory::SunProtection => write!(f, "Sun protection"),
            UseCategory::AntioxidantProtection => write!(f, "Antioxidant protection"),
            UseCategory::Various => write!(f, "Various applications"),
        }
    }
}

/// Hazard data returned by the safety-data service for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoritativeData {
    pub score: EwgScore,
    /// Hazard phrases joined with `", "`; empty when none were listed.
    pub concerns: String,
}

/// Where an ingredient's score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Lookup,
    Fallback,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Lookup => write!(f, "lookup"),
            DataSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// One analyzed ingredient. Fields are private so the safety level can only be
/// derived from the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    name: String,
    function: FunctionCategory,
    common_use: UseCategory,
    ewg_score: EwgScore,
    safety_level: SafetyLevel,
    reason_for_concern: String,
    source: DataSource,
}

impl Ingredient {
    pub(crate) fn new(
        name: String,
        function: FunctionCategory,
        common_use: UseCategory,
        ewg_score: EwgScore,
        reason_for_concern: String,
        source: DataSource,
    ) -> Self {
        Ingredient {
            name,
            function,
            common_use,
            ewg_score,
            safety_level: ewg_score.safety_level(),
            reason_for_concern,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> FunctionCategory {
        self.function
    }

    pub fn common_use(&self) -> UseCategory {
        self.common_use
    }

    pub fn ewg_score(&self) -> EwgScore {
        self.ewg_score
    }

    pub fn safety_level(&self) -> SafetyLevel {
        self.safety_level
    }

    pub fn reason_for_concern(&self) -> &str {
        &self.reason_for_concern
    }

    pub fn source(&self) -> DataSource {
        self.source
    }
}

/// Overall verdict for a whole ingredient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallVerdict {
    Safe,
    #[serde(rename = "Moderately Safe")]
    ModeratelySafe,
    #[serde(rename = "Use with Caution")]
    UseWithCaution,
    #[serde(rename = "Potentially Unsafe")]
    PotentiallyUnsafe,
}

impl std::fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallVerdict::Safe => write!(f, "Safe"),
            OverallVerdict::ModeratelySafe => write!(f, "Moderately Safe"),
            OverallVerdict::UseWithCaution => write!(f, "Use with Caution"),
            OverallVerdict::PotentiallyUnsafe => write!(f, "Potentially Unsafe"),
        }
    }
}

/// Number of ingredients in each safety band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ingredients: Vec<Ingredient>,
    pub counts: LevelCounts,
    pub average_score: f64,
    pub verdict: OverallVerdict,
}
