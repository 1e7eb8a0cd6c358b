// ABOUTME: Structured meal intent produced by the optional NLU collaborator
// ABOUTME: Lenient intent decoding, diet normalization and the injected IntentSource trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Meal Intent
//!
//! The intent is advisory. Whatever the collaborator returns is decoded
//! leniently: numbers may arrive as strings, lists as single strings, and
//! unknown diet labels collapse to [`DietType::None`]. A collaborator that
//! fails produces no intent at all, never an error.

use super::text::fold;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Closed set of diets understood by the ranker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    /// No diet filter
    #[default]
    None,
    /// No meat, no fish
    Vegetarian,
    /// No meat, fish, dairy or eggs
    Vegan,
    /// No meat
    Pescetarian,
    /// Low carb; no tag filter
    Keto,
}

impl DietType {
    /// Map a free-form label onto the closed set
    ///
    /// Labels containing `|` (an unresolved choice such as `"none|vegan"`) and
    /// unrecognized labels map to `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = fold(label);
        if label.contains('|') {
            return Self::None;
        }
        if ["vegan", "vegn", "wegan"].iter().any(|key| label.contains(key)) {
            Self::Vegan
        } else if ["veget", "wegetar", "wege", "vege", "wega"]
            .iter()
            .any(|key| label.contains(key))
        {
            Self::Vegetarian
        } else if ["pesc", "pesk", "ryb", "fish"].iter().any(|key| label.contains(key)) {
            Self::Pescetarian
        } else if label.contains("keto") {
            Self::Keto
        } else {
            Self::None
        }
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescetarian => "pescetarian",
            Self::Keto => "keto",
        }
    }
}

/// Calorie block of the intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KcalIntent {
    /// Wanted calories
    #[serde(deserialize_with = "lenient_number")]
    pub target: Option<f64>,
    /// Lower calorie bound
    #[serde(deserialize_with = "lenient_number")]
    pub low: Option<f64>,
    /// Upper calorie bound
    #[serde(deserialize_with = "lenient_number")]
    pub high: Option<f64>,
}

impl KcalIntent {
    /// Whether any sub-field is set
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.target.is_some() || self.low.is_some() || self.high.is_some()
    }
}

/// Desired macro proportions; surfaced in debug output only
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepRatio {
    /// Protein share
    #[serde(deserialize_with = "lenient_number")]
    pub p: Option<f64>,
    /// Fat share
    #[serde(deserialize_with = "lenient_number")]
    pub f: Option<f64>,
    /// Carbohydrate share
    #[serde(deserialize_with = "lenient_number")]
    pub c: Option<f64>,
}

/// Macro block of the intent, grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MacroIntent {
    /// Minimum protein
    #[serde(deserialize_with = "lenient_number")]
    pub p_min: Option<f64>,
    /// Maximum protein
    #[serde(deserialize_with = "lenient_number")]
    pub p_max: Option<f64>,
    /// Minimum fat
    #[serde(deserialize_with = "lenient_number")]
    pub f_min: Option<f64>,
    /// Maximum fat
    #[serde(deserialize_with = "lenient_number")]
    pub f_max: Option<f64>,
    /// Minimum carbohydrates
    #[serde(deserialize_with = "lenient_number")]
    pub c_min: Option<f64>,
    /// Maximum carbohydrates
    #[serde(deserialize_with = "lenient_number")]
    pub c_max: Option<f64>,
    /// Desired proportions
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_ratio")]
    pub keep_ratio: Option<KeepRatio>,
}

/// Structured request understanding returned by the NLU collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealIntent {
    /// Diet restriction
    #[serde(deserialize_with = "diet_label")]
    pub diet: DietType,
    /// Calorie goal
    #[serde(deserialize_with = "null_as_default")]
    pub kcal: KcalIntent,
    /// Macro bounds
    #[serde(deserialize_with = "null_as_default")]
    pub macros: MacroIntent,
    /// Foods that must appear
    #[serde(deserialize_with = "string_list")]
    pub require: Vec<String>,
    /// Foods of which at least one should appear
    #[serde(deserialize_with = "string_list")]
    pub prefer: Vec<String>,
    /// Foods that must not appear
    #[serde(deserialize_with = "string_list")]
    pub avoid: Vec<String>,
    /// Free-form remarks
    #[serde(deserialize_with = "string_list")]
    pub notes: Vec<String>,
}

impl MealIntent {
    /// Decode a collaborator response; `None` unless it is a decodable JSON object
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_ratio<'de, D>(deserializer: D) -> Result<Option<KeepRatio>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|ratio| serde_json::from_value(ratio).ok()))
}

fn diet_label<'de, D>(deserializer: D) -> Result<DietType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(label)) => DietType::from_label(&label),
        _ => DietType::None,
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(item)) => vec![item],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) if !text.trim().is_empty() => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Diagnostic record of one collaborator interaction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntentEvent {
    /// Request sent
    Request {
        /// Model asked
        model: String,
        /// Sampling temperature
        temperature: f32,
        /// Token limit
        max_tokens: u32,
    },
    /// Non-success status returned
    HttpError {
        /// HTTP status, when known
        status: Option<u16>,
        /// Truncated response body
        body: String,
    },
    /// Response decoded
    Response {
        /// Truncated raw content
        raw: String,
        /// Parsed JSON (empty object when unparsable)
        parsed: Value,
    },
    /// Transport or decoding failure
    Exception {
        /// Error message
        message: String,
    },
}

/// Result of asking the collaborator; `intent` is `None` on any failure
#[derive(Debug, Clone, Default)]
pub struct IntentOutcome {
    /// Decoded intent
    pub intent: Option<MealIntent>,
    /// Diagnostics exposed in debug responses
    pub events: Vec<IntentEvent>,
}

impl IntentOutcome {
    /// Outcome carrying no intent and no diagnostics
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            intent: None,
            events: Vec::new(),
        }
    }
}

/// Source of structured intent for a raw request
///
/// Implementations must absorb every failure: a slow or broken collaborator
/// degrades suggestions but never fails a request. Called at most once per
/// request and never retried.
#[async_trait]
pub trait IntentSource: Send + Sync {
    /// Understand a raw request
    async fn understand(&self, prompt: &str) -> IntentOutcome;
}

/// Intent source used when the collaborator is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntent;

#[async_trait]
impl IntentSource for NoIntent {
    async fn understand(&self, _prompt: &str) -> IntentOutcome {
        IntentOutcome::empty()
    }
}
