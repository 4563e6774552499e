//! Generated artifact record
//!
//! The flat display record parsed out of the model's JSON text output. The
//! cocktail and dish schemas share the same shape under different field
//! names, so deserialization accepts both spellings and the dish-only fields
//! are optional.

use serde::{Deserialize, Serialize};

/// One generated cocktail or dish, alive only for a single session interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// English display name
    pub name: String,
    /// Localized (Simplified Chinese) display name
    #[serde(rename = "cnName")]
    pub cn_name: String,
    /// Poetic description
    pub desc: String,
    /// Base spirit, or the dish's main ingredient (`main`)
    #[serde(alias = "main")]
    pub base: String,
    /// Middle note, or the dish's side (`side`)
    #[serde(alias = "side")]
    pub mid: String,
    /// Top note / garnish (`garnish`)
    #[serde(alias = "garnish")]
    pub top: String,
    /// Per-note explanatory strings
    pub analysis: NoteAnalysis,
    /// CSS gradient token driving the liquid or card color
    #[serde(
        rename = "liquidColor",
        alias = "themeColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// English image-generation prompt (dish schema only)
    #[serde(rename = "imagePrompt", default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    /// Filled in by the image acquisition helper, never by the model
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Explanations matching the three note fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAnalysis {
    #[serde(alias = "main")]
    pub base: String,
    #[serde(alias = "side")]
    pub mid: String,
    #[serde(alias = "garnish")]
    pub top: String,
}
