use replyline_core::serde_utils::float;
use replyline_protocol::types::ModelUsage;
use serde::{Deserialize, Serialize};

/// Model parameters used for AI decisions and AI-generated replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "ModelConfig::default_provider")]
    pub provider: String,
    #[serde(default = "ModelConfig::default_model_name")]
    pub model_name: String,
    /// Sampling temperature, valid in `[0, 2]`.
    #[serde(
        default = "ModelConfig::default_temperature",
        deserialize_with = "float"
    )]
    pub temperature: f64,
    /// Minimum classifier confidence for AI-decision triggers, valid in `[0, 1]`.
    #[serde(
        default = "ModelConfig::default_confidence_threshold",
        deserialize_with = "float"
    )]
    pub confidence_threshold: f64,
    #[serde(default)]
    pub rag_enabled: bool,
    #[serde(default)]
    pub model_usage: ModelUsage,
}

impl ModelConfig {
    pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);
    pub const CONFIDENCE_RANGE: (f64, f64) = (0.0, 1.0);

    pub fn default_provider() -> String {
        "openai".to_string()
    }

    pub fn default_model_name() -> String {
        "gpt-4o-mini".to_string()
    }

    pub fn default_temperature() -> f64 {
        0.7
    }

    pub fn default_confidence_threshold() -> f64 {
        0.7
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Self::default_provider(),
            model_name: Self::default_model_name(),
            temperature: Self::default_temperature(),
            confidence_threshold: Self::default_confidence_threshold(),
            rag_enabled: false,
            model_usage: ModelUsage::default(),
        }
    }
}
