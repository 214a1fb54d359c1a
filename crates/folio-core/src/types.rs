//! Response types shared by the classifier and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Which classification path the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Zero-shot scoring with the CLIP model
    #[serde(rename = "CLIP")]
    Clip,
    /// Filename keyword matching
    Fallback,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Clip => "CLIP",
            ModelKind::Fallback => "Fallback",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse confidence label reported with each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// The outcome of classifying one uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Two or three labels, most relevant first
    pub tags: Vec<String>,

    /// Folder-style path derived from the first two tags ("Animals/Pets")
    pub category: String,

    pub confidence: Confidence,

    pub model: ModelKind,
}

/// Service status as reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model: ModelKind,
    pub model_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_json_shape() {
        let result = Classification {
            tags: vec!["animals".into(), "pets".into()],
            category: "Animals/Pets".into(),
            confidence: Confidence::High,
            model: ModelKind::Clip,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tags": ["animals", "pets"],
                "category": "Animals/Pets",
                "confidence": "high",
                "model": "CLIP"
            })
        );
    }

    #[test]
    fn test_fallback_serializes_by_name() {
        let json = serde_json::to_string(&ModelKind::Fallback).unwrap();
        assert_eq!(json, "\"Fallback\"");
        assert_eq!(serde_json::to_string(&Confidence::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_health_status_json_shape() {
        let health = HealthStatus {
            status: "healthy".into(),
            model: ModelKind::Fallback,
            model_loaded: false,
        };
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "healthy", "model": "Fallback", "model_loaded": false})
        );
    }
}
