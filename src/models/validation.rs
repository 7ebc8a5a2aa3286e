// file: src/models/validation.rs
// description: per-section research validation results and score grading
// reference: static validation ledger keyed by section id

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            ScoreGrade::Good
        } else if score >= 0.7 {
            ScoreGrade::Fair
        } else {
            ScoreGrade::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreGrade::Good => "good",
            ScoreGrade::Fair => "fair",
            ScoreGrade::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub section_id: String,
    pub credibility_score: f64,
    #[serde(default)]
    pub logical_fallacies: Vec<String>,
    pub citation_accuracy: f64,
    pub statistical_validity: f64,
    #[serde(default)]
    pub inconsistencies: Vec<String>,
}

impl ValidationResult {
    /// Named scores in display order.
    pub fn scores(&self) -> [(&'static str, f64); 3] {
        [
            ("Credibility Score", self.credibility_score),
            ("Citation Accuracy", self.citation_accuracy),
            ("Statistical Validity", self.statistical_validity),
        ]
    }

    pub fn has_issues(&self) -> bool {
        !self.logical_fallacies.is_empty() || !self.inconsistencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(ScoreGrade::from_score(0.85), ScoreGrade::Good);
        assert_eq!(ScoreGrade::from_score(0.849), ScoreGrade::Fair);
        assert_eq!(ScoreGrade::from_score(0.7), ScoreGrade::Fair);
        assert_eq!(ScoreGrade::from_score(0.69), ScoreGrade::Poor);
    }

    #[test]
    fn test_has_issues() {
        let mut result = ValidationResult {
            section_id: "intro".to_string(),
            credibility_score: 0.9,
            logical_fallacies: vec![],
            citation_accuracy: 0.9,
            statistical_validity: 0.9,
            inconsistencies: vec![],
        };
        assert!(!result.has_issues());

        result.logical_fallacies.push("Hasty Generalization".to_string());
        assert!(result.has_issues());
    }
}
