//! Analysis configuration
//!
//! All fields have defaults, so a configuration file only needs the keys it
//! overrides:
//!
//! ```json
//! {
//!   "exclude_spam": true,
//!   "classifier": { "match_mode": "word-boundary" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::classify::ClassifierConfig;

/// Title keywords that mark a post as learning-related.
pub const LEARNING_KEYWORDS: &[&str] = &[
    "learn",
    "skill",
    "built",
    "tutorial",
    "how to",
    "guide",
    "discovered",
    "figured out",
];

/// Share of posts (in percent) in a single hour above which posting looks scheduled.
pub const DEFAULT_SCHEDULING_THRESHOLD_PCT: f64 = 15.0;

pub const DEFAULT_TOP_LEARNING_POSTS: usize = 10;

pub const DEFAULT_TOP_SUBMOLTS: usize = 10;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("scheduling threshold must be within 0..=100 percent, got {value}")]
    SchedulingThresholdOutOfRange { value: f64 },
    #[display("keyword list '{list}' contains an empty entry")]
    EmptyKeyword { list: &'static str },
    #[display("keyword '{keyword}' in list '{list}' must be lowercase")]
    UppercaseKeyword { list: &'static str, keyword: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub classifier: ClassifierConfig,
    /// Drop spam posts before computing any aggregate.
    pub exclude_spam: bool,
    pub scheduling_threshold_pct: f64,
    pub top_learning_posts: usize,
    pub learning_keywords: Vec<String>,
    /// Number of most active submolts listed in the report.
    pub top_submolts: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            exclude_spam: false,
            scheduling_threshold_pct: DEFAULT_SCHEDULING_THRESHOLD_PCT,
            top_learning_posts: DEFAULT_TOP_LEARNING_POSTS,
            learning_keywords: LEARNING_KEYWORDS.iter().map(|&k| k.to_owned()).collect(),
            top_submolts: DEFAULT_TOP_SUBMOLTS,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.scheduling_threshold_pct) {
            return Err(ConfigError::SchedulingThresholdOutOfRange {
                value: self.scheduling_threshold_pct,
            });
        }

        let lists: [(&'static str, &[String]); 5] = [
            ("procedural_keywords", self.classifier.procedural_keywords.as_slice()),
            ("conceptual_keywords", self.classifier.conceptual_keywords.as_slice()),
            ("question_openers", self.classifier.question_openers.as_slice()),
            ("spam_patterns", self.classifier.spam_patterns.as_slice()),
            ("learning_keywords", self.learning_keywords.as_slice()),
        ];
        for (list, keywords) in lists {
            for keyword in keywords {
                if keyword.is_empty() {
                    return Err(ConfigError::EmptyKeyword { list });
                }
                if keyword.to_lowercase() != *keyword {
                    return Err(ConfigError::UppercaseKeyword {
                        list,
                        keyword: keyword.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::classify::MatchMode;

    use super::*;

    #[test]
    fn test_default_is_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{ "exclude_spam": true, "classifier": { "match_mode": "word-boundary" } }"#,
        )
        .unwrap();
        assert!(config.exclude_spam);
        assert_eq!(config.classifier.match_mode, MatchMode::WordBoundary);
        assert_eq!(
            config.classifier.procedural_keywords,
            ClassifierConfig::default().procedural_keywords
        );
        assert_eq!(config.top_learning_posts, DEFAULT_TOP_LEARNING_POSTS);
        assert_eq!(config.top_submolts, DEFAULT_TOP_SUBMOLTS);
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let config = AnalysisConfig {
            scheduling_threshold_pct: 120.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SchedulingThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let mut config = AnalysisConfig::default();
        config.classifier.spam_patterns.push(String::new());
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "keyword list 'spam_patterns' contains an empty entry"
        );
    }

    #[test]
    fn test_rejects_uppercase_keyword() {
        let mut config = AnalysisConfig::default();
        config.learning_keywords = vec!["Learn".to_owned()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UppercaseKeyword { list: "learning_keywords", .. })
        ));
    }
}
