//! Keyword-based post classification
//!
//! Each post is labelled along independent axes, all pure functions of its
//! title and body text:
//!
//! - [`DiscourseType`]: question or statement, from the title
//! - [`KnowledgeType`]: procedural, conceptual or other, from keyword hits in
//!   `title + " " + body`
//! - [`LengthBucket`]: short, medium or long, from the body length
//! - spam flag, from substrings of the title
//!
//! Labels are never persisted as authoritative; they are recomputed from the
//! source text whenever needed.
//!
//! # Matching
//!
//! The default [`MatchMode::Substring`] counts a keyword whenever it occurs
//! anywhere in the lowercased text, so short keywords like `why` also match
//! inside unrelated words. This is a known precision limitation kept for
//! compatibility with previously published figures. [`MatchMode::WordBoundary`]
//! is an opt-in alternative that only counts keywords not flanked by
//! alphanumeric characters.
//!
//! # Examples
//!
//! ```
//! use moltstat_analysis::classify::{
//!     Classification, ClassifierConfig, DiscourseType, KnowledgeType, LengthBucket,
//! };
//!
//! let config = ClassifierConfig::default();
//! let c = Classification::of("How to build a skill?", "", &config);
//! assert_eq!(c.discourse, DiscourseType::Question);
//! assert_eq!(c.knowledge, KnowledgeType::Procedural);
//! assert_eq!(c.length, LengthBucket::Short);
//! assert!(!c.is_spam);
//! ```

use serde::{Deserialize, Serialize};

/// Keywords that indicate procedural ("how do I do X") knowledge.
pub const PROCEDURAL_KEYWORDS: &[&str] = &[
    "skill",
    "build",
    "built",
    "how to",
    "tutorial",
    "guide",
    "made",
    "created",
    "workflow",
    "tool",
    "script",
    "code",
    "implement",
    "setup",
    "configure",
];

/// Keywords that indicate conceptual ("why is X") knowledge.
pub const CONCEPTUAL_KEYWORDS: &[&str] = &[
    "understand",
    "theory",
    "why",
    "philosophy",
    "consciousness",
    "meaning",
    "think",
    "believe",
    "concept",
    "idea",
    "question",
    "wonder",
    "curious",
];

/// Leading words (with their trailing space) that mark a title as a question.
pub const QUESTION_OPENERS: &[&str] = &[
    "what ", "why ", "how ", "is ", "are ", "do ", "does ", "can ", "should ", "would ", "could ",
    "anyone ", "who ", "where ", "when ",
];

/// Title substrings that mark token-minting spam.
pub const SPAM_PATTERNS: &[&str] = &["mint", "claw", "mbc"];

/// Body length (in characters) at which a post stops being [`LengthBucket::Short`].
pub const MEDIUM_MIN_LEN: usize = 500;
/// Body length (in characters) at which a post becomes [`LengthBucket::Long`].
pub const LONG_MIN_LEN: usize = 2000;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum DiscourseType {
    Question,
    Statement,
}

impl DiscourseType {
    pub const ALL: [Self; 2] = [Self::Question, Self::Statement];

    /// Lowercase identifier used in metric names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Statement => "statement",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeType {
    Procedural,
    Conceptual,
    Other,
}

impl KnowledgeType {
    pub const ALL: [Self; 3] = [Self::Procedural, Self::Conceptual, Self::Other];

    /// Lowercase identifier used in metric names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Procedural => "procedural",
            Self::Conceptual => "conceptual",
            Self::Other => "other",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    /// Fewer than 500 characters.
    Short,
    /// 500 to 1999 characters.
    Medium,
    /// 2000 characters or more.
    Long,
}

impl LengthBucket {
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Buckets a body length given in characters.
    ///
    /// ```
    /// # use moltstat_analysis::classify::LengthBucket;
    /// assert_eq!(LengthBucket::from_len(499), LengthBucket::Short);
    /// assert_eq!(LengthBucket::from_len(500), LengthBucket::Medium);
    /// assert_eq!(LengthBucket::from_len(2000), LengthBucket::Long);
    /// ```
    #[must_use]
    pub const fn from_len(body_len: usize) -> Self {
        if body_len < MEDIUM_MIN_LEN {
            Self::Short
        } else if body_len < LONG_MIN_LEN {
            Self::Medium
        } else {
            Self::Long
        }
    }

    /// Lowercase identifier used in metric names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

/// How keywords are matched against lowercased text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Plain substring containment.
    #[default]
    Substring,
    /// Containment where the keyword is not glued to surrounding letters or digits.
    WordBoundary,
}

impl MatchMode {
    /// Whether `keyword` occurs in `haystack` under this mode.
    ///
    /// Both arguments are expected to be lowercase already.
    #[must_use]
    pub fn contains(self, haystack: &str, keyword: &str) -> bool {
        match self {
            Self::Substring => haystack.contains(keyword),
            Self::WordBoundary => contains_at_word_boundary(haystack, keyword),
        }
    }
}

fn contains_at_word_boundary(haystack: &str, keyword: &str) -> bool {
    // Only alphanumeric keyword edges need a boundary; "til:" or "why " already carry one.
    let check_before = keyword.chars().next().is_some_and(char::is_alphanumeric);
    let check_after = keyword.chars().next_back().is_some_and(char::is_alphanumeric);

    haystack.match_indices(keyword).any(|(start, matched)| {
        let before_ok = !check_before
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let after_ok = !check_after
            || !haystack[start + matched.len()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric);
        before_ok && after_ok
    })
}

/// Keyword tables and matching policy for the classifiers.
///
/// Every list must contain lowercase, non-empty entries; see
/// [`AnalysisConfig::validate`](crate::config::AnalysisConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub match_mode: MatchMode,
    pub procedural_keywords: Vec<String>,
    pub conceptual_keywords: Vec<String>,
    pub question_openers: Vec<String>,
    pub spam_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|&w| w.to_owned()).collect();
        Self {
            match_mode: MatchMode::default(),
            procedural_keywords: owned(PROCEDURAL_KEYWORDS),
            conceptual_keywords: owned(CONCEPTUAL_KEYWORDS),
            question_openers: owned(QUESTION_OPENERS),
            spam_patterns: owned(SPAM_PATTERNS),
        }
    }
}

impl ClassifierConfig {
    /// Question iff the title contains `?` or starts with an interrogative opener.
    ///
    /// ```
    /// # use moltstat_analysis::classify::{ClassifierConfig, DiscourseType};
    /// let config = ClassifierConfig::default();
    /// assert_eq!(config.discourse_type("Is this real?"), DiscourseType::Question);
    /// assert_eq!(config.discourse_type("Hello Moltbook community!"), DiscourseType::Statement);
    /// ```
    #[must_use]
    pub fn discourse_type(&self, title: &str) -> DiscourseType {
        let lower = title.to_lowercase();
        let is_question =
            title.contains('?') || self.question_openers.iter().any(|w| lower.starts_with(w.as_str()));
        if is_question {
            DiscourseType::Question
        } else {
            DiscourseType::Statement
        }
    }

    /// Number of distinct procedural and conceptual keywords found in the text.
    #[must_use]
    pub fn keyword_hits(&self, title: &str, body: &str) -> (usize, usize) {
        let text = format!("{title} {body}").to_lowercase();
        let count = |keywords: &[String]| {
            keywords
                .iter()
                .filter(|k| self.match_mode.contains(&text, k))
                .count()
        };
        (
            count(&self.procedural_keywords),
            count(&self.conceptual_keywords),
        )
    }

    /// Procedural or conceptual by strict majority of keyword hits; ties are [`KnowledgeType::Other`].
    #[must_use]
    pub fn knowledge_type(&self, title: &str, body: &str) -> KnowledgeType {
        let (procedural, conceptual) = self.keyword_hits(title, body);
        match procedural.cmp(&conceptual) {
            std::cmp::Ordering::Greater => KnowledgeType::Procedural,
            std::cmp::Ordering::Less => KnowledgeType::Conceptual,
            std::cmp::Ordering::Equal => KnowledgeType::Other,
        }
    }

    /// Spam iff the lowercased title contains any spam pattern.
    ///
    /// Spam detection always uses substring matching.
    #[must_use]
    pub fn is_spam(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.spam_patterns.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// All labels derived for one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub discourse: DiscourseType,
    pub knowledge: KnowledgeType,
    pub length: LengthBucket,
    pub is_spam: bool,
}

impl Classification {
    #[must_use]
    pub fn of(title: &str, body: &str, config: &ClassifierConfig) -> Self {
        Self {
            discourse: config.discourse_type(title),
            knowledge: config.knowledge_type(title, body),
            length: LengthBucket::from_len(body.chars().count()),
            is_spam: config.is_spam(title),
        }
    }
}
