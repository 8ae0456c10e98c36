//! Ranking of learning-related posts by engagement.

use serde::{Deserialize, Serialize};

use crate::{classify::MatchMode, post::Post};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPost {
    pub id: Option<String>,
    pub title: String,
    pub comments: i64,
    pub upvotes: i64,
}

/// Posts whose lowercased title contains any of `keywords`, most-commented first.
///
/// Ties are broken by upvotes, then by title, both descending. At most
/// `limit` posts are returned.
#[must_use]
pub fn top_learning_posts<'a, I>(posts: I, keywords: &[String], limit: usize) -> Vec<LearningPost>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut matches = posts
        .into_iter()
        .filter(|post| {
            let title = post.title.to_lowercase();
            keywords
                .iter()
                .any(|k| MatchMode::Substring.contains(&title, k))
        })
        .map(|post| LearningPost {
            id: post.id.clone(),
            title: post.title.clone(),
            comments: post.comments,
            upvotes: post.upvotes,
        })
        .collect::<Vec<_>>();
    matches.sort_by(|a, b| {
        (b.comments, b.upvotes, &b.title).cmp(&(a.comments, a.upvotes, &a.title))
    });
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn post(title: &str, comments: i64, upvotes: i64) -> Post {
        Post {
            title: title.to_owned(),
            comments,
            upvotes,
            ..Post::default()
        }
    }

    #[test]
    fn test_filters_and_ranks() {
        let posts = [
            post("TIL: I learned Rust", 5, 1),
            post("Random musings", 100, 100),
            post("A guide to memory", 50, 2),
            post("Figured out caching", 5, 9),
        ];
        let keywords = AnalysisConfig::default().learning_keywords;
        let top = top_learning_posts(&posts, &keywords, 10);
        let titles = top.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec!["A guide to memory", "Figured out caching", "TIL: I learned Rust"]
        );
    }

    #[test]
    fn test_ties_break_on_upvotes_then_title() {
        let posts = [
            post("guide a", 3, 1),
            post("guide b", 3, 1),
            post("guide c", 3, 7),
        ];
        let keywords = AnalysisConfig::default().learning_keywords;
        let top = top_learning_posts(&posts, &keywords, 10);
        let titles = top.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["guide c", "guide b", "guide a"]);
    }

    #[test]
    fn test_limit() {
        let posts = (0..20)
            .map(|i| post("skill share", i, 0))
            .collect::<Vec<_>>();
        let keywords = AnalysisConfig::default().learning_keywords;
        let top = top_learning_posts(&posts, &keywords, 3);
        assert_eq!(
            top.iter().map(|p| p.comments).collect::<Vec<_>>(),
            vec![19, 18, 17]
        );
    }
}
