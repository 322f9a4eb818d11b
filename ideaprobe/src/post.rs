//! Scraped posts, as far as prompts need them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Where a post was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// news.ycombinator.com
    HackerNews,
    /// reddit.com
    Reddit,
    /// WeChat official accounts.
    WeChat,
    /// Xiaohongshu (RED).
    Xiaohongshu,
}

impl Platform {
    /// Every platform, in report order.
    pub const ALL: [Platform; 4] = [
        Platform::HackerNews,
        Platform::Reddit,
        Platform::WeChat,
        Platform::Xiaohongshu,
    ];

    /// Display name used in prompts and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::HackerNews => "HackerNews",
            Self::Reddit => "Reddit",
            Self::WeChat => "WeChat",
            Self::Xiaohongshu => "Xiaohongshu",
        }
    }

    /// How many comments go into an analysis prompt.
    pub fn comment_limit(self) -> usize {
        match self {
            Self::Xiaohongshu => 15,
            _ => 5,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A comment under a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Comment body.
    pub text: String,
    /// Author handle, when known.
    pub author: Option<String>,
    /// Upvotes or likes.
    pub score: i64,
}

impl Comment {
    /// Create a comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the score.
    #[must_use]
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }
}

/// A scraped post.
///
/// Only used to build prompts; nothing here is interpreted beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Source platform.
    pub platform: Platform,
    /// Post title.
    #[serde(default)]
    pub title: String,
    /// Body or description.
    #[serde(default)]
    pub body: Option<String>,
    /// Points, upvotes or likes.
    #[serde(default)]
    pub score: i64,
    /// Number of comments reported by the platform.
    #[serde(default)]
    pub comment_count: i64,
    /// Link to the post.
    #[serde(default)]
    pub url: Option<String>,
    /// Subreddit, for Reddit posts.
    #[serde(default)]
    pub subreddit: Option<String>,
    /// Scraped comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Platform-specific counters and metadata.
    #[serde(default)]
    pub extras: IndexMap<String, JsonValue>,
}

impl Post {
    /// Create a post with a title.
    pub fn new(platform: Platform, title: impl Into<String>) -> Self {
        Self {
            platform,
            title: title.into(),
            body: None,
            score: 0,
            comment_count: 0,
            url: None,
            subreddit: None,
            comments: Vec::new(),
            extras: IndexMap::new(),
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set score and comment count.
    #[must_use]
    pub fn with_counts(mut self, score: i64, comment_count: i64) -> Self {
        self.score = score;
        self.comment_count = comment_count;
        self
    }

    /// Set the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the subreddit.
    #[must_use]
    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = Some(subreddit.into());
        self
    }

    /// Add a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Add a platform-specific value.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Title cut to `max` characters, for logs.
    pub fn short_title(&self, max: usize) -> &str {
        match self.title.char_indices().nth(max) {
            Some((idx, _)) => &self.title[..idx],
            None => &self.title,
        }
    }

    /// The post as a prompt section.
    pub fn describe(&self) -> String {
        let mut out = format!("{} Post:\n", self.platform);
        if let Some(subreddit) = &self.subreddit {
            out.push_str(&format!("Subreddit: {}\n", subreddit));
        }
        out.push_str(&format!("Title: {}\n", self.title));
        if let Some(body) = &self.body {
            out.push_str(&format!("Body: {}\n", body));
        }
        out.push_str(&format!("Score: {}\n", self.score));
        out.push_str(&format!("Comments: {}\n", self.comment_count));
        if let Some(url) = &self.url {
            out.push_str(&format!("URL: {}\n", url));
        }
        for (key, value) in &self.extras {
            match value {
                JsonValue::String(s) => out.push_str(&format!("{}: {}\n", key, s)),
                other => out.push_str(&format!("{}: {}\n", key, other)),
            }
        }

        let limit = self.platform.comment_limit();
        if !self.comments.is_empty() {
            out.push_str("\nTop Comments:\n");
            for comment in self.comments.iter().take(limit) {
                out.push_str(&format!("- {} (score: {}", comment.text, comment.score));
                if let Some(author) = &comment.author {
                    out.push_str(&format!(", user: {}", author));
                }
                out.push_str(")\n");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_describe_reddit_post() {
        let post = Post::new(Platform::Reddit, "How do you track invoices?")
            .with_subreddit("smallbusiness")
            .with_counts(120, 45)
            .with_url("https://reddit.com/r/smallbusiness/1")
            .with_comment(Comment::new("Spreadsheets, sadly").with_score(30));

        assert_eq!(
            post.describe(),
            "Reddit Post:\n\
             Subreddit: smallbusiness\n\
             Title: How do you track invoices?\n\
             Score: 120\n\
             Comments: 45\n\
             URL: https://reddit.com/r/smallbusiness/1\n\
             \n\
             Top Comments:\n\
             - Spreadsheets, sadly (score: 30)\n"
        );
    }

    #[test]
    fn test_describe_caps_comments_and_lists_extras() {
        let mut post = Post::new(Platform::Xiaohongshu, "露营装备推荐")
            .with_extra("collected_count", 88)
            .with_extra("city", "成都");
        for i in 0..20 {
            post = post.with_comment(Comment::new(format!("c{}", i)));
        }

        let text = post.describe();
        assert!(text.contains("collected_count: 88\ncity: 成都\n"));
        assert_eq!(text.matches("\n- c").count(), 15);
    }

    #[test]
    fn test_short_title_respects_char_boundaries() {
        let post = Post::new(Platform::WeChat, "小红书运营指南");
        assert_eq!(post.short_title(3), "小红书");
        assert_eq!(post.short_title(50), "小红书运营指南");
    }

    #[test]
    fn test_post_deserializes_with_defaults() {
        let post: Post = serde_json::from_value(json!({
            "platform": "hacker_news",
            "title": "Show HN: invoice bot",
            "score": 10
        }))
        .unwrap();
        assert_eq!(post.platform, Platform::HackerNews);
        assert!(post.comments.is_empty());
        assert_eq!(post.comment_count, 0);
    }
}
