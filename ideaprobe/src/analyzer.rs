//! Business-idea analyzers.
//!
//! Every analyzer call goes through the generation orchestrator. When a
//! generation fails the error is logged and a fallback record is returned,
//! so one bad post never sinks a whole run.

use futures::future::join_all;
use ideaprobe_generate::generate_output;
use ideaprobe_models::{BoxedInvoker, ModelInvoker};
use ideaprobe_retries::{ConfigError, ConfigResult, RetryConfig};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::post::{Platform, Post};
use crate::prompts;
use crate::records::{
    CombinedAnalysis, KeywordSet, PlatformInsight, PostAnalysis, RedditPostAnalysis,
};

/// Environment variable selecting the answer language.
pub const LANGUAGE_ENV: &str = "IDEAPROBE_LANGUAGE";

/// Distinct pain points or solutions kept in a fallback report.
pub const FALLBACK_LIST_LIMIT: usize = 10;

/// Language the model is asked to answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (no extra instruction).
    #[default]
    English,
    /// Chinese.
    Chinese,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "zh" | "cn" | "chinese" => Ok(Self::Chinese),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("english"),
            Self::Chinese => f.write_str("chinese"),
        }
    }
}

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Retry policy for every generation.
    pub retry: RetryConfig,
    /// Answer language.
    pub language: Language,
    /// Keywords requested per idea.
    pub keyword_count: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            language: Language::default(),
            keyword_count: 3,
        }
    }
}

impl AnalyzerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the answer language.
    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the number of keywords to request.
    #[must_use]
    pub fn keyword_count(mut self, count: usize) -> Self {
        self.keyword_count = count;
        self
    }

    /// Read the retry policy and the language from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            retry: RetryConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(raw) = lookup(LANGUAGE_ENV) {
            config.language = raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid(LANGUAGE_ENV, &raw, reason))?;
        }

        Ok(config)
    }
}

/// One analyzed post, normalized across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedPost {
    /// Source platform.
    pub platform: Platform,
    /// Title of the analyzed post.
    pub title: String,
    /// The analysis.
    pub analysis: PostAnalysis,
    /// Audience context, for Reddit posts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit_context: Option<String>,
}

/// Runs the business-validation analyses against one model.
#[derive(Clone)]
pub struct Analyzer {
    invoker: BoxedInvoker,
    config: AnalyzerConfig,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("model", &self.invoker.identifier())
            .field("config", &self.config)
            .finish()
    }
}

impl Analyzer {
    /// Create an analyzer with the default configuration.
    pub fn new(invoker: impl ModelInvoker + 'static) -> Self {
        Self::from_arc(Arc::new(invoker))
    }

    /// Create an analyzer from a shared invoker.
    pub fn from_arc(invoker: BoxedInvoker) -> Self {
        Self {
            invoker,
            config: AnalyzerConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Suggest search keywords for `idea`.
    ///
    /// Falls back to the first two words of the idea.
    pub async fn generate_keywords(&self, idea: &str) -> Vec<String> {
        info!(idea, count = self.config.keyword_count, "Generating keywords");
        let prompt = prompts::keywords(idea, self.config.keyword_count, self.config.language);

        match generate_output::<KeywordSet>(&prompt, self.invoker.as_ref(), &self.config.retry)
            .await
        {
            Ok(set) => {
                info!(keywords = ?set.keywords, "Generated keywords");
                set.keywords
            }
            Err(err) => {
                warn!(
                    reason = %err.reason(),
                    error = %err,
                    "Keyword generation failed, using fallback"
                );
                fallback_keywords(idea)
            }
        }
    }

    /// Analyze a HackerNews, WeChat or Xiaohongshu post.
    ///
    /// Reddit posts are accepted too but lose their subreddit context; use
    /// [`analyze_reddit_post`](Self::analyze_reddit_post) or
    /// [`analyze`](Self::analyze) for them.
    pub async fn analyze_post(&self, post: &Post, idea: &str) -> PostAnalysis {
        info!(platform = %post.platform, title = post.short_title(50), "Analyzing post");
        let prompt = prompts::post_analysis(post, idea, self.config.language);

        match generate_output::<PostAnalysis>(&prompt, self.invoker.as_ref(), &self.config.retry)
            .await
        {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(
                    platform = %post.platform,
                    reason = %err.reason(),
                    error = %err,
                    "Post analysis failed, using placeholder"
                );
                PostAnalysis::failed()
            }
        }
    }

    /// Analyze a Reddit post, including what its subreddit says about the
    /// audience.
    pub async fn analyze_reddit_post(&self, post: &Post, idea: &str) -> RedditPostAnalysis {
        info!(
            subreddit = post.subreddit.as_deref().unwrap_or("unknown"),
            title = post.short_title(50),
            "Analyzing Reddit post"
        );
        let prompt = prompts::post_analysis(post, idea, self.config.language);

        match generate_output::<RedditPostAnalysis>(
            &prompt,
            self.invoker.as_ref(),
            &self.config.retry,
        )
        .await
        {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(
                    reason = %err.reason(),
                    error = %err,
                    "Reddit post analysis failed, using placeholder"
                );
                RedditPostAnalysis::failed()
            }
        }
    }

    /// Analyze any post with the analysis matching its platform.
    pub async fn analyze(&self, post: &Post, idea: &str) -> AnalyzedPost {
        let (analysis, subreddit_context) = match post.platform {
            Platform::Reddit => {
                let reddit = self.analyze_reddit_post(post, idea).await;
                (reddit.analysis, Some(reddit.subreddit_context))
            }
            _ => (self.analyze_post(post, idea).await, None),
        };

        AnalyzedPost {
            platform: post.platform,
            title: post.title.clone(),
            analysis,
            subreddit_context,
        }
    }

    /// Analyze many posts concurrently; results keep the input order.
    pub async fn analyze_posts(&self, posts: &[Post], idea: &str) -> Vec<AnalyzedPost> {
        info!(posts = posts.len(), "Analyzing posts");
        join_all(posts.iter().map(|post| self.analyze(post, idea))).await
    }

    /// Combine post analyses into the final report.
    ///
    /// Falls back to [`fallback_analysis`] when generation fails.
    pub async fn combine(
        &self,
        idea: &str,
        keywords: &[String],
        posts: &[AnalyzedPost],
    ) -> CombinedAnalysis {
        info!(posts = posts.len(), "Generating combined analysis");
        let prompt = prompts::combined(idea, keywords, posts, self.config.language);

        match generate_output::<CombinedAnalysis>(
            &prompt,
            self.invoker.as_ref(),
            &self.config.retry,
        )
        .await
        {
            Ok(report) => report,
            Err(err) => {
                warn!(
                    reason = %err.reason(),
                    error = %err,
                    "Combined analysis failed, building fallback report"
                );
                fallback_analysis(posts)
            }
        }
    }

    /// Keywords, then every post, then the combined report.
    pub async fn validate(&self, idea: &str, posts: &[Post]) -> (Vec<String>, CombinedAnalysis) {
        let keywords = self.generate_keywords(idea).await;
        let analyzed = self.analyze_posts(posts, idea).await;
        let report = self.combine(idea, &keywords, &analyzed).await;
        (keywords, report)
    }
}

/// The first two words of `idea`, as a single keyword.
pub fn fallback_keywords(idea: &str) -> Vec<String> {
    let words: Vec<&str> = idea.split_whitespace().take(2).collect();
    if words.is_empty() {
        Vec::new()
    } else {
        vec![words.join(" ")]
    }
}

/// A report built from the relevant analyses alone.
pub fn fallback_analysis(posts: &[AnalyzedPost]) -> CombinedAnalysis {
    info!(posts = posts.len(), "Creating fallback analysis");

    let relevant: Vec<&AnalyzedPost> = posts.iter().filter(|p| p.analysis.relevant).collect();

    let pain_points: IndexSet<&str> = relevant
        .iter()
        .flat_map(|p| p.analysis.pain_points.iter().map(String::as_str))
        .collect();
    let solutions: IndexSet<&str> = relevant
        .iter()
        .flat_map(|p| p.analysis.solutions_mentioned.iter().map(String::as_str))
        .collect();

    let score = (relevant.len() * 100 / posts.len().max(1)).min(100);

    let platforms: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|platform| posts.iter().any(|p| p.platform == *platform))
        .collect();

    let platform_insights = platforms
        .iter()
        .map(|platform| {
            let total = posts.iter().filter(|p| p.platform == *platform).count();
            let found = relevant.iter().filter(|p| p.platform == *platform).count();
            PlatformInsight::new(
                platform.label(),
                format!("Found {} relevant posts out of {} total", found, total),
            )
        })
        .collect();

    let across = if platforms.is_empty() {
        "the analyzed platforms".to_string()
    } else {
        platforms
            .iter()
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(" and ")
    };

    CombinedAnalysis {
        overall_score: score as i64,
        market_validation_summary: format!(
            "Analysis found {} relevant posts across {}. \
             The idea shows {}% relevance based on available data. \
             Note: This is a fallback analysis due to an error in the full analysis generation.",
            relevant.len(),
            across,
            score
        ),
        key_pain_points: capped_or(pain_points, "No clear pain points identified"),
        existing_solutions: capped_or(solutions, "No clear solutions identified"),
        market_opportunities: vec!["Review the collected data for opportunities".to_string()],
        platform_insights,
        recommendations: vec![
            "Review the individual post analyses for more detailed insights".to_string(),
            "Consider refining the business idea based on the pain points identified".to_string(),
            "Try running the analysis again with more focused keywords".to_string(),
        ],
    }
}

fn capped_or(items: IndexSet<&str>, placeholder: &str) -> Vec<String> {
    if items.is_empty() {
        return vec![placeholder.to_string()];
    }
    items
        .into_iter()
        .take(FALLBACK_LIST_LIMIT)
        .map(str::to_string)
        .collect()
}
