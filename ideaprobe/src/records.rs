//! Business-validation records.
//!
//! Each record is generated through its schema in [`schemas`](crate::schemas)
//! and bound into the Rust type with `serde`.

use ideaprobe_output::StructuredOutput;
use ideaprobe_schema::{Schema, SchemaResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::schemas;

/// Search keywords for a business idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    /// Short search phrases.
    pub keywords: Vec<String>,
}

impl StructuredOutput for KeywordSet {
    fn schema() -> SchemaResult<Arc<Schema>> {
        schemas::resolve(schemas::KEYWORD_SET)
    }
}

/// Validation signals found in one post.
///
/// Used for HackerNews, WeChat and Xiaohongshu posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAnalysis {
    /// Whether the post bears on the idea at all.
    pub relevant: bool,
    /// Pain points raised in the post or its comments.
    pub pain_points: Vec<String>,
    /// Existing solutions that were mentioned.
    pub solutions_mentioned: Vec<String>,
    /// Demand, competition and behavior signals.
    pub market_signals: Vec<String>,
    /// `positive`, `negative` or `neutral`.
    pub sentiment: String,
    /// 1 to 10, from score and comment quality.
    pub engagement_score: i64,
}

impl PostAnalysis {
    /// Placeholder used when a post could not be analyzed.
    pub fn failed() -> Self {
        let failed = vec![ANALYSIS_FAILED.to_string()];
        Self {
            relevant: false,
            pain_points: failed.clone(),
            solutions_mentioned: failed.clone(),
            market_signals: failed,
            sentiment: "neutral".to_string(),
            engagement_score: 0,
        }
    }
}

impl StructuredOutput for PostAnalysis {
    fn schema() -> SchemaResult<Arc<Schema>> {
        schemas::resolve(schemas::POST_ANALYSIS)
    }
}

/// A [`PostAnalysis`] plus what the subreddit says about its audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditPostAnalysis {
    /// The platform-independent part.
    #[serde(flatten)]
    pub analysis: PostAnalysis,
    /// Audience context from the subreddit.
    pub subreddit_context: String,
}

impl RedditPostAnalysis {
    /// Placeholder used when a post could not be analyzed.
    pub fn failed() -> Self {
        Self {
            analysis: PostAnalysis::failed(),
            subreddit_context: ANALYSIS_FAILED.to_string(),
        }
    }
}

impl StructuredOutput for RedditPostAnalysis {
    fn schema() -> SchemaResult<Arc<Schema>> {
        schemas::resolve(schemas::REDDIT_POST_ANALYSIS)
    }
}

/// Insights specific to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInsight {
    /// Platform name, e.g. `HackerNews`.
    pub platform: String,
    /// What this platform showed.
    pub insights: String,
}

impl PlatformInsight {
    /// Create an insight.
    pub fn new(platform: impl Into<String>, insights: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            insights: insights.into(),
        }
    }
}

impl StructuredOutput for PlatformInsight {
    fn schema() -> SchemaResult<Arc<Schema>> {
        schemas::resolve(schemas::PLATFORM_INSIGHT)
    }
}

/// The final validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAnalysis {
    /// 1 to 100.
    pub overall_score: i64,
    /// Two or three sentences.
    pub market_validation_summary: String,
    /// Pain points seen across platforms.
    pub key_pain_points: Vec<String>,
    /// Solutions already on the market.
    pub existing_solutions: Vec<String>,
    /// Openings worth pursuing.
    pub market_opportunities: Vec<String>,
    /// One entry per platform.
    pub platform_insights: Vec<PlatformInsight>,
    /// Next steps.
    pub recommendations: Vec<String>,
}

impl CombinedAnalysis {
    /// Report for a run that stopped before any analysis finished.
    pub fn interrupted(idea: &str, data_location: &str) -> Self {
        let incomplete = vec![INCOMPLETE.to_string()];
        Self {
            overall_score: 10,
            market_validation_summary: format!(
                "Analysis for '{}' was interrupted. This is a minimal report based on limited data.",
                idea
            ),
            key_pain_points: incomplete.clone(),
            existing_solutions: incomplete.clone(),
            market_opportunities: incomplete,
            platform_insights: vec![PlatformInsight::new("Error", "Analysis was interrupted")],
            recommendations: vec![
                format!("Review the data in {} for partial insights", data_location),
                "Try running the analysis again with fewer keywords".to_string(),
                "Consider breaking the analysis into smaller parts".to_string(),
            ],
        }
    }
}

impl StructuredOutput for CombinedAnalysis {
    fn schema() -> SchemaResult<Arc<Schema>> {
        schemas::resolve(schemas::COMBINED_ANALYSIS)
    }
}

/// Marker used in placeholder analyses.
pub const ANALYSIS_FAILED: &str = "Analysis failed";

const INCOMPLETE: &str = "Analysis incomplete - review collected data";

#[cfg(test)]
mod tests {
    use super::*;
    use ideaprobe_output::{synthesize, validate};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_reddit_analysis_round_trips_flat() {
        let analysis = RedditPostAnalysis {
            analysis: PostAnalysis {
                relevant: true,
                pain_points: vec!["slow onboarding".into()],
                solutions_mentioned: vec![],
                market_signals: vec!["people pay for it".into()],
                sentiment: "negative".into(),
                engagement_score: 7,
            },
            subreddit_context: "indie founders".into(),
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["subreddit_context"], "indie founders");
        assert_eq!(value["engagement_score"], 7);

        let outcome = validate(&RedditPostAnalysis::schema().unwrap(), &value).unwrap();
        assert!(outcome.is_clean());
        let back: RedditPostAnalysis = outcome.into_first().unwrap().into_typed().unwrap();
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_synthesized_examples_bind() {
        let keywords: KeywordSet =
            serde_json::from_value(synthesize(&KeywordSet::schema().unwrap())).unwrap();
        assert_eq!(keywords.keywords.len(), 2);

        let combined: CombinedAnalysis =
            serde_json::from_value(synthesize(&CombinedAnalysis::schema().unwrap())).unwrap();
        assert_eq!(combined.platform_insights.len(), 2);
        assert_eq!(combined.overall_score, 0);
    }

    #[test]
    fn test_failed_placeholders() {
        let failed = RedditPostAnalysis::failed();
        assert!(!failed.analysis.relevant);
        assert_eq!(failed.analysis.pain_points, vec![ANALYSIS_FAILED]);
        assert_eq!(failed.subreddit_context, ANALYSIS_FAILED);
        assert_eq!(failed.analysis.engagement_score, 0);
    }

    #[test]
    fn test_interrupted_report() {
        let report = CombinedAnalysis::interrupted("pet sitting app", "data/run-1");
        assert_eq!(report.overall_score, 10);
        assert_eq!(
            serde_json::to_value(&report.platform_insights).unwrap(),
            json!([{"platform": "Error", "insights": "Analysis was interrupted"}])
        );
        assert!(report.recommendations[0].contains("data/run-1"));
    }
}
