//! Schemas of the business-validation records.
//!
//! All of them live in one process-wide [`SchemaRegistry`], built on first
//! use and shared read-only afterwards.

use ideaprobe_schema::{Schema, SchemaBuilder, SchemaRegistry, SchemaResult};
use std::sync::{Arc, OnceLock};

/// Name of the keyword list schema.
pub const KEYWORD_SET: &str = "KeywordSet";
/// Name of the generic post analysis schema.
pub const POST_ANALYSIS: &str = "PostAnalysis";
/// Name of the Reddit post analysis schema.
pub const REDDIT_POST_ANALYSIS: &str = "RedditPostAnalysis";
/// Name of the per-platform insight schema.
pub const PLATFORM_INSIGHT: &str = "PlatformInsight";
/// Name of the final report schema.
pub const COMBINED_ANALYSIS: &str = "CombinedAnalysis";

static REGISTRY: OnceLock<SchemaResult<SchemaRegistry>> = OnceLock::new();

/// The shared registry of every record schema.
///
/// # Errors
///
/// Returns the [`SchemaError`](ideaprobe_schema::SchemaError) raised while
/// building the registry, on this and every later call.
pub fn registry() -> SchemaResult<&'static SchemaRegistry> {
    REGISTRY
        .get_or_init(build_registry)
        .as_ref()
        .map_err(Clone::clone)
}

/// Resolve one record schema from the shared registry.
///
/// # Errors
///
/// Fails if the registry could not be built or `name` is not in it.
pub fn resolve(name: &str) -> SchemaResult<Arc<Schema>> {
    registry()?.resolve(name)
}

fn build_registry() -> SchemaResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    registry.declare(
        Schema::builder(KEYWORD_SET)
            .description("Search keywords for validating a business idea")
            .string_list("keywords")
            .build()?,
    )?;

    registry.declare(post_analysis(POST_ANALYSIS).build()?)?;
    registry.declare(
        post_analysis(REDDIT_POST_ANALYSIS)
            .string("subreddit_context")
            .build()?,
    )?;

    let insight = registry.declare(
        Schema::builder(PLATFORM_INSIGHT)
            .string("platform")
            .string("insights")
            .build()?,
    )?;

    registry.declare(
        Schema::builder(COMBINED_ANALYSIS)
            .description("Final validation report across platforms")
            .integer("overall_score")
            .string("market_validation_summary")
            .string_list("key_pain_points")
            .string_list("existing_solutions")
            .string_list("market_opportunities")
            .object_list("platform_insights", insight)
            .string_list("recommendations")
            .build()?,
    )?;

    Ok(registry)
}

fn post_analysis(name: &str) -> SchemaBuilder {
    Schema::builder(name)
        .description("Business validation signals found in one post")
        .boolean("relevant")
        .string_list("pain_points")
        .string_list("solutions_mentioned")
        .string_list("market_signals")
        .string("sentiment")
        .integer("engagement_score")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideaprobe_output::render_example;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_holds_every_record() {
        let registry = registry().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                KEYWORD_SET,
                POST_ANALYSIS,
                REDDIT_POST_ANALYSIS,
                PLATFORM_INSIGHT,
                COMBINED_ANALYSIS,
            ]
        );
    }

    #[test]
    fn test_registry_is_shared() {
        let first = registry().unwrap() as *const SchemaRegistry;
        let second = registry().unwrap() as *const SchemaRegistry;
        assert_eq!(first, second);
    }

    #[test]
    fn test_reddit_extends_post_analysis() {
        let post = resolve(POST_ANALYSIS).unwrap();
        let reddit = resolve(REDDIT_POST_ANALYSIS).unwrap();
        assert_eq!(reddit.len(), post.len() + 1);
        assert_eq!(reddit.field_names().last(), Some(&"subreddit_context"));
    }

    #[test]
    fn test_combined_example_nests_two_insights() {
        let combined = resolve(COMBINED_ANALYSIS).unwrap();
        let example = render_example(&combined);
        assert_eq!(example.matches(r#""platform":"example_string""#).count(), 2);
        assert!(example.starts_with(r#"{"overall_score":0,"#));
    }

    #[test]
    fn test_unknown_name() {
        assert!(resolve("HNPostAnalysis").is_err());
    }
}
