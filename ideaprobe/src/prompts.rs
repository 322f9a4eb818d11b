//! Analyzer prompts.

use crate::analyzer::{AnalyzedPost, Language};
use crate::post::{Platform, Post};

const CHINESE_INSTRUCTION: &str = "Note: return the answer in Chinese.";

/// Relevant posts quoted per platform in the combined prompt.
const INSIGHTS_PER_PLATFORM: usize = 5;

fn finish(mut prompt: String, language: Language) -> String {
    if language == Language::Chinese {
        prompt.push_str("\n\n");
        prompt.push_str(CHINESE_INSTRUCTION);
    }
    prompt
}

pub(crate) fn keywords(idea: &str, count: usize, language: Language) -> String {
    let words = match language {
        Language::English => "2-4",
        Language::Chinese => "3-6",
    };
    finish(
        format!(
            "For the business idea: \"{idea}\"\n\n\
             Generate {count} specific search keywords that would help validate this idea.\n\
             These should be phrases people might use when discussing pain points, needs, \
             or solutions related to this idea.\n\n\
             Keep keywords concise ({words} words) and focused on the core problem/solution."
        ),
        language,
    )
}

pub(crate) fn post_analysis(post: &Post, idea: &str, language: Language) -> String {
    let platform = post.platform;
    let mut questions = String::from(
        "1. Is this relevant to validating the business idea? (true/false)",
    );
    if platform == Platform::Xiaohongshu {
        questions.push_str(
            " Pay attention to location, city and brand details; if they do not match, answer false.",
        );
    }
    questions.push_str(
        "\n2. What pain points are mentioned in the post or comments?\n\
         3. What solutions are discussed or mentioned?\n\
         4. What market signals does this show? (demand, competition, user behavior, etc.)\n\
         5. What's the overall sentiment? (positive/negative/neutral)\n\
         6. Rate the engagement score 1-10 based on score and comment quality",
    );
    if platform == Platform::Reddit {
        questions.push_str("\n7. What does the subreddit context tell us about the audience?");
    }

    let mut prompt = format!(
        "Business Idea: \"{idea}\"\n\n{post}\n\
         Analyze this {platform} post and comments for business validation:\n\n{questions}",
        post = post.describe(),
    );
    match platform {
        Platform::Reddit | Platform::Xiaohongshu => prompt.push_str(&format!(
            "\n\n{platform} often has more detailed discussions than other platforms - \
             look for nuanced insights."
        )),
        Platform::HackerNews => prompt.push_str(
            "\n\nHackerNews has a technical, startup-minded audience - weigh builder and \
             investor perspectives.",
        ),
        Platform::WeChat => {}
    }

    finish(prompt, language)
}

pub(crate) fn combined(
    idea: &str,
    keywords: &[String],
    posts: &[AnalyzedPost],
    language: Language,
) -> String {
    let mut summary = String::new();
    let mut insights = String::new();

    for platform in Platform::ALL {
        let on_platform: Vec<_> = posts.iter().filter(|p| p.platform == platform).collect();
        if on_platform.is_empty() {
            continue;
        }
        let relevant: Vec<_> = on_platform
            .iter()
            .filter(|p| p.analysis.relevant)
            .collect();

        summary.push_str(&format!(
            "\n{platform}:\n- Total posts analyzed: {}\n- Relevant posts found: {}\n",
            on_platform.len(),
            relevant.len()
        ));

        insights.push_str(&format!("\n{platform} Insights:\n"));
        for post in relevant.iter().take(INSIGHTS_PER_PLATFORM) {
            let analysis = &post.analysis;
            insights.push_str(&format!(
                "- Pain Points: {:?}, Solutions: {:?}",
                analysis.pain_points, analysis.solutions_mentioned
            ));
            if let Some(context) = &post.subreddit_context {
                insights.push_str(&format!(", Subreddit: {}", context));
            }
            insights.push_str(&format!(", Sentiment: {}\n", analysis.sentiment));
        }
    }

    finish(
        format!(
            "Business Idea: \"{idea}\"\n\
             Keywords Searched: {keywords}\n\n\
             Analysis Summary:\n{summary}{insights}\n\
             Based on this validation research, provide:\n\n\
             1. Overall validation score (1-100) where:\n   \
                - 85+ = Strong market validation with clear demand\n   \
                - 70-84 = Good validation with some concerns\n   \
                - 50-69 = Mixed signals, needs more research\n   \
                - 30-49 = Weak validation, major concerns\n   \
                - 0-29 = Little to no validation found\n\
             2. Market validation summary (2-3 sentences)\n\
             3. Key pain points discovered across platforms\n\
             4. Existing solutions mentioned across platforms\n\
             5. Market opportunities identified\n\
             6. Platform-specific insights as a list of objects, each with 'platform' and \
                'insights'\n\
             7. Specific recommendations for moving forward",
            keywords = keywords.join(", "),
        ),
        language,
    )
}
