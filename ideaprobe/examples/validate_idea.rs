//! Business idea validation example.
//!
//! Generates search keywords for an idea, analyzes a file of scraped posts
//! and prints the combined report as JSON.
//!
//! Run with:
//! ```bash
//! OPENAI_API_KEY=your-key RUST_LOG=ideaprobe=debug \
//!     cargo run --example validate_idea -- "AI invoice chasing for freelancers" posts.json
//! ```
//!
//! `posts.json` holds an array of posts, e.g.
//! `[{"platform": "reddit", "title": "...", "subreddit": "freelance", "score": 120}]`.
//! Set `IDEAPROBE_LANGUAGE=zh` for answers in Chinese and `MAX_RETRIES` /
//! `RETRY_DELAY` to tune retries.

use anyhow::Context;
use ideaprobe::prelude::*;
use ideaprobe::OpenAIChatInvoker;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let idea = args
        .next()
        .context("usage: validate_idea <business idea> [posts.json]")?;

    let posts: Vec<Post> = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading posts from {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing posts in {}", path))?
        }
        None => Vec::new(),
    };

    let model = OpenAIChatInvoker::from_env()?;
    let config = AnalyzerConfig::from_env()?;
    let analyzer = Analyzer::new(model).with_config(config);

    println!("Validating: {}\n", idea);

    let (keywords, report) = analyzer.validate(&idea, &posts).await;

    println!("Keywords: {}", keywords.join(", "));
    println!("Score: {}/100\n", report.overall_score);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
