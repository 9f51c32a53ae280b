//! Print what the bridge would extract from a report file.
//!
//! Usage: `extract-report <path/to/daily.html>`

use anyhow::{bail, Context, Result};
use report_bridge::ReportExtractor;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: extract-report <report.html>");
    };

    let extractor =
        ReportExtractor::from_path(&path).with_context(|| format!("reading report {path}"))?;

    println!("=== AI Analysis ({:?}) ===", extractor.layout());
    println!("{}", extractor.ai_analysis());
    println!("\n=== Top 5 News ===");
    for news in extractor.hot_news().iter().take(5) {
        println!("- {} ({})", news.title, news.source);
    }

    if !extractor.is_valid() {
        bail!("report {path} has no news and no analysis");
    }
    Ok(())
}
