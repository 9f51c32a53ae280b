//! Report extractor: reads the AI analysis and hot news back out of a
//! finished HTML report.
//!
//! Extraction is a two-tier strategy. Reports that carry `ai-block` elements
//! are read block by block; older reports without blocks fall back to the
//! section's visible text.

use std::path::Path;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::normalize::normalize;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static SEL_SECTION: Lazy<Selector> = Lazy::new(|| selector(".ai-section"));
static SEL_BLOCK: Lazy<Selector> = Lazy::new(|| selector(".ai-block"));
static SEL_BLOCK_TITLE: Lazy<Selector> = Lazy::new(|| selector(".ai-block-title"));
static SEL_BLOCK_CONTENT: Lazy<Selector> = Lazy::new(|| selector(".ai-block-content"));
static SEL_ERROR: Lazy<Selector> = Lazy::new(|| selector(".ai-error"));
static SEL_NEWS_ITEM: Lazy<Selector> = Lazy::new(|| selector(".news-item"));
static SEL_NEWS_TITLE: Lazy<Selector> = Lazy::new(|| selector(".news-title"));
static SEL_SOURCE: Lazy<Selector> = Lazy::new(|| selector(".source-name"));
static SEL_NEWS_LINK: Lazy<Selector> = Lazy::new(|| selector("a.news-link"));

pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub url: String,
}

/// Everything a poll cycle needs from one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReport {
    pub analysis_text: String,
    pub news_items: Vec<NewsItem>,
}

impl ExtractedReport {
    /// A report is worth delivering if it has any news or any analysis.
    pub fn is_valid(&self) -> bool {
        !self.news_items.is_empty() || !self.analysis_text.is_empty()
    }
}

/// How the analysis section of a report is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisLayout {
    /// No `ai-section` at all.
    Missing,
    /// The section only carries an `ai-error`.
    Failed,
    /// Block-structured section; `version` comes from `data-format-version`.
    /// A versioned section without blocks is structured with zero blocks.
    Structured { version: Option<u32> },
    /// Section without blocks (reports predating the block format).
    Legacy,
}

pub struct ReportExtractor {
    document: Html,
}

impl ReportExtractor {
    pub fn from_html(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let html = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_html(&html))
    }

    fn section(&self) -> Option<ElementRef<'_>> {
        self.document.select(&SEL_SECTION).next()
    }

    pub fn layout(&self) -> AnalysisLayout {
        let Some(section) = self.section() else {
            return AnalysisLayout::Missing;
        };
        let version_attr = section.value().attr("data-format-version");
        let version = version_attr.and_then(|v| v.trim().parse().ok());
        if section.select(&SEL_BLOCK).next().is_some() {
            AnalysisLayout::Structured { version }
        } else if section.select(&SEL_ERROR).next().is_some() {
            AnalysisLayout::Failed
        } else if version_attr.is_some() {
            // versioned section whose sections were all empty: zero blocks
            AnalysisLayout::Structured { version }
        } else {
            AnalysisLayout::Legacy
        }
    }

    /// Analysis text: one `【title】` line per block, its content, then a
    /// blank line. Empty when the report has no (successful) analysis.
    pub fn ai_analysis(&self) -> String {
        let Some(section) = self.section() else {
            warn!("no .ai-section found in report");
            return String::new();
        };

        match self.layout() {
            AnalysisLayout::Missing => String::new(),
            AnalysisLayout::Failed => {
                warn!("report carries a failed AI analysis; ignoring it");
                String::new()
            }
            AnalysisLayout::Legacy => {
                debug!("no .ai-block in .ai-section, using legacy text layout");
                visible_text(section)
            }
            AnalysisLayout::Structured { version } => {
                debug!(?version, "reading structured AI blocks");
                let mut out = String::new();
                for block in section.select(&SEL_BLOCK) {
                    if let Some(title) = block.select(&SEL_BLOCK_TITLE).next() {
                        out.push_str(&format!("【{}】\n", inline_text(title)));
                    }
                    if let Some(content) = block.select(&SEL_BLOCK_CONTENT).next() {
                        out.push_str(&normalize(&visible_text(content)));
                        out.push_str("\n\n");
                    }
                }
                out
            }
        }
    }

    /// News items in document order. Items without a title are skipped.
    pub fn hot_news(&self) -> Vec<NewsItem> {
        let mut news = Vec::new();
        for item in self.document.select(&SEL_NEWS_ITEM) {
            let title = item
                .select(&SEL_NEWS_TITLE)
                .next()
                .map(inline_text)
                .unwrap_or_default();
            if title.is_empty() {
                debug!("skipping .news-item without a title");
                continue;
            }

            let source = item
                .select(&SEL_SOURCE)
                .next()
                .map(inline_text)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

            let url = item
                .select(&SEL_NEWS_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_string();

            news.push(NewsItem { title, source, url });
        }
        news
    }

    pub fn is_valid(&self) -> bool {
        !self.hot_news().is_empty() || !self.ai_analysis().is_empty()
    }

    pub fn extract(&self) -> ExtractedReport {
        ExtractedReport {
            analysis_text: self.ai_analysis(),
            news_items: self.hot_news(),
        }
    }
}

/// Text nodes trimmed, blanks dropped, one per line.
fn visible_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text nodes trimmed and concatenated (headings, titles).
fn inline_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect::<String>()
}
