//! Text channel variants. Same sections, same order, different wrapping.

use crate::analysis::AnalysisResult;
use crate::normalize::normalize;

use super::{failure_message, FAILURE_PREFIX, HEADING};

/// Heading/line syntax for one text channel.
struct TextStyle {
    heading: fn(&str) -> String,
    section: fn(&str) -> String,
    failure: fn(&str) -> String,
}

fn render_with(style: &TextStyle, result: &AnalysisResult) -> String {
    if let AnalysisResult::Failure { error } = result {
        return (style.failure)(failure_message(error));
    }
    let mut lines = vec![(style.heading)(HEADING), String::new()];
    for section in result.present_sections() {
        lines.push((style.section)(&section.title));
        lines.push(normalize(&section.body));
        lines.push(String::new());
    }
    lines.join("\n")
}

const MARKDOWN: TextStyle = TextStyle {
    heading: |h| format!("**{h}**"),
    section: |t| format!("**{t}**"),
    failure: |e| format!("⚠️ {FAILURE_PREFIX}: {e}"),
};

const DINGTALK: TextStyle = TextStyle {
    heading: |h| format!("### {h}"),
    section: |t| format!("#### {t}"),
    failure: |e| format!("⚠️ {FAILURE_PREFIX}: {e}"),
};

const PLAIN: TextStyle = TextStyle {
    heading: |h| format!("【{h}】"),
    section: |t| format!("[{t}]"),
    failure: |e| format!("{FAILURE_PREFIX}: {e}"),
};

/// Generic markdown (wework, telegram, ntfy, slack).
pub fn render_markdown(result: &AnalysisResult) -> String {
    render_with(&MARKDOWN, result)
}

/// Feishu cards take the same bold-heading markdown.
pub fn render_feishu(result: &AnalysisResult) -> String {
    render_with(&MARKDOWN, result)
}

pub fn render_dingtalk(result: &AnalysisResult) -> String {
    render_with(&DINGTALK, result)
}

pub fn render_plain(result: &AnalysisResult) -> String {
    render_with(&PLAIN, result)
}
