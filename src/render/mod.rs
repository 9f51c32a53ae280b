//! Renderers for AI analysis results: the report micro-format plus thin
//! per-channel variants used by push notifications.

pub mod html;
pub mod text;

use std::str::FromStr;

use crate::analysis::AnalysisResult;

pub use html::{render_html, render_html_rich};
pub use text::{render_dingtalk, render_feishu, render_markdown, render_plain};

pub(crate) const HEADING: &str = "✨ AI 财经分析";
pub(crate) const FAILURE_PREFIX: &str = "AI 分析失败";
pub(crate) const UNKNOWN_ERROR: &str = "未知错误";

/// Error text shown to readers; blank messages become [`UNKNOWN_ERROR`].
pub(crate) fn failure_message(error: &str) -> &str {
    if error.trim().is_empty() {
        UNKNOWN_ERROR
    } else {
        error
    }
}

/// Delivery channel a rendered analysis is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Feishu,
    Dingtalk,
    Wework,
    Telegram,
    Email,
    Ntfy,
    Bark,
    Slack,
    /// Anything unrecognized; rendered as markdown.
    Other,
}

impl FromStr for Channel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "feishu" => Channel::Feishu,
            "dingtalk" => Channel::Dingtalk,
            "wework" => Channel::Wework,
            "telegram" => Channel::Telegram,
            "email" => Channel::Email,
            "ntfy" => Channel::Ntfy,
            "bark" => Channel::Bark,
            "slack" => Channel::Slack,
            _ => Channel::Other,
        })
    }
}

/// Render `result` in the style expected by `channel`.
pub fn render_for(channel: Channel, result: &AnalysisResult) -> String {
    match channel {
        Channel::Feishu => render_feishu(result),
        Channel::Dingtalk => render_dingtalk(result),
        Channel::Email => render_html_rich(result),
        Channel::Bark => render_plain(result),
        Channel::Wework | Channel::Telegram | Channel::Ntfy | Channel::Slack | Channel::Other => {
            render_markdown(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_are_case_insensitive_with_markdown_fallback() {
        assert_eq!("DingTalk".parse::<Channel>(), Ok(Channel::Dingtalk));
        assert_eq!(" bark ".parse::<Channel>(), Ok(Channel::Bark));
        assert_eq!("pigeon".parse::<Channel>(), Ok(Channel::Other));
    }

    #[test]
    fn dispatch_picks_variant() {
        let r = AnalysisResult::from_known(Some("x".into()), None, None);
        assert_eq!(render_for(Channel::Bark, &r), render_plain(&r));
        assert_eq!(render_for(Channel::Email, &r), render_html_rich(&r));
        assert_eq!(render_for(Channel::Other, &r), render_markdown(&r));
    }
}
