//! AI analysis result model shared by the renderers.
//!
//! The upstream analyzer produces commentary for a small, fixed set of market
//! sections; any of them may be missing on a given day.

use serde::{Deserialize, Serialize};

/// Known analysis sections, in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownSection {
    /// Broad market (CSI 300).
    Csi300,
    /// Small caps, growth and tech.
    Tech,
    /// Gold and safe-haven assets.
    Gold,
}

impl KnownSection {
    pub const ALL: [KnownSection; 3] = [KnownSection::Csi300, KnownSection::Tech, KnownSection::Gold];

    pub fn title(self) -> &'static str {
        match self {
            KnownSection::Csi300 => "国内股票：沪深300大盘分析",
            KnownSection::Tech => "科技股：小盘与成长分析",
            KnownSection::Gold => "黄金与避险资产分析",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn known(kind: KnownSection, body: impl Into<String>) -> Self {
        Self::new(kind.title(), body)
    }

    /// Sections with a blank body are never rendered.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Outcome of one upstream analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResult {
    Success { sections: Vec<Section> },
    Failure { error: String },
}

impl AnalysisResult {
    /// Build a successful result from the three known sections, keeping their
    /// canonical order and dropping the absent ones.
    pub fn from_known(csi300: Option<String>, tech: Option<String>, gold: Option<String>) -> Self {
        let sections = KnownSection::ALL
            .into_iter()
            .zip([csi300, tech, gold])
            .filter_map(|(kind, body)| body.map(|b| Section::known(kind, b)))
            .collect();
        AnalysisResult::Success { sections }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisResult::Failure {
            error: error.into(),
        }
    }

    /// Sections that will actually be rendered (non-empty, original order).
    pub fn present_sections(&self) -> impl Iterator<Item = &Section> {
        let sections: &[Section] = match self {
            AnalysisResult::Success { sections } => sections,
            AnalysisResult::Failure { .. } => &[],
        };
        sections.iter().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_known_keeps_canonical_order_and_skips_missing() {
        let r = AnalysisResult::from_known(Some("a".into()), None, Some("c".into()));
        let titles: Vec<&str> = r.present_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![KnownSection::Csi300.title(), KnownSection::Gold.title()]
        );
    }

    #[test]
    fn blank_sections_are_not_present() {
        let r = AnalysisResult::Success {
            sections: vec![Section::new("x", "  \n "), Section::new("y", "body")],
        };
        assert_eq!(r.present_sections().count(), 1);
        assert_eq!(AnalysisResult::failure("boom").present_sections().count(), 0);
    }
}
