//! Line-break normalization for LLM-generated analysis prose.
//!
//! Models tend to glue numbered lists, topic labels and bracketed headings
//! onto the previous sentence. The rules below force those onto their own
//! lines while leaving ordinary prose alone. Order matters: later rules rely
//! on breaks inserted by earlier ones.
//!
//! Every rule is applied until the text stops changing, and the whole rule
//! sequence is then repeated until a full pass is a no-op. A later rule can
//! expose a match for an earlier one (`3.1.**` splits into a bare `3.`), so
//! only the outer fixpoint makes the pipeline idempotent. Extraction re-runs
//! it on text that was already normalized at render time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on passes per rule and per pipeline; real input settles after
/// one or two.
const MAX_PASSES: usize = 16;

// A list marker is one or two digits and a dot followed by whitespace, a bold
// opener or the end of text. "1.5%" is not a marker.
static RE_LIST_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.([^\s\d*])").unwrap());
static RE_GAP_BEFORE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)\s+(\d{1,2}\.(?:\s|\*|$))").unwrap());
static RE_BOLD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s\d])(\d{1,2}\.\*\*)").unwrap());
static RE_PUNCT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([：:;,。；，])\s*(\d{1,2}\.(?:\s|\*|$))").unwrap());
static RE_TOPIC_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([。！？；，、])\s*([A-Za-z0-9\p{Han}]+(?:方面|领域)[:：])").unwrap()
});
static RE_BRACKET_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)\s*(【[^】\n]+】[:：])").unwrap());
static RE_LINE_BEFORE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^:：\n])\n(\d{1,2}\.(?:\s|\*|$))").unwrap());

/// A named, pure text rewrite.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    apply: fn(&str) -> String,
}

impl Rule {
    pub fn apply(&self, text: &str) -> String {
        (self.apply)(text)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// The pipeline, in application order.
pub static RULES: [Rule; 8] = [
    Rule {
        name: "trim_edges",
        apply: trim_edges,
    },
    Rule {
        name: "space_after_list_dot",
        apply: space_after_list_dot,
    },
    Rule {
        name: "break_before_list_marker",
        apply: break_before_list_marker,
    },
    Rule {
        name: "break_before_bold_marker",
        apply: break_before_bold_marker,
    },
    Rule {
        name: "break_after_punctuation",
        apply: break_after_punctuation,
    },
    Rule {
        name: "break_before_topic_label",
        apply: break_before_topic_label,
    },
    Rule {
        name: "blank_before_bracket_label",
        apply: blank_before_bracket_label,
    },
    Rule {
        name: "blank_before_list_marker",
        apply: blank_before_list_marker,
    },
];

/// Run the full rule pipeline over `text`.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        let next = apply_rules(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn apply_rules(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

pub fn trim_edges(text: &str) -> String {
    text.trim().to_string()
}

/// `1.word` → `1. word`. Decimals and bold openers (`1.**`) are left alone.
pub fn space_after_list_dot(text: &str) -> String {
    rewrite_until_stable(&RE_LIST_DOT, text, "${1}. ${2}")
}

/// A marker that follows prose on the same line starts a new line; the gap
/// before it collapses to a single newline.
pub fn break_before_list_marker(text: &str) -> String {
    rewrite_until_stable(&RE_GAP_BEFORE_MARKER, text, "${1}\n${2}")
}

/// `text1.**Bold**` → `text\n1.**Bold**`.
pub fn break_before_bold_marker(text: &str) -> String {
    rewrite_until_stable(&RE_BOLD_MARKER, text, "${1}\n${2}")
}

/// `概述：2. 风险` → `概述：\n2. 风险`.
pub fn break_after_punctuation(text: &str) -> String {
    rewrite_until_stable(&RE_PUNCT_MARKER, text, "${1}\n${2}")
}

/// `……，政策方面：` → `……，\n政策方面：`.
pub fn break_before_topic_label(text: &str) -> String {
    rewrite_until_stable(&RE_TOPIC_LABEL, text, "${1}\n${2}")
}

/// `……。【要点】：` → `……。\n\n【要点】：`.
pub fn blank_before_bracket_label(text: &str) -> String {
    rewrite_until_stable(&RE_BRACKET_LABEL, text, "${1}\n\n${2}")
}

/// Single line break before a marker becomes a paragraph break, unless the
/// previous line ends with a colon (the list belongs to that line).
pub fn blank_before_list_marker(text: &str) -> String {
    rewrite_until_stable(&RE_LINE_BEFORE_MARKER, text, "${1}\n\n${2}")
}

fn rewrite_until_stable(re: &Regex, text: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        let next = re.replace_all(&current, replacement).into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}
