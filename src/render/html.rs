//! HTML renderers. `render_html_rich` produces the micro-format that
//! [`crate::extract`] reads back; keep the class names in sync with it.

use crate::analysis::AnalysisResult;
use crate::normalize::normalize;

use super::{failure_message, FAILURE_PREFIX, HEADING};

/// Bump when the block structure changes in a way readers must notice.
pub const FORMAT_VERSION: u32 = 1;

pub const CLASS_SECTION: &str = "ai-section";
pub const CLASS_BLOCK: &str = "ai-block";
pub const CLASS_BLOCK_TITLE: &str = "ai-block-title";
pub const CLASS_BLOCK_CONTENT: &str = "ai-block-content";
pub const CLASS_ERROR: &str = "ai-error";

/// Escape text for embedding in markup (quotes included).
pub fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Normalize, escape, then turn newlines into `<br>`. Escaping happens before
/// any markup is inserted.
fn content_html(body: &str) -> String {
    escape(&normalize(body)).replace('\n', "<br>")
}

/// Rich HTML block used inside the daily report (and for email).
pub fn render_html_rich(result: &AnalysisResult) -> String {
    if let AnalysisResult::Failure { error } = result {
        return format!(
            r#"
                <div class="{CLASS_SECTION}" data-format-version="{FORMAT_VERSION}">
                    <div class="{CLASS_ERROR}">⚠️ {FAILURE_PREFIX}: {}</div>
                </div>"#,
            escape(failure_message(error))
        );
    }

    let mut out = format!(
        r#"
                <div class="{CLASS_SECTION}" data-format-version="{FORMAT_VERSION}">
                    <div class="ai-section-header">
                        <div class="ai-section-title">{HEADING}</div>
                        <span class="ai-section-badge">AI</span>
                    </div>"#
    );

    for section in result.present_sections() {
        out.push_str(&format!(
            r#"
                    <div class="{CLASS_BLOCK}">
                        <div class="{CLASS_BLOCK_TITLE}">{}</div>
                        <div class="{CLASS_BLOCK_CONTENT}">{}</div>
                    </div>"#,
            escape(&section.title),
            content_html(&section.body)
        ));
    }

    out.push_str(
        r#"
                </div>"#,
    );
    out
}

/// Plain email HTML: one `ai-analysis` wrapper, `<h4>` per section.
pub fn render_html(result: &AnalysisResult) -> String {
    if let AnalysisResult::Failure { error } = result {
        return format!(
            r#"<div class="{CLASS_ERROR}">⚠️ {FAILURE_PREFIX}: {}</div>"#,
            escape(failure_message(error))
        );
    }

    let mut parts = vec![
        r#"<div class="ai-analysis">"#.to_string(),
        format!("<h3>{HEADING}</h3>"),
    ];
    for section in result.present_sections() {
        parts.push(format!(r#"<div class="{CLASS_SECTION}">"#));
        parts.push(format!("<h4>{}</h4>", escape(&section.title)));
        parts.push(format!(
            r#"<div class="ai-content">{}</div>"#,
            content_html(&section.body)
        ));
        parts.push("</div>".to_string());
    }
    parts.push("</div>".to_string());
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Section;
    use crate::render::UNKNOWN_ERROR;

    fn without_br(s: &str) -> String {
        s.replace("<br>", "")
    }

    #[test]
    fn rich_html_tags_every_present_section() {
        let r = AnalysisResult::Success {
            sections: vec![
                Section::new("A", "line one\nline two"),
                Section::new("Empty", "   "),
                Section::new("B", "body"),
            ],
        };
        let html = render_html_rich(&r);
        assert_eq!(html.matches(r#"class="ai-block""#).count(), 2);
        assert!(html.contains(r#"<div class="ai-block-title">A</div>"#));
        assert!(html.contains("line one<br>line two"));
        assert!(!html.contains("Empty"));
        assert!(html.contains(r#"data-format-version="1""#));
    }

    #[test]
    fn content_is_escaped_before_line_breaks() {
        let r = AnalysisResult::Success {
            sections: vec![Section::new("T&C", "<script>alert(1)</script>\nR&D up")],
        };
        let html = render_html_rich(&r);
        let block = html
            .split(r#"<div class="ai-block-content">"#)
            .nth(1)
            .and_then(|rest| rest.split("</div>").next())
            .unwrap();
        let inner = without_br(block);
        assert!(!inner.contains('<') && !inner.contains('>'));
        assert!(inner.contains("&lt;script&gt;"));
        assert!(inner.contains("R&amp;D"));
        assert!(html.contains("T&amp;C"));
    }

    #[test]
    fn failure_renders_single_escaped_error() {
        let html = render_html_rich(&AnalysisResult::failure("<b>timeout</b> & retry"));
        assert!(html.contains(r#"class="ai-error""#));
        assert!(html.contains("&lt;b&gt;timeout&lt;/b&gt; &amp; retry"));
        assert!(!html.contains("ai-block"));

        let blank = render_html_rich(&AnalysisResult::failure(""));
        assert!(blank.contains(UNKNOWN_ERROR));
    }

    #[test]
    fn email_html_escapes_error_and_sections() {
        let err = render_html(&AnalysisResult::failure("<x>"));
        assert!(err.contains("&lt;x&gt;"));

        let ok = render_html(&AnalysisResult::from_known(Some("a & b".into()), None, None));
        assert!(ok.starts_with(r#"<div class="ai-analysis">"#));
        assert!(ok.contains("a &amp; b"));
        assert_eq!(ok.matches("<h4>").count(), 1);
    }

    #[test]
    fn blank_error_falls_back_in_every_html_variant() {
        for html in [
            render_html(&AnalysisResult::failure("  ")),
            render_html_rich(&AnalysisResult::failure("")),
        ] {
            assert!(html.contains(UNKNOWN_ERROR), "got {html}");
        }
    }
}
