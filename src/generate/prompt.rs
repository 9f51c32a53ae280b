//! Prompts for the podcast script generator.

use crate::extract::ExtractedReport;

pub const PODCAST_TITLE: &str = "Agili 的 财经早茶";

/// System prompt: two-host finance talk show, plain text, one speaker per line.
pub fn system_prompt() -> String {
    format!(
        "你是财经脱口秀《{PODCAST_TITLE}》的制作人。\n\
任务：根据提供的材料写一份10-15分钟的复盘与推演对话脚本，不少于3500字。\n\
\n\
【主播】\n\
- 老张：十五年股龄的老股民，情绪化，爱讲段子，代表散户追涨杀跌的心态。\n\
- 小王：量化交易员出身的分析师，讲数据和逻辑，负责给老张泼冷水。\n\
\n\
【结构】必须依次讨论三个板块：\n\
1. 大盘风向（沪深300）：账户涨跌、宏观与政策原因。\n\
2. 科技前沿（科技股）：AI、芯片动态，估值与风险。\n\
3. 黄金避险：金价与国际局势。\n\
\n\
【格式】\n\
- 纯文本，不使用 Markdown。\n\
- 每行以“老张：”或“小王：”开头。"
    )
}

/// User prompt: the extracted analysis followed by one line per headline.
pub fn user_prompt(report: &ExtractedReport) -> String {
    let mut out = String::from("【今日AI财经深度分析】\n");
    out.push_str(&report.analysis_text);
    out.push_str("\n\n【今日财经热点】\n");
    for news in &report.news_items {
        out.push_str(&format!("- {} (来源: {})\n", news.title, news.source));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::NewsItem;

    #[test]
    fn user_prompt_lists_analysis_then_news() {
        let report = ExtractedReport {
            analysis_text: "【大盘】\n震荡\n\n".into(),
            news_items: vec![NewsItem {
                title: "央行降准".into(),
                source: "新华社".into(),
                url: String::new(),
            }],
        };
        let p = user_prompt(&report);
        assert!(p.starts_with("【今日AI财经深度分析】\n【大盘】\n震荡"));
        assert!(p.ends_with("【今日财经热点】\n- 央行降准 (来源: 新华社)\n"));
    }

    #[test]
    fn system_prompt_names_show_and_hosts() {
        let s = system_prompt();
        assert!(s.contains(PODCAST_TITLE));
        assert!(s.contains("老张") && s.contains("小王"));
    }
}
