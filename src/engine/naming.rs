// ==========================================
// 邮箱线索管理系统 - 导出命名模板
// ==========================================
// 职责: 合并标签替换与紧凑数字格式化（纯字符串渲染，无文件 I/O）
// 支持的合并标签:
//   %d-name% %d-abrr% %day% %month% %t-all% %t-name% %t-amount%
// ==========================================

use chrono::{DateTime, Datelike, Utc};

use crate::domain::history::ExportTagRequest;

// ==========================================
// MergeTagContext - 模板渲染上下文
// ==========================================
#[derive(Debug, Clone)]
pub struct MergeTagContext<'a> {
    pub domain_name: &'a str,
    pub domain_abbreviation: &'a str,
    pub now: DateTime<Utc>,
    /// %t-all% 的值（全部请求的联合标签，见 requests_label）
    pub all_requests_label: &'a str,
    /// 按标签拆分时当前标签的名称/请求量；合并输出时为 None
    pub tag_name: Option<&'a str>,
    pub tag_amount: Option<i64>,
}

/// 将模板中的合并标签替换为上下文值
pub fn apply_merge_tags(template: &str, ctx: &MergeTagContext<'_>) -> String {
    let day = ctx.now.day().to_string();
    let month = ctx.now.month().to_string();
    let tag_amount = ctx
        .tag_amount
        .map(format_compact_number)
        .unwrap_or_default();

    let mut result = template.to_string();
    for (key, value) in [
        ("%d-name%", ctx.domain_name),
        ("%d-abrr%", ctx.domain_abbreviation),
        ("%day%", day.as_str()),
        ("%month%", month.as_str()),
        ("%t-all%", ctx.all_requests_label),
        ("%t-name%", ctx.tag_name.unwrap_or("")),
        ("%t-amount%", tag_amount.as_str()),
    ] {
        result = result.replace(key, value);
    }
    result
}

/// 紧凑数字格式: 2500 → "2.5k", 1000000 → "1M"（去掉无意义的 ".0"）
pub fn format_compact_number(num: i64) -> String {
    let formatted = if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}k", num as f64 / 1_000.0)
    } else {
        num.to_string()
    };
    formatted.replace(".0", "")
}

/// %t-all% 的联合标签: "Name_2.5k--Other_1k"（只含请求量 > 0 的标签）
pub fn requests_label(requests: &[ExportTagRequest]) -> String {
    requests
        .iter()
        .filter(|r| r.requested_amount > 0)
        .map(|r| format!("{}_{}", r.tag_name, format_compact_number(r.requested_amount)))
        .collect::<Vec<_>>()
        .join("--")
}
