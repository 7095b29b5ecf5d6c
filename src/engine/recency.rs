// ==========================================
// 邮箱线索管理系统 - 冷却期判定（Eligibility Predicate）
// ==========================================
// 职责: 定义分配与统计共用的同一份判定 SQL 与截止点计算
// 红线: 分配引擎与统计引擎必须引用此处的同一片段，禁止各写一份
//
// 判定语义: 线索 L（标签 T，域 D）在 now 时刻可分配，当且仅当
//   L.is_active = 1
//   且同邮箱在"其他域"的最近使用时间早于 now - global_use_limit_days
//   且同邮箱在"本域"的最近使用时间早于 now - use_limit_days
//   （从未使用 = NULL，两个窗口均视为通过）
//
// 边界: 窗口为 0 天时截止点即 now —— 严格早于 now 的使用不再阻断，
//       与 now 同一时刻的使用仍阻断
// ==========================================

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// 近期使用 CTE：按邮箱聚合"域外"与"域内"各自的最近使用时间
///
/// 命名参数: :domain_id
pub const RECENT_USE_CTES: &str = r#"
cross_domain_recent AS (
    SELECT l.email, MAX(l.last_used_at) AS last_used
    FROM leads l
    JOIN tags t ON l.tag_id = t.id
    WHERE t.domain_id != :domain_id
    GROUP BY l.email
),
same_domain_recent AS (
    SELECT l.email, MAX(l.last_used_at) AS last_used
    FROM leads l
    JOIN tags t ON l.tag_id = t.id
    WHERE t.domain_id = :domain_id
    GROUP BY l.email
)"#;

/// 冷却期通过条件（依赖 g/d 两个 LEFT JOIN 别名）
///
/// 命名参数: :global_cutoff, :domain_cutoff
pub const ELIGIBLE_CONDITION: &str = r#"(g.last_used < :global_cutoff OR g.last_used IS NULL)
          AND (d.last_used < :domain_cutoff OR d.last_used IS NULL)"#;

/// 时间戳统一存储格式
///
/// 固定微秒精度的 RFC 3339 UTC 字符串，保证 SQL 的字符串比较
/// 与时间先后一致（不同小数位宽会破坏字典序）。
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// 解析存储格式的时间戳
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 计算冷却期截止点: now - limit_days 天
///
/// limit_days <= 0 时截止点为 now 本身（冷却期实质关闭）
pub fn cutoff(now: DateTime<Utc>, limit_days: i64) -> String {
    let days = limit_days.max(0);
    format_timestamp(now - Duration::days(days))
}
