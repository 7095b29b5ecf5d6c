// ==========================================
// 邮箱线索管理系统 - 引擎层
// ==========================================
// 职责: 业务规则（冷却期判定、命名模板渲染）
// ==========================================

pub mod naming;
pub mod recency;
