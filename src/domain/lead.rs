// ==========================================
// 邮箱线索管理系统 - 线索实体与统计
// ==========================================
// 红线: 线索消费是软状态转移（is_active 1 → 0），绝不删除行；
//       已消费行仍参与其他标签/域的冷却期判定
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Lead - 可分配线索
// ==========================================
// 不变量: (email, tag_id) 唯一 —— 同一地址每个标签至多一行，
//         跨标签/跨域可重复出现
// 对齐: schema leads 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,                              // 主键
    pub email: String,                        // 邮箱地址（非全局唯一）
    pub tag_id: i64,                          // 所属标签（FK）
    pub import_id: i64,                       // 来源导入批次（FK）
    pub export_id: Option<i64>,               // 消费它的导出批次（认领时写入）
    pub is_active: bool,                      // true=可用 false=已消费
    pub random_order: f64,                    // [0,1) 均匀随机排序键（插入/重导入时赋值）
    pub last_used_at: Option<DateTime<Utc>>,  // 最近一次被认领时间（从未使用为 NULL）
}

// ==========================================
// TagLeadStats - 单标签统计三元组
// ==========================================
// 语义: inactive = is_active=0 行数
//       active   = is_active=1 行数
//       available = is_active=1 且通过冷却期判定的行数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLeadStats {
    pub inactive: i64,
    pub active: i64,
    pub available: i64,
}

// ==========================================
// TagOverview - 仪表盘标签行
// ==========================================
// 用途: 域详情页一次查询取回的标签信息（名称/目标量/统计）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagOverview {
    pub tag_id: i64,
    pub name: String,
    pub ideal_amount: i64,
    pub stats: TagLeadStats,
}
