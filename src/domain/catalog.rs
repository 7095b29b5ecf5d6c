// ==========================================
// 邮箱线索管理系统 - 域/标签目录实体
// ==========================================
// 红线: 软删除只翻转 is_active，历史线索/导入/导出记录保持完整
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Domain - 顶层分区
// ==========================================
// 用途: 拥有标签与冷却期配置的顶层分区
// 对齐: schema domains 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: i64,                     // 主键
    pub name: String,                // 域名称
    pub abbreviation: String,        // 缩写（命名模板 %d-abrr% 使用）
    pub use_limit_days: i64,         // 域内复用窗口（天，0=截止点为当前时刻）
    pub global_use_limit_days: i64,  // 跨域复用窗口（天）
    pub is_active: bool,             // 软删除标记
}

// ==========================================
// Tag - 线索分组
// ==========================================
// 用途: 域下的命名分组；ideal_amount 仅用于界面着色，不参与分配逻辑
// 对齐: schema tags 表，UNIQUE(name, domain_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,           // 主键
    pub name: String,      // 标签名（域内唯一）
    pub domain_id: i64,    // 所属域（FK）
    pub ideal_amount: i64, // 理想数量目标（仅 UI 展示）
    pub is_active: bool,   // 软删除标记
}
