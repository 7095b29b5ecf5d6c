// ==========================================
// 邮箱线索管理系统 - 导入/导出历史实体
// ==========================================
// 用途: 不可变批次记录，供历史页与"上次导出配置"回显
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::ImportSourceType;

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 对齐: schema imports 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub id: i64,                        // 主键
    pub name: String,                   // 批次名
    pub created_at: DateTime<Utc>,      // 创建时间
    pub source_type: ImportSourceType,  // 来源（文件/文本/组合）
    pub tag_id: i64,                    // 目标标签（FK）
    pub emails_amount: i64,             // 本批次提供的邮箱数（去重后输入量）
}

// ==========================================
// ExportTagRequest - 导出中的单标签请求
// ==========================================
// 语义: fulfilled_amount < requested_amount 是池耗尽的正常结果，不是错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTagRequest {
    pub tag_id: i64,
    pub tag_name: String,
    pub requested_amount: i64, // 请求数量
    pub fulfilled_amount: i64, // 实际认领数量
}

// ==========================================
// ExportRecord - 导出批次
// ==========================================
// 对齐: schema exports 表；tag_requests 以 JSON 列持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: i64,                            // 主键
    pub domain_id: i64,                     // 所属域（FK）
    pub created_at: DateTime<Utc>,          // 导出时间
    pub file_name_template: String,         // 文件命名模板（含合并标签）
    pub folder_name_template: String,       // 目录命名模板
    pub separate_files: bool,               // 是否按标签拆分输出
    pub tag_requests: Vec<ExportTagRequest>, // 各标签请求与实际完成量
}
