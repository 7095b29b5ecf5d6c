// ==========================================
// 邮箱线索管理系统 - 领域类型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ImportSourceType - 导入来源类型
// ==========================================
// 用途: 记录导入批次的邮箱来源（文件/文本/两者）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSourceType {
    File,     // 仅文件
    Text,     // 仅粘贴文本
    Combined, // 文件 + 文本
}

impl ImportSourceType {
    /// 根据两路输入是否非空推导来源类型
    ///
    /// # 返回
    /// - None: 两路输入均为空
    pub fn from_parts(has_files: bool, has_text: bool) -> Option<Self> {
        match (has_files, has_text) {
            (true, true) => Some(ImportSourceType::Combined),
            (true, false) => Some(ImportSourceType::File),
            (false, true) => Some(ImportSourceType::Text),
            (false, false) => None,
        }
    }

    /// 存储编码（对齐历史数据: 1=文件, 2=文本, 3=组合）
    pub fn to_code(self) -> i64 {
        match self {
            ImportSourceType::File => 1,
            ImportSourceType::Text => 2,
            ImportSourceType::Combined => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ImportSourceType::File),
            2 => Some(ImportSourceType::Text),
            3 => Some(ImportSourceType::Combined),
            _ => None,
        }
    }
}

// ==========================================
// ExcludeScope - 批量排除范围
// ==========================================
// 用途: 区分"仅某个标签"与"域下全部标签"两种排除范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeScope {
    /// 仅排除指定标签下的线索
    Tag(i64),
    /// 排除域下所有标签的线索
    WholeDomain,
}
