// ==========================================
// 邮箱线索管理系统 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入层错误类型
#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("未在 {source_name} 中找到 'Email' 列")]
    EmailColumnNotFound { source_name: String },

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),
}

/// Result 类型别名
pub type ImporterResult<T> = Result<T, ImporterError>;
