// ==========================================
// 邮箱线索管理系统 - 导入层
// ==========================================
// 职责: 上游邮箱解析（核心引擎的外部协作方）
// 产出: 已校验、已去重的邮箱列表
// ==========================================

pub mod email_parser;
pub mod error;
pub mod parse_task;

pub use email_parser::{extract_from_file, extract_from_text, is_valid_email, merge_unique};
pub use error::{ImporterError, ImporterResult};
pub use parse_task::{spawn_files_parse, spawn_text_parse, ParseHandle};
