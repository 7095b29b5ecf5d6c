// ==========================================
// 邮箱线索管理系统 - 领域层
// ==========================================
// 职责: 实体定义与领域类型，不含数据访问
// ==========================================

pub mod catalog;
pub mod history;
pub mod lead;
pub mod types;

pub use catalog::{Domain, Tag};
pub use history::{ExportRecord, ExportTagRequest, ImportBatch};
pub use lead::{Lead, TagLeadStats, TagOverview};
pub use types::{ExcludeScope, ImportSourceType};
