// ==========================================
// 邮箱线索管理系统 - API层
// ==========================================
// 职责: 对外业务接口，编排仓储与引擎
// 红线: API 层不写 SQL；配置/输入错误在触碰存储前拒绝
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod exclude_api;
pub mod export_api;
pub mod import_api;

pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use exclude_api::{ExcludeApi, ExcludeRequest};
pub use export_api::{
    ExportApi, ExportOutcome, ExportRequestInput, FulfilledTagRequest, TagRequestInput,
};
pub use import_api::{ImportApi, ImportOutcome};
