// ==========================================
// 邮箱线索管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 线索池管理 + 分配与冷却期引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 上游邮箱解析
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一/单写闸门）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ExcludeScope, ImportSourceType};

// 领域实体
pub use domain::{
    Domain, ExportRecord, ExportTagRequest, ImportBatch, Lead, Tag, TagLeadStats, TagOverview,
};

// 数据库闸门
pub use db::StoreGate;

// 仓储
pub use repository::{
    DomainRepository, ExportRepository, ImportRepository, LeadRepository, RepositoryError,
    RepositoryResult, TagRepository,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, ExcludeApi, ExportApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "邮箱线索管理系统";
