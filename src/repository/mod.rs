// ==========================================
// 邮箱线索管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod domain_repo;
pub mod error;
pub mod export_repo;
pub mod import_repo;
pub mod lead_repo;
pub mod schema;
pub mod tag_repo;

// 重导出核心仓储
pub use domain_repo::DomainRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use export_repo::ExportRepository;
pub use import_repo::ImportRepository;
pub use lead_repo::LeadRepository;
pub use tag_repo::TagRepository;
