// ==========================================
// 邮箱线索管理系统 - 应用层
// ==========================================
// 职责: 状态装配（闸门 -> 仓储 -> API）
// ==========================================

pub mod state;

pub use state::AppState;
