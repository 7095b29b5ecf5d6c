// ==========================================
// 邮箱线索管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::{ApiResult, DashboardApi, ExcludeApi, ExportApi, ImportApi};
use crate::db::StoreGate;
use crate::repository::{
    DomainRepository, ExportRepository, ImportRepository, LeadRepository, TagRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源；整个进程只持有一个 StoreGate
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 域目录仓储
    pub domain_repo: Arc<DomainRepository>,

    /// 标签目录仓储
    pub tag_repo: Arc<TagRepository>,

    /// 导入API
    pub import_api: Arc<ImportApi>,

    /// 导出API
    pub export_api: Arc<ExportApi>,

    /// 排除API
    pub exclude_api: Arc<ExcludeApi>,

    /// 仪表盘API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在则建库建表）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化表结构
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: &str) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let gate = Arc::new(StoreGate::open(db_path)?);
        Self::with_gate(gate, db_path.to_string())
    }

    /// 基于已打开的闸门装配（测试用内存库走这里）
    pub fn with_gate(gate: Arc<StoreGate>, db_path: String) -> ApiResult<Self> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let domain_repo = Arc::new(DomainRepository::new(gate.clone()));
        let tag_repo = Arc::new(TagRepository::new(gate.clone()));
        let import_repo = Arc::new(ImportRepository::new(gate.clone()));
        let export_repo = Arc::new(ExportRepository::new(gate.clone()));
        let lead_repo = Arc::new(LeadRepository::new(gate));

        // ==========================================
        // 初始化API层
        // ==========================================
        let import_api = Arc::new(ImportApi::new(
            tag_repo.clone(),
            import_repo,
            lead_repo.clone(),
        ));

        let export_api = Arc::new(ExportApi::new(
            domain_repo.clone(),
            export_repo,
            lead_repo.clone(),
        ));

        let exclude_api = Arc::new(ExcludeApi::new(lead_repo.clone()));

        let dashboard_api = Arc::new(DashboardApi::new(
            domain_repo.clone(),
            tag_repo.clone(),
            lead_repo,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            domain_repo,
            tag_repo,
            import_api,
            export_api,
            exclude_api,
            dashboard_api,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}
