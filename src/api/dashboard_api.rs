// ==========================================
// 邮箱线索管理系统 - 仪表盘API
// ==========================================
// 职责: 域/标签统计视图（只读）
// 约束: 统计与认领共用同一份判定 SQL，结果不会相互漂移
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::catalog::Domain;
use crate::domain::lead::{TagLeadStats, TagOverview};
use crate::repository::{DomainRepository, LeadRepository, TagRepository};

// ==========================================
// DashboardApi - 仪表盘API
// ==========================================
pub struct DashboardApi {
    domain_repo: Arc<DomainRepository>,
    tag_repo: Arc<TagRepository>,
    lead_repo: Arc<LeadRepository>,
}

impl DashboardApi {
    pub fn new(
        domain_repo: Arc<DomainRepository>,
        tag_repo: Arc<TagRepository>,
        lead_repo: Arc<LeadRepository>,
    ) -> Self {
        Self {
            domain_repo,
            tag_repo,
            lead_repo,
        }
    }

    fn require_domain(&self, domain_id: i64) -> ApiResult<Domain> {
        self.domain_repo
            .find_by_id(domain_id)?
            .ok_or_else(|| ApiError::NotFound(format!("域(id={})不存在", domain_id)))
    }

    /// 域下全部标签的统计概览（仪表盘主视图）
    pub fn domain_overview(
        &self,
        domain_id: i64,
        now: DateTime<Utc>,
    ) -> ApiResult<Vec<TagOverview>> {
        let domain = self.require_domain(domain_id)?;
        Ok(self.lead_repo.domain_tag_overview(
            domain_id,
            domain.use_limit_days,
            domain.global_use_limit_days,
            now,
            true,
        )?)
    }

    /// 单标签统计三元组（标签 -> 所属域 -> 窗口配置）
    pub fn tag_stats(&self, tag_id: i64, now: DateTime<Utc>) -> ApiResult<TagLeadStats> {
        let tag = self
            .tag_repo
            .find_by_id(tag_id)?
            .ok_or_else(|| ApiError::NotFound(format!("标签(id={})不存在", tag_id)))?;
        let domain = self.require_domain(tag.domain_id)?;

        Ok(self.lead_repo.tag_stats(
            tag_id,
            domain.id,
            domain.use_limit_days,
            domain.global_use_limit_days,
            now,
        )?)
    }

    /// 一组标签的统计三元组（导出表单逐行展示可用量）
    ///
    /// # 说明
    /// 与逐标签调用 tag_stats 结果一致；集合为空返回空映射
    pub fn batch_tag_stats(
        &self,
        domain_id: i64,
        tag_ids: &[i64],
        now: DateTime<Utc>,
    ) -> ApiResult<HashMap<i64, TagLeadStats>> {
        let domain = self.require_domain(domain_id)?;
        Ok(self.lead_repo.batch_tag_stats(
            domain_id,
            tag_ids,
            domain.use_limit_days,
            domain.global_use_limit_days,
            now,
        )?)
    }
}
