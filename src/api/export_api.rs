// ==========================================
// 邮箱线索管理系统 - 导出API
// ==========================================
// 职责: 按标签请求认领线索、落导出历史、回显上次导出配置
// 红线: 认领经由闸门原子执行；不足量是正常结果而非错误
// 约束: 文件写入（CSV 落盘）由外部协作方完成，本层只返回邮箱列表
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::history::{ExportRecord, ExportTagRequest};
use crate::engine::naming;
use crate::repository::{DomainRepository, ExportRepository, LeadRepository};

// ==========================================
// 请求/结果 DTO
// ==========================================

/// 单标签导出请求
#[derive(Debug, Clone)]
pub struct TagRequestInput {
    pub tag_id: i64,
    pub tag_name: String,
    pub requested_amount: i64,
}

/// 一次导出的完整请求
#[derive(Debug, Clone)]
pub struct ExportRequestInput {
    pub file_name_template: String,
    pub folder_name_template: String,
    pub separate_files: bool,
    pub tags: Vec<TagRequestInput>,
}

/// 单标签的认领结果
#[derive(Debug, Clone)]
pub struct FulfilledTagRequest {
    pub tag_id: i64,
    pub tag_name: String,
    pub requested_amount: i64,
    /// 实际认领的邮箱（外部协作方据此写文件）
    pub emails: Vec<String>,
}

impl FulfilledTagRequest {
    pub fn fulfilled_amount(&self) -> i64 {
        self.emails.len() as i64
    }
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub export_id: i64,
    pub tags: Vec<FulfilledTagRequest>,
}

// ==========================================
// ExportApi - 导出API
// ==========================================
pub struct ExportApi {
    domain_repo: Arc<DomainRepository>,
    export_repo: Arc<ExportRepository>,
    lead_repo: Arc<LeadRepository>,
}

impl ExportApi {
    pub fn new(
        domain_repo: Arc<DomainRepository>,
        export_repo: Arc<ExportRepository>,
        lead_repo: Arc<LeadRepository>,
    ) -> Self {
        Self {
            domain_repo,
            export_repo,
            lead_repo,
        }
    }

    /// 执行一次导出：逐标签认领并记录历史
    ///
    /// # 流程
    /// 1. 先落导出记录（其 id 作为认领行的 export_id 戳）
    /// 2. 按域的冷却期配置逐标签认领（请求量 <= 0 的标签跳过）
    /// 3. 回写各标签实际完成量
    ///
    /// # 返回
    /// - Ok(ExportOutcome): 各标签实际认领的邮箱；完成量可能少于请求量
    /// - Err(NotFound): 域不存在
    pub fn run_export(
        &self,
        domain_id: i64,
        request: &ExportRequestInput,
        now: DateTime<Utc>,
    ) -> ApiResult<ExportOutcome> {
        let domain = self
            .domain_repo
            .find_by_id(domain_id)?
            .ok_or_else(|| ApiError::NotFound(format!("域(id={})不存在", domain_id)))?;

        let initial_requests: Vec<ExportTagRequest> = request
            .tags
            .iter()
            .map(|t| ExportTagRequest {
                tag_id: t.tag_id,
                tag_name: t.tag_name.clone(),
                requested_amount: t.requested_amount,
                fulfilled_amount: 0,
            })
            .collect();

        let export_id = self.export_repo.add(
            domain_id,
            &request.file_name_template,
            &request.folder_name_template,
            request.separate_files,
            &initial_requests,
            now,
        )?;

        let mut fulfilled = Vec::with_capacity(request.tags.len());
        for tag_request in &request.tags {
            let emails = if tag_request.requested_amount > 0 {
                self.lead_repo.claim_leads(
                    tag_request.tag_id,
                    domain_id,
                    tag_request.requested_amount,
                    domain.use_limit_days,
                    domain.global_use_limit_days,
                    Some(export_id),
                    now,
                )?
            } else {
                Vec::new()
            };

            fulfilled.push(FulfilledTagRequest {
                tag_id: tag_request.tag_id,
                tag_name: tag_request.tag_name.clone(),
                requested_amount: tag_request.requested_amount,
                emails,
            });
        }

        let final_requests: Vec<ExportTagRequest> = fulfilled
            .iter()
            .map(|f| ExportTagRequest {
                tag_id: f.tag_id,
                tag_name: f.tag_name.clone(),
                requested_amount: f.requested_amount,
                fulfilled_amount: f.fulfilled_amount(),
            })
            .collect();
        self.export_repo.update_tag_requests(export_id, &final_requests)?;

        tracing::info!(
            "导出完成: export_id={} domain_id={} 标签 {} 个，共认领 {}",
            export_id,
            domain_id,
            fulfilled.len(),
            fulfilled.iter().map(|f| f.emails.len()).sum::<usize>()
        );

        Ok(ExportOutcome {
            export_id,
            tags: fulfilled,
        })
    }

    /// 按命名模板渲染文件/目录名
    ///
    /// # 参数
    /// - tag_requests: 本次导出的全部标签请求（%t-all% 的来源）
    /// - tag: 按标签拆分输出时传 (标签名, 请求量)；合并输出时传 None
    pub fn render_name(
        &self,
        domain_id: i64,
        template: &str,
        tag_requests: &[ExportTagRequest],
        tag: Option<(&str, i64)>,
        now: DateTime<Utc>,
    ) -> ApiResult<String> {
        let domain = self
            .domain_repo
            .find_by_id(domain_id)?
            .ok_or_else(|| ApiError::NotFound(format!("域(id={})不存在", domain_id)))?;

        let all_requests_label = naming::requests_label(tag_requests);
        let ctx = naming::MergeTagContext {
            domain_name: &domain.name,
            domain_abbreviation: &domain.abbreviation,
            now,
            all_requests_label: &all_requests_label,
            tag_name: tag.map(|(name, _)| name),
            tag_amount: tag.map(|(_, amount)| amount),
        };
        Ok(naming::apply_merge_tags(template, &ctx))
    }

    /// 域的最近一次导出配置（表单回显）
    pub fn last_export(&self, domain_id: i64) -> ApiResult<Option<ExportRecord>> {
        Ok(self.export_repo.last_for_domain(domain_id)?)
    }

    /// 域的导出历史（分页，新到旧）
    pub fn list_history(
        &self,
        domain_id: i64,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<ExportRecord>, i64)> {
        Ok(self.export_repo.list_by_domain(domain_id, limit, offset)?)
    }
}
