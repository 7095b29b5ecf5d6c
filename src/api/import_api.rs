// ==========================================
// 邮箱线索管理系统 - 导入API
// ==========================================
// 职责: 登记导入批次并批量 upsert 线索；导入历史查询
// 输入: 上游解析层产出的已校验邮箱列表（本层只做去重兜底）
// ==========================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::history::ImportBatch;
use crate::domain::types::ImportSourceType;
use crate::repository::{ImportRepository, LeadRepository, TagRepository};

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub import_id: i64,
    /// 本批次提供的邮箱数（去重后）
    pub emails_amount: i64,
}

// ==========================================
// ImportApi - 导入API
// ==========================================
pub struct ImportApi {
    tag_repo: Arc<TagRepository>,
    import_repo: Arc<ImportRepository>,
    lead_repo: Arc<LeadRepository>,
}

impl ImportApi {
    pub fn new(
        tag_repo: Arc<TagRepository>,
        import_repo: Arc<ImportRepository>,
        lead_repo: Arc<LeadRepository>,
    ) -> Self {
        Self {
            tag_repo,
            import_repo,
            lead_repo,
        }
    }

    /// 导入一批邮箱到指定标签
    ///
    /// # 参数
    /// - batch_name: 批次名（历史页展示）
    /// - source_type: 来源（文件/文本/组合）
    /// - emails: 邮箱列表（上游已校验格式）
    /// - now: 批次时间戳（注入）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 批次 id 与去重后数量
    /// - Err(InvalidInput): 空输入
    /// - Err(NotFound): 标签不存在
    ///
    /// # 说明
    /// 重导入已耗尽地址会将其重新激活并指向新批次（见 LeadRepository）；
    /// emails_amount 记录输入量而非新建行数
    pub fn import_leads(
        &self,
        tag_id: i64,
        batch_name: &str,
        source_type: ImportSourceType,
        emails: &[String],
        now: DateTime<Utc>,
    ) -> ApiResult<ImportOutcome> {
        if emails.is_empty() {
            return Err(ApiError::InvalidInput("没有可导入的邮箱".to_string()));
        }

        if self.tag_repo.find_by_id(tag_id)?.is_none() {
            return Err(ApiError::NotFound(format!("标签(id={})不存在", tag_id)));
        }

        // 去重兜底（上游解析层已去重，跨来源合并时可能仍有重复）
        let deduped: Vec<String> = {
            let mut seen = HashSet::new();
            emails
                .iter()
                .filter(|e| seen.insert(e.as_str()))
                .cloned()
                .collect()
        };

        let import_id =
            self.import_repo
                .add(batch_name, tag_id, source_type, deduped.len() as i64, now)?;

        self.lead_repo.bulk_upsert_leads(&deduped, import_id, tag_id)?;

        tracing::info!(
            "导入批次登记完成: import_id={} tag_id={} 邮箱 {}",
            import_id,
            tag_id,
            deduped.len()
        );

        Ok(ImportOutcome {
            import_id,
            emails_amount: deduped.len() as i64,
        })
    }

    /// 标签的导入历史（新到旧）
    pub fn list_history(&self, tag_id: i64) -> ApiResult<Vec<ImportBatch>> {
        Ok(self.import_repo.list_by_tag(tag_id)?)
    }
}
