// ==========================================
// 邮箱线索管理系统 - 排除API
// ==========================================
// 职责: 排除配置校验 + 批量停用
// 红线: 配置无效必须在触碰存储前拒绝（单标签范围却未选标签）
// ==========================================

use std::sync::Arc;
use std::time::Instant;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::ExcludeScope;
use crate::repository::LeadRepository;

// ==========================================
// ExcludeRequest - 排除配置
// ==========================================
#[derive(Debug, Clone)]
pub struct ExcludeRequest {
    /// true = 域下全部标签；false = 仅 selected_tag_id
    pub exclude_from_all: bool,
    pub selected_tag_id: Option<i64>,
}

impl ExcludeRequest {
    /// 校验配置并归一化为排除范围
    ///
    /// # 返回
    /// - Err(InvalidInput): 单标签范围却未选标签
    fn resolve_scope(&self) -> ApiResult<ExcludeScope> {
        if self.exclude_from_all {
            return Ok(ExcludeScope::WholeDomain);
        }
        match self.selected_tag_id {
            Some(tag_id) => Ok(ExcludeScope::Tag(tag_id)),
            None => Err(ApiError::InvalidInput(
                "排除范围为单标签时必须选择标签".to_string(),
            )),
        }
    }
}

// ==========================================
// ExcludeApi - 排除API
// ==========================================
pub struct ExcludeApi {
    lead_repo: Arc<LeadRepository>,
}

impl ExcludeApi {
    pub fn new(lead_repo: Arc<LeadRepository>) -> Self {
        Self { lead_repo }
    }

    /// 批量排除邮箱
    ///
    /// # 参数
    /// - domain_id: 目标域
    /// - request: 排除范围配置（先校验后执行）
    /// - emails: 待排除邮箱列表
    ///
    /// # 返回
    /// - Ok(usize): 实际停用的行数；空列表或 0 行匹配返回 Ok(0)
    /// - Err(InvalidInput): 配置无效，存储未被触碰
    pub fn exclude_leads(
        &self,
        domain_id: i64,
        request: &ExcludeRequest,
        emails: &[String],
    ) -> ApiResult<usize> {
        let scope = request.resolve_scope()?;

        if emails.is_empty() {
            return Ok(0);
        }

        let start = Instant::now();
        let affected = self.lead_repo.bulk_exclude_leads(domain_id, scope, emails)?;

        tracing::info!(
            "排除操作完成: domain_id={} 输入 {} 停用 {} 耗时 {:?}",
            domain_id,
            emails.len(),
            affected,
            start.elapsed()
        );
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scope_whole_domain() {
        let request = ExcludeRequest {
            exclude_from_all: true,
            selected_tag_id: None,
        };
        assert!(matches!(
            request.resolve_scope(),
            Ok(ExcludeScope::WholeDomain)
        ));
    }

    #[test]
    fn test_resolve_scope_single_tag() {
        let request = ExcludeRequest {
            exclude_from_all: false,
            selected_tag_id: Some(42),
        };
        assert!(matches!(request.resolve_scope(), Ok(ExcludeScope::Tag(42))));
    }

    #[test]
    fn test_resolve_scope_missing_tag_rejected() {
        let request = ExcludeRequest {
            exclude_from_all: false,
            selected_tag_id: None,
        };
        assert!(matches!(
            request.resolve_scope(),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
