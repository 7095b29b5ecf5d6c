// ==========================================
// 邮箱线索管理系统 - 导出批次仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 职责: 导出历史的持久化与"上次导出配置"回显
// 说明: 各标签请求（请求量/完成量）以 JSON 列存储
// ==========================================

use chrono::{DateTime, Utc};
use rusqlite::{params, Result as SqliteResult};
use std::sync::Arc;

use crate::db::StoreGate;
use crate::domain::history::{ExportRecord, ExportTagRequest};
use crate::engine::recency;
use crate::repository::error::{RepositoryError, RepositoryResult};

pub struct ExportRepository {
    gate: Arc<StoreGate>,
}

impl ExportRepository {
    pub fn new(gate: Arc<StoreGate>) -> Self {
        Self { gate }
    }

    /// 登记一个导出批次（认领开始前写入，行 id 用作线索上的 export_id 戳）
    ///
    /// # 返回
    /// - Ok(i64): 新批次 id
    pub fn add(
        &self,
        domain_id: i64,
        file_name_template: &str,
        folder_name_template: &str,
        separate_files: bool,
        tag_requests: &[ExportTagRequest],
        now: DateTime<Utc>,
    ) -> RepositoryResult<i64> {
        let requests_json = serde_json::to_string(tag_requests)
            .map_err(|e| RepositoryError::ValidationError(format!("tag_requests 序列化失败: {}", e)))?;

        self.gate.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO exports (
                    domain_id, created_at, file_name_template,
                    folder_name_template, separate_files, tag_requests_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    domain_id,
                    recency::format_timestamp(now),
                    file_name_template,
                    folder_name_template,
                    separate_files,
                    requests_json
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// 回写各标签的实际完成量（认领结束后）
    pub fn update_tag_requests(
        &self,
        export_id: i64,
        tag_requests: &[ExportTagRequest],
    ) -> RepositoryResult<()> {
        let requests_json = serde_json::to_string(tag_requests)
            .map_err(|e| RepositoryError::ValidationError(format!("tag_requests 序列化失败: {}", e)))?;

        self.gate.execute(|conn| {
            conn.execute(
                "UPDATE exports SET tag_requests_json = ?2 WHERE id = ?1",
                params![export_id, requests_json],
            )?;
            Ok(())
        })
    }

    /// 按 id 查询导出批次
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ExportRecord>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                r#"
                SELECT id, domain_id, created_at, file_name_template,
                       folder_name_template, separate_files, tag_requests_json
                FROM exports
                WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            );

            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 域的最近一次导出（"上次导出配置"回显）
    pub fn last_for_domain(&self, domain_id: i64) -> RepositoryResult<Option<ExportRecord>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                r#"
                SELECT id, domain_id, created_at, file_name_template,
                       folder_name_template, separate_files, tag_requests_json
                FROM exports
                WHERE domain_id = ?1
                ORDER BY created_at DESC, id DESC
                LIMIT 1
                "#,
                params![domain_id],
                Self::map_row,
            );

            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 域的导出历史（分页，新到旧）
    ///
    /// # 返回
    /// - (记录列表, 总条数)
    pub fn list_by_domain(
        &self,
        domain_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<(Vec<ExportRecord>, i64)> {
        self.gate.execute(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM exports WHERE domain_id = ?1",
                params![domain_id],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(
                r#"
                SELECT id, domain_id, created_at, file_name_template,
                       folder_name_template, separate_files, tag_requests_json
                FROM exports
                WHERE domain_id = ?1
                ORDER BY created_at DESC, id DESC
                LIMIT ?2 OFFSET ?3
                "#,
            )?;

            let records = stmt
                .query_map(params![domain_id, limit, offset], Self::map_row)?
                .collect::<SqliteResult<Vec<ExportRecord>>>()?;

            Ok((records, total))
        })
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<ExportRecord> {
        let requests_json: String = row.get(6)?;
        Ok(ExportRecord {
            id: row.get(0)?,
            domain_id: row.get(1)?,
            created_at: row
                .get::<_, String>(2)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            file_name_template: row.get(3)?,
            folder_name_template: row.get(4)?,
            separate_files: row.get(5)?,
            tag_requests: serde_json::from_str(&requests_json).unwrap_or_default(),
        })
    }
}
