// ==========================================
// 邮箱线索管理系统 - 导入批次仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 导入批次是不可变记录，只增不改
// ==========================================

use chrono::{DateTime, Utc};
use rusqlite::{params, Result as SqliteResult};
use std::sync::Arc;

use crate::db::StoreGate;
use crate::domain::history::ImportBatch;
use crate::domain::types::ImportSourceType;
use crate::engine::recency;
use crate::repository::error::RepositoryResult;

pub struct ImportRepository {
    gate: Arc<StoreGate>,
}

impl ImportRepository {
    pub fn new(gate: Arc<StoreGate>) -> Self {
        Self { gate }
    }

    /// 登记一个导入批次
    ///
    /// # 参数
    /// - emails_amount: 本批次提供的邮箱数（去重后的输入量，
    ///   与实际新建行数无关 —— 重导入同一地址仍计 1）
    ///
    /// # 返回
    /// - Ok(i64): 新批次 id
    pub fn add(
        &self,
        name: &str,
        tag_id: i64,
        source_type: ImportSourceType,
        emails_amount: i64,
        now: DateTime<Utc>,
    ) -> RepositoryResult<i64> {
        self.gate.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO imports (name, created_at, source_type, tag_id, emails_amount)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    name,
                    recency::format_timestamp(now),
                    source_type.to_code(),
                    tag_id,
                    emails_amount
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// 按 id 查询批次
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ImportBatch>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                r#"
                SELECT id, name, created_at, source_type, tag_id, emails_amount
                FROM imports
                WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            );

            match result {
                Ok(batch) => Ok(Some(batch)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 标签的导入历史（新到旧）
    pub fn list_by_tag(&self, tag_id: i64) -> RepositoryResult<Vec<ImportBatch>> {
        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, name, created_at, source_type, tag_id, emails_amount
                FROM imports
                WHERE tag_id = ?1
                ORDER BY created_at DESC, id DESC
                "#,
            )?;

            let batches = stmt
                .query_map(params![tag_id], Self::map_row)?
                .collect::<SqliteResult<Vec<ImportBatch>>>()?;
            Ok(batches)
        })
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<ImportBatch> {
        let source_code: i64 = row.get(3)?;
        Ok(ImportBatch {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row
                .get::<_, String>(2)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            source_type: ImportSourceType::from_code(source_code)
                .unwrap_or(ImportSourceType::Combined),
            tag_id: row.get(4)?,
            emails_amount: row.get(5)?,
        })
    }
}
