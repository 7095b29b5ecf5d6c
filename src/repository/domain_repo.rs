// ==========================================
// 邮箱线索管理系统 - 域仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 域只软删除；被标签间接引用的域绝不物理删除
// ==========================================

use rusqlite::{params, Result as SqliteResult};
use std::sync::Arc;

use crate::db::StoreGate;
use crate::domain::catalog::Domain;
use crate::repository::error::RepositoryResult;

pub struct DomainRepository {
    gate: Arc<StoreGate>,
}

impl DomainRepository {
    pub fn new(gate: Arc<StoreGate>) -> Self {
        Self { gate }
    }

    /// 新建域（冷却期默认 0 天）
    ///
    /// # 返回
    /// - Ok(i64): 新行 id
    pub fn add(&self, name: &str, abbreviation: &str) -> RepositoryResult<i64> {
        self.gate.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO domains (name, abbreviation, use_limit_days, global_use_limit_days, is_active)
                VALUES (?1, ?2, 0, 0, 1)
                "#,
                params![name, abbreviation],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// 按 id 查询域
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Domain>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                r#"
                SELECT id, name, abbreviation, use_limit_days, global_use_limit_days, is_active
                FROM domains
                WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            );

            match result {
                Ok(domain) => Ok(Some(domain)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 列出未软删除的域
    pub fn list_active(&self) -> RepositoryResult<Vec<Domain>> {
        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, name, abbreviation, use_limit_days, global_use_limit_days, is_active
                FROM domains
                WHERE is_active = 1
                ORDER BY name
                "#,
            )?;

            let domains = stmt
                .query_map([], Self::map_row)?
                .collect::<SqliteResult<Vec<Domain>>>()?;
            Ok(domains)
        })
    }

    /// 更新域配置（名称/缩写/两个冷却期窗口）
    pub fn update_settings(
        &self,
        id: i64,
        name: &str,
        abbreviation: &str,
        use_limit_days: i64,
        global_use_limit_days: i64,
    ) -> RepositoryResult<()> {
        self.gate.execute(|conn| {
            conn.execute(
                r#"
                UPDATE domains
                SET name = ?2,
                    abbreviation = ?3,
                    use_limit_days = ?4,
                    global_use_limit_days = ?5
                WHERE id = ?1
                "#,
                params![id, name, abbreviation, use_limit_days, global_use_limit_days],
            )?;
            Ok(())
        })
    }

    /// 软删除（仅翻转 is_active；历史线索/导入/导出保持完整）
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        self.gate.execute(|conn| {
            conn.execute("UPDATE domains SET is_active = 0 WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<Domain> {
        Ok(Domain {
            id: row.get(0)?,
            name: row.get(1)?,
            abbreviation: row.get(2)?,
            use_limit_days: row.get(3)?,
            global_use_limit_days: row.get(4)?,
            is_active: row.get(5)?,
        })
    }
}
