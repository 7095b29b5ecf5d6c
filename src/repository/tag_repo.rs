// ==========================================
// 邮箱线索管理系统 - 标签仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 不变量: (name, domain_id) 唯一；软删除只翻转 is_active
// ==========================================

use rusqlite::{params, Result as SqliteResult};
use std::sync::Arc;

use crate::db::StoreGate;
use crate::domain::catalog::Tag;
use crate::repository::error::RepositoryResult;

pub struct TagRepository {
    gate: Arc<StoreGate>,
}

impl TagRepository {
    pub fn new(gate: Arc<StoreGate>) -> Self {
        Self { gate }
    }

    /// 新建标签（ideal_amount 初始为 0）
    ///
    /// # 返回
    /// - Ok(i64): 新行 id
    /// - Err(UniqueConstraintViolation): 域内同名标签已存在
    pub fn add(&self, name: &str, domain_id: i64) -> RepositoryResult<i64> {
        self.gate.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO tags (name, domain_id, ideal_amount, is_active)
                VALUES (?1, ?2, 0, 1)
                "#,
                params![name, domain_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// 按 id 查询标签
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tag>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                r#"
                SELECT id, name, domain_id, ideal_amount, is_active
                FROM tags
                WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            );

            match result {
                Ok(tag) => Ok(Some(tag)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 按域内名称查询标签 id
    pub fn find_by_name(&self, name: &str, domain_id: i64) -> RepositoryResult<Option<i64>> {
        self.gate.execute(|conn| {
            let result = conn.query_row(
                "SELECT id FROM tags WHERE name = ?1 AND domain_id = ?2",
                params![name, domain_id],
                |row| row.get::<_, i64>(0),
            );

            match result {
                Ok(id) => Ok(Some(id)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 列出域下标签
    ///
    /// # 参数
    /// - only_active: 是否排除软删除标签
    pub fn list_by_domain(&self, domain_id: i64, only_active: bool) -> RepositoryResult<Vec<Tag>> {
        let sql = if only_active {
            r#"
            SELECT id, name, domain_id, ideal_amount, is_active
            FROM tags
            WHERE domain_id = ?1 AND is_active = 1
            ORDER BY name
            "#
        } else {
            r#"
            SELECT id, name, domain_id, ideal_amount, is_active
            FROM tags
            WHERE domain_id = ?1
            ORDER BY name
            "#
        };

        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let tags = stmt
                .query_map(params![domain_id], Self::map_row)?
                .collect::<SqliteResult<Vec<Tag>>>()?;
            Ok(tags)
        })
    }

    /// 编辑标签名与理想数量
    pub fn edit(&self, id: i64, name: &str, ideal_amount: i64) -> RepositoryResult<()> {
        self.gate.execute(|conn| {
            conn.execute(
                "UPDATE tags SET name = ?2, ideal_amount = ?3 WHERE id = ?1",
                params![id, name, ideal_amount],
            )?;
            Ok(())
        })
    }

    /// 软删除（历史线索保持完整，仍参与冷却期判定）
    pub fn soft_delete(&self, id: i64) -> RepositoryResult<()> {
        self.gate.execute(|conn| {
            conn.execute("UPDATE tags SET is_active = 0 WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            domain_id: row.get(2)?,
            ideal_amount: row.get(3)?,
            is_active: row.get(4)?,
        })
    }
}
