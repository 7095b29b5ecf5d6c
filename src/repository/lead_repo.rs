// ==========================================
// 邮箱线索管理系统 - 线索仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 职责: 批量插入/更新、原子认领、统计查询、批量排除
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{named_params, params, Connection, Result as SqliteResult};
use std::sync::Arc;

use crate::db::StoreGate;
use crate::domain::lead::{Lead, TagLeadStats, TagOverview};
use crate::domain::types::ExcludeScope;
use crate::engine::recency;
use crate::repository::error::RepositoryResult;

/// IN 子句分块大小（避开 SQLite 参数数量上限）
const CHUNK_SIZE: usize = 900;

// ==========================================
// LeadRepository - 线索仓储
// ==========================================
pub struct LeadRepository {
    gate: Arc<StoreGate>,
}

impl LeadRepository {
    pub fn new(gate: Arc<StoreGate>) -> Self {
        Self { gate }
    }

    // ==========================================
    // 批量插入/更新（导入）
    // ==========================================

    /// 批量 upsert 线索（单事务）
    ///
    /// # 参数
    /// - emails: 邮箱列表（上游已校验格式并去重）
    /// - import_id: 来源导入批次
    /// - tag_id: 目标标签
    ///
    /// # 返回
    /// - Ok(usize): 处理的邮箱数
    ///
    /// # 说明
    /// - (email, tag_id) 冲突时转为更新: is_active=1、import_id 指向新批次、
    ///   random_order 重新抽取 —— 重导入已耗尽地址会使其重新可用并重排抽取顺序
    pub fn bulk_upsert_leads(
        &self,
        emails: &[String],
        import_id: i64,
        tag_id: i64,
    ) -> RepositoryResult<usize> {
        if emails.is_empty() {
            return Ok(0);
        }

        self.gate.execute(|conn| {
            let tx = conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO leads (email, tag_id, import_id, is_active, random_order)
                    VALUES (?1, ?2, ?3, 1, ?4)
                    ON CONFLICT(email, tag_id) DO UPDATE SET
                        is_active = 1,
                        import_id = excluded.import_id,
                        random_order = excluded.random_order
                    "#,
                )?;

                let mut rng = rand::thread_rng();
                for email in emails {
                    stmt.execute(params![email, tag_id, import_id, rng.gen::<f64>()])?;
                }
            }
            tx.commit()?;

            tracing::info!("批量导入完成: tag_id={} 共 {} 条线索", tag_id, emails.len());
            Ok(emails.len())
        })
    }

    // ==========================================
    // 原子认领（分配引擎）
    // ==========================================

    /// 认领至多 amount 条通过冷却期判定的线索，并在同一条语句内标记消费
    ///
    /// # 参数
    /// - tag_id / domain_id: 目标标签及其所属域
    /// - amount: 请求数量（<= 0 直接返回空，不触碰任何行）
    /// - domain_limit_days / global_limit_days: 域内/跨域复用窗口（天）
    /// - export_id: 消费方导出批次（写入认领行）
    /// - now: 判定时刻（注入，不耦合墙钟）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 实际认领的邮箱；不足 amount 属正常结果而非错误
    ///
    /// # 原子性
    /// 选取与标记是一条 UPDATE ... WHERE id IN (...) RETURNING email 语句，
    /// 经由闸门串行执行 —— 并发认领不可能选到重叠行
    pub fn claim_leads(
        &self,
        tag_id: i64,
        domain_id: i64,
        amount: i64,
        domain_limit_days: i64,
        global_limit_days: i64,
        export_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<String>> {
        if amount <= 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            UPDATE leads
            SET is_active = 0,
                last_used_at = :now,
                export_id = :export_id
            WHERE id IN (
                WITH {ctes}
                SELECT l.id
                FROM leads l
                LEFT JOIN cross_domain_recent g ON l.email = g.email
                LEFT JOIN same_domain_recent d ON l.email = d.email
                WHERE l.tag_id = :tag_id
                  AND l.is_active = 1
                  AND {cond}
                ORDER BY l.random_order
                LIMIT :amount
            )
            RETURNING email
            "#,
            ctes = recency::RECENT_USE_CTES,
            cond = recency::ELIGIBLE_CONDITION,
        );

        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let emails = stmt
                .query_map(
                    named_params! {
                        ":now": recency::format_timestamp(now),
                        ":export_id": export_id,
                        ":domain_id": domain_id,
                        ":tag_id": tag_id,
                        ":global_cutoff": recency::cutoff(now, global_limit_days),
                        ":domain_cutoff": recency::cutoff(now, domain_limit_days),
                        ":amount": amount,
                    },
                    |row| row.get::<_, String>(0),
                )?
                .collect::<SqliteResult<Vec<String>>>()?;

            if !emails.is_empty() {
                tracing::info!(
                    "认领完成: tag_id={} 请求 {} 实际 {}",
                    tag_id,
                    amount,
                    emails.len()
                );
            }
            Ok(emails)
        })
    }

    // ==========================================
    // 统计查询（只读）
    // ==========================================

    /// 单标签统计三元组
    ///
    /// # 返回
    /// - inactive/active 按 is_active 计数；available 叠加冷却期判定
    pub fn tag_stats(
        &self,
        tag_id: i64,
        domain_id: i64,
        domain_limit_days: i64,
        global_limit_days: i64,
        now: DateTime<Utc>,
    ) -> RepositoryResult<TagLeadStats> {
        let sql = format!(
            r#"
            WITH {ctes}
            SELECT
                SUM(CASE WHEN l.is_active = 0 THEN 1 ELSE 0 END) AS inactive_count,
                SUM(CASE WHEN l.is_active = 1 THEN 1 ELSE 0 END) AS active_count,
                SUM(CASE
                    WHEN l.is_active = 1
                     AND {cond}
                    THEN 1
                    ELSE 0
                END) AS available_count
            FROM leads l
            LEFT JOIN cross_domain_recent g ON l.email = g.email
            LEFT JOIN same_domain_recent d ON l.email = d.email
            WHERE l.tag_id = :tag_id
            "#,
            ctes = recency::RECENT_USE_CTES,
            cond = recency::ELIGIBLE_CONDITION,
        );

        self.gate.execute(|conn| {
            let stats = conn.query_row(
                &sql,
                named_params! {
                    ":domain_id": domain_id,
                    ":tag_id": tag_id,
                    ":global_cutoff": recency::cutoff(now, global_limit_days),
                    ":domain_cutoff": recency::cutoff(now, domain_limit_days),
                },
                |row| {
                    Ok(TagLeadStats {
                        inactive: row.get::<_, Option<i64>>(0)?.unwrap_or(0),
                        active: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                        available: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    })
                },
            )?;
            Ok(stats)
        })
    }

    /// 域下全部标签的分组统计（仪表盘一次取回）
    ///
    /// # 参数
    /// - only_active: 是否只返回未软删除的标签
    ///
    /// # 说明
    /// 与逐标签调用 tag_stats 逐点等价（同一份判定 SQL），按标签名排序
    pub fn domain_tag_overview(
        &self,
        domain_id: i64,
        domain_limit_days: i64,
        global_limit_days: i64,
        now: DateTime<Utc>,
        only_active: bool,
    ) -> RepositoryResult<Vec<TagOverview>> {
        let active_filter = if only_active {
            "AND t.is_active = 1"
        } else {
            ""
        };

        let sql = format!(
            r#"
            WITH {ctes}
            SELECT
                t.id,
                t.name,
                t.ideal_amount,
                SUM(CASE WHEN l.is_active = 0 THEN 1 ELSE 0 END) AS inactive_count,
                SUM(CASE WHEN l.is_active = 1 THEN 1 ELSE 0 END) AS active_count,
                SUM(CASE
                    WHEN l.is_active = 1
                     AND {cond}
                    THEN 1
                    ELSE 0
                END) AS available_count
            FROM tags t
            LEFT JOIN leads l ON t.id = l.tag_id
            LEFT JOIN cross_domain_recent g ON l.email = g.email
            LEFT JOIN same_domain_recent d ON l.email = d.email
            WHERE t.domain_id = :domain_id
              {active_filter}
            GROUP BY t.id, t.name, t.ideal_amount
            ORDER BY t.name
            "#,
            ctes = recency::RECENT_USE_CTES,
            cond = recency::ELIGIBLE_CONDITION,
            active_filter = active_filter,
        );

        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    named_params! {
                        ":domain_id": domain_id,
                        ":global_cutoff": recency::cutoff(now, global_limit_days),
                        ":domain_cutoff": recency::cutoff(now, domain_limit_days),
                    },
                    |row| {
                        Ok(TagOverview {
                            tag_id: row.get(0)?,
                            name: row.get(1)?,
                            ideal_amount: row.get(2)?,
                            stats: TagLeadStats {
                                inactive: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                                active: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                                available: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
                            },
                        })
                    },
                )?
                .collect::<SqliteResult<Vec<TagOverview>>>()?;
            Ok(rows)
        })
    }

    /// 一组标签的统计三元组（一次分组查询）
    ///
    /// # 参数
    /// - tag_ids: 目标标签集合（须属于 domain_id 域；不在域内的返回零值）
    ///
    /// # 说明
    /// 与逐标签调用 tag_stats 结果一致；无线索/已软删除的标签得到全零三元组
    pub fn batch_tag_stats(
        &self,
        domain_id: i64,
        tag_ids: &[i64],
        domain_limit_days: i64,
        global_limit_days: i64,
        now: DateTime<Utc>,
    ) -> RepositoryResult<HashMap<i64, TagLeadStats>> {
        if tag_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let overview = self.domain_tag_overview(
            domain_id,
            domain_limit_days,
            global_limit_days,
            now,
            false,
        )?;

        let by_tag: HashMap<i64, TagLeadStats> =
            overview.into_iter().map(|o| (o.tag_id, o.stats)).collect();

        Ok(tag_ids
            .iter()
            .map(|id| (*id, by_tag.get(id).copied().unwrap_or_default()))
            .collect())
    }

    // ==========================================
    // 批量排除
    // ==========================================

    /// 批量停用匹配邮箱的线索（staging 临时表 + 单条 join 更新）
    ///
    /// # 参数
    /// - domain_id: 目标域
    /// - scope: Tag(id)=仅该标签 / WholeDomain=域下全部标签
    /// - emails: 待排除邮箱（内部去重）
    ///
    /// # 返回
    /// - Ok(usize): 实际停用的行数；0 行匹配同样视为成功（幂等）
    ///
    /// # 说明
    /// 临时表在任何退出路径（含失败）上都会被清理；清理自身的失败
    /// 只记录日志，不覆盖主操作结果
    pub fn bulk_exclude_leads(
        &self,
        domain_id: i64,
        scope: ExcludeScope,
        emails: &[String],
    ) -> RepositoryResult<usize> {
        if emails.is_empty() {
            return Ok(0);
        }

        let unique: Vec<&String> = {
            let mut seen = HashSet::new();
            emails.iter().filter(|e| seen.insert(e.as_str())).collect()
        };

        self.gate.execute(|conn| {
            conn.execute_batch(
                r#"
                CREATE TEMP TABLE IF NOT EXISTS exclude_staging (email TEXT PRIMARY KEY);
                DELETE FROM exclude_staging;
                "#,
            )?;

            let result = Self::exclude_with_staging(conn, domain_id, scope, &unique);

            // 任何退出路径都清理 staging 表
            if let Err(e) = conn.execute_batch("DROP TABLE IF EXISTS temp.exclude_staging;") {
                tracing::warn!("exclude_staging 清理失败: {}", e);
            }

            result
        })
    }

    fn exclude_with_staging(
        conn: &Connection,
        domain_id: i64,
        scope: ExcludeScope,
        emails: &[&String],
    ) -> RepositoryResult<usize> {
        let tx = conn.unchecked_transaction()?;

        // 分块多值插入，避开参数数量上限
        for chunk in emails.chunks(CHUNK_SIZE) {
            let placeholders = vec!["(?)"; chunk.len()].join(", ");
            let sql = format!(
                "INSERT OR IGNORE INTO exclude_staging (email) VALUES {}",
                placeholders
            );

            let params_vec: Vec<&dyn rusqlite::ToSql> =
                chunk.iter().map(|e| *e as &dyn rusqlite::ToSql).collect();
            tx.execute(&sql, params_vec.as_slice())?;
        }

        let affected = match scope {
            ExcludeScope::Tag(tag_id) => tx.execute(
                r#"
                UPDATE leads
                SET is_active = 0
                WHERE is_active = 1
                  AND tag_id = ?1
                  AND email IN (SELECT email FROM exclude_staging)
                "#,
                params![tag_id],
            )?,
            ExcludeScope::WholeDomain => tx.execute(
                r#"
                UPDATE leads
                SET is_active = 0
                WHERE is_active = 1
                  AND tag_id IN (SELECT id FROM tags WHERE domain_id = ?1)
                  AND email IN (SELECT email FROM exclude_staging)
                "#,
                params![domain_id],
            )?,
        };

        tx.commit()?;

        tracing::info!(
            "排除完成: domain_id={} scope={:?} 输入 {} 停用 {}",
            domain_id,
            scope,
            emails.len(),
            affected
        );
        Ok(affected)
    }

    // ==========================================
    // 查询辅助
    // ==========================================

    /// 按 (email, tag_id) 查询线索行
    pub fn find_lead(&self, email: &str, tag_id: i64) -> RepositoryResult<Option<Lead>> {
        self.gate.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, email, tag_id, import_id, export_id,
                       is_active, random_order, last_used_at
                FROM leads
                WHERE email = ?1 AND tag_id = ?2
                "#,
            )?;

            let result = stmt.query_row(params![email, tag_id], Self::map_lead_row);

            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// 统计标签下的线索行数
    ///
    /// # 参数
    /// - is_active: Some(_) 时按可用状态过滤，None 统计全部
    pub fn count_leads(&self, tag_id: i64, is_active: Option<bool>) -> RepositoryResult<i64> {
        self.gate.execute(|conn| {
            let count = match is_active {
                Some(active) => conn.query_row(
                    "SELECT COUNT(*) FROM leads WHERE tag_id = ?1 AND is_active = ?2",
                    params![tag_id, active],
                    |row| row.get(0),
                )?,
                None => conn.query_row(
                    "SELECT COUNT(*) FROM leads WHERE tag_id = ?1",
                    params![tag_id],
                    |row| row.get(0),
                )?,
            };
            Ok(count)
        })
    }

    fn map_lead_row(row: &rusqlite::Row<'_>) -> SqliteResult<Lead> {
        Ok(Lead {
            id: row.get(0)?,
            email: row.get(1)?,
            tag_id: row.get(2)?,
            import_id: row.get(3)?,
            export_id: row.get(4)?,
            is_active: row.get(5)?,
            random_order: row.get(6)?,
            last_used_at: row
                .get::<_, Option<String>>(7)?
                .and_then(|s| recency::parse_timestamp(&s)),
        })
    }
}
