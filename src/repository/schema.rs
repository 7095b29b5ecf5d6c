// ==========================================
// 邮箱线索管理系统 - 数据库 Schema
// ==========================================
// 职责: 建表与索引（幂等，启动时执行）
// 不变量: leads(email, tag_id) 唯一 —— 全系统唯一的正确性关键约束
// ==========================================

use rusqlite::Connection;

use crate::repository::error::RepositoryResult;

/// 初始化全部表与索引（CREATE IF NOT EXISTS，可重复执行）
pub fn init_schema(conn: &Connection) -> RepositoryResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS domains (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            abbreviation TEXT NOT NULL DEFAULT 'ABC',
            use_limit_days INTEGER NOT NULL DEFAULT 0,
            global_use_limit_days INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            domain_id INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
            ideal_amount INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            UNIQUE(name, domain_id)
        );

        CREATE TABLE IF NOT EXISTS imports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            source_type INTEGER NOT NULL,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            emails_amount INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS exports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            domain_id INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            file_name_template TEXT NOT NULL,
            folder_name_template TEXT NOT NULL,
            separate_files INTEGER NOT NULL DEFAULT 0,
            tag_requests_json TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            import_id INTEGER NOT NULL REFERENCES imports(id) ON DELETE CASCADE,
            export_id INTEGER REFERENCES exports(id) ON DELETE SET NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            random_order REAL NOT NULL,
            last_used_at TEXT,
            UNIQUE(email, tag_id)
        );

        CREATE INDEX IF NOT EXISTS idx_leads_tag_active
            ON leads(tag_id, is_active, email);

        CREATE INDEX IF NOT EXISTS idx_leads_email
            ON leads(email);

        CREATE INDEX IF NOT EXISTS idx_tags_domain_active
            ON tags(domain_id, is_active);
        "#,
    )?;

    Ok(())
}
