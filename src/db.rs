// ==========================================
// 邮箱线索管理系统 - SQLite 连接初始化与单写闸门
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 全库只持有一个连接，所有读写经由 StoreGate 串行化
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::schema;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库文件名
pub const DB_FILE_NAME: &str = "emails-helper-db.sqlite3";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径（平台数据目录/EmailsHelper/）
///
/// 目录不存在时自动创建；无法解析平台目录时回退到当前目录。
pub fn default_db_path() -> String {
    let folder = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("EmailsHelper");

    if let Err(e) = std::fs::create_dir_all(&folder) {
        tracing::warn!("无法创建数据目录 {:?}: {}", folder, e);
    }

    folder.join(DB_FILE_NAME).to_string_lossy().into_owned()
}

// ==========================================
// StoreGate - 单写闸门
// ==========================================
/// 单写闸门：独占持有唯一的数据库连接
///
/// 职责:
/// - 保证同一时刻只有一个逻辑操作访问连接
/// - 多语句序列（建临时表 → 批量插入 → 更新 → 清理）对其他调用方表现为原子
/// - 调用方按 await/join 顺序获得 FIFO 语义；并发提交只保证"一个完整执行后才轮到下一个"
///
/// 约束: 闸门内不得进行无关外部 I/O（文件写入等在闸门外完成）
pub struct StoreGate {
    conn: Mutex<Connection>,
}

impl StoreGate {
    /// 打开数据库并初始化 schema
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        schema::init_schema(&conn)?;
        tracing::info!("数据库已打开: {}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 打开内存数据库（测试用）
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 从已有连接创建闸门（连接所有权移交给闸门）
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// 以独占方式执行一个数据库操作
    ///
    /// # 参数
    /// - op: 操作闭包，可执行多条语句；任一语句失败时由闭包内事务回滚
    ///
    /// # 返回
    /// - 闭包的结果；锁获取失败映射为 LockError
    pub fn execute<T>(
        &self,
        op: impl FnOnce(&Connection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let conn = self.lock()?;
        op(&conn)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}
