// ==========================================
// 邮箱线索管理系统 - 可取消的解析任务
// ==========================================
// 职责: 把文件/文本解析放到阻塞线程池，调用方可随时取消
// 约束: 取消只丢弃在途结果；核心 API 永远只接收已完成的邮箱列表，
//       存储层对取消一无所知
// ==========================================

use std::path::PathBuf;

use tokio::task::JoinHandle;

use crate::importer::email_parser;
use crate::importer::error::ImporterResult;

// ==========================================
// ParseHandle - 解析任务句柄
// ==========================================
pub struct ParseHandle {
    handle: JoinHandle<ImporterResult<Vec<String>>>,
}

impl ParseHandle {
    /// 取消任务（已完成的任务取消无效果）
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// 等待任务完成
    ///
    /// # 返回
    /// - Some(result): 任务跑完（成功或失败）
    /// - None: 任务被取消，结果已丢弃
    pub async fn join(self) -> Option<ImporterResult<Vec<String>>> {
        match self.handle.await {
            Ok(result) => Some(result),
            Err(e) if e.is_cancelled() => None,
            Err(e) => Some(Err(crate::importer::error::ImporterError::Io(
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            ))),
        }
    }
}

/// 启动文件解析任务
///
/// # 说明
/// 单个文件解析失败（缺 Email 列、IO 错误）记录警告并跳过，
/// 不中断其余文件；结果跨文件保序去重
pub fn spawn_files_parse(paths: Vec<PathBuf>) -> ParseHandle {
    let handle = tokio::task::spawn_blocking(move || {
        let mut all_emails: Vec<Vec<String>> = Vec::with_capacity(paths.len());

        for path in &paths {
            match email_parser::extract_from_file(path) {
                Ok(emails) => all_emails.push(emails),
                Err(e) => {
                    tracing::warn!("跳过文件 {:?}: {}", path, e);
                }
            }
        }

        let merged = all_emails
            .iter()
            .fold(Vec::new(), |acc, next| email_parser::merge_unique(&acc, next));
        Ok(merged)
    });

    ParseHandle { handle }
}

/// 启动文本解析任务
pub fn spawn_text_parse(text: String) -> ParseHandle {
    let handle = tokio::task::spawn_blocking(move || email_parser::extract_from_text(&text));
    ParseHandle { handle }
}
