// ==========================================
// 邮箱线索管理系统 - 邮箱提取与校验
// ==========================================
// 职责: 从 CSV 文件/粘贴文本中提取格式合法的邮箱列表
// 约束: 输出去重；列名按"包含 email（不区分大小写）"匹配
// ==========================================

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::importer::error::{ImporterError, ImporterResult};

/// 邮箱格式: local@domain.tld（上游唯一的格式校验点）
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("邮箱正则必须合法")
    })
}

/// 校验单个邮箱格式
pub fn is_valid_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

/// 从 CSV 数据源提取合法邮箱（保序去重）
///
/// # 参数
/// - source_name: 数据源名称（错误信息用）
///
/// # 返回
/// - Err(EmailColumnNotFound): 表头中没有包含 "email" 的列
pub fn extract_from_reader<R: Read>(reader: R, source_name: &str) -> ImporterResult<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let email_column = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim().to_lowercase().contains("email"))
        .ok_or_else(|| ImporterError::EmailColumnNotFound {
            source_name: source_name.to_string(),
        })?;

    let mut seen = HashSet::new();
    let mut emails = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let Some(raw) = record.get(email_column) else {
            continue;
        };

        let candidate = raw.trim();
        if is_valid_email(candidate) && seen.insert(candidate.to_string()) {
            emails.push(candidate.to_string());
        }
    }

    Ok(emails)
}

/// 从 CSV 文件提取合法邮箱
pub fn extract_from_file(path: &Path) -> ImporterResult<Vec<String>> {
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path)?;
    extract_from_reader(file, &source_name)
}

/// 从粘贴文本（按 CSV 解析）提取合法邮箱
pub fn extract_from_text(text: &str) -> ImporterResult<Vec<String>> {
    extract_from_reader(text.as_bytes(), "Input Text")
}

/// 合并两路邮箱列表（保序去重，文件在前）
pub fn merge_unique(from_files: &[String], from_text: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    from_files
        .iter()
        .chain(from_text.iter())
        .filter(|e| seen.insert(e.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.co"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a@x.c"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn test_extract_from_text_with_email_column() {
        let text = "Name,Email Address\nAlice,a@x.com\nBob,not-an-email\nCarol, c@y.org \n";
        let emails = extract_from_text(text).unwrap();
        assert_eq!(emails, vec!["a@x.com".to_string(), "c@y.org".to_string()]);
    }

    #[test]
    fn test_extract_from_text_dedupes_preserving_order() {
        let text = "email\nb@x.com\na@x.com\nb@x.com\n";
        let emails = extract_from_text(text).unwrap();
        assert_eq!(emails, vec!["b@x.com".to_string(), "a@x.com".to_string()]);
    }

    #[test]
    fn test_extract_from_text_missing_column() {
        let text = "Name,Phone\nAlice,123\n";
        let err = extract_from_text(text).unwrap_err();
        assert!(matches!(err, ImporterError::EmailColumnNotFound { .. }));
    }

    #[test]
    fn test_merge_unique() {
        let files = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let text = vec!["b@x.com".to_string(), "c@x.com".to_string()];
        assert_eq!(
            merge_unique(&files, &text),
            vec![
                "a@x.com".to_string(),
                "b@x.com".to_string(),
                "c@x.com".to_string()
            ]
        );
    }
}
