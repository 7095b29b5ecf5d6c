// ==========================================
// 导入解析任务集成测试
// ==========================================
// 目标: 验证文件/文本解析任务与取消语义（取消只丢弃在途结果）
// ==========================================

use std::io::Write;

use tempfile::NamedTempFile;

use emails_helper::importer::{spawn_files_parse, spawn_text_parse};

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("创建临时 CSV 失败");
    file.write_all(content.as_bytes()).expect("写入 CSV 失败");
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_files_parse_merges_and_dedupes() {
    let file_1 = csv_file("Name,Email\nAlice,a@x.com\nBob,b@x.com\n");
    let file_2 = csv_file("email\nb@x.com\nc@x.com\n");

    let handle = spawn_files_parse(vec![
        file_1.path().to_path_buf(),
        file_2.path().to_path_buf(),
    ]);
    let emails = handle.join().await.unwrap().unwrap();
    assert_eq!(
        emails,
        vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string()
        ]
    );
}

/// 单个坏文件跳过，不中断其余文件
#[tokio::test]
async fn test_files_parse_skips_unreadable_source() {
    let good = csv_file("email\na@x.com\n");
    let bad = csv_file("Name,Phone\nAlice,123\n");

    let handle = spawn_files_parse(vec![
        bad.path().to_path_buf(),
        good.path().to_path_buf(),
        std::path::PathBuf::from("/nonexistent/missing.csv"),
    ]);
    let emails = handle.join().await.unwrap().unwrap();
    assert_eq!(emails, vec!["a@x.com".to_string()]);
}

#[tokio::test]
async fn test_text_parse() {
    let handle = spawn_text_parse("Email Address\n a@x.com \nnot-an-email\n".to_string());
    let emails = handle.join().await.unwrap().unwrap();
    assert_eq!(emails, vec!["a@x.com".to_string()]);
}

/// 取消后 join 返回 None（若任务恰已完成则容许返回结果）
#[tokio::test]
async fn test_cancel_discards_in_flight_result() {
    let handle = spawn_text_parse("email\na@x.com\n".to_string());
    handle.cancel();

    match handle.join().await {
        None => {}               // 取消生效
        Some(Ok(_)) => {}        // 任务在取消前已跑完，同样合法
        Some(Err(e)) => panic!("取消不应产生解析错误: {}", e),
    }
}
