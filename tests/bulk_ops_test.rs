// ==========================================
// 批量操作集成测试
// ==========================================
// 目标: 验证批量 upsert 的重激活语义与批量排除的幂等性
// ==========================================


use emails_helper::domain::types::{ExcludeScope, ImportSourceType};
use emails_helper::repository::{ImportRepository, LeadRepository};
use test_helpers::{at, create_test_gate, seed_domain, seed_leads, seed_tag, staging_table_exists};

// ==========================================
// 批量 upsert
// ==========================================
#[test]
fn test_upsert_no_duplicate_rows() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);

    seed_leads(&gate, tag, "批次1", &["a@x.com", "b@x.com"], now);
    seed_leads(&gate, tag, "批次2", &["b@x.com", "c@x.com"], now);

    let repo = LeadRepository::new(gate.clone());
    assert_eq!(repo.count_leads(tag, None).unwrap(), 3);
}

/// 重导入已耗尽地址: 重新激活、指向新批次、重抽 random_order（Scenario D）
#[test]
fn test_upsert_reactivates_consumed_lead() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);
    let first_import = seed_leads(&gate, tag, "批次1", &["a@x.com"], now);

    let repo = LeadRepository::new(gate.clone());

    // 耗尽
    let claimed = repo.claim_leads(tag, domain, 1, 0, 0, None, now).unwrap();
    assert_eq!(claimed.len(), 1);
    let consumed = repo.find_lead("a@x.com", tag).unwrap().unwrap();
    assert!(!consumed.is_active);

    // 第二个批次重导入同一地址: emails_amount 仍计 1 个输入
    let import_repo = ImportRepository::new(gate.clone());
    let second_import = import_repo
        .add("批次2", tag, ImportSourceType::Text, 1, now)
        .unwrap();
    repo.bulk_upsert_leads(&["a@x.com".to_string()], second_import, tag)
        .unwrap();

    let reactivated = repo.find_lead("a@x.com", tag).unwrap().unwrap();
    assert!(reactivated.is_active);
    assert_eq!(reactivated.import_id, second_import);
    assert_ne!(reactivated.import_id, first_import);
    // 同一 (email, tag) 仍只有一行
    assert_eq!(repo.count_leads(tag, None).unwrap(), 1);
    assert_eq!(reactivated.id, consumed.id);

    let batch = import_repo.find_by_id(second_import).unwrap().unwrap();
    assert_eq!(batch.emails_amount, 1);
}

#[test]
fn test_upsert_empty_input_is_noop() {
    let (_tmp, gate) = create_test_gate();

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);

    let repo = LeadRepository::new(gate.clone());
    assert_eq!(repo.bulk_upsert_leads(&[], 1, tag).unwrap(), 0);
    assert_eq!(repo.count_leads(tag, None).unwrap(), 0);
}

// ==========================================
// 批量排除
// ==========================================

/// 全域排除停用域下所有标签的匹配行，不触碰其他域（Scenario C）
#[test]
fn test_exclude_whole_domain_scope() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain_d = seed_domain(&gate, "域D", "D", 0, 0);
    let domain_e = seed_domain(&gate, "域E", "E", 0, 0);
    let tag_1 = seed_tag(&gate, "T1", domain_d);
    let tag_2 = seed_tag(&gate, "T2", domain_d);
    let tag_3 = seed_tag(&gate, "T3", domain_e);

    seed_leads(&gate, tag_1, "批次1", &["a@x.com", "b@x.com"], now);
    seed_leads(&gate, tag_2, "批次2", &["a@x.com"], now);
    seed_leads(&gate, tag_3, "批次3", &["a@x.com"], now);

    let repo = LeadRepository::new(gate.clone());
    let affected = repo
        .bulk_exclude_leads(
            domain_d,
            ExcludeScope::WholeDomain,
            &["a@x.com".to_string()],
        )
        .unwrap();
    assert_eq!(affected, 2);

    // 域D 下两个标签的 a 均被停用
    assert!(!repo.find_lead("a@x.com", tag_1).unwrap().unwrap().is_active);
    assert!(!repo.find_lead("a@x.com", tag_2).unwrap().unwrap().is_active);
    // 域E 与无关邮箱不受影响
    assert!(repo.find_lead("a@x.com", tag_3).unwrap().unwrap().is_active);
    assert!(repo.find_lead("b@x.com", tag_1).unwrap().unwrap().is_active);
}

#[test]
fn test_exclude_single_tag_scope() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag_1 = seed_tag(&gate, "T1", domain);
    let tag_2 = seed_tag(&gate, "T2", domain);

    seed_leads(&gate, tag_1, "批次1", &["a@x.com"], now);
    seed_leads(&gate, tag_2, "批次2", &["a@x.com"], now);

    let repo = LeadRepository::new(gate.clone());
    let affected = repo
        .bulk_exclude_leads(domain, ExcludeScope::Tag(tag_1), &["a@x.com".to_string()])
        .unwrap();
    assert_eq!(affected, 1);

    assert!(!repo.find_lead("a@x.com", tag_1).unwrap().unwrap().is_active);
    assert!(repo.find_lead("a@x.com", tag_2).unwrap().unwrap().is_active);
}

/// 幂等性: 重复排除第二次报 0 行，终态不变
#[test]
fn test_exclude_is_idempotent() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);
    seed_leads(&gate, tag, "批次", &["a@x.com", "b@x.com"], now);

    let repo = LeadRepository::new(gate.clone());
    let emails = vec!["a@x.com".to_string()];

    assert_eq!(
        repo.bulk_exclude_leads(domain, ExcludeScope::WholeDomain, &emails)
            .unwrap(),
        1
    );
    assert_eq!(
        repo.bulk_exclude_leads(domain, ExcludeScope::WholeDomain, &emails)
            .unwrap(),
        0
    );
    assert_eq!(repo.count_leads(tag, Some(true)).unwrap(), 1);
}

#[test]
fn test_exclude_unmatched_emails_is_success() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);
    seed_leads(&gate, tag, "批次", &["a@x.com"], now);

    let repo = LeadRepository::new(gate.clone());
    let affected = repo
        .bulk_exclude_leads(
            domain,
            ExcludeScope::WholeDomain,
            &["nobody@x.com".to_string()],
        )
        .unwrap();
    assert_eq!(affected, 0);
}

/// 大输入走分块插入路径，且临时表在操作后不残留
#[test]
fn test_exclude_large_input_and_staging_cleanup() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let tag = seed_tag(&gate, "T", domain);

    let emails: Vec<String> = (0..2500).map(|i| format!("user{}@x.com", i)).collect();
    let email_refs: Vec<&str> = emails.iter().map(|s| s.as_str()).collect();
    seed_leads(&gate, tag, "批次", &email_refs, now);

    let repo = LeadRepository::new(gate.clone());

    // 输入含重复，内部去重后一次 join 更新
    let mut input = emails.clone();
    input.extend(emails.iter().take(100).cloned());
    let affected = repo
        .bulk_exclude_leads(domain, ExcludeScope::WholeDomain, &input)
        .unwrap();
    assert_eq!(affected, 2500);

    assert!(!staging_table_exists(&gate));
    assert_eq!(repo.count_leads(tag, Some(true)).unwrap(), 0);
}

#[test]
fn test_exclude_empty_input_is_noop() {
    let (_tmp, gate) = create_test_gate();

    let domain = seed_domain(&gate, "域D", "D", 0, 0);
    let repo = LeadRepository::new(gate.clone());
    assert_eq!(
        repo.bulk_exclude_leads(domain, ExcludeScope::WholeDomain, &[])
            .unwrap(),
        0
    );
}
