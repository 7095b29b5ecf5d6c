// ==========================================
// 导出流程集成测试
// ==========================================
// 目标: 验证导出API的端到端编排（记录 -> 认领 -> 完成量回写）
// ==========================================


use std::sync::Arc;

use emails_helper::api::{ExportApi, ExportRequestInput, TagRequestInput};
use emails_helper::repository::{
    DomainRepository, ExportRepository, LeadRepository,
};
use test_helpers::{at, create_test_gate, seed_domain, seed_leads, seed_tag};

fn build_api(gate: &Arc<emails_helper::db::StoreGate>) -> ExportApi {
    ExportApi::new(
        Arc::new(DomainRepository::new(gate.clone())),
        Arc::new(ExportRepository::new(gate.clone())),
        Arc::new(LeadRepository::new(gate.clone())),
    )
}

fn request(tags: Vec<TagRequestInput>) -> ExportRequestInput {
    ExportRequestInput {
        file_name_template: "%d-name%_%t-name%".to_string(),
        folder_name_template: "%d-abrr%_%month%".to_string(),
        separate_files: true,
        tags,
    }
}

#[test]
fn test_export_claims_and_records_fulfillment() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "营销域", "MK", 0, 0);
    let tag_a = seed_tag(&gate, "开发者", domain);
    let tag_b = seed_tag(&gate, "设计师", domain);
    seed_leads(&gate, tag_a, "批次A", &["a@x.com", "b@x.com", "c@x.com"], now);
    seed_leads(&gate, tag_b, "批次B", &["d@x.com"], now);

    let api = build_api(&gate);
    let outcome = api
        .run_export(
            domain,
            &request(vec![
                TagRequestInput {
                    tag_id: tag_a,
                    tag_name: "开发者".to_string(),
                    requested_amount: 2,
                },
                TagRequestInput {
                    tag_id: tag_b,
                    tag_name: "设计师".to_string(),
                    requested_amount: 5,
                },
            ]),
            now,
        )
        .unwrap();

    assert_eq!(outcome.tags.len(), 2);
    assert_eq!(outcome.tags[0].emails.len(), 2);
    // 池中只有 1 条: 不足量属正常结果
    assert_eq!(outcome.tags[1].emails.len(), 1);

    // 历史记录已回写实际完成量
    let export_repo = ExportRepository::new(gate.clone());
    let record = export_repo.find_by_id(outcome.export_id).unwrap().unwrap();
    assert_eq!(record.tag_requests.len(), 2);
    assert_eq!(record.tag_requests[0].requested_amount, 2);
    assert_eq!(record.tag_requests[0].fulfilled_amount, 2);
    assert_eq!(record.tag_requests[1].requested_amount, 5);
    assert_eq!(record.tag_requests[1].fulfilled_amount, 1);
    assert_eq!(record.file_name_template, "%d-name%_%t-name%");
    assert!(record.separate_files);
}

/// 认领行被戳上本次导出的 export_id
#[test]
fn test_export_stamps_claimed_leads() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let domain = seed_domain(&gate, "营销域", "MK", 0, 0);
    let tag = seed_tag(&gate, "T", domain);
    seed_leads(&gate, tag, "批次", &["a@x.com"], now);

    let api = build_api(&gate);
    let outcome = api
        .run_export(
            domain,
            &request(vec![TagRequestInput {
                tag_id: tag,
                tag_name: "T".to_string(),
                requested_amount: 1,
            }]),
            now,
        )
        .unwrap();

    let lead_repo = LeadRepository::new(gate.clone());
    let lead = lead_repo.find_lead("a@x.com", tag).unwrap().unwrap();
    assert_eq!(lead.export_id, Some(outcome.export_id));
    assert!(!lead.is_active);
}

#[test]
fn test_export_missing_domain_rejected() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 1, 8);

    let api = build_api(&gate);
    let result = api.run_export(999, &request(Vec::new()), now);
    assert!(matches!(
        result,
        Err(emails_helper::api::ApiError::NotFound(_))
    ));
}

// ==========================================
// 命名模板渲染
// ==========================================
#[test]
fn test_render_name_with_merge_tags() {
    let (_tmp, gate) = create_test_gate();
    let now = at(2026, 3, 5, 8);

    let domain = seed_domain(&gate, "Acme", "AC", 0, 0);
    let api = build_api(&gate);

    let requests = vec![
        emails_helper::domain::history::ExportTagRequest {
            tag_id: 1,
            tag_name: "Sales".to_string(),
            requested_amount: 2500,
            fulfilled_amount: 0,
        },
        emails_helper::domain::history::ExportTagRequest {
            tag_id: 2,
            tag_name: "Dev".to_string(),
            requested_amount: 1000,
            fulfilled_amount: 0,
        },
    ];

    // 按标签拆分: %t-name%/%t-amount% 取当前标签
    let name = api
        .render_name(
            domain,
            "%d-abrr%_%day%.%month%_%t-name%_%t-amount%",
            &requests,
            Some(("Sales", 2500)),
            now,
        )
        .unwrap();
    assert_eq!(name, "AC_5.3_Sales_2.5k");

    // 合并输出: %t-all% 取联合标签
    let name = api
        .render_name(domain, "%d-name%/%t-all%", &requests, None, now)
        .unwrap();
    assert_eq!(name, "Acme/Sales_2.5k--Dev_1k");
}

// ==========================================
// 历史与"上次导出配置"回显
// ==========================================
#[test]
fn test_last_export_and_pagination() {
    let (_tmp, gate) = create_test_gate();

    let domain = seed_domain(&gate, "营销域", "MK", 0, 0);
    let tag = seed_tag(&gate, "T", domain);
    seed_leads(&gate, tag, "批次", &["a@x.com"], at(2026, 3, 1, 8));

    let api = build_api(&gate);
    for hour in [8, 9, 10] {
        api.run_export(
            domain,
            &request(vec![TagRequestInput {
                tag_id: tag,
                tag_name: "T".to_string(),
                requested_amount: 1,
            }]),
            at(2026, 3, 2, hour),
        )
        .unwrap();
    }

    // 最近一次 = 10 点的记录
    let last = api.last_export(domain).unwrap().unwrap();
    assert_eq!(last.created_at, at(2026, 3, 2, 10));

    // 分页: 共 3 条，第二页取到最旧一条
    let (page, total) = api.list_history(domain, 2, 2).unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].created_at, at(2026, 3, 2, 8));

    // 其他域没有历史
    let other = seed_domain(&gate, "其他域", "O", 0, 0);
    assert!(api.last_export(other).unwrap().is_none());
}
