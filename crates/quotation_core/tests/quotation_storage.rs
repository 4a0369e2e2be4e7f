use quotation_core::{
    FsQuotationRepository, Figure, QuotationId, QuotationRepository, QuotationService,
    ServiceError,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn service() -> (TempDir, QuotationService<FsQuotationRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let repo = FsQuotationRepository::open(dir.path().join("quotations")).unwrap();
    (dir, QuotationService::new(repo))
}

fn sample(number: &str) -> Value {
    json!({
        "quotation_number": number,
        "date": "2024-01-01",
        "customer": "Acme",
        "contact_person": "王小明",
        "address": "台北市信義區",
        "notes": "含稅",
        "items": [
            {"description": "Widget", "quantity": 2, "unit_price": 5, "amount": 10, "notes": ""},
            {"description": "Gadget", "quantity": 1.5, "unit_price": 4.0, "amount": 6.0, "notes": "急件"}
        ],
        "grand_total": 16,
        "extra_client_field": {"kept": true}
    })
}

#[test]
fn save_then_load_returns_identical_document() {
    let (_dir, service) = service();
    let document = sample("QTN-20240101-120000");

    let id = service.save(&document).unwrap();
    assert_eq!(id.as_str(), "QTN-20240101-120000");

    let loaded = service.load("QTN-20240101-120000").unwrap();
    assert_eq!(loaded, document);
}

#[test]
fn save_preserves_key_order_on_disk() {
    let (_dir, service) = service();
    service.save(&sample("QTN-ORDER")).unwrap();

    let path = service
        .repo()
        .document_path(&QuotationId::parse("QTN-ORDER").unwrap());
    let written = std::fs::read_to_string(path).unwrap();
    let number_at = written.find("quotation_number").unwrap();
    let extra_at = written.find("extra_client_field").unwrap();
    assert!(number_at < extra_at);
}

#[test]
fn save_with_empty_or_missing_number_fails_without_writing() {
    let (_dir, service) = service();

    for document in [
        json!({"quotation_number": "", "customer": "Acme"}),
        json!({"customer": "Acme"}),
        json!({"quotation_number": null}),
        json!(["not", "an", "object"]),
    ] {
        let err = service.save(&document).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{err}");
    }

    let entries = std::fs::read_dir(service.repo().dir()).unwrap().count();
    assert_eq!(entries, 0);
}

#[test]
fn save_rejects_number_that_escapes_storage_dir() {
    let (dir, service) = service();

    let err = service
        .save(&json!({"quotation_number": "../outside"}))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(!dir.path().join("outside.json").exists());
}

#[test]
fn delete_removes_from_listing_and_later_reads_fail() {
    let (_dir, service) = service();
    service.save(&sample("QTN-A")).unwrap();
    service.save(&sample("QTN-B")).unwrap();

    service.delete("QTN-A").unwrap();

    let ids: Vec<String> = service
        .list_quotations()
        .unwrap()
        .into_iter()
        .map(|summary| summary.id.to_string())
        .collect();
    assert_eq!(ids, vec!["QTN-B"]);

    assert!(matches!(
        service.load("QTN-A").unwrap_err(),
        ServiceError::NotFound(id) if id == "QTN-A"
    ));
    assert!(matches!(
        service.export_text("QTN-A").unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.export_spreadsheet("QTN-A").unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.delete("QTN-A").unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn listing_skips_invalid_json_silently() {
    let (_dir, service) = service();
    service.save(&sample("QTN-GOOD")).unwrap();
    std::fs::write(service.repo().dir().join("QTN-BROKEN.json"), "{not json").unwrap();
    std::fs::write(
        service.repo().dir().join("QTN-NOT-OBJECT.json"),
        r#"["QTN-NOT-OBJECT", "2024-01-01"]"#,
    )
    .unwrap();

    let summaries = service.list_quotations().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id.as_str(), "QTN-GOOD");

    assert!(matches!(
        service.load("QTN-BROKEN").unwrap_err(),
        ServiceError::Parse { .. }
    ));
}

#[test]
fn document_with_non_string_fields_is_listed_and_exported() {
    let (_dir, service) = service();
    let document = json!({
        "quotation_number": "QTN-9",
        "customer": 42,
        "items": [
            {"description": "Widget", "quantity": true, "unit_price": 5, "amount": 10},
            "stray"
        ],
        "grand_total": 10
    });
    service.save(&document).unwrap();
    std::fs::write(
        service.repo().dir().join("QTN-ITEMS-TEXT.json"),
        r#"{"customer": "Globex", "items": "none"}"#,
    )
    .unwrap();

    let summaries = service.list_quotations().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id.as_str(), "QTN-ITEMS-TEXT");
    assert_eq!(summaries[0].customer, "Globex");
    assert_eq!(summaries[1].id.as_str(), "QTN-9");
    assert_eq!(summaries[1].customer, "42");
    assert_eq!(summaries[1].total, Figure::from(10));

    let text = String::from_utf8(service.export_text("QTN-9").unwrap().bytes).unwrap();
    assert!(text.contains("客戶名稱: 42\n"));
    assert!(text.contains("1. Widget - 數量: true - 單價: 5 - 金額: 10\n"));
    assert!(!text.contains("2. "));

    let sheet = service.export_spreadsheet("QTN-9").unwrap();
    assert!(sheet.bytes.starts_with(b"PK"));
    assert!(service.export_text("QTN-ITEMS-TEXT").is_ok());
}

#[test]
fn whitespace_number_is_a_valid_identifier() {
    let (_dir, service) = service();
    let id = service
        .save(&json!({"quotation_number": " ", "customer": "Acme"}))
        .unwrap();
    assert_eq!(id.as_str(), " ");
    assert_eq!(service.load(" ").unwrap()["customer"], json!("Acme"));
}

#[test]
fn listing_projects_summary_fields_with_defaults() {
    let (_dir, service) = service();
    service.save(&sample("QTN-FULL")).unwrap();
    service
        .save(&json!({"quotation_number": "QTN-BARE"}))
        .unwrap();

    let summaries = service.list_quotations().unwrap();
    assert_eq!(summaries.len(), 2);

    // Newest id first; "QTN-FULL" sorts after "QTN-BARE".
    assert_eq!(summaries[0].id.as_str(), "QTN-FULL");
    assert_eq!(summaries[0].date, "2024-01-01");
    assert_eq!(summaries[0].customer, "Acme");
    assert_eq!(summaries[0].total, Figure::from(16));

    assert_eq!(summaries[1].id.as_str(), "QTN-BARE");
    assert_eq!(summaries[1].date, "");
    assert_eq!(summaries[1].customer, "");
    assert_eq!(summaries[1].total, Figure::default());
}

#[test]
fn listing_uses_file_name_not_document_number() {
    let (_dir, service) = service();
    std::fs::write(
        service.repo().dir().join("QTN-RENAMED.json"),
        r#"{"quotation_number": "QTN-ORIGINAL", "customer": "Acme"}"#,
    )
    .unwrap();

    let summaries = service.list_quotations().unwrap();
    assert_eq!(summaries[0].id.as_str(), "QTN-RENAMED");
}

#[test]
fn resave_overwrites_single_entry() {
    let (_dir, service) = service();
    service.save(&sample("QTN-SAME")).unwrap();

    let mut updated = sample("QTN-SAME");
    updated["customer"] = json!("Globex");
    updated["grand_total"] = json!(99);
    service.save(&updated).unwrap();

    let summaries = service.list_quotations().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].customer, "Globex");
    assert_eq!(service.load("QTN-SAME").unwrap(), updated);
}

#[test]
fn grand_total_is_never_recomputed() {
    let (_dir, service) = service();
    let mut document = sample("QTN-TRUST");
    document["grand_total"] = json!(1);
    service.save(&document).unwrap();

    assert_eq!(service.load("QTN-TRUST").unwrap()["grand_total"], json!(1));
    assert_eq!(service.list_quotations().unwrap()[0].total, Figure::from(1));
}

#[test]
fn path_like_ids_read_as_not_found() {
    let (_dir, service) = service();
    assert!(matches!(
        service.load("../etc/passwd").unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.delete("").unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[test]
fn repository_reports_absence_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FsQuotationRepository::open(dir.path()).unwrap();
    let id = QuotationId::parse("QTN-NONE").unwrap();

    assert_eq!(repo.get(&id).unwrap(), None);
    assert!(!repo.delete(&id).unwrap());
    assert!(repo.list_ids().unwrap().is_empty());
}
