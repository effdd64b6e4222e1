// ==========================================
// ProductImporter 集成测试
// ==========================================
// 测试目标: 验证 CSV → SQLite 的完整导入流程
// ==========================================


use catalog_service::domain::IssueKind;
use catalog_service::importer::{ImportError, ProductImporter};
use catalog_service::logging;
use test_helpers::{create_test_db, create_test_state, csv_with_rows, write_csv, BASIC_HEADER};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_import_fixture_file() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let importer = state.importer();

    let report = importer
        .import_from_csv("tests/fixtures/products.csv", &CancellationToken::new())
        .await
        .expect("Import should succeed");

    assert_eq!(report.total_rows, 9);
    assert_eq!(report.imported, 4);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.rejected, 3);
    assert_eq!(report.malformed, 1);
    assert_eq!(report.failed, 0);

    let malformed: Vec<_> = report.issues_of(IssueKind::Malformed).collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].line, 8);

    let repo = &state.product_repo;
    assert_eq!(repo.count().unwrap(), 4);

    let a1 = repo.find_by_sku("A1").unwrap().unwrap();
    assert_eq!(a1.name, "Widget");
    assert_eq!(a1.price_cents, 950);
    assert_eq!(a1.stock_quantity, 10);
    assert_eq!(a1.weight_grams, 120);
    assert_eq!(a1.currency, "USD");

    let a2 = repo.find_by_sku("A2").unwrap().unwrap();
    assert_eq!(a2.name, "Gadget, deluxe");
    assert_eq!(a2.description, "Says \"hi\"");
    assert_eq!(a2.price_cents, 123450);
    assert_eq!(a2.stock_quantity, 1200);
    assert_eq!(a2.weight_grams, 1201);
    assert_eq!(a2.currency, "EUR");

    let a3 = repo.find_by_sku("A3").unwrap().unwrap();
    assert_eq!(a3.price_cents, 2000);
    assert_eq!(a3.stock_quantity, 0);

    let a7 = repo.find_by_sku("A7").unwrap().unwrap();
    assert_eq!(a7.price_cents, 425);
    assert_eq!(a7.stock_quantity, 0);
    assert_eq!(a7.currency, "GBP");

    assert!(repo.find_by_sku("A5").unwrap().is_none());
    assert!(repo.find_by_sku("A6").unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_sku_within_run_first_wins() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let csv = write_csv(&csv_with_rows(
        BASIC_HEADER,
        &["A1,Widget,Tools,9.5,10", "A1,Widget2,Tools,5,3"],
    ));

    let report = state
        .importer()
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.duplicates, 1);

    let stored = state.product_repo.find_by_sku("A1").unwrap().unwrap();
    assert_eq!(stored.name, "Widget");
    assert_eq!(stored.category, "Tools");
    assert_eq!(stored.price_cents, 950);
    assert_eq!(stored.stock_quantity, 10);
    assert_eq!(state.product_repo.count().unwrap(), 1);
}

#[tokio::test]
async fn test_same_sku_across_runs_last_wins() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let importer = state.importer();

    let first = write_csv(&csv_with_rows(BASIC_HEADER, &["B1,Old Name,Tools,1.00,1"]));
    let second = write_csv(&csv_with_rows(BASIC_HEADER, &["B1,New Name,Garden,2.00,2"]));

    importer
        .import_from_csv(first.path(), &CancellationToken::new())
        .await
        .unwrap();
    let original = state.product_repo.find_by_sku("B1").unwrap().unwrap();

    importer
        .import_from_csv(second.path(), &CancellationToken::new())
        .await
        .unwrap();
    let updated = state.product_repo.find_by_sku("B1").unwrap().unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.category, "Garden");
    assert_eq!(updated.price_cents, 200);
    assert_eq!(updated.stock_quantity, 2);
    assert_eq!(state.product_repo.count().unwrap(), 1);
}

#[tokio::test]
async fn test_reimport_same_file_is_idempotent() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let importer = state.importer();
    let csv = write_csv(&csv_with_rows(
        BASIC_HEADER,
        &["C1,One,Tools,1,1", "C2,Two,Tools,2,2"],
    ));

    importer
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap();
    let (before, _) = state.product_repo.list_paginated(10, 0).unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let report = importer
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.imported, 2);

    for old in &before {
        let new = state.product_repo.find_by_sku(&old.sku).unwrap().unwrap();
        assert_eq!(new.id, old.id);
        assert_eq!(new.created_at, old.created_at);
        assert!(new.updated_at > old.updated_at);
        assert_eq!(new.name, old.name);
        assert_eq!(new.price_cents, old.price_cents);
    }
    assert_eq!(state.product_repo.count().unwrap(), 2);
}

#[tokio::test]
async fn test_missing_required_header_imports_nothing() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let csv = write_csv(&csv_with_rows(
        "sku,product_name,stock_quantity",
        &["D1,Widget,10"],
    ));

    let err = state
        .importer()
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_configuration_error());
    match err {
        ImportError::MissingRequiredHeaders(missing) => {
            assert_eq!(missing, vec!["product_category", "product_price"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(state.product_repo.count().unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_line_does_not_abort_run() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);
    let csv = write_csv(&csv_with_rows(
        BASIC_HEADER,
        &["E1,One,Tools,1,1", "E2,\"Two,Tools,2,2", "E3,Three,Tools,3,3"],
    ));

    let report = state
        .importer()
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.malformed, 1);
    assert_eq!(report.imported, 2);
    assert!(state.product_repo.find_by_sku("E2").unwrap().is_none());
    assert!(state.product_repo.find_by_sku("E3").unwrap().is_some());
}

#[tokio::test]
async fn test_cli_default_currency_applies() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = catalog_service::app::AppState::new(
        &db_path,
        catalog_service::config::ImportConfig::with_default_currency("jpy"),
    )
    .unwrap();
    let csv = write_csv(&csv_with_rows(BASIC_HEADER, &["F1,Yen,Tools,100,1"]));

    state
        .importer()
        .import_from_csv(csv.path(), &CancellationToken::new())
        .await
        .unwrap();

    let stored = state.product_repo.find_by_sku("F1").unwrap().unwrap();
    assert_eq!(stored.currency, "JPY");
}

#[tokio::test]
async fn test_missing_file_is_fatal() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_test_state(&db_path);

    let err = state
        .importer()
        .import_from_csv("tests/fixtures/does_not_exist.csv", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::FileNotFound(_)));
}
