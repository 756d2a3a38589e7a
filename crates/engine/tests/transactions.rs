use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use engine::{Engine, EngineError, LineItemInput, TransactionCmd};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    (engine, url, path)
}

fn grocery_cmd(transaction_id: &str, shopper_id: &str) -> TransactionCmd {
    TransactionCmd::new(transaction_id, shopper_id, "store-42", "2026-01-15T10:30:00Z")
        .item(LineItemInput::new("SKU-1", "Milk", 2, 11.75, "grocery"))
}

#[tokio::test]
async fn apply_awards_stickers_and_creates_shopper() {
    let (engine, _db) = engine_with_db().await;

    let applied = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();

    assert_eq!(applied.transaction_id, "txn-1");
    assert_eq!(applied.stickers_earned, 2);
    assert_eq!(applied.new_balance, 2);
    assert_eq!(applied.raw_total, 2);
    assert!(!applied.capped);
    assert!(!applied.is_duplicate);

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 2);
    assert_eq!(detail.transactions.len(), 1);
    assert_eq!(detail.transactions[0].total_amount.cents(), 2350);
}

#[tokio::test]
async fn promo_lines_add_bonus_and_cap_applies() {
    let (engine, _db) = engine_with_db().await;

    // $100 basket with three promo lines: 10 base + 3 bonus, capped at 5.
    let cmd = TransactionCmd::new("txn-1", "shopper-1", "store-42", "2026-01-15T10:30:00Z")
        .item(LineItemInput::new("SKU-1", "TV", 1, 91.00, "electronics"))
        .item(LineItemInput::new("SKU-2", "Candy", 4, 1.00, "promo"))
        .item(LineItemInput::new("SKU-3", "Soda", 1, 2.00, "promo"))
        .item(LineItemInput::new("SKU-4", "Chips", 1, 3.00, "promo"));

    let applied = engine.apply_transaction(cmd).await.unwrap();

    assert_eq!(applied.raw_total, 13);
    assert_eq!(applied.stickers_earned, 5);
    assert!(applied.capped);
    assert_eq!(applied.new_balance, 5);
}

#[tokio::test]
async fn duplicate_replays_original_result() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();
    let replay = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();

    assert!(replay.is_duplicate);
    assert_eq!(replay.stickers_earned, first.stickers_earned);
    assert_eq!(replay.new_balance, first.new_balance);
    assert_eq!(replay.raw_total, first.raw_total);
    assert_eq!(replay.capped, first.capped);

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 2);
    assert_eq!(detail.transactions.len(), 1);
}

#[tokio::test]
async fn duplicate_replay_reports_balance_at_application_time() {
    let (engine, _db) = engine_with_db().await;

    engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();
    engine
        .apply_transaction(grocery_cmd("txn-2", "shopper-1"))
        .await
        .unwrap();

    // The balance has moved on since txn-1, but its replay must not.
    let replay = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();
    assert!(replay.is_duplicate);
    assert_eq!(replay.new_balance, 2);

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 4);
}

#[tokio::test]
async fn concurrent_submissions_of_same_id_apply_once() {
    let (engine, _db) = engine_with_db().await;
    let engine = std::sync::Arc::new(engine);

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
                .await
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
                .await
        })
    };

    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();

    assert_eq!(
        [a.is_duplicate, b.is_duplicate].iter().filter(|d| !**d).count(),
        1
    );
    assert_eq!(a.stickers_earned, b.stickers_earned);
    assert_eq!(a.new_balance, b.new_balance);

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 2);
    assert_eq!(detail.transactions.len(), 1);
}

#[tokio::test]
async fn invalid_submission_reports_every_problem() {
    let (engine, _db) = engine_with_db().await;

    let cmd = TransactionCmd::new("", "shopper-1", "store-42", "yesterday")
        .item(LineItemInput::new("SKU-1", "Milk", 0, -1.0, "sweets"));

    let err = engine.apply_transaction(cmd).await.unwrap_err();
    match err {
        EngineError::Validation(problems) => assert!(problems.len() >= 5),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Nothing was written.
    let err = engine.shopper("shopper-1").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn history_keeps_submission_order_not_timestamp_order() {
    let (engine, _db) = engine_with_db().await;

    let late = TransactionCmd::new("txn-late", "shopper-1", "store-42", "2026-01-20T09:00:00Z")
        .item(LineItemInput::new("SKU-1", "Milk", 1, 12.00, "grocery"));
    let early = TransactionCmd::new("txn-early", "shopper-1", "store-42", "2026-01-10T09:00:00Z")
        .item(LineItemInput::new("SKU-1", "Milk", 1, 12.00, "grocery"));

    engine.apply_transaction(late).await.unwrap();
    engine.apply_transaction(early).await.unwrap();

    let detail = engine.shopper("shopper-1").await.unwrap();
    let ids: Vec<&str> = detail
        .transactions
        .iter()
        .map(|t| t.transaction_id.as_str())
        .collect();
    assert_eq!(ids, ["txn-late", "txn-early"]);
    assert!(detail.transactions[0].seq < detail.transactions[1].seq);
}

#[tokio::test]
async fn failed_apply_commits_nothing_and_retry_succeeds() {
    let (engine, db) = engine_with_db().await;

    // Fail the transaction insert itself, after the shopper upsert: the
    // duplicate check and the shopper write must roll back with it.
    db.execute_unprepared(
        "CREATE TRIGGER block_transaction_insert BEFORE INSERT ON transactions \
         BEGIN SELECT RAISE(ABORT, 'storage failure'); END",
    )
    .await
    .unwrap();

    let err = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let err = engine.shopper("shopper-1").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    db.execute_unprepared("DROP TRIGGER block_transaction_insert")
        .await
        .unwrap();

    // The same transaction_id is safe to retry and applies exactly once.
    let applied = engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();
    assert!(!applied.is_duplicate);
    assert_eq!(applied.new_balance, 2);

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 2);
    assert_eq!(detail.transactions.len(), 1);
}

#[tokio::test]
async fn unknown_shopper_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.shopper("nobody").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("nobody".to_string()));
}

#[tokio::test]
async fn ledger_survives_reconnect() {
    let (engine, url, path) = engine_with_file_db().await;

    engine
        .apply_transaction(grocery_cmd("txn-1", "shopper-1"))
        .await
        .unwrap();
    drop(engine);

    let db = Database::connect(&url).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let detail = engine.shopper("shopper-1").await.unwrap();
    assert_eq!(detail.shopper.sticker_balance, 2);
    assert_eq!(detail.transactions.len(), 1);

    drop(engine);
    std::fs::remove_file(path).unwrap();
}
