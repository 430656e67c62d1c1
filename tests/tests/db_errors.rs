use outpost_core::{driver::Statement, stmt::Data};
use tests::{setup, table};

#[tokio::test]
async fn failures_are_broadcast() {
    let (db, _log) = setup().await;
    let mut first = db.subscribe_errors();
    let mut second = db.subscribe_errors();

    let err = db
        .execute(Statement::from("SELECT * FROM missing;"))
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert!(err.to_string().contains("no such table"));

    let received = first.try_recv().unwrap();
    assert_eq!(received.to_string(), err.to_string());
    assert_eq!(second.try_recv().unwrap().to_string(), err.to_string());
    assert!(first.try_recv().is_err());
}

#[tokio::test]
async fn failures_without_subscribers() {
    let (db, _log) = setup().await;

    let err = db
        .execute(Statement::from("SELECT * FROM missing;"))
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed());

    // Subscribers only see failures after subscribing
    let mut errors = db.subscribe_errors();
    assert!(errors.try_recv().is_err());
}

#[tokio::test]
async fn failed_batch_is_rolled_back() {
    let (db, _log) = setup().await;
    let office = table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    let mut errors = db.subscribe_errors();

    let insert = db
        .compiler()
        .insert(&office, &Data::new().with("name", "Main"));
    let err = db
        .batch(vec![insert, Statement::from("INSERT INTO missing DEFAULT VALUES;")])
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert!(errors.try_recv().is_ok());
    assert_eq!(office.count(&db, None).await.unwrap(), 0);
}

#[tokio::test]
async fn schema_errors_touch_no_storage() {
    let (db, mut log) = setup().await;
    let office = table("office", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    let mut errors = db.subscribe_errors();

    log.clear();
    let err = office.on(office.column("name").unwrap()).unwrap_err();
    assert!(err.is_invalid_expression());

    let err = office.column("missing").unwrap_err();
    assert!(err.is_invalid_expression());

    assert!(log.is_empty());
    assert!(errors.try_recv().is_err());
}
