use outpost_core::{
    stmt::{Data, Direction, SelectOptions, Value},
    Db, Table,
};
use tests::{setup, table};

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn offices(db: &Db) -> Arc<Table> {
    table(
        "office",
        &[
            ("name", "string"),
            ("active", "boolean"),
            ("rating", "double"),
            ("opened", "date"),
            ("layout", "json"),
            ("photo", "upload"),
        ],
    )
    .create(db, vec![])
    .await
    .unwrap()
}

fn names(rows: Vec<outpost_core::stmt::Row>, table: &str) -> Vec<Value> {
    rows.into_iter()
        .map(|row| row.into_data(table)["name"].clone())
        .collect()
}

#[tokio::test]
async fn insert_returns_identity() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    assert_eq!(office.insert(&db, Data::new().with("name", "Main")).await.unwrap(), 1);
    assert_eq!(office.insert(&db, Data::new().with("name", "Annex")).await.unwrap(), 2);
    assert_eq!(office.count(&db, None).await.unwrap(), 2);
}

#[tokio::test]
async fn values_come_back_typed() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    office
        .insert(
            &db,
            Data::new()
                .with("name", "Main")
                .with("active", true)
                .with("rating", 4.0)
                .with("opened", NaiveDate::from_ymd_opt(2020, 3, 4).unwrap())
                .with("layout", Value::Json(serde_json::json!({ "rooms": [1, 2] }))),
        )
        .await
        .unwrap();

    let rows = office
        .select(&db, vec![], SelectOptions::default())
        .await
        .unwrap();
    let data = rows[0].clone().into_data("office");

    assert_eq!(data["active"], Value::Bool(true));
    assert_eq!(data["rating"], Value::Double(4.0));
    assert_eq!(
        data["opened"],
        Value::Date(NaiveDate::from_ymd_opt(2020, 3, 4).unwrap())
    );
    assert_eq!(
        data["layout"],
        Value::Json(serde_json::json!({ "rooms": [1, 2] }))
    );
    assert_eq!(data["photo"], Value::Null);
}

#[tokio::test]
async fn update_with_filter() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    let old = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    for name in ["Main", "Annex"] {
        office
            .insert(&db, Data::new().with("name", name).with("modified_on", old))
            .await
            .unwrap();
    }

    let id = office.field("id").unwrap();
    let affected = office
        .update(&db, Data::new().with("name", "Renamed"), Some(id.equals(1)))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let options = SelectOptions::default().order_by(office.column("id").unwrap(), Direction::Asc);
    let rows = office.select(&db, vec![], options).await.unwrap();

    let first = rows[0].clone().into_data("office");
    assert_eq!(first["name"], Value::from("Renamed"));
    assert_ne!(first["modified_on"], Value::DateTime(old));

    let second = rows[1].clone().into_data("office");
    assert_eq!(second["name"], Value::from("Annex"));
    assert_eq!(second["modified_on"], Value::DateTime(old));
}

#[tokio::test]
async fn update_skipping_defaults() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    let old = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    office
        .insert(&db, Data::new().with("name", "Main").with("modified_on", old))
        .await
        .unwrap();

    let affected = office
        .update(&db, Data::new().with("name", "Renamed").skip_defaults(), None)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = office
        .select(&db, vec![], SelectOptions::default())
        .await
        .unwrap();
    let data = rows[0].clone().into_data("office");
    assert_eq!(data["name"], Value::from("Renamed"));
    assert_eq!(data["modified_on"], Value::DateTime(old));
}

#[tokio::test]
async fn update_without_known_fields() {
    let (db, mut log) = setup().await;
    let office = offices(&db).await;
    office.insert(&db, Data::new().with("name", "Main")).await.unwrap();

    log.clear();
    let affected = office
        .update(&db, Data::new().with("bogus", 1).skip_defaults(), None)
        .await
        .unwrap();

    assert_eq!(affected, 0);
    assert!(log.is_empty());
}

#[tokio::test]
async fn select_options() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    for name in ["b", "a", "c", "a"] {
        office.insert(&db, Data::new().with("name", name)).await.unwrap();
    }

    let name = office.column("name").unwrap();

    let rows = office
        .select(
            &db,
            vec![name.clone()],
            SelectOptions::default().order_by(name.clone(), Direction::Desc),
        )
        .await
        .unwrap();
    assert_eq!(
        names(rows, "office"),
        ["c", "b", "a", "a"].map(Value::from)
    );

    let rows = office
        .select(
            &db,
            vec![name.clone()],
            SelectOptions::default()
                .distinct()
                .order_by(name.clone(), Direction::Asc),
        )
        .await
        .unwrap();
    assert_eq!(names(rows, "office"), ["a", "b", "c"].map(Value::from));

    let rows = office
        .select(
            &db,
            vec![name.clone()],
            SelectOptions::default()
                .order_by(name.clone(), Direction::Asc)
                .limit(2)
                .offset(1),
        )
        .await
        .unwrap();
    assert_eq!(names(rows, "office"), ["a", "b"].map(Value::from));

    let rows = office
        .select(
            &db,
            vec![name.clone()],
            SelectOptions::default()
                .order_by(name.clone(), Direction::Asc)
                .offset(3),
        )
        .await
        .unwrap();
    assert_eq!(names(rows, "office"), ["c"].map(Value::from));
}

#[tokio::test]
async fn filters_combine() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    office
        .insert(&db, Data::new().with("name", "Main").with("active", true))
        .await
        .unwrap();
    office
        .insert(&db, Data::new().with("name", "Annex").with("active", true))
        .await
        .unwrap();
    office
        .insert(&db, Data::new().with("name", "Closed").with("active", false))
        .await
        .unwrap();

    let active = office.field("active").unwrap().equals(true);
    assert_eq!(office.count(&db, Some(active.clone())).await.unwrap(), 2);

    let rows = office
        .filter(active)
        .filter(office.sql_assert("office.name <> 'Main'"))
        .select(&db, vec![office.column("name").unwrap()], SelectOptions::default())
        .await
        .unwrap();
    assert_eq!(names(rows, "office"), [Value::from("Annex")]);
}

#[tokio::test]
async fn joins() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;
    let person = table(
        "person",
        &[("name", "string"), ("office", "reference office")],
    )
    .create(&db, vec![])
    .await
    .unwrap();

    let main = office.insert(&db, Data::new().with("name", "Main")).await.unwrap();
    person
        .insert(&db, Data::new().with("name", "Ann").with("office", main))
        .await
        .unwrap();
    person
        .insert(&db, Data::new().with("name", "Bob"))
        .await
        .unwrap();

    let columns = vec![
        person.column("name").unwrap(),
        office.column("name").unwrap(),
    ];
    let on = || office.on(office.sql_assert("office.id = person.office")).unwrap();
    let order = || SelectOptions::default().order_by(person.column("id").unwrap(), Direction::Asc);

    let rows = person
        .join(on())
        .select(&db, columns.clone(), order())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("person.name"), Some(&Value::from("Ann")));
    assert_eq!(rows[0].get("office.name"), Some(&Value::from("Main")));

    let rows = person
        .left(on())
        .select(&db, columns, order())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("person.name"), Some(&Value::from("Bob")));
    assert_eq!(rows[1].get("office.name"), Some(&Value::Null));
}

#[tokio::test]
async fn files() {
    let (db, _log) = setup().await;
    let office = offices(&db).await;

    office
        .insert(&db, Data::new().with("name", "Main").with("photo", "file:///main.jpg"))
        .await
        .unwrap();
    office
        .insert(&db, Data::new().with("name", "Annex").with("photo", ""))
        .await
        .unwrap();
    office
        .insert(&db, Data::new().with("name", "Closed").with("photo", "file:///closed.jpg"))
        .await
        .unwrap();
    office.insert(&db, Data::new().with("name", "Empty")).await.unwrap();

    assert_eq!(
        office.files(&db, None).await.unwrap(),
        ["file:///main.jpg", "file:///closed.jpg"]
    );

    let name = office.field("name").unwrap();
    assert_eq!(
        office.files(&db, Some(name.equals("Closed"))).await.unwrap(),
        ["file:///closed.jpg"]
    );

    let person = table("person", &[("name", "string")])
        .create(&db, vec![])
        .await
        .unwrap();
    assert!(person.files(&db, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn identify_by_uuid() {
    let (db, mut log) = setup().await;
    let office = offices(&db).await;

    let synchronized = Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap();
    office
        .insert(
            &db,
            Data::new()
                .with("name", "Main")
                .with("uuid", "o1")
                .with("photo", "file:///main.jpg")
                .with("synchronized_on", synchronized),
        )
        .await
        .unwrap();

    let found = office
        .identify(&db, &Data::new().with("uuid", "o1").with("name", "Other"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found["id"], Value::Integer(1));
    assert_eq!(found["synchronized_on"], Value::DateTime(synchronized));
    assert!(matches!(found["modified_on"], Value::DateTime(_)));
    assert_eq!(found["photo"], Value::from("file:///main.jpg"));
    assert!(!found.contains("name"));

    let missing = office
        .identify(&db, &Data::new().with("uuid", "o2"))
        .await
        .unwrap();
    assert!(missing.is_none());

    log.clear();
    let without_uuid = office
        .identify(&db, &Data::new().with("name", "Main"))
        .await
        .unwrap();
    assert!(without_uuid.is_none());
    assert!(log.is_empty());
}
