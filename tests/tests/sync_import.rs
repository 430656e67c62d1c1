use outpost_core::{
    stmt::{Data, SelectOptions, Value},
    Db, Table,
};
use outpost_sync::{add_file, add_reference, decode, encode, encode_record};
use tests::{setup, table};

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

async fn schema(db: &Db) -> (Arc<Table>, Arc<Table>) {
    let organisation = table("organisation", &[("name", "string")])
        .create(db, vec![])
        .await
        .unwrap();
    let office = table(
        "office",
        &[
            ("name", "string"),
            ("staff", "integer"),
            ("organisation", "reference organisation"),
            ("photo", "upload"),
        ],
    )
    .create(db, vec![])
    .await
    .unwrap();

    (organisation, office)
}

fn tree() -> serde_json::Value {
    json!({
        "$_office": [{
            "@uuid": "o1",
            "@created_on": "2020-01-01T10:00:00",
            "@modified_on": "2020-01-02T10:00:00",
            "name": "Main",
            "staff": { "@value": "12" },
            "$k_organisation": { "@resource": "organisation", "@uuid": "g1" },
            "photo": { "@url": "https://files.example.com/main.jpg" },
        }],
        "$_organisation": [{
            "@uuid": "g1",
            "@created_on": "2019-06-01T08:00:00Z",
            "@modified_on": "2019-06-01T08:00:00Z",
            "name": "Acme",
        }],
    })
}

/// Writes the decoded records, referenced records first, resolving
/// foreign keys to local identities.
async fn import(db: &Db, root: &str, tree: &serde_json::Value) {
    let decoded = decode(&db.tables(), root, tree);

    let mut order = decoded.keys().cloned().collect::<Vec<_>>();
    order.reverse();

    for name in order {
        let table = db.table(&name).unwrap();

        for record in decoded[&name].values() {
            let mut data = record.data.clone();

            for (field, reference) in &record.references {
                let target = db.table(&reference.table).unwrap();
                let fragment = Data::new().with("uuid", reference.uuid.as_str());
                if let Some(found) = target.identify(db, &fragment).await.unwrap() {
                    data.insert(field.clone(), found["id"].clone());
                }
            }

            for (field, url) in &record.files {
                data.insert(field.clone(), url.as_str());
            }

            match table.identify(db, &data).await.unwrap() {
                Some(existing) => {
                    let id = table.field("id").unwrap().equals(existing["id"].clone());
                    table.update(db, data.skip_defaults(), Some(id)).await.unwrap();
                }
                None => {
                    table.insert(db, data).await.unwrap();
                }
            }
        }
    }
}

async fn uuid_of(db: &Db, table: &Table, id: &Value) -> Option<String> {
    let rows = table
        .filter(table.field("id").unwrap().equals(id.clone()))
        .select(db, vec![table.column("uuid").unwrap()], SelectOptions::default())
        .await
        .unwrap();

    rows.first()
        .and_then(|row| row.get(&format!("{}.uuid", table.name)))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[tokio::test]
async fn import_then_export() {
    let (db, _log) = setup().await;
    let (organisation, office) = schema(&db).await;

    import(&db, "office", &tree()).await;

    assert_eq!(organisation.count(&db, None).await.unwrap(), 1);
    assert_eq!(office.count(&db, None).await.unwrap(), 1);

    let rows = office
        .select(&db, vec![], SelectOptions::default())
        .await
        .unwrap();
    let row = rows[0].clone().into_data("office");

    assert_eq!(row["uuid"], Value::from("o1"));
    assert_eq!(row["staff"], Value::Integer(12));
    assert_eq!(row["organisation"], Value::Integer(1));
    assert_eq!(
        row["photo"],
        Value::from("https://files.example.com/main.jpg")
    );

    let encoded = encode_record(&office, &row);
    let mut item = encoded.data;

    for (field, (table, value)) in &encoded.references {
        let target = db.table(table).unwrap();
        let uuid = uuid_of(&db, &target, value).await;
        add_reference(&mut item, field, table, uuid.as_deref());
    }
    for field in encoded.files.keys() {
        add_file(&mut item, field, Some("main.jpg"));
    }

    assert_eq!(
        encode("office", vec![serde_json::Value::Object(item)]),
        json!({
            "$_office": [{
                "@uuid": "o1",
                "@created_on": "2020-01-01T10:00:00.000Z",
                "@modified_on": "2020-01-02T10:00:00.000Z",
                "name": "Main",
                "staff": { "@value": "12" },
                "$k_organisation": { "@resource": "organisation", "@uuid": "g1" },
                "photo": { "@filename": "main.jpg" },
            }],
        })
    );
}

#[tokio::test]
async fn reimport_updates_in_place() {
    let (db, _log) = setup().await;
    let (organisation, office) = schema(&db).await;

    import(&db, "office", &tree()).await;

    let mut changed = tree();
    changed["$_office"][0]["name"] = json!("Renamed");
    import(&db, "office", &changed).await;

    assert_eq!(organisation.count(&db, None).await.unwrap(), 1);
    assert_eq!(office.count(&db, None).await.unwrap(), 1);

    let rows = office
        .select(&db, vec![office.column("name").unwrap()], SelectOptions::default())
        .await
        .unwrap();
    assert_eq!(rows[0].get("office.name"), Some(&Value::from("Renamed")));
}

#[tokio::test]
async fn unresolved_reference_is_left_empty() {
    let (db, _log) = setup().await;
    let (organisation, office) = schema(&db).await;

    let tree = json!({
        "$_office": [{
            "@uuid": "o1",
            "name": "Main",
            "$k_organisation": { "@resource": "organisation", "@uuid": "g9" },
        }],
    });
    import(&db, "office", &tree).await;

    assert_eq!(organisation.count(&db, None).await.unwrap(), 0);

    let rows = office
        .select(&db, vec![], SelectOptions::default())
        .await
        .unwrap();
    let row = rows[0].clone().into_data("office");
    assert_eq!(row["organisation"], Value::Null);
    assert!(encode_record(&office, &row).references.is_empty());
}
