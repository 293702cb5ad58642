//! End-to-end round trips through a table handle backed by an in-memory
//! database.

use relatable_core::condition::{Condition, OrderBy};
use relatable_core::frame::Frame;
use relatable_core::types::SqlType;
use relatable_core::value::Value;
use relatable_db::flatfile;
use relatable_db::table::Table;

async fn open(name: &str) -> Table {
    Table::connect("sqlite::memory:", name)
        .await
        .expect("failed to open in-memory session")
}

fn players() -> Frame {
    Frame::with_rows(
        vec!["name".into(), "score".into()],
        vec![
            vec![Value::Text("alice".into()), Value::Float(9.5)],
            vec![Value::Text("bob".into()), Value::Float(7.0)],
            vec![Value::Text("carol".into()), Value::Float(8.25)],
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn create_synthesizes_identity_ahead_of_sampled_columns() {
    let table = open("players").await;
    let sample = Frame::with_rows(
        vec!["name".into(), "score".into()],
        vec![vec![Value::Text("alice".into()), Value::Float(9.5)]],
    )
    .unwrap();

    table.create(&sample, false).await.unwrap();

    assert_eq!(table.columns().await.unwrap(), vec!["id", "name", "score"]);
}

#[tokio::test]
async fn delete_with_condition_leaves_the_rest() {
    let table = open("players").await;
    let sample = players();
    table.create(&sample, false).await.unwrap();
    assert_eq!(table.insert(&sample).await.unwrap(), 3);

    let matching_one = [Condition::equal("name", ["bob"]).unwrap()];
    assert_eq!(table.delete(&matching_one).await.unwrap(), 1);

    let frame = table.query(&[], None, None).await.unwrap();
    assert_eq!(frame.len(), 2);

    // Unconditional delete clears what is left.
    assert_eq!(table.delete(&[]).await.unwrap(), 2);
    assert!(table.query(&[], None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn sentinel_substitution_is_gated_on_text_columns() {
    let table = open("readings").await;
    let sample = Frame::with_rows(
        vec!["x".into(), "label".into()],
        vec![
            vec![Value::Float(1.0), Value::Text("first".into())],
            vec![Value::Null, Value::Null],
        ],
    )
    .unwrap();

    table.create(&sample, false).await.unwrap();
    table.insert(&sample).await.unwrap();

    let frame = table.query(&[], None, None).await.unwrap();
    // The number column keeps its NULL; the text column takes the
    // sentinel literal.
    assert_eq!(frame.rows()[1][1], Value::Null);
    assert_eq!(frame.rows()[1][2], Value::Text("nan".into()));

    // And the sentinel is addressable through equality like any text.
    let sentinel = [Condition::equal("label", ["nan"]).unwrap()];
    assert_eq!(table.query(&sentinel, None, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn alterations_track_through_live_schema() {
    let mut table = open("players").await;
    let sample = players();
    table.create(&sample, false).await.unwrap();
    table.insert(&sample).await.unwrap();

    table.rename("people").await.unwrap();
    assert_eq!(table.name(), "people");

    table
        .add_columns(&["team".into()], &[SqlType::Varchar(80)])
        .await
        .unwrap();
    let renamed = table
        .rename_columns(
            &["name".into(), "score".into()],
            &["name".into(), "points".into()],
        )
        .await
        .unwrap();
    assert_eq!(renamed, 1);
    table.drop_columns(&["team".into()]).await.unwrap();

    // Query labels come from the live schema after all of that.
    let frame = table.query(&[], None, None).await.unwrap();
    assert_eq!(frame.columns(), &["id", "name", "points"]);
    assert_eq!(frame.len(), 3);
}

#[tokio::test]
async fn ordered_limited_query_after_update() {
    let table = open("players").await;
    let sample = players();
    table.create(&sample, false).await.unwrap();
    table.insert(&sample).await.unwrap();

    let patch = Frame::with_rows(vec!["score".into()], vec![vec![Value::Float(10.0)]]).unwrap();
    let conditions = [Condition::equal("name", ["carol"]).unwrap()];
    assert_eq!(table.update(&patch, &conditions).await.unwrap(), 1);

    let order = OrderBy::desc("score").unwrap();
    let top = table.query(&[], Some(&order), Some(1)).await.unwrap();
    assert_eq!(top.rows()[0][1], Value::Text("carol".into()));
    assert_eq!(top.rows()[0][2], Value::Float(10.0));
}

#[tokio::test]
async fn export_writes_the_whole_table() {
    let table = open("players").await;
    let sample = players();
    table.create(&sample, false).await.unwrap();
    table.insert(&sample).await.unwrap();

    let file = tempfile::NamedTempFile::new().unwrap();
    let written = table.export(file.path()).await.unwrap();
    assert_eq!(written, 3);

    let back = flatfile::read_frame(file.path(), ',').unwrap();
    assert_eq!(back.columns(), &["id", "name", "score"]);
    assert_eq!(back.len(), 3);
    assert_eq!(back.rows()[0][1], Value::Text("alice".into()));
}
