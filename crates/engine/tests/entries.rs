use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::Database;

use engine::{BoxType, Engine, EngineError, EntryDraft};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn draft(box_type: BoxType, number_of_boxes: i64, total_cost: f64) -> EntryDraft {
    let count = number_of_boxes as f64;
    EntryDraft {
        date: day(14),
        box_type,
        number_of_boxes,
        total_cost,
        unit_cost: 640.0,
        unit_margin: 640.0 - total_cost / count,
        total_margin: 640.0 * count - total_cost,
    }
}

#[tokio::test]
async fn insert_assigns_identity_and_lists_newest_first() {
    let engine = engine_with_db().await;

    let first = engine
        .insert_entry(draft(BoxType::NormalBox, 10, 5000.0))
        .await
        .unwrap();
    // Split the creation timestamps so the ordering is observable.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = engine
        .insert_entry(draft(BoxType::DoubleBox, 3, 900.0))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);

    let entries = engine.list_entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, second.id);
    assert_eq!(entries[1].id, first.id);
    assert_eq!(entries[1].unit_margin, 140.0);
    assert_eq!(entries[1].total_margin, 1400.0);
}

#[tokio::test]
async fn update_preserves_id_and_created_at() {
    let engine = engine_with_db().await;

    let original = engine
        .insert_entry(draft(BoxType::NormalBox, 10, 5000.0))
        .await
        .unwrap();

    let mut replacement = draft(BoxType::FlushBox, 4, 1000.0);
    replacement.date = day(20);
    let updated = engine
        .update_entry(original.id, replacement)
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.box_type, BoxType::FlushBox);
    assert_eq!(updated.date, day(20));
    assert_eq!(updated.number_of_boxes, 4);
    assert_eq!(updated.total_cost, 1000.0);
    assert_eq!(updated.unit_margin, 390.0);
    assert_eq!(updated.total_margin, 1560.0);

    let entries = engine.list_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], updated);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let engine = engine_with_db().await;

    let err = engine
        .update_entry(Uuid::new_v4(), draft(BoxType::NormalBox, 1, 100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn delete_removes_entry() {
    let engine = engine_with_db().await;

    let entry = engine
        .insert_entry(draft(BoxType::DoubleBox, 2, 300.0))
        .await
        .unwrap();
    engine.delete_entry(entry.id).await.unwrap();

    assert!(engine.list_entries().await.unwrap().is_empty());

    let err = engine.delete_entry(entry.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn bulk_insert_keeps_submitted_order() {
    let engine = engine_with_db().await;

    let inserted = engine
        .insert_entries(vec![
            draft(BoxType::NormalBox, 10, 5000.0),
            draft(BoxType::DoubleBox, 3, 900.0),
            draft(BoxType::FlushBox, 7, 2100.0),
        ])
        .await
        .unwrap();

    assert_eq!(inserted.len(), 3);
    assert_eq!(inserted[0].box_type, BoxType::NormalBox);
    assert_eq!(inserted[1].box_type, BoxType::DoubleBox);
    assert_eq!(inserted[2].box_type, BoxType::FlushBox);
    assert_eq!(engine.list_entries().await.unwrap().len(), 3);
}

#[tokio::test]
async fn bulk_insert_is_all_or_nothing() {
    let engine = engine_with_db().await;

    let bad = EntryDraft {
        number_of_boxes: 0,
        unit_margin: 0.0,
        total_margin: 0.0,
        ..draft(BoxType::NormalBox, 1, 100.0)
    };
    let err = engine
        .insert_entries(vec![draft(BoxType::DoubleBox, 5, 1000.0), bad])
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidCount(_)));
    assert!(engine.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_count_is_rejected() {
    let engine = engine_with_db().await;

    let bad = EntryDraft {
        number_of_boxes: 0,
        unit_margin: 0.0,
        total_margin: 0.0,
        ..draft(BoxType::NormalBox, 1, 100.0)
    };
    let err = engine.insert_entry(bad).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidCount(_)));
}

#[tokio::test]
async fn bad_cost_is_rejected() {
    let engine = engine_with_db().await;

    let mut negative = draft(BoxType::NormalBox, 2, 100.0);
    negative.total_cost = -1.0;
    let err = engine.insert_entry(negative).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let mut nan = draft(BoxType::NormalBox, 2, 100.0);
    nan.total_cost = f64::NAN;
    let err = engine.insert_entry(nan).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}
