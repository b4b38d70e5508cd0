use std::sync::Arc;

use energy_store::{Reading, ReadingStore};
use time::{macros::datetime, Duration, OffsetDateTime};

fn at(hour: i64) -> OffsetDateTime {
    datetime!(2024-06-01 00:00:00 UTC) + Duration::hours(hour)
}

#[tokio::test]
async fn latest_returns_max_timestamp_regardless_of_arrival_order() {
    let store = ReadingStore::new();
    store.append(Reading::new("m1", 3.0, at(3))).await;
    store.append(Reading::new("m1", 9.0, at(9))).await;
    store.append(Reading::new("m1", 5.0, at(5))).await;

    let latest = store.latest("m1").await.expect("m1 has readings");
    assert_eq!(latest.usage, 9.0);
    assert_eq!(latest.timestamp, at(9));
}

#[tokio::test]
async fn unknown_source_yields_nothing() {
    let store = ReadingStore::new();
    store.append(Reading::new("m1", 1.0, at(0))).await;

    assert!(store.latest("nope").await.is_none());
    assert!(store.range("nope", None, None).await.is_empty());
    assert!(store.summary(Some("nope"), None, None).await.is_empty());
}

#[tokio::test]
async fn appends_to_other_sources_do_not_disturb_a_series() {
    let store = ReadingStore::new();
    for h in 0..5 {
        store.append(Reading::new("m1", h as f64, at(h))).await;
    }
    let before = store.range("m1", None, None).await;

    for i in 0..50 {
        store
            .append(Reading::new(format!("other-{i}"), 1.0, at(50 - i)))
            .await;
    }

    assert_eq!(store.range("m1", None, None).await, before);
    assert_eq!(store.len().await, 55);
}

#[tokio::test]
async fn range_all_merges_sources_by_timestamp() {
    let store = ReadingStore::new();
    store.append(Reading::new("b", 1.0, at(1))).await;
    store.append(Reading::new("a", 2.0, at(2))).await;
    store.append(Reading::new("b", 3.0, at(2))).await;
    store.append(Reading::new("a", 4.0, at(0))).await;

    let got: Vec<(String, f64)> = store
        .range_all(Some(at(1)), Some(at(2)))
        .await
        .into_iter()
        .map(|r| (r.source_id, r.usage))
        .collect();

    assert_eq!(
        got,
        vec![
            ("b".to_string(), 1.0),
            ("a".to_string(), 2.0),
            ("b".to_string(), 3.0),
        ]
    );
}

#[tokio::test]
async fn latest_all_is_ordered_by_source() {
    let store = ReadingStore::new();
    store.append(Reading::new("m2", 1.0, at(1))).await;
    store.append(Reading::new("m1", 2.0, at(2))).await;
    store.append(Reading::new("m2", 3.0, at(3))).await;

    let got: Vec<(String, f64)> = store
        .latest_all()
        .await
        .into_iter()
        .map(|r| (r.source_id, r.usage))
        .collect();

    assert_eq!(got, vec![("m1".to_string(), 2.0), ("m2".to_string(), 3.0)]);
}

#[tokio::test]
async fn sources_report_counts_and_latest_timestamp() {
    let store = ReadingStore::new();
    store.append(Reading::new("m1", 1.0, at(4))).await;
    store.append(Reading::new("m1", 1.0, at(2))).await;
    store.append(Reading::new("m2", 1.0, at(1))).await;

    let sources = store.sources().await;
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].source_id, "m1");
    assert_eq!(sources[0].reading_count, 2);
    assert_eq!(sources[0].latest_timestamp, Some(at(4)));
    assert_eq!(sources[1].source_id, "m2");
    assert_eq!(sources[1].reading_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_are_all_kept_in_order() {
    let store = Arc::new(ReadingStore::new());

    let mut handles = Vec::new();
    for worker in 0..8i64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100i64 {
                let source = format!("m{}", worker % 2);
                store
                    .append(Reading::new(source, 1.0, at((i * 7 + worker) % 50)))
                    .await;
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(store.len().await, 800);
    for source in ["m0", "m1"] {
        let readings = store.range(source, None, None).await;
        assert_eq!(readings.len(), 400);
        assert!(readings.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
