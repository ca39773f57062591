//! Per-item result aggregation for batch operations.
//!
//! Every input item yields exactly one record, at the same position as the
//! item. Item failures are captured as records and never abort the batch.

use futures::{StreamExt, stream};
use serde::Serialize;
use std::future::Future;
use tracing::warn;

use crate::{
    models::asset::AssetRecord,
    services::asset_error::{AssetError, AssetResult, ErrorKind},
};

/// Ordered records of one batch, one per input item.
#[derive(Debug, Default, Clone)]
pub struct BatchOutcome {
    records: Vec<AssetRecord>,
}

/// Records of a batch partitioned by outcome, each side keeping input order.
#[derive(Serialize, Debug, Default, Clone)]
pub struct SplitOutcome {
    pub successes: Vec<AssetRecord>,
    pub failures: Vec<AssetRecord>,
}

impl BatchOutcome {
    pub fn into_records(self) -> Vec<AssetRecord> {
        self.records
    }

    pub fn all_succeeded(&self) -> bool {
        self.records.iter().all(|record| !record.is_error())
    }

    pub fn split(self) -> SplitOutcome {
        let (failures, successes): (Vec<_>, Vec<_>) =
            self.records.into_iter().partition(AssetRecord::is_error);
        SplitOutcome {
            successes,
            failures,
        }
    }
}

impl From<Vec<AssetRecord>> for BatchOutcome {
    fn from(records: Vec<AssetRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<AssetRecord> for BatchOutcome {
    fn from_iter<T: IntoIterator<Item = AssetRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Turn one item's result into its terminal record.
///
/// Failures are logged with their cause; the record only carries the
/// caller-safe message.
pub fn settle(
    operation: &str,
    name: Option<&str>,
    original_name: Option<&str>,
    result: AssetResult<AssetRecord>,
) -> AssetRecord {
    match result {
        Ok(record) => record,
        Err(err) => {
            log_item_failure(operation, name.or(original_name).unwrap_or("<unnamed>"), &err);
            AssetRecord::failed(
                name.map(str::to_string),
                original_name.map(str::to_string),
                &err,
            )
        }
    }
}

fn log_item_failure(operation: &str, subject: &str, err: &AssetError) {
    match err.kind() {
        ErrorKind::IoFailure => warn!(
            "{} failed for `{}`: {} ({:?})",
            operation, subject, err, err
        ),
        _ => warn!("{} rejected for `{}`: {}", operation, subject, err),
    }
}

/// Run `op` over `items` with at most `concurrency` in flight and return
/// the outputs in input order, whatever order they complete in.
pub async fn run_ordered<I, T, F, Fut>(items: I, concurrency: usize, op: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(items)
        .map(op)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::namespace::Namespace;
    use bytes::Bytes;
    use std::time::Duration;

    #[tokio::test]
    async fn output_order_follows_input_not_completion() {
        let delays = vec![30u64, 1, 15, 0];
        let out = run_ordered(delays.clone(), 4, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ms
        })
        .await;
        assert_eq!(out, delays);
    }

    #[test]
    fn settle_keeps_names_and_error_kind() {
        let err = AssetError::NotFound {
            namespace: Namespace::Product,
            name: "gone.png".into(),
        };
        let record = settle("read", Some("gone.png"), None, Err(err));
        assert_eq!(record.name.as_deref(), Some("gone.png"));
        assert_eq!(record.error_kind, Some(ErrorKind::NotFound));
    }

    #[test]
    fn split_partitions_and_keeps_order() {
        let fail = AssetError::Validation("bad".into());
        let outcome: BatchOutcome = vec![
            AssetRecord::with_bytes("a", Bytes::from_static(b"a")),
            AssetRecord::failed(Some("b".into()), None, &fail),
            AssetRecord::with_bytes("c", Bytes::from_static(b"c")),
        ]
        .into();
        assert!(!outcome.all_succeeded());

        let split = outcome.split();
        let names: Vec<_> = split
            .successes
            .iter()
            .map(|r| r.name.clone().unwrap())
            .collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(split.failures.len(), 1);
    }
}
