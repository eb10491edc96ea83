//! Batch fetch with per-item failure absorption.
//!
//! The loyalty contract exposes its collections as an identifier list plus a
//! per-identifier detail getter. [`aggregate`] runs that fan-out: every
//! identifier is fetched, normalized, and collected in input order, and an
//! identifier whose fetch or normalization fails is replaced by a placeholder
//! record instead of failing the whole batch.
//!
//! The output always has the same length and order as the input identifier
//! list. Per-item errors are logged and absorbed here; a failure of the
//! identifier-list fetch itself is the caller's to handle and never reaches
//! this module.

use futures_util::StreamExt;
use futures_util::stream;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How many per-item fetches may be in flight at once during one pass.
///
/// [`Concurrency::Sequential`] issues one fetch at a time and is the default.
/// [`Concurrency::Bounded`] keeps up to `n` fetches in flight while still
/// yielding results in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// One in-flight fetch at a time.
    #[default]
    Sequential,
    /// Up to `n` in-flight fetches, results reordered by original index.
    Bounded(NonZeroUsize),
}

/// Error returned when parsing an invalid concurrency setting.
#[derive(Debug, thiserror::Error)]
#[error("invalid concurrency value: {0}")]
pub struct InvalidConcurrency(String);

impl FromStr for Concurrency {
    type Err = InvalidConcurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sequential") {
            return Ok(Concurrency::Sequential);
        }
        let n: usize = s.parse().map_err(|_| InvalidConcurrency(s.to_string()))?;
        match NonZeroUsize::new(n) {
            None => Err(InvalidConcurrency(s.to_string())),
            Some(n) if n.get() == 1 => Ok(Concurrency::Sequential),
            Some(n) => Ok(Concurrency::Bounded(n)),
        }
    }
}

/// Fetches details for every identifier, substituting a placeholder for any
/// item whose fetch or normalization fails.
///
/// For each identifier, `fetch_one` is invoked and its raw result passed
/// through `normalize`. An error from either stage is logged and replaced by
/// `placeholder_for(&id)`; it never propagates to the caller. The returned
/// vector has exactly one record per input identifier, in input order,
/// regardless of per-item latency or the concurrency mode.
///
/// Each call is a fresh pass: no retries, no caching, no state shared with
/// other invocations.
pub async fn aggregate<Id, Raw, Out, E, F, Fut, N, P>(
    identifiers: Vec<Id>,
    concurrency: Concurrency,
    fetch_one: F,
    normalize: N,
    placeholder_for: P,
) -> Vec<Out>
where
    Id: Display + Clone,
    E: Display,
    F: Fn(Id) -> Fut,
    Fut: Future<Output = Result<Raw, E>>,
    N: Fn(Raw) -> Result<Out, E>,
    P: Fn(&Id) -> Out,
{
    match concurrency {
        Concurrency::Sequential => {
            let mut records = Vec::with_capacity(identifiers.len());
            for id in identifiers {
                let outcome = fetch_one(id.clone()).await.and_then(&normalize);
                records.push(unwrap_or_placeholder(outcome, &id, &placeholder_for));
            }
            records
        }
        Concurrency::Bounded(limit) => {
            // `buffered` keeps at most `limit` futures in flight and yields
            // outputs in the order of the underlying stream, so the result
            // still matches the identifier order, not completion order.
            let normalize = &normalize;
            let placeholder_for = &placeholder_for;
            stream::iter(identifiers.into_iter().map(|id| {
                let fut = fetch_one(id.clone());
                async move {
                    unwrap_or_placeholder(fut.await.and_then(normalize), &id, placeholder_for)
                }
            }))
            .buffered(limit.get())
            .collect()
            .await
        }
    }
}

fn unwrap_or_placeholder<Id, Out, E, P>(
    outcome: Result<Out, E>,
    id: &Id,
    placeholder_for: &P,
) -> Out
where
    Id: Display,
    E: Display,
    P: Fn(&Id) -> Out,
{
    match outcome {
        Ok(out) => out,
        Err(error) => {
            tracing::warn!(item = %id, error = %error, "Item fetch failed, substituting placeholder");
            placeholder_for(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn normalize_ok(raw: u64) -> Result<String, String> {
        Ok(format!("item-{raw}"))
    }

    fn placeholder(id: &u64) -> String {
        format!("missing-{id}")
    }

    #[tokio::test]
    async fn one_record_per_identifier_with_failures_absorbed() {
        let records = aggregate(
            vec![1u64, 2, 3],
            Concurrency::Sequential,
            |id| async move {
                if id == 2 {
                    Err("execution reverted".to_string())
                } else {
                    Ok(id * 10)
                }
            },
            normalize_ok,
            placeholder,
        )
        .await;
        assert_eq!(records, vec!["item-10", "missing-2", "item-30"]);
    }

    #[tokio::test]
    async fn empty_identifier_list_yields_empty_batch() {
        let records = aggregate(
            Vec::<u64>::new(),
            Concurrency::Sequential,
            |id| async move { Ok::<u64, String>(id) },
            normalize_ok,
            placeholder,
        )
        .await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn normalize_failure_is_treated_like_fetch_failure() {
        let records = aggregate(
            vec![7u64, 8],
            Concurrency::Sequential,
            |id| async move { Ok::<u64, String>(id) },
            |raw| {
                if raw == 8 {
                    Err("malformed item".to_string())
                } else {
                    Ok(format!("item-{raw}"))
                }
            },
            placeholder,
        )
        .await;
        assert_eq!(records, vec!["item-7", "missing-8"]);
    }

    #[tokio::test]
    async fn bounded_concurrency_preserves_identifier_order() {
        // Later identifiers complete first; output order must not change.
        let ids: Vec<u64> = (0..6).collect();
        let records = aggregate(
            ids.clone(),
            Concurrency::Bounded(NonZeroUsize::new(4).unwrap()),
            |id| async move {
                tokio::time::sleep(Duration::from_millis(5 * (6 - id))).await;
                if id == 3 {
                    Err("timeout".to_string())
                } else {
                    Ok(id)
                }
            },
            normalize_ok,
            placeholder,
        )
        .await;
        assert_eq!(
            records,
            vec![
                "item-0",
                "item-1",
                "item-2",
                "missing-3",
                "item-4",
                "item-5"
            ]
        );
    }

    #[tokio::test]
    async fn failed_item_equals_placeholder_exactly() {
        let records = aggregate(
            vec![42u64],
            Concurrency::Sequential,
            |_| async move { Err::<u64, String>("no response".to_string()) },
            normalize_ok,
            placeholder,
        )
        .await;
        assert_eq!(records[0], placeholder(&42));
    }

    #[test]
    fn concurrency_parses_from_config_values() {
        assert_eq!(
            "sequential".parse::<Concurrency>().unwrap(),
            Concurrency::Sequential
        );
        assert_eq!("1".parse::<Concurrency>().unwrap(), Concurrency::Sequential);
        assert_eq!(
            "8".parse::<Concurrency>().unwrap(),
            Concurrency::Bounded(NonZeroUsize::new(8).unwrap())
        );
        assert!("0".parse::<Concurrency>().is_err());
        assert!("many".parse::<Concurrency>().is_err());
    }
}
