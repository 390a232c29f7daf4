use domain::{AggregatedError, PipelineError, SyncError};
use tracing::error;

/// Collects per-item failures during one stage's pass over the product
/// mapping.
///
/// In fail-fast mode every failure is returned immediately; otherwise
/// failures accumulate and a single bundled error is raised after the
/// full pass. Fatal errors (rate limit, identity) always propagate
/// immediately regardless of mode. Every failure is logged the moment
/// it occurs, independent of whether it is later raised.
pub struct ErrorAggregator {
    fail_fast: bool,
    failures: Vec<SyncError>,
}

impl ErrorAggregator {
    pub fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            failures: Vec::new(),
        }
    }

    /// Record one failure. Returns `Err` when the pass must stop.
    pub fn collect(&mut self, err: SyncError) -> Result<(), PipelineError> {
        error!("{err}");

        if err.is_fatal() || self.fail_fast {
            return Err(PipelineError::Fatal(err));
        }

        self.failures.push(err);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// End-of-pass decision: raise the bundle iff anything was recorded.
    pub fn finish(self) -> Result<(), PipelineError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Aggregated(AggregatedError::new(
                self.failures,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(product: &str) -> SyncError {
        SyncError::RepoNotFound {
            product: product.to_string(),
        }
    }

    #[test]
    fn test_accumulates_and_bundles_in_order() {
        let mut report = ErrorAggregator::new(false);
        report.collect(not_found("a")).unwrap();
        report.collect(not_found("b")).unwrap();

        let err = report.finish().unwrap_err();
        match err {
            PipelineError::Aggregated(agg) => {
                assert_eq!(agg.count(), 2);
                assert_eq!(agg.failures[0], not_found("a"));
                assert_eq!(agg.failures[1], not_found("b"));
            }
            other => panic!("expected aggregated error, got {other:?}"),
        }
    }

    #[test]
    fn test_finish_is_ok_without_failures() {
        let report = ErrorAggregator::new(false);
        assert!(report.finish().is_ok());
    }

    #[test]
    fn test_fail_fast_raises_first_failure() {
        let mut report = ErrorAggregator::new(true);
        let err = report.collect(not_found("a")).unwrap_err();
        assert!(matches!(err, PipelineError::Fatal(SyncError::RepoNotFound { .. })));
    }

    #[test]
    fn test_rate_limit_raises_even_without_fail_fast() {
        let mut report = ErrorAggregator::new(false);
        let err = report
            .collect(SyncError::RateLimit {
                message: "throttled".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::Fatal(SyncError::RateLimit { .. })));
    }
}
