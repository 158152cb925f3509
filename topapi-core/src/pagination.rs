//! Full-pagination orchestration for list operations.
//!
//! [`ApiRequest::get_all`] retrieves every page of a list operation without
//! the caller managing concurrency or retries. Page 1 is fetched
//! synchronously and sizes the run; the remaining pages fan out to tasks
//! gated by a per-call semaphore; failed pages move to a serialized retry
//! worker; a single collector task owns the aggregate.
//!
//! The aggregate is assembled in completion order. Callers get exactly one
//! document per page but must not assume page-number ordering.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::auth::Params;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::request::ApiRequest;

/// Default bound on concurrently in-flight fan-out fetches.
pub const DEFAULT_MAX_WORKERS: usize = 10;
/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Retry behavior for pages that fail after the bootstrap stage.
///
/// The default is unlimited attempts with no delay: a failed page never
/// surfaces to the caller, and a permanently dead endpoint stalls the call
/// forever. Bounded policies cap the attempts and surface the final error
/// from `get_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts per failed page; `None` retries until success.
    pub max_attempts: Option<u32>,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Retry until success, immediately. The default.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_attempts: None,
            delay: Duration::ZERO,
        }
    }

    /// Retry at most `max_attempts` times, waiting `delay` between attempts.
    #[must_use]
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Pagination settings carried by an [`ApiRequest`].
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Fan-out concurrency bound. Scoped per `get_all` call.
    pub max_workers: usize,
    /// Parameter key carrying the 1-based page number.
    pub page_no_key: String,
    /// Parameter key carrying the page size.
    pub page_size_key: String,
    /// Retry policy for failed pages.
    pub retry: RetryPolicy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            page_no_key: "page_no".to_string(),
            page_size_key: "page_size".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PaginationConfig {
    /// Overrides the fan-out concurrency bound.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Overrides the page parameter keys (some endpoint families use
    /// `page_index` instead of `page_no`).
    #[must_use]
    pub fn with_page_keys(
        mut self,
        page_no_key: impl Into<String>,
        page_size_key: impl Into<String>,
    ) -> Self {
        self.page_no_key = page_no_key.into();
        self.page_size_key = page_size_key.into();
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// One page fetch travelling through the fan-out and retry stages.
#[derive(Debug, Clone)]
struct PageTask {
    page_no: u64,
    params: Params,
}

impl PageTask {
    /// Copies the base parameters with the page fields substituted.
    fn new(base: &Params, config: &PaginationConfig, page_no: u64, page_size: u64) -> Self {
        let mut params = base.clone();
        params.insert(config.page_no_key.clone(), page_no.to_string());
        params.insert(config.page_size_key.clone(), page_size.to_string());
        Self { page_no, params }
    }
}

impl ApiRequest {
    /// Fetches every page of a list operation and returns one document per
    /// page, in completion order.
    ///
    /// `parse_total` reads the total item count from page 1's document;
    /// an unresolvable count is treated as 0, and zero pages is reported as
    /// [`Error::NotFound`] rather than an empty success.
    ///
    /// Failure semantics: only the page-1 fetch error and the zero-total
    /// case surface. Later pages are retried per the configured
    /// [`RetryPolicy`]; under the default unlimited policy their failures
    /// never surface, and a permanently unavailable endpoint blocks the call
    /// indefinitely.
    ///
    /// # Errors
    ///
    /// - Any error from the page-1 fetch, unmodified.
    /// - [`Error::NotFound`] when the total resolves to zero pages.
    /// - With a bounded retry policy, the last error of a page whose
    ///   attempts were exhausted.
    pub async fn get_all<F>(
        &self,
        operation: &str,
        params: &Params,
        page_size: u64,
        parse_total: F,
    ) -> Result<Vec<Document>>
    where
        F: Fn(&Document) -> Option<u64>,
    {
        let config = self.pagination().clone();
        let page_size = page_size.max(1);

        // Bootstrap: page 1 gates everything, its error aborts the call.
        let first = PageTask::new(params, &config, 1, page_size);
        let first_doc = self.get(operation, &first.params).await?;

        let total = parse_total(&first_doc).unwrap_or(0);
        let page_count = total.div_ceil(page_size);
        if page_count == 0 {
            return Err(Error::not_found(format!(
                "operation {operation} matched no items"
            )));
        }
        debug!(operation, total, page_count, "pagination sized");

        // Single collector owns the aggregate; pages land in completion
        // order.
        let (doc_tx, mut doc_rx) = mpsc::unbounded_channel::<Document>();
        let collector = tokio::spawn(async move {
            let mut pages = vec![first_doc];
            while let Some(doc) = doc_rx.recv().await {
                pages.push(doc);
            }
            pages
        });

        // Serialized retry path: failed pages re-fetch one at a time,
        // outside the fan-out concurrency bound.
        let (failed_tx, mut failed_rx) = mpsc::unbounded_channel::<PageTask>();
        let retry_worker = {
            let req = self.clone();
            let operation = operation.to_string();
            let policy = config.retry.clone();
            let doc_tx = doc_tx.clone();
            tokio::spawn(async move {
                let mut exhausted: Option<Error> = None;
                while let Some(task) = failed_rx.recv().await {
                    match retry_page(&req, &operation, &task, &policy).await {
                        Ok(doc) => {
                            let _ = doc_tx.send(doc);
                        }
                        Err(err) => {
                            warn!(
                                page_no = task.page_no,
                                error = %err,
                                "page retries exhausted"
                            );
                            exhausted.get_or_insert(err);
                        }
                    }
                }
                match exhausted {
                    None => Ok(()),
                    Some(err) => Err(err),
                }
            })
        };

        // Fan out pages 2..=page_count under a per-call concurrency bound.
        let semaphore = Arc::new(Semaphore::new(config.max_workers.max(1)));
        let mut handles = Vec::with_capacity((page_count - 1) as usize);
        for page_no in 2..=page_count {
            let task = PageTask::new(params, &config, page_no, page_size);
            let req = self.clone();
            let operation = operation.to_string();
            let semaphore = Arc::clone(&semaphore);
            let doc_tx = doc_tx.clone();
            let failed_tx = failed_tx.clone();

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquisition cannot fail.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("pagination semaphore closed");
                match req.get(&operation, &task.params).await {
                    Ok(doc) => {
                        let _ = doc_tx.send(doc);
                    }
                    Err(err) => {
                        warn!(
                            page_no = task.page_no,
                            error = %err,
                            "page fetch failed, queueing for retry"
                        );
                        let _ = failed_tx.send(task);
                    }
                }
            }));
        }
        drop(doc_tx);
        drop(failed_tx);

        // Join: every fan-out task has either delivered its document or
        // handed it to the retry path...
        for handle in handles {
            handle.await.map_err(Error::task)?;
        }
        // ...then the retry queue drains (its senders are gone)...
        retry_worker.await.map_err(Error::task)??;
        // ...and the collector sees its channel close.
        let pages = collector.await.map_err(Error::task)?;

        debug!(operation, pages = pages.len(), "pagination complete");
        Ok(pages)
    }
}

/// Re-fetches one failed page until it succeeds or the policy gives out.
async fn retry_page(
    req: &ApiRequest,
    operation: &str,
    task: &PageTask,
    policy: &RetryPolicy,
) -> Result<Document> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        info!(page_no = task.page_no, attempt, "retrying page fetch");
        match req.get(operation, &task.params).await {
            Ok(doc) => {
                info!(page_no = task.page_no, attempt, "page retry succeeded");
                return Ok(doc);
            }
            Err(err) => {
                warn!(
                    page_no = task.page_no,
                    attempt,
                    error = %err,
                    "page retry failed"
                );
                if let Some(max_attempts) = policy.max_attempts
                    && attempt >= max_attempts
                {
                    return Err(err);
                }
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default_is_unlimited() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.delay, Duration::ZERO);
    }

    #[test]
    fn test_pagination_config_default() {
        let config = PaginationConfig::default();
        assert_eq!(config.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(config.page_no_key, "page_no");
        assert_eq!(config.page_size_key, "page_size");
        assert_eq!(config.retry, RetryPolicy::unlimited());
    }

    #[test]
    fn test_pagination_config_overrides() {
        let config = PaginationConfig::default()
            .with_max_workers(0)
            .with_page_keys("page_index", "page_size")
            .with_retry(RetryPolicy::bounded(3, Duration::from_millis(50)));
        // a zero bound is clamped, never a stalled pool
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.page_no_key, "page_index");
        assert_eq!(config.retry.max_attempts, Some(3));
    }

    #[test]
    fn test_page_task_substitutes_page_fields() {
        let mut base = Params::new();
        base.insert("fields".to_string(), "tid".to_string());
        base.insert("page_no".to_string(), "1".to_string());

        let config = PaginationConfig::default();
        let task = PageTask::new(&base, &config, 7, 100);
        assert_eq!(task.page_no, 7);
        assert_eq!(task.params["page_no"], "7");
        assert_eq!(task.params["page_size"], "100");
        assert_eq!(task.params["fields"], "tid");
        // the copy is independent of the base set
        assert_eq!(base["page_no"], "1");
    }
}
