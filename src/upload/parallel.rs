//! Fixed-size worker pool for manifest uploads
//!
//! Jobs go into one queue shared by all workers; every worker reports one
//! [`UploadOutcome`] per job on a results queue. A failed upload never stops
//! the others, and [`ParallelUploader::run`] returns only after every worker
//! has drained the queue.

use crate::common::ManifestRegistry;
use crate::error::{RetagError, Result};
use crate::logging::Logger;
use crate::upload::{UploadJob, UploadOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, Receiver, Sender};

pub struct ParallelUploader<R: ?Sized> {
    registry: Arc<R>,
    max_workers: usize,
    output: Logger,
}

impl<R> ParallelUploader<R>
where
    R: ManifestRegistry + ?Sized + 'static,
{
    pub fn new(registry: Arc<R>, max_workers: usize, output: Logger) -> Self {
        Self {
            registry,
            max_workers: max_workers.max(1),
            output,
        }
    }

    /// Workers needed for `jobs` jobs, bounded by the configured cap
    pub fn worker_count(&self, jobs: usize) -> usize {
        self.max_workers.min(jobs)
    }

    /// Publish every job and return the outcomes in the order they arrived
    pub async fn run(&self, jobs: Vec<UploadJob>) -> Result<Vec<UploadOutcome>> {
        let total = jobs.len();
        let workers = self.worker_count(total);
        if workers == 0 {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        self.output.detail(&format!(
            "Publishing {} manifests with {} workers",
            total, workers
        ));

        let (job_tx, job_rx) = mpsc::channel::<UploadJob>(total);
        let (result_tx, mut result_rx) = mpsc::channel::<UploadOutcome>(total);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                tokio::spawn(upload_worker(
                    worker_id,
                    Arc::clone(&self.registry),
                    Arc::clone(&job_rx),
                    result_tx.clone(),
                    self.output.clone(),
                ))
            })
            .collect();
        // Only workers hold result senders now, so the results queue closes with them
        drop(result_tx);

        for job in jobs {
            job_tx.send(job).await.map_err(|_| {
                RetagError::Worker("upload workers exited before all jobs were queued".to_string())
            })?;
        }
        drop(job_tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
        }

        for handle in handles {
            handle.await?;
        }

        if outcomes.len() != total {
            return Err(RetagError::Worker(format!(
                "expected {} upload outcomes, received {}",
                total,
                outcomes.len()
            )));
        }

        self.output.detail(&format!(
            "{} manifest uploads finished in {:.2}s",
            total,
            start_time.elapsed().as_secs_f64()
        ));
        Ok(outcomes)
    }
}

async fn upload_worker<R>(
    worker_id: usize,
    registry: Arc<R>,
    jobs: Arc<Mutex<Receiver<UploadJob>>>,
    results: Sender<UploadOutcome>,
    output: Logger,
) where
    R: ManifestRegistry + ?Sized,
{
    loop {
        let job = {
            let mut queue = jobs.lock().await;
            queue.recv().await
        };
        let Some(job) = job else {
            break;
        };

        output.trace(&format!("worker-{} publishing {}", worker_id, job.target));
        let result = registry.publish_manifest(&job.target, &job.manifest).await;

        if results
            .send(UploadOutcome {
                target: job.target,
                result,
            })
            .await
            .is_err()
        {
            break;
        }
    }
}
