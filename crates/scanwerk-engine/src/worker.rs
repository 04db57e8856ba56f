// SPDX-License-Identifier: MIT
//
// Background worker — runs one job to completion on the blocking thread
// pool and reports back over a channel.
//
// The pipeline is CPU-bound, so the job body runs via
// `tokio::task::spawn_blocking` rather than on the async worker threads.
// Progress and the final outcome travel through an unbounded mpsc channel;
// the submitting side (typically a UI or CLI event loop) holds only the
// receiver and never shares mutable state with the running job.

use std::path::PathBuf;

use scanwerk_core::types::{JobId, Progress, ScanJob};
use tokio::sync::mpsc;
use tracing::{info, instrument};

use crate::job::convert_job;

/// Messages emitted by a running job, in order: zero or more `Progress`
/// events followed by exactly one `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// A page finished processing.
    Progress(Progress),
    /// The whole job succeeded and the artifact was written.
    Completed { output_path: PathBuf },
    /// The job failed; no output artifact was produced.
    Failed { error: String },
}

/// Handle to a submitted job: its id plus the event stream.
pub struct JobHandle {
    pub job_id: JobId,
    events: mpsc::UnboundedReceiver<JobEvent>,
}

impl JobHandle {
    /// Await the next event. Returns `None` once the terminal event has
    /// been consumed and the worker is gone.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }
}

/// Submit a job to a dedicated worker.
///
/// Must be called within a Tokio runtime. Each submission gets its own
/// blocking task and its own channel; jobs share nothing with one another.
#[instrument(skip(job), fields(job_id = %job.id))]
pub fn submit(job: ScanJob) -> JobHandle {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let job_id = job.id;

    tokio::task::spawn_blocking(move || {
        let progress_tx = events_tx.clone();
        let result = convert_job(&job, move |progress| {
            // A dropped receiver just means nobody is watching anymore;
            // the job still runs to completion.
            let _ = progress_tx.send(JobEvent::Progress(progress));
        });

        let terminal = match result {
            Ok(output_path) => JobEvent::Completed { output_path },
            Err(err) => JobEvent::Failed {
                error: err.to_string(),
            },
        };
        let _ = events_tx.send(terminal);
    });

    info!("job submitted to worker");
    JobHandle {
        job_id,
        events: events_rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use scanwerk_core::config::ScanConfig;
    use scanwerk_core::types::JobInput;

    /// End-to-end through the worker: one photo in, progress + completion
    /// out, artifact on disk.
    #[tokio::test]
    async fn worker_reports_progress_then_completion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let photo_path = dir.path().join("page.png");
        let output_path = dir.path().join("page_scanned.pdf");

        let photo = RgbImage::from_pixel(200, 260, Rgb([45, 45, 50]));
        photo.save(&photo_path).expect("write test photo");

        let job = ScanJob::new(
            JobInput::Images(vec![photo_path]),
            output_path.clone(),
            ScanConfig::default(),
        );
        let mut handle = submit(job);

        let mut progress = Vec::new();
        let mut completed = None;
        while let Some(event) = handle.next_event().await {
            match event {
                JobEvent::Progress(p) => progress.push(p),
                JobEvent::Completed { output_path } => completed = Some(output_path),
                JobEvent::Failed { error } => panic!("job failed: {error}"),
            }
        }

        assert_eq!(progress, vec![Progress { current: 1, total: 1 }]);
        let written = completed.expect("job must complete");
        assert_eq!(written, output_path);
        let bytes = std::fs::read(&written).expect("artifact readable");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn worker_reports_failure_for_empty_job() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output_path = dir.path().join("never.pdf");

        let job = ScanJob::new(
            JobInput::Images(vec![]),
            output_path.clone(),
            ScanConfig::default(),
        );
        let mut handle = submit(job);

        let mut failed = false;
        while let Some(event) = handle.next_event().await {
            match event {
                JobEvent::Failed { .. } => failed = true,
                JobEvent::Progress(_) => panic!("empty job must not report progress"),
                JobEvent::Completed { .. } => panic!("empty job must not complete"),
            }
        }

        assert!(failed);
        assert!(!output_path.exists());
    }
}
