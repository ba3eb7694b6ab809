//! Concurrent runner
//!
//! Cleaning completes before any pipeline starts; pipelines of independent
//! pairs then run as tasks of one `JoinSet`. Runs are serialized: a second
//! `run` waits for the first to finish.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::config::ProjectLayout;
use crate::domain::Variant;
use crate::error::{BuildError, BuildResult};
use crate::pipeline::{Collaborators, Pipeline, PipelineOutput, Stage};

use super::clean::{clean_roots, CleanResult};
use super::graph::{Plan, Task};

/// Outcome of one (application, variant) pair
#[derive(Debug)]
pub struct PairReport {
    pub task: Task,
    pub elapsed: Duration,
    pub outcome: BuildResult<PipelineOutput>,
}

impl PairReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&BuildError> {
        self.outcome.as_ref().err()
    }

    /// Final state of the pair
    pub fn stage(&self) -> Stage {
        if self.is_success() {
            Stage::Done
        } else {
            Stage::Failed
        }
    }
}

/// Outcome of one invocation
#[derive(Debug)]
pub struct RunReport {
    pub plan: String,
    pub cleaned: CleanResult,
    /// Sorted by task
    pub pairs: Vec<PairReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.pairs.iter().all(PairReport::is_success)
    }

    pub fn succeeded(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PairReport> {
        self.pairs.iter().filter(|p| !p.is_success())
    }

    /// First failure that must stop a long-running session
    pub fn fatal_error(&self) -> Option<&BuildError> {
        self.failed()
            .filter_map(PairReport::error)
            .find(|e| e.is_fatal())
    }
}

pub struct Orchestrator {
    pipeline: Pipeline,
    running: Mutex<()>,
}

impl Orchestrator {
    pub fn new(layout: Arc<ProjectLayout>, collaborators: Collaborators) -> Self {
        Self {
            pipeline: Pipeline::new(layout, collaborators),
            running: Mutex::new(()),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        self.pipeline.layout()
    }

    /// Plan `variants` for every application, or only `app`.
    pub fn plan(
        &self,
        variants: &[Variant],
        app: Option<&str>,
        dest: Option<&Path>,
    ) -> BuildResult<Plan> {
        Plan::new(self.layout(), variants, app, dest)
    }

    /// Delete every configured output root and the destination override.
    pub async fn clean(&self, dest: Option<&Path>) -> BuildResult<CleanResult> {
        let _guard = self.running.lock().await;
        if let Some(dest) = dest {
            self.layout().check_dest(dest)?;
        }
        clean_roots(&self.layout().output_roots(dest)).await
    }

    /// Clean, then run every task of `plan` concurrently.
    ///
    /// A cleaning failure aborts the invocation before any task starts.
    /// Task failures are reported per pair and do not stop siblings.
    pub async fn run(&self, plan: &Plan) -> BuildResult<RunReport> {
        let _guard = self.running.lock().await;
        let started = Instant::now();
        tracing::info!(plan = %plan.name, tasks = plan.tasks.len(), "run started");

        tracing::debug!(plan = %plan.name, stage = %Stage::Cleaning, roots = plan.clean_roots.len());
        let cleaned = clean_roots(&plan.clean_roots).await?;

        let mut set = JoinSet::new();
        for task in plan.tasks.iter().cloned() {
            let pipeline = self.pipeline.clone();
            let dest = plan.dest.clone();
            set.spawn(async move {
                let started = Instant::now();
                let outcome = pipeline.run(&task.app, task.variant, dest.as_deref()).await;
                PairReport {
                    task,
                    elapsed: started.elapsed(),
                    outcome,
                }
            });
        }

        let mut pairs = Vec::with_capacity(plan.tasks.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(report) => pairs.push(report),
                Err(e) => return Err(BuildError::Io(std::io::Error::other(e.to_string()))),
            }
        }
        pairs.sort_by(|a, b| a.task.cmp(&b.task));

        let report = RunReport {
            plan: plan.name.clone(),
            cleaned,
            pairs,
        };
        tracing::info!(
            plan = %plan.name,
            succeeded = report.succeeded(),
            failed = report.pairs.len() - report.succeeded(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(report)
    }
}
