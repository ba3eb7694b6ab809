//! Watch loop: initial build, then rebuild on change

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{AccessKind, AccessMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{BuildError, BuildResult};
use crate::orchestrator::{Orchestrator, Plan};

use super::event::{PendingChanges, WatchEvent, WatchOptions};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Build once, then rebuild every planned pair on any change under the
/// source root until `running` is cleared.
///
/// The watcher is registered before the initial build, so edits made while
/// it runs are picked up by the first follow-up rebuild. Rebuilds never
/// overlap. A cleaning or other filesystem failure ends the session; any
/// other failure is reported and the session continues.
pub async fn watch(
    orchestrator: Arc<Orchestrator>,
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> BuildResult<()> {
    let plan = orchestrator.plan(&options.variants, None, options.dest.as_deref())?;

    let (tx, mut rx) = mpsc::channel::<PathBuf>(256);
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if is_change(&event.kind) {
                    for path in event.paths {
                        let _ = tx.blocking_send(path);
                    }
                }
            }
        },
        Config::default(),
    )
    .map_err(|e| BuildError::Watch(e.to_string()))?;
    watcher
        .watch(&options.source, RecursiveMode::Recursive)
        .map_err(|e| BuildError::Watch(e.to_string()))?;

    event_callback(WatchEvent::WatchStarted {
        source: options.source.display().to_string(),
        tasks: plan.tasks.len(),
    });
    rebuild(&orchestrator, &plan, 0, &event_callback).await?;

    let mut pending = PendingChanges::new(&options.source);
    while running.load(Ordering::SeqCst) {
        match tokio::time::timeout(POLL_INTERVAL, rx.recv()).await {
            Ok(Some(path)) => {
                pending.record(&path);
                tracing::trace!(path = %path.display(), pending = pending.len(), "change recorded");
            }
            Ok(None) => break,
            Err(_) => {}
        }
        // Take everything already queued before deciding the batch is quiet.
        while let Ok(path) = rx.try_recv() {
            pending.record(&path);
        }

        if let Some(changes) = pending.settle() {
            for path in &changes {
                event_callback(WatchEvent::FileChanged { path: path.clone() });
            }
            rebuild(&orchestrator, &plan, changes.len(), &event_callback).await?;
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

async fn rebuild(
    orchestrator: &Orchestrator,
    plan: &Plan,
    changes: usize,
    callback: &impl Fn(WatchEvent),
) -> BuildResult<()> {
    callback(WatchEvent::RebuildStarted {
        plan: plan.name.clone(),
        changes,
    });

    let report = match orchestrator.run(plan).await {
        Ok(report) => report,
        Err(e) => {
            callback(WatchEvent::Error {
                message: e.to_string(),
            });
            return Err(e);
        }
    };

    for pair in report.failed() {
        if let Some(e) = pair.error() {
            callback(WatchEvent::Error {
                message: e.to_string(),
            });
        }
    }
    callback(WatchEvent::RebuildComplete {
        succeeded: report.succeeded(),
        failed: report.pairs.len() - report.succeeded(),
    });

    match report.fatal_error() {
        Some(fatal) => Err(BuildError::Watch(format!("stopping after fatal error: {fatal}"))),
        None => Ok(()),
    }
}

/// Content or tree changes; plain reads are ignored so a build reading
/// its sources never triggers itself.
pub(crate) fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        _ => false,
    }
}
