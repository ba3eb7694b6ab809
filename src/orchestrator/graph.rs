//! Task graph
//!
//! Every per-application task depends on `clean`; aggregate tasks are the
//! conjunction of per-application tasks:
//!
//! ```text
//! clean
//! ├── build:dev-<app> / build:debug-<app> / build:e2e-<app>
//! ├── build:concat-<app>   ── build:concat = all apps
//! └── dist:<app>           ── dist = all apps
//! build = build:dev + build:debug + build:e2e + build:concat
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ProjectLayout;
use crate::domain::Variant;
use crate::error::{BuildError, BuildResult};

/// One (application, variant) pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Task {
    pub app: String,
    pub variant: Variant,
}

impl Task {
    pub fn new(app: impl Into<String>, variant: Variant) -> Self {
        Self {
            app: app.into(),
            variant,
        }
    }

    pub fn name(&self) -> String {
        self.variant.task_name(&self.app)
    }
}

/// Name of the task that runs `variants` for every application (or one)
pub fn goal_name(variants: &[Variant], app: Option<&str>) -> String {
    match (variants, app) {
        ([variant], Some(app)) => variant.task_name(app),
        ([Variant::Distribution], None) => "dist".to_string(),
        ([variant], None) => format!("build:{}", variant.name()),
        (_, Some(app)) => format!("build-{app}"),
        (_, None) => "build".to_string(),
    }
}

/// The tasks one invocation runs
#[derive(Debug, Clone)]
pub struct Plan {
    pub name: String,
    pub tasks: Vec<Task>,
    /// Roots deleted by the `clean` dependency before any task starts
    pub clean_roots: Vec<PathBuf>,
    pub dest: Option<PathBuf>,
}

impl Plan {
    /// Plan `variants` for every declared application, or only `app`.
    pub fn new(
        layout: &ProjectLayout,
        variants: &[Variant],
        app: Option<&str>,
        dest: Option<&Path>,
    ) -> BuildResult<Self> {
        if let Some(dest) = dest {
            layout.check_dest(dest)?;
        }
        let apps: Vec<&str> = match app {
            Some(app) => vec![layout.app(app)?.name.as_str()],
            None => layout.app_names(),
        };

        let mut tasks: Vec<Task> = variants
            .iter()
            .flat_map(|variant| apps.iter().map(move |app| Task::new(*app, *variant)))
            .collect();
        tasks.sort();
        tasks.dedup();

        let mut owners: BTreeMap<PathBuf, &Task> = BTreeMap::new();
        for task in &tasks {
            let output = layout.pair_output(&task.app, task.variant, dest);
            if let Some(first) = owners.insert(output.clone(), task) {
                return Err(BuildError::SharedOutput {
                    path: output,
                    first: first.name(),
                    second: task.name(),
                });
            }
        }

        Ok(Self {
            name: goal_name(variants, app),
            tasks,
            clean_roots: layout.output_roots(dest),
            dest: dest.map(Path::to_path_buf),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A row of the task table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub task: String,
    pub app: String,
    pub variant: Variant,
    pub output: PathBuf,
    pub depends_on: Vec<String>,
}

/// An aggregate task and the per-application tasks it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub task: String,
    pub runs: Vec<String>,
}

/// The full (application, variant) table
#[derive(Debug, Clone, Serialize)]
pub struct TaskTable {
    pub tasks: Vec<TaskRow>,
    pub aggregates: Vec<AggregateRow>,
}

impl TaskTable {
    pub fn from_layout(layout: &ProjectLayout, dest: Option<&Path>) -> Self {
        let apps = layout.app_names();
        let tasks = Variant::ALL
            .iter()
            .flat_map(|variant| {
                apps.iter().map(move |app| TaskRow {
                    task: variant.task_name(app),
                    app: app.to_string(),
                    variant: *variant,
                    output: layout.pair_output(app, *variant, dest),
                    depends_on: vec!["clean".to_string()],
                })
            })
            .collect();

        let per_app = |variants: &[Variant]| -> Vec<String> {
            variants
                .iter()
                .flat_map(|v| apps.iter().map(move |app| v.task_name(app)))
                .collect()
        };
        let mut aggregates: Vec<AggregateRow> = Variant::BUILD
            .iter()
            .map(|variant| AggregateRow {
                task: goal_name(&[*variant], None),
                runs: per_app(&[*variant]),
            })
            .collect();
        aggregates.push(AggregateRow {
            task: goal_name(&Variant::BUILD, None),
            runs: Variant::BUILD
                .iter()
                .map(|v| goal_name(&[*v], None))
                .collect(),
        });
        aggregates.push(AggregateRow {
            task: goal_name(&[Variant::Distribution], None),
            runs: per_app(&[Variant::Distribution]),
        });

        Self { tasks, aggregates }
    }
}
