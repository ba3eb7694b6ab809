//! Build orchestrator: task graph, cleaning and the concurrent runner

pub mod clean;
pub mod graph;
pub mod run;

pub use clean::{clean_roots, CleanResult};
pub use graph::{goal_name, AggregateRow, Plan, Task, TaskRow, TaskTable};
pub use run::{Orchestrator, PairReport, RunReport};
