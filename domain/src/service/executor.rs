use std::path::Path;
use std::time::Duration;

use crate::error::Error;
use crate::model::vo::SubmitArgs;

/// The workflow engine this front end drives.
///
/// Implementations own task graph construction, scheduler dispatch,
/// parallelism and retries. They must create the assigned base
/// directory if it is absent.
#[async_trait::async_trait]
pub trait PipelineExecutor: Send {
    /// Assign the scratch directory the pipeline runs under.
    fn assign_base_dir(&mut self, dir: &Path);

    /// Persist a visual representation of the task graph.
    fn write_graph(&mut self) -> anyhow::Result<()>;

    /// Raise the job-completion detection timeout. Needed on schedulers
    /// that may run over networked file systems, where metadata caching
    /// can make a finished job look unfinished.
    fn raise_job_finished_timeout(&mut self, timeout: Duration);

    /// Flag a named task as requiring MPI-aware invocation.
    fn mark_task_mpi(&mut self, task: &str) -> Result<(), Error>;

    /// Attach per-task submission arguments, overriding the
    /// pipeline-wide ones for that task.
    fn set_task_submit_args(&mut self, task: &str, args: &SubmitArgs) -> Result<(), Error>;

    /// Run the pipeline to completion under the given scheduler.
    async fn run(&mut self, scheduler: &str, args: &SubmitArgs) -> anyhow::Result<()>;
}
