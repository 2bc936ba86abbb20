/// Errors surfaced by the pipeline front end. Nothing here is retried
/// or suppressed; retry policy, if any, belongs to the executor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The configured site policy does not know this scheduler. A
    /// configured site must be explicit about what it supports instead
    /// of silently producing empty submission arguments.
    #[error("scheduler `{0}` is not supported by the site policy")]
    UnsupportedScheduler(String),

    /// A per-task resource override names a task absent from the
    /// pipeline graph.
    #[error("no task named `{0}` in the pipeline")]
    TaskNotFound(String),

    /// The executor's run call failed. The working directory is kept
    /// so partial results can be inspected.
    #[error(transparent)]
    Execution(#[from] anyhow::Error),

    /// Working directory removal failed after a clean run.
    #[error("failed to clean up working dir: {0}")]
    Cleanup(#[source] std::io::Error),
}
