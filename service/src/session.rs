use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use domain::model::entity::ResourceRequest;
use domain::model::vo::WorkDirSpec;
use domain::service::{PipelineExecutor, SitePolicy};
use domain::Error;
use typed_builder::TypedBuilder;

use crate::fingerprint::fingerprint;
use crate::paths::common_parent;
use crate::submit::full_submit_args;

/// Exec plugins that only ever run on the submitting host. Everything
/// else may be distributed and is subject to networked file system
/// metadata caching when polling for finished jobs.
pub const NON_DISTRIBUTED_PLUGINS: &[&str] = &["local", "debug", "multiproc"];

/// Job-completion detection timeout applied to possibly distributed
/// plugins. Too eager a check makes a finished job on networked
/// storage look unfinished and corrupts the pipeline results, so this
/// is a correctness setting, not a tuning knob.
pub const JOB_FINISHED_TIMEOUT: Duration = Duration::from_secs(60);

/// Exec plugin used when neither the command line nor the site
/// configuration selects one.
pub const DEFAULT_EXEC_PLUGIN: &str = "local";

/// The generic options every pipeline shares, parsed and already
/// merged with any site defaults.
#[derive(Debug, Clone)]
pub struct GeneralOptions {
    /// Explicit destination directory. `None` means infer it.
    pub dest_dir: Option<PathBuf>,
    /// Directory to put the working directory under. `None` means use
    /// the destination directory.
    pub wd_root: Option<PathBuf>,
    /// Suffix appended to the working directory name.
    pub wd_suffix: String,
    /// Keep the working directory even after a clean run.
    pub keep_wd: bool,
    pub exec_plugin: String,
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            dest_dir: None,
            wd_root: None,
            wd_suffix: String::new(),
            keep_wd: false,
            exec_plugin: DEFAULT_EXEC_PLUGIN.to_owned(),
        }
    }
}

/// Everything the caller supplies to set up one invocation.
#[derive(Debug, TypedBuilder)]
pub struct SessionConfig {
    /// Program name used in the working directory name.
    pub program: String,
    /// Stringified values of the options that force a full rerun when
    /// changed, in their declaration order. Absent optional values are
    /// omitted by the caller, not stringified.
    #[builder(default)]
    pub base_inputs: Vec<String>,
    /// Values of the path options the default destination is inferred
    /// from, multi-valued options already flattened. `None` means the
    /// pipeline declared no such options and the current directory is
    /// the default destination.
    #[builder(default)]
    pub dest_sources: Option<Vec<PathBuf>>,
    pub options: GeneralOptions,
}

/// One pipeline invocation.
///
/// The destination and working directories are resolved up front from
/// the parsed arguments; `run` then drives the executor and decides
/// what happens to the working directory afterwards. The working
/// directory is created by the executor and owned by this invocation.
#[derive(Debug)]
pub struct Session {
    options: GeneralOptions,
    dest_dir: PathBuf,
    working_dir: PathBuf,
}

impl Session {
    /// Resolve the destination and working directories.
    ///
    /// The explicit `--dest-dir` wins; otherwise the destination is the
    /// closest common parent of the declared path inputs, or the
    /// current directory when there are none. The working directory
    /// name is derived from the fingerprint of the base inputs, so
    /// rerunning with the same inputs targets the same directory.
    pub fn prepare(config: SessionConfig) -> Result<Self, Error> {
        let digest = fingerprint(&config.base_inputs);

        let dest_dir = match &config.options.dest_dir {
            Some(dir) => absolute(dir)?,
            None => match &config.dest_sources {
                None => current_dir()?,
                Some(sources) => {
                    let sources: Vec<PathBuf> =
                        sources.iter().map(|p| absolute(p)).collect::<Result<_, _>>()?;
                    common_parent(&sources)?
                }
            },
        };

        let user = env::var("USER").unwrap_or_else(|_| "unknown".to_owned());
        let spec = WorkDirSpec::builder()
            .root(config.options.wd_root.clone().unwrap_or_else(|| dest_dir.clone()))
            .program(config.program)
            .user(user)
            .fingerprint_prefix(digest.short())
            .suffix(config.options.wd_suffix.clone())
            .build();
        let working_dir = spec.path();

        Ok(Self {
            options: config.options,
            dest_dir,
            working_dir,
        })
    }

    /// The directory final results are stored under. Read by this
    /// layer, never created or removed.
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run the pipeline to completion.
    ///
    /// Submission arguments for the whole pipeline and for every task
    /// override are translated through the site policy first, so a bad
    /// request or an unsupported scheduler fails before anything is
    /// submitted. The working directory is removed only after a clean
    /// run without `keep_wd`; a failed run always leaves it behind and
    /// surfaces the executor's error unchanged.
    pub async fn run<E>(
        &self,
        executor: &mut E,
        policy: Option<&dyn SitePolicy>,
        pipeline_req: &ResourceRequest,
        task_reqs: &HashMap<String, ResourceRequest>,
    ) -> Result<(), Error>
    where
        E: PipelineExecutor,
    {
        let plugin = self.options.exec_plugin.as_str();

        executor.assign_base_dir(&self.working_dir);

        // Fire and forget: a missing graphviz install should not stop
        // the run.
        if let Err(e) = executor.write_graph() {
            tracing::warn!("could not write the pipeline graph: {e:#}");
        }

        if !NON_DISTRIBUTED_PLUGINS.contains(&plugin) {
            executor.raise_job_finished_timeout(JOB_FINISHED_TIMEOUT);
        }

        let pipeline_args = full_submit_args(policy, plugin, pipeline_req)?;

        for (task, req) in task_reqs {
            if req.use_mpi {
                executor.mark_task_mpi(task)?;
            }
            let args = full_submit_args(policy, plugin, req)?;
            executor.set_task_submit_args(task, &args)?;
        }

        if let Err(e) = executor.run(plugin, &pipeline_args).await {
            tracing::error!(
                working_dir = %self.working_dir.display(),
                "pipeline failed, keeping working dir for inspection: {e:#}"
            );
            return Err(Error::Execution(e));
        }

        if self.options.keep_wd {
            tracing::info!(
                working_dir = %self.working_dir.display(),
                "pipeline finished, keeping working dir as requested"
            );
        } else {
            tracing::info!(
                working_dir = %self.working_dir.display(),
                "pipeline finished, cleaning up working dir"
            );
            tokio::fs::remove_dir_all(&self.working_dir).await.map_err(Error::Cleanup)?;
        }

        Ok(())
    }
}

fn current_dir() -> Result<PathBuf, Error> {
    env::current_dir()
        .map_err(|e| Error::InvalidInput(format!("cannot resolve the current directory: {e}")))
}

fn absolute(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        Ok(path.to_owned())
    } else {
        Ok(current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use domain::model::vo::SubmitArgs;

    use super::*;

    /// In-memory stand-in for a workflow engine. Creates the assigned
    /// base directory on `run`, like a real engine would.
    #[derive(Default)]
    struct FakeExecutor {
        tasks: HashSet<String>,
        fail: bool,
        base_dir: Option<PathBuf>,
        graph_written: bool,
        timeout: Option<Duration>,
        mpi_tasks: Vec<String>,
        task_args: HashMap<String, String>,
        ran: Option<(String, String)>,
    }

    impl FakeExecutor {
        fn with_tasks(tasks: &[&str]) -> Self {
            Self {
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl PipelineExecutor for FakeExecutor {
        fn assign_base_dir(&mut self, dir: &Path) {
            self.base_dir = Some(dir.to_owned());
        }

        fn write_graph(&mut self) -> anyhow::Result<()> {
            self.graph_written = true;
            Ok(())
        }

        fn raise_job_finished_timeout(&mut self, timeout: Duration) {
            self.timeout = Some(timeout);
        }

        fn mark_task_mpi(&mut self, task: &str) -> Result<(), Error> {
            if !self.tasks.contains(task) {
                return Err(Error::TaskNotFound(task.to_owned()));
            }
            self.mpi_tasks.push(task.to_owned());
            Ok(())
        }

        fn set_task_submit_args(&mut self, task: &str, args: &SubmitArgs) -> Result<(), Error> {
            if !self.tasks.contains(task) {
                return Err(Error::TaskNotFound(task.to_owned()));
            }
            self.task_args.insert(task.to_owned(), args.as_str().to_owned());
            Ok(())
        }

        async fn run(&mut self, scheduler: &str, args: &SubmitArgs) -> anyhow::Result<()> {
            let dir = self.base_dir.as_ref().expect("base dir assigned before run");
            std::fs::create_dir_all(dir)?;
            std::fs::write(dir.join("intermediate.dat"), b"scratch")?;
            if self.fail {
                anyhow::bail!("node crashed")
            }
            self.ran = Some((scheduler.to_owned(), args.as_str().to_owned()));
            Ok(())
        }
    }

    fn session_in(root: &Path, suffix: &str) -> Session {
        let options = GeneralOptions {
            dest_dir: Some(root.to_owned()),
            wd_suffix: suffix.to_owned(),
            ..GeneralOptions::default()
        };
        Session::prepare(
            SessionConfig::builder()
                .program("align".to_owned())
                .base_inputs(vec!["sub-01".to_owned(), "/data/t1.nii.gz".to_owned()])
                .options(options)
                .build(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn clean_run_removes_the_working_dir() {
        let root = tempfile::tempdir().unwrap();
        let session = session_in(root.path(), "");
        let mut executor = FakeExecutor::default();

        session
            .run(&mut executor, None, &ResourceRequest::default(), &HashMap::new())
            .await
            .unwrap();

        assert!(executor.graph_written);
        assert_eq!(executor.ran, Some(("local".to_owned(), String::new())));
        assert!(!session.working_dir().exists());
    }

    #[tokio::test]
    async fn keep_wd_retains_the_working_dir_and_its_contents() {
        let root = tempfile::tempdir().unwrap();
        let mut session = session_in(root.path(), "");
        session.options.keep_wd = true;
        let mut executor = FakeExecutor::default();

        session
            .run(&mut executor, None, &ResourceRequest::default(), &HashMap::new())
            .await
            .unwrap();

        assert!(session.working_dir().join("intermediate.dat").exists());
    }

    #[tokio::test]
    async fn a_failed_run_preserves_the_working_dir_and_the_error() {
        let root = tempfile::tempdir().unwrap();
        let session = session_in(root.path(), "");
        let mut executor = FakeExecutor {
            fail: true,
            ..FakeExecutor::default()
        };

        let err = session
            .run(&mut executor, None, &ResourceRequest::default(), &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(&err, Error::Execution(_)));
        assert_eq!(err.to_string(), "node crashed");
        assert!(session.working_dir().exists());
    }

    #[tokio::test]
    async fn task_overrides_set_the_mpi_flag_and_the_args() {
        let root = tempfile::tempdir().unwrap();
        let session = session_in(root.path(), "");
        let mut executor = FakeExecutor::with_tasks(&["register", "smooth"]);

        let mut task_reqs = HashMap::new();
        task_reqs.insert(
            "register".to_owned(),
            ResourceRequest::builder().use_mpi(true).min_cores(4).build(),
        );
        task_reqs.insert("smooth".to_owned(), ResourceRequest::default());

        session
            .run(&mut executor, None, &ResourceRequest::default(), &task_reqs)
            .await
            .unwrap();

        assert_eq!(executor.mpi_tasks, vec!["register".to_owned()]);
        assert_eq!(executor.task_args.len(), 2);
        // No site policy: the override args are empty, the flag still applies.
        assert_eq!(executor.task_args["register"], "");
    }

    #[tokio::test]
    async fn an_unknown_task_override_fails_before_running() {
        let root = tempfile::tempdir().unwrap();
        let session = session_in(root.path(), "");
        let mut executor = FakeExecutor::with_tasks(&["register"]);

        let mut task_reqs = HashMap::new();
        task_reqs.insert("no-such-task".to_owned(), ResourceRequest::default());

        let err = session
            .run(&mut executor, None, &ResourceRequest::default(), &task_reqs)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TaskNotFound(name) if name == "no-such-task"));
        assert!(executor.ran.is_none());
    }

    #[tokio::test]
    async fn distributed_plugins_get_a_raised_job_finished_timeout() {
        let root = tempfile::tempdir().unwrap();
        let mut session = session_in(root.path(), "");
        session.options.exec_plugin = "sge".to_owned();
        let mut executor = FakeExecutor::default();

        session
            .run(&mut executor, None, &ResourceRequest::default(), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(executor.timeout, Some(JOB_FINISHED_TIMEOUT));
    }

    #[tokio::test]
    async fn single_host_plugins_keep_the_default_timeout() {
        let root = tempfile::tempdir().unwrap();
        let session = session_in(root.path(), "");
        let mut executor = FakeExecutor::default();

        session
            .run(&mut executor, None, &ResourceRequest::default(), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(executor.timeout, None);
    }

    #[test]
    fn identical_inputs_target_the_same_working_dir() {
        let root = tempfile::tempdir().unwrap();
        let a = session_in(root.path(), "");
        let b = session_in(root.path(), "");
        assert_eq!(a.working_dir(), b.working_dir());
    }

    #[test]
    fn a_suffix_makes_the_working_dirs_disjoint() {
        let root = tempfile::tempdir().unwrap();
        let a = session_in(root.path(), "");
        let b = session_in(root.path(), "second");
        assert_ne!(a.working_dir(), b.working_dir());
    }

    #[test]
    fn destination_is_inferred_from_the_source_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![dir.path().join("sub-01/anat.nii"), dir.path().join("sub-02/anat.nii")];
        let session = Session::prepare(
            SessionConfig::builder()
                .program("align".to_owned())
                .dest_sources(Some(sources))
                .options(GeneralOptions::default())
                .build(),
        )
        .unwrap();

        assert_eq!(session.dest_dir(), dir.path());
        // Without a wd root the working dir lands under the destination.
        assert!(session.working_dir().starts_with(dir.path()));
    }

    #[test]
    fn without_path_inputs_the_destination_is_the_current_dir() {
        let session = Session::prepare(
            SessionConfig::builder()
                .program("align".to_owned())
                .options(GeneralOptions::default())
                .build(),
        )
        .unwrap();
        assert_eq!(session.dest_dir(), env::current_dir().unwrap());
    }

    #[test]
    fn wd_root_overrides_the_destination_as_the_working_dir_parent() {
        let dest = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let options = GeneralOptions {
            dest_dir: Some(dest.path().to_owned()),
            wd_root: Some(scratch.path().to_owned()),
            ..GeneralOptions::default()
        };
        let session = Session::prepare(
            SessionConfig::builder()
                .program("align".to_owned())
                .options(options)
                .build(),
        )
        .unwrap();
        assert!(session.working_dir().starts_with(scratch.path()));
    }
}
