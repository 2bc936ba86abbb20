use std::path::{Path, PathBuf};

use clap::Args;
use service::session::{GeneralOptions, DEFAULT_EXEC_PLUGIN};

use crate::config::CliDefaults;

/// Options applicable to any pipeline.
///
/// Flatten this into the pipeline's own parser with
/// `#[command(flatten)]`; the pipeline-specific options live there,
/// not here.
#[derive(Debug, Clone, Args)]
pub struct GeneralOpts {
    /// The directory to store results under. Defaults to the closest
    /// common parent directory of the pipeline's input paths, or to
    /// the current working directory for pipelines without path
    /// inputs.
    #[arg(long, value_name = "PATH")]
    pub dest_dir: Option<PathBuf>,

    /// The directory to put the working directory under. Defaults to
    /// the destination directory.
    #[arg(long, value_name = "PATH")]
    pub wd_root: Option<PathBuf>,

    /// Suffix to append to the working directory name. Prevents
    /// collisions between simultaneous runs with the same base inputs.
    #[arg(long, value_name = "STRING", default_value = "")]
    pub wd_suffix: String,

    /// Don't delete the working dir, even if no errors occurred.
    #[arg(long)]
    pub keep_wd: bool,

    /// Execution plugin to run the pipeline with.
    #[arg(long, value_name = "NAME")]
    pub exec_plugin: Option<String>,
}

impl GeneralOpts {
    /// Merge in the site's CLI defaults. Explicit command line values
    /// always win over site defaults.
    pub fn resolve(self, defaults: Option<&CliDefaults>) -> GeneralOptions {
        let wd_root = self.wd_root.or_else(|| defaults.and_then(|d| d.wd_root.clone()));
        let exec_plugin = self
            .exec_plugin
            .or_else(|| defaults.and_then(|d| d.exec_plugin.clone()))
            .unwrap_or_else(|| DEFAULT_EXEC_PLUGIN.to_owned());
        GeneralOptions {
            dest_dir: self.dest_dir,
            wd_root,
            wd_suffix: self.wd_suffix,
            keep_wd: self.keep_wd,
            exec_plugin,
        }
    }
}

/// Program name as invoked, for the working directory name.
pub fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pipeline".to_owned())
}
