use std::path::PathBuf;

use typed_builder::TypedBuilder;

/// Identity of one run's scratch directory.
///
/// The name is unique per (program, user, fingerprint, suffix), so
/// reruns with the same base inputs land in the same place and can
/// resume, while runs differing in any component never collide.
#[derive(Debug, Clone, TypedBuilder)]
pub struct WorkDirSpec {
    /// Directory the working directory is placed under.
    pub root: PathBuf,
    pub program: String,
    pub user: String,
    /// First 8 hex characters of the base-input fingerprint.
    pub fingerprint_prefix: String,
    /// Caller-chosen discriminator for simultaneous runs with the same
    /// base inputs. Empty by default.
    #[builder(default)]
    pub suffix: String,
}

impl WorkDirSpec {
    pub fn dir_name(&self) -> String {
        format!(
            "_{}_{}_{}_{}",
            self.program, self.user, self.fingerprint_prefix, self.suffix
        )
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(self.dir_name())
    }
}
