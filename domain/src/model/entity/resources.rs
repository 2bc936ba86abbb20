use bytesize::ByteSize;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::Error;

/// A generic resource request for one job on the cluster, either for
/// the whole pipeline or as a per-task override.
#[derive(Debug, Clone, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct ResourceRequest {
    /// Max time in seconds the job will take to run
    #[builder(default)]
    pub time: Option<u64>,
    /// Max physical memory
    #[builder(default)]
    pub mem: Option<ByteSize>,
    /// Max virtual memory
    #[builder(default)]
    pub vmem: Option<ByteSize>,
    /// Use MPI if available
    #[builder(default)]
    pub use_mpi: bool,
    /// Minimum cores to request if MPI or SMP processing is available
    #[builder(default = 1)]
    pub min_cores: u32,
    /// Maximum cores to request if MPI or SMP processing is available
    #[builder(default)]
    pub max_cores: Option<u32>,
}

impl Default for ResourceRequest {
    fn default() -> Self {
        Self {
            time: None,
            mem: None,
            vmem: None,
            use_mpi: false,
            min_cores: 1,
            max_cores: None,
        }
    }
}

impl ResourceRequest {
    /// Check internal consistency before the request is translated.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_cores < 1 {
            return Err(Error::InvalidInput("min_cores must be at least 1".into()));
        }
        if let Some(max) = self.max_cores {
            if max < self.min_cores {
                return Err(Error::InvalidInput(format!(
                    "max_cores ({max}) is below min_cores ({})",
                    self.min_cores
                )));
            }
        }
        Ok(())
    }
}
