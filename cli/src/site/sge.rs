use domain::model::entity::ResourceRequest;
use domain::model::vo::SubmitArgs;
use domain::service::SitePolicy;
use domain::Error;
use service::session::NON_DISTRIBUTED_PLUGINS;

/// Grid Engine style argument builder: resource limits go through a
/// single `-l` flag, parallel environments through `-pe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SgePolicy;

const SUPPORTED: &[&str] = &["sge", "sge-graph"];

impl SitePolicy for SgePolicy {
    fn default_args(&self, _scheduler: &str) -> Option<SubmitArgs> {
        // Fixed defaults come from the site configuration file, not
        // from the flavor.
        None
    }

    fn compute_args(
        &self,
        scheduler: &str,
        req: &ResourceRequest,
    ) -> Result<Option<SubmitArgs>, Error> {
        if NON_DISTRIBUTED_PLUGINS.contains(&scheduler) {
            return Ok(None);
        }
        if !SUPPORTED.contains(&scheduler) {
            return Err(Error::UnsupportedScheduler(scheduler.to_owned()));
        }

        let mut fragments = Vec::new();

        let mut limits = Vec::new();
        if let Some(time) = req.time {
            limits.push(format!("h_rt={time}"));
        }
        if let Some(mem) = req.mem {
            limits.push(format!("mf={}", mem.as_u64()));
        }
        if let Some(vmem) = req.vmem {
            limits.push(format!("h_vmem={}", vmem.as_u64()));
        }
        if !limits.is_empty() {
            fragments.push(format!("-l {}", limits.join(",")));
        }

        if req.min_cores != 1 || req.max_cores.is_some() {
            let environment = if req.use_mpi { "mpi" } else { "smp" };
            let slots = match req.max_cores {
                Some(max) => format!("{}-{max}", req.min_cores),
                None => req.min_cores.to_string(),
            };
            fragments.push(format!("-pe {environment} {slots}"));
        }

        if fragments.is_empty() {
            return Ok(None);
        }
        Ok(Some(SubmitArgs::new(fragments.join(" "))))
    }
}
