mod sge;

pub use self::sge::SgePolicy;

use std::collections::HashMap;

use domain::model::entity::ResourceRequest;
use domain::model::vo::SubmitArgs;
use domain::service::SitePolicy;
use domain::Error;

use crate::config::SiteConfig;

/// Site policy assembled from the configuration file: a fixed
/// per-scheduler default plus an optional built-in computed flavor.
pub struct ConfiguredPolicy {
    defaults: HashMap<String, String>,
    flavor: Option<Box<dyn SitePolicy>>,
}

impl ConfiguredPolicy {
    pub fn from_config(config: &SiteConfig) -> anyhow::Result<Self> {
        let flavor: Option<Box<dyn SitePolicy>> = match config.policy.as_deref() {
            None => None,
            Some("sge") => Some(Box::new(SgePolicy)),
            Some(other) => anyhow::bail!("unknown site policy `{other}`"),
        };
        Ok(Self {
            defaults: config.default_submit_args.clone(),
            flavor,
        })
    }
}

impl SitePolicy for ConfiguredPolicy {
    fn default_args(&self, scheduler: &str) -> Option<SubmitArgs> {
        self.defaults.get(scheduler).map(|args| SubmitArgs::new(args.as_str()))
    }

    fn compute_args(
        &self,
        scheduler: &str,
        req: &ResourceRequest,
    ) -> Result<Option<SubmitArgs>, Error> {
        match &self.flavor {
            Some(flavor) => flavor.compute_args(scheduler, req),
            None => Ok(None),
        }
    }
}

/// Load the site configuration and build its policy, if the
/// environment selects one.
pub fn load() -> anyhow::Result<Option<(SiteConfig, ConfiguredPolicy)>> {
    let Some(conf) = SiteConfig::load()? else {
        return Ok(None);
    };
    let policy = ConfiguredPolicy::from_config(&conf)?;
    Ok(Some((conf, policy)))
}
