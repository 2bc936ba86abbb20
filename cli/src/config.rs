use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming the site configuration file. Unset or
/// empty disables site-specific behavior entirely.
pub const SITE_CONF_ENV: &str = "PIPECLI_SITE_CONF";

/// Site-local configuration, loaded once at process start and
/// read-only afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Default values for the general command line options.
    #[serde(default)]
    pub cli_defaults: CliDefaults,

    /// Fixed submission arguments per scheduler, e.g. `sge: "-b n"`.
    #[serde(default)]
    pub default_submit_args: HashMap<String, String>,

    /// Name of the built-in computed-argument policy, e.g. `sge`.
    /// Absent means the site only supplies fixed defaults.
    #[serde(default)]
    pub policy: Option<String>,
}

/// Site defaults for the generic options, merged under explicit
/// command line values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliDefaults {
    #[serde(default)]
    pub wd_root: Option<PathBuf>,

    #[serde(default)]
    pub exec_plugin: Option<String>,
}

impl SiteConfig {
    /// Load the configuration file named by `PIPECLI_SITE_CONF`, if
    /// the variable selects one.
    pub fn load() -> anyhow::Result<Option<Self>> {
        match env::var(SITE_CONF_ENV) {
            Ok(path) if !path.is_empty() => Ok(Some(Self::load_from(&path)?)),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let conf = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("failed to read site config {path}"))?;
        conf.try_deserialize()
            .with_context(|| format!("malformed site config {path}"))
    }
}
