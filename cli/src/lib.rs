//! Command line front end for cluster pipeline runs.
//!
//! Pipeline authors flatten [`GeneralOpts`] into their own argument
//! parser, hand the parsed values to a [`service::Session`] and run
//! their workflow engine through it. The site configuration file
//! (selected by the `PIPECLI_SITE_CONF` environment variable) supplies
//! option defaults and scheduler argument policy for the local cluster.

pub mod config;
pub mod options;
pub mod site;
pub mod telemetry;

#[rustfmt::skip]
pub use self::{
    config::{SiteConfig, SITE_CONF_ENV},
    options::{program_name, GeneralOpts},
    site::ConfiguredPolicy,
};
