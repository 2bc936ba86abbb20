mod executor;
mod site_policy;

#[rustfmt::skip]
pub use self::{
    executor::PipelineExecutor,
    site_policy::SitePolicy,
};
