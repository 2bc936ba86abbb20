use crate::error::Error;
use crate::model::entity::ResourceRequest;
use crate::model::vo::SubmitArgs;

/// Site-local knowledge about scheduler argument syntax.
///
/// Clusters differ in queues, parallel environments and mandatory
/// flags, so translation is pluggable. An install without a policy gets
/// empty submission arguments everywhere, which is a fully supported
/// mode.
pub trait SitePolicy: Send + Sync {
    /// The fixed argument string this site always passes to the given
    /// scheduler, if any.
    fn default_args(&self, scheduler: &str) -> Option<SubmitArgs>;

    /// Arguments derived from one resource request. `Ok(None)` means
    /// the policy has nothing to add for this scheduler; a scheduler
    /// the policy does not know must be an `UnsupportedScheduler`
    /// error, never a silent empty string.
    fn compute_args(
        &self,
        scheduler: &str,
        req: &ResourceRequest,
    ) -> Result<Option<SubmitArgs>, Error>;
}
