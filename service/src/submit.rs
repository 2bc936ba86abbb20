use domain::model::entity::ResourceRequest;
use domain::model::vo::SubmitArgs;
use domain::service::SitePolicy;
use domain::Error;

/// Full submission arguments for one job under the given scheduler:
/// the site's fixed default for that scheduler followed by the
/// arguments computed from the resource request, space separated.
///
/// Without a site policy every job is submitted with empty arguments,
/// the degraded mode of an unconfigured install.
pub fn full_submit_args(
    policy: Option<&dyn SitePolicy>,
    scheduler: &str,
    req: &ResourceRequest,
) -> Result<SubmitArgs, Error> {
    req.validate()?;

    let Some(policy) = policy else {
        return Ok(SubmitArgs::default());
    };

    let mut fragments = Vec::with_capacity(2);
    if let Some(args) = policy.default_args(scheduler) {
        fragments.push(args);
    }
    if let Some(args) = policy.compute_args(scheduler, req)? {
        fragments.push(args);
    }
    Ok(SubmitArgs::join(fragments))
}
