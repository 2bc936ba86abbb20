pub mod fingerprint;
pub mod paths;
pub mod session;
pub mod submit;

#[rustfmt::skip]
pub use self::{
    fingerprint::{fingerprint, Fingerprint},
    paths::common_parent,
    session::{GeneralOptions, Session, SessionConfig},
    submit::full_submit_args,
};
