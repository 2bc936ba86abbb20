pub mod submit;
pub mod workdir;

#[rustfmt::skip]
pub use self::{
    submit::SubmitArgs,
    workdir::WorkDirSpec,
};
