use std::fmt;

/// Scheduler-syntax submission arguments. The text is opaque to this
/// layer; only the scheduler and the site policy that produced it know
/// its structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitArgs(String);

impl SubmitArgs {
    pub fn new(args: impl Into<String>) -> Self {
        Self(args.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join non-empty fragments with a single space.
    pub fn join(fragments: impl IntoIterator<Item = SubmitArgs>) -> Self {
        let parts: Vec<String> =
            fragments.into_iter().filter(|f| !f.is_empty()).map(|f| f.0).collect();
        Self(parts.join(" "))
    }
}

impl fmt::Display for SubmitArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
