use std::fmt;

/// Digest of the base-input values that identify one logical run.
///
/// Two invocations with identical values for exactly the base input
/// options produce identical fingerprints, regardless of any other
/// argument differences, so they share a working directory and an
/// interrupted run can be resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    /// Full lowercase hex form.
    pub fn hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    /// The 8 hex characters used in working directory names.
    pub fn short(&self) -> String {
        self.hex()[..8].to_owned()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Hash the ordered, stringified base-input values.
///
/// Values are concatenated without a separator. The engine does not
/// inspect option names; callers must pass the values in the declared
/// order of their base input options and keep that order stable across
/// releases.
pub fn fingerprint<I>(values: I) -> Fingerprint
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut hasher = blake3::Hasher::new();
    for value in values {
        hasher.update(value.as_ref().as_bytes());
    }
    Fingerprint(hasher.finalize())
}
