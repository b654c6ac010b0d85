//! Update policy: which kinds of version bumps count as an acceptable update

/// Minimum significance of change the caller is willing to accept.
///
/// Flags are cumulative once normalized with [`UpdatePolicy::effective`]:
/// `major` implies `minor`, and `minor` implies `patch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub major: bool,
    pub minor: bool,
    pub patch: bool,
}

impl UpdatePolicy {
    pub fn new(major: bool, minor: bool, patch: bool) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major() -> Self {
        Self::new(true, false, false)
    }

    pub fn minor() -> Self {
        Self::new(false, true, false)
    }

    pub fn patch() -> Self {
        Self::new(false, false, true)
    }

    /// Returns the policy with lower levels escalated by higher ones
    pub fn effective(self) -> Self {
        let minor = self.major || self.minor;
        Self {
            major: self.major,
            minor,
            patch: minor || self.patch,
        }
    }

    /// True when no level is selected, so no update can ever be accepted
    pub fn is_empty(&self) -> bool {
        !(self.major || self.minor || self.patch)
    }
}
