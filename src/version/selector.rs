//! Selection of the latest acceptable tag for an image
//!
//! Given the current version, the tags a registry knows about, and an
//! [`UpdatePolicy`], pick the single highest tag that is a permitted update.
//!
//! Rules:
//! - A current tag with three dot-separated parts (`1.2.3`, `1.2-rc.1`) only
//!   updates to strictly parsed tags; `1.3` is never offered in place of `1.2.3`.
//! - Such a tag keeps its `v` prefix: `v2.10.3` only moves to `v`-prefixed
//!   tags, and `2.10.3` never moves to one.
//! - A partial current version (`1.2`) accepts both `1.3` and `1.3.0`.
//! - The pre-release qualifier must match exactly: `1.0.0-beta` only moves to
//!   other `-beta` tags, and a release only moves to releases.
//! - Among equal versions the fully qualified tag wins, then input order.

use tracing::trace;

use crate::version::policy::UpdatePolicy;
use crate::version::semver::{ParseMode, TagVersion, parse_tag, version_prefix};

/// A parsed tag alongside the text it came from
#[derive(Debug)]
struct Candidate<'a> {
    version: TagVersion,
    tag: &'a str,
}

/// Returns the latest tag in `tags` that `policy` allows `current` to move to,
/// or `None` when no tag qualifies.
pub fn select_latest(current: &TagVersion, tags: &[String], policy: UpdatePolicy) -> Option<String> {
    if policy.is_empty() {
        return None;
    }
    let policy = policy.effective();

    let strict = current.has_full_form();
    let prefix = version_prefix(current.original());

    let mut candidates: Vec<Candidate> = tags
        .iter()
        .filter_map(|tag| {
            let version = if strict {
                parse_tag(tag.strip_prefix(prefix)?, ParseMode::Strict).ok()?
            } else {
                parse_tag(tag, ParseMode::Lenient).ok()?
            };
            Some(Candidate {
                version,
                tag: tag.as_str(),
            })
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }

    // Highest first; strictly specified tags ahead of equal partial ones
    candidates.sort_by(|a, b| {
        b.version
            .cmp(&a.version)
            .then_with(|| b.version.is_strict().cmp(&a.version.is_strict()))
    });

    candidates
        .into_iter()
        .find(|candidate| is_accepted(current, &candidate.version, policy))
        .map(|candidate| {
            trace!("Selected {} over current {}", candidate.tag, current);
            candidate.tag.to_string()
        })
}

fn is_accepted(current: &TagVersion, candidate: &TagVersion, policy: UpdatePolicy) -> bool {
    if candidate <= current || candidate.prerelease() != current.prerelease() {
        return false;
    }

    let same_major = candidate.major() == current.major();
    let same_minor = same_major && candidate.minor() == current.minor();

    (policy.major && candidate.major() > current.major())
        || (policy.minor && same_major && candidate.minor() > current.minor())
        || (policy.patch && same_minor && candidate.patch() > current.patch())
}
