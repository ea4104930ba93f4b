use crate::error::{Result, UpdaterError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub(crate) type CachedRegex = OnceLock<std::result::Result<Regex, regex::Error>>;

static RELEASE_TAG: CachedRegex = OnceLock::new();
static MAJOR_MINOR: CachedRegex = OnceLock::new();

/// Compile `pattern` on first use and keep it in `cell`
pub(crate) fn cached_regex(
    cell: &'static CachedRegex,
    pattern: &str,
) -> std::result::Result<&'static Regex, &'static regex::Error> {
    cell.get_or_init(|| Regex::new(pattern)).as_ref()
}

/// Release line of a repository: major.minor, patch ignored
///
/// Field order makes the derived ordering compare major first, then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }

    /// Parse a release tag (e.g., "1.2.3" -> Version(1,2))
    ///
    /// Only tags made of exactly three dot-separated non-negative integers are
    /// release tags; the patch component is discarded.
    pub fn parse_tag(tag: &str) -> Result<Self> {
        Ok(ReleaseTag::parse(tag)?.version)
    }

    /// Same major, minor incremented
    ///
    /// # Returns
    /// * `Ok(Version)` - The bumped version
    /// * `Err` - If the minor version is already `u32::MAX`
    pub fn bump_minor(&self) -> Result<Self> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            UpdaterError::version(format!("Cannot bump minor version of {}", self))
        })?;
        Ok(Version {
            major: self.major,
            minor,
        })
    }

    /// The `major.minor.0` form used as a dependency lower bound
    pub fn lower_bound(&self) -> semver::Version {
        semver::Version::new(u64::from(self.major), u64::from(self.minor), 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parses the user supplied `<major>.<minor>` form
impl FromStr for Version {
    type Err = UpdaterError;

    fn from_str(s: &str) -> Result<Self> {
        let re = cached_regex(&MAJOR_MINOR, r"^(\d+)\.(\d+)$")
            .map_err(|e| UpdaterError::version(format!("Invalid version pattern: {}", e)))?;
        let captures = re.captures(s.trim()).ok_or_else(|| {
            UpdaterError::version(format!(
                "Invalid version '{}' - expected <major>.<minor>",
                s
            ))
        })?;

        Ok(Version {
            major: parse_component(&captures[1], "major", s)?,
            minor: parse_component(&captures[2], "minor", s)?,
        })
    }
}

/// The tag a release version was read from
///
/// Keeps the tag name so the release commit can be located by its exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
    pub patch: u32,
}

impl ReleaseTag {
    /// Parse a tag of the form `major.minor.patch`
    pub fn parse(tag: &str) -> Result<Self> {
        let re = cached_regex(&RELEASE_TAG, r"^(\d+)\.(\d+)\.(\d+)$")
            .map_err(|e| UpdaterError::version(format!("Invalid tag pattern: {}", e)))?;
        let captures = re.captures(tag).ok_or_else(|| {
            UpdaterError::version(format!(
                "Tag '{}' does not match version format X.Y.Z",
                tag
            ))
        })?;

        Ok(ReleaseTag {
            name: tag.to_string(),
            version: Version {
                major: parse_component(&captures[1], "major", tag)?,
                minor: parse_component(&captures[2], "minor", tag)?,
            },
            patch: parse_component(&captures[3], "patch", tag)?,
        })
    }
}

fn parse_component(digits: &str, component: &str, source: &str) -> Result<u32> {
    digits.parse::<u32>().map_err(|_| {
        UpdaterError::version(format!(
            "Invalid {} version '{}' in '{}'",
            component, digits, source
        ))
    })
}

/// Picks the latest release among a repository's tags.
///
/// Tags that are not `major.minor.patch` are handed to `on_invalid` and
/// skipped. Versions compare on (major, minor); among tags of the same
/// release line the highest patch wins.
///
/// # Returns
/// * `Some(ReleaseTag)` - The maximal valid release tag
/// * `None` - If no tag is a valid release tag
pub fn latest_release<S, F>(tags: &[S], mut on_invalid: F) -> Option<ReleaseTag>
where
    S: AsRef<str>,
    F: FnMut(&str, &UpdaterError),
{
    tags.iter()
        .filter_map(|tag| match ReleaseTag::parse(tag.as_ref()) {
            Ok(release) => Some(release),
            Err(e) => {
                on_invalid(tag.as_ref(), &e);
                None
            }
        })
        .max_by_key(|release| (release.version, release.patch))
}

/// Maximal release version among `tags`, `None` when no tag is valid.
pub fn maximal_version_tag<S: AsRef<str>>(tags: &[S]) -> Option<Version> {
    latest_release(tags, |tag, _| {
        tracing::warn!(tag, "tag does not match version format, skipping");
    })
    .map(|release| release.version)
}
