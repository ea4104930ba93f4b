use std::fmt;

/// Non-fatal conditions met while describing repositories and planning
/// versions. They are reported to the user and processing continues.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Tag is not a `major.minor.patch` release tag and is ignored
    InvalidVersionTag { repository: String, tag: String },
    /// Repository has no valid release tag and is treated as changed
    MissingBaseline { repository: String },
    /// Allow-list names a repository that is not configured
    UnknownRepository { name: String },
    /// Manifest dumper wrote diagnostics to stderr
    ManifestDiagnostics { repository: String, output: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::InvalidVersionTag { repository, tag } => {
                write!(
                    f,
                    "Tag '{}' of {} does not match version format X.Y.Z",
                    tag, repository
                )
            }
            BoundaryWarning::MissingBaseline { repository } => {
                write!(
                    f,
                    "{} has no release tag; treating it as changed",
                    repository
                )
            }
            BoundaryWarning::UnknownRepository { name } => {
                write!(
                    f,
                    "Repository '{}' is in the allow-list but not configured",
                    name
                )
            }
            BoundaryWarning::ManifestDiagnostics { repository, output } => {
                write!(f, "Manifest dump of {} reported: {}", repository, output.trim())
            }
        }
    }
}
