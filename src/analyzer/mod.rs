//! Version propagation engine: which repositories changed, what depends on
//! them, and which version each affected repository gets

pub mod bump_orchestrator;
pub mod change_detector;
pub mod dependency_graph;
pub mod version_policy;

pub use bump_orchestrator::{BumpOrchestrator, BumpPlan};
pub use change_detector::{is_later_commit, ChangeDetector};
pub use dependency_graph::transitive_closure;
pub use version_policy::{CoreFamily, VersionPolicy};
