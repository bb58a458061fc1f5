//! External collaborators for tally.
//!
//! The pipeline depends only on the [`VersionControl`] and [`Notifier`]
//! traits; [`GitRunner`] and [`WebhookNotifier`] are the production
//! implementations. Tests swap in in-memory fakes.

pub mod atomic_write;
pub mod git;
pub mod notify;

pub use atomic_write::atomic_write;
pub use git::{Author, GitError, GitRunner};
pub use notify::{Announcement, NotifyError, WebhookNotifier};

use std::future::Future;
use std::path::Path;

/// Version-control side effects, in pipeline order.
///
/// Every method is fatal on failure: the run aborts and surfaces the
/// captured diagnostics.
pub trait VersionControl {
    fn configure_identity(
        &self,
        author: &Author,
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    fn stage_and_commit(
        &self,
        path: &Path,
        message: &str,
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    fn push(&self, branch: &str) -> impl Future<Output = Result<(), GitError>> + Send;
}

/// Optional notification side effect. Failures are the caller's to log and
/// swallow; they never abort a run.
pub trait Notifier {
    fn notify(
        &self,
        announcement: &Announcement,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
