use crate::domain::{CommitStamp, RepositoryDescriptor, TagRef};
use crate::error::{Result, UpdaterError};
use crate::git::TagSource;
use git2::{build::CheckoutBuilder, build::RepoBuilder, Cred, CredentialType, RemoteCallbacks, Signature};
use git2::Repository as Git2Repo;
use std::path::Path;

/// Wrapper around a git2 checkout with the operations the updater needs
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open an existing checkout
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path)?;

        Ok(Git2Repository { repo })
    }

    /// Clone `url` into `into`, authenticating with the same strategy as push
    pub fn clone_into<P: AsRef<Path>>(url: &str, into: P) -> Result<Self> {
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());
        fetch_options.download_tags(git2::AutotagOption::All);

        let repo = RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(url, into.as_ref())
            .map_err(|e| UpdaterError::remote(format!("Cannot clone {}: {}", url, e)))?;

        Ok(Git2Repository { repo })
    }

    /// Identity and time of the commit HEAD points to
    pub fn head_commit(&self) -> Result<CommitStamp> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(CommitStamp::new(
            commit.id().to_string(),
            commit.time().seconds(),
        ))
    }

    /// Names of all tags in the repository
    pub fn tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    /// All tags with the object each one identifies
    pub fn tags(&self) -> Result<Vec<TagRef>> {
        self.tag_names()?
            .iter()
            .map(|name| self.tag_ref(name))
            .collect()
    }

    fn tag_ref(&self, tag_name: &str) -> Result<TagRef> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))?
            .resolve()?;
        let oid = reference.target().ok_or_else(|| {
            UpdaterError::Git(git2::Error::from_str(&format!(
                "Tag '{}' has no target",
                tag_name
            )))
        })?;
        let object = self.repo.find_object(oid, None)?;

        let target = match object.as_tag() {
            // Annotated: the tag object has its own hash, dated by the tagger
            Some(tag) => {
                let time = match tag.tagger() {
                    Some(tagger) => tagger.when().seconds(),
                    None => object.peel_to_commit()?.time().seconds(),
                };
                CommitStamp::new(tag.id().to_string(), time)
            }
            None => {
                let commit = object.peel_to_commit()?;
                CommitStamp::new(commit.id().to_string(), commit.time().seconds())
            }
        };

        Ok(TagRef::new(tag_name, target))
    }

    /// Create a branch at HEAD and check it out
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let branch = self.repo.branch(branch_name, &head, false)?;
        let reference_name = branch
            .get()
            .name()
            .ok_or_else(|| {
                UpdaterError::Git(git2::Error::from_str(&format!(
                    "Branch '{}' has a non UTF-8 reference name",
                    branch_name
                )))
            })?
            .to_string();

        self.repo.set_head(&reference_name)?;
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().safe()))?;
        Ok(())
    }

    /// Stage one file (relative to the workdir) and commit it on HEAD
    pub fn commit_file(&self, relative_path: &Path, message: &str) -> Result<CommitStamp> {
        let mut index = self.repo.index()?;
        index.add_path(relative_path)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        // Fresh clones may have no user identity configured
        let signature = match self.repo.signature() {
            Ok(signature) => signature,
            Err(_) => Signature::now("package-updater", "package-updater@localhost")?,
        };

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        let commit = self.repo.find_commit(oid)?;

        Ok(CommitStamp::new(oid.to_string(), commit.time().seconds()))
    }

    /// Push a local branch to a remote.
    ///
    /// # Returns
    /// * `Ok(())` - Branch pushed successfully
    /// * `Err` - If push fails (network, auth, or reference error)
    pub fn push_branch(&self, remote_name: &str, branch_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            UpdaterError::remote(format!("No remote named '{}' found", remote_name))
        })?;

        let mut callbacks = credential_callbacks();

        // Rejected references only show up in this callback
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                tracing::warn!(refname, status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch_name, branch_name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    UpdaterError::remote(format!("Network error during push: {}", e))
                } else if e.class() == git2::ErrorClass::Reference {
                    UpdaterError::remote(format!("Reference error during push: {}", e))
                } else {
                    UpdaterError::remote(format!(
                        "Failed to push branch '{}': {}",
                        branch_name, e
                    ))
                }
            })
    }
}

/// Credentials for clone and push: SSH keys from ~/.ssh, then the agent,
/// then git's default credential helpers.
fn credential_callbacks() -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(ssh_dir) = dirs::home_dir().map(|home| home.join(".ssh")) {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = ssh_dir.join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

/// [TagSource] reading tags from each repository's local checkout
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutTagSource;

impl TagSource for CheckoutTagSource {
    fn tags(&self, repository: &RepositoryDescriptor) -> Result<Vec<TagRef>> {
        Git2Repository::open(&repository.checkout)?.tags()
    }
}
