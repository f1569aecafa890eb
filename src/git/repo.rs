use crate::error::{GtallyError, Result};
use crate::model::CommitRecord;
use crate::util::run_git;
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = discover(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every commit reachable from any reference, each with its author
    /// email, author date, and inserted-line count. No ordering is
    /// guaranteed. An empty repository yields an empty list.
    pub fn collect_commits(&self) -> Result<Vec<CommitRecord>> {
        let mut stack: VecDeque<ObjectId> = VecDeque::new();
        let platform = self
            .repo
            .references()
            .map_err(|e| GtallyError::GitRepo(format!("Failed to list references: {e}")))?;
        let refs = platform
            .all()
            .map_err(|e| GtallyError::GitRepo(format!("Failed to iterate references: {e}")))?;
        for mut reference in refs.filter_map(std::result::Result::ok) {
            if let Ok(id) = reference.peel_to_id_in_place() {
                stack.push_back(id.detach());
            }
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Walking commits in {}", self.path.display()));

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            // Tags can peel to trees or blobs; skip anything that is not a commit
            let Ok(commit) = self.repo.find_commit(commit_id) else {
                continue;
            };

            let author = commit.author()?;
            let secs = author.time()?.seconds;
            let author_date = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| GtallyError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
            let author_email = author.email.to_string();

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            let inserted_lines = match self.count_insertions(commit_id, parents.first().copied()) {
                Ok(count) => count,
                Err(_) => self.count_insertions_shim(&commit_id.to_string())?,
            };

            commits.push(CommitRecord {
                hash: commit_id.to_string(),
                author_email,
                author_date,
                inserted_lines,
            });

            for pid in parents {
                stack.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_with_message(format!("Collected {} commits", commits.len()));
        Ok(commits)
    }

    fn count_insertions(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<u64> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let parent_tree = match parent_id {
            Some(pid) => Some(self.repo.find_commit(pid)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)?;

        let mut inserted = 0u64;
        for change in changes {
            inserted += self.insertions_for_change(change);
        }
        Ok(inserted)
    }

    fn insertions_for_change(&self, change: ChangeDetached) -> u64 {
        match change {
            ChangeDetached::Addition { id, .. } => match self.repo.find_object(id) {
                Ok(obj) if !is_binary_object(&obj) => count_lines(&obj),
                _ => 0,
            },
            ChangeDetached::Deletion { .. } => 0,
            ChangeDetached::Modification {
                previous_id, id, ..
            } => {
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(previous_id), self.repo.find_object(id))
                {
                    if is_binary_object(&old_obj) || is_binary_object(&new_obj) {
                        0
                    } else {
                        added_lines(&old_obj, &new_obj)
                    }
                } else {
                    0
                }
            }
            ChangeDetached::Rewrite {
                source_id, id, copy, ..
            } => {
                if !copy {
                    return 0;
                }
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(source_id), self.repo.find_object(id))
                {
                    if is_binary_object(&old_obj) || is_binary_object(&new_obj) {
                        0
                    } else {
                        added_lines(&old_obj, &new_obj)
                    }
                } else {
                    0
                }
            }
        }
    }

    /// Compatibility fallback when the tree diff fails: scrape the
    /// insertion count out of `git show --stat` output.
    fn count_insertions_shim(&self, hash: &str) -> Result<u64> {
        let stat = run_git(&self.path, &["show", "--stat", hash])?;
        Ok(parse_insertions(&stat))
    }
}

fn is_binary_object(object: &gix::Object<'_>) -> bool {
    object.data.as_slice().iter().take(8192).any(|&b| b == 0)
}

fn count_lines(object: &gix::Object<'_>) -> u64 {
    std::str::from_utf8(object.data.as_slice())
        .map(|t| t.lines().count() as u64)
        .unwrap_or(0)
}

fn added_lines(old_object: &gix::Object<'_>, new_object: &gix::Object<'_>) -> u64 {
    let old_text = std::str::from_utf8(old_object.data.as_slice()).unwrap_or("");
    let new_text = std::str::from_utf8(new_object.data.as_slice()).unwrap_or("");

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let mut added = 0usize;
    let (mut oi, mut ni) = (0usize, 0usize);

    while oi < old_lines.len() || ni < new_lines.len() {
        if oi >= old_lines.len() {
            added += new_lines.len() - ni;
            break;
        }
        if ni >= new_lines.len() {
            break;
        }

        if old_lines[oi] == new_lines[ni] {
            oi += 1;
            ni += 1;
            continue;
        }

        let mut found = false;
        for look_ahead in 1..=3 {
            if oi + look_ahead < old_lines.len() && old_lines[oi + look_ahead] == new_lines[ni] {
                oi += look_ahead;
                found = true;
                break;
            }
            if ni + look_ahead < new_lines.len() && old_lines[oi] == new_lines[ni + look_ahead] {
                added += look_ahead;
                ni += look_ahead;
                found = true;
                break;
            }
        }

        if !found {
            added += 1;
            oi += 1;
            ni += 1;
        }
    }

    added as u64
}

static INSERTIONS: OnceLock<Regex> = OnceLock::new();

/// Extract the inserted-line count from diff-statistics text. Output
/// without an insertion phrase means zero insertions, not an error.
pub fn parse_insertions(stat: &str) -> u64 {
    let re = INSERTIONS
        .get_or_init(|| Regex::new(r"(\d+) insertion").expect("insertion pattern is valid"));
    re.captures(stat)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::parse_insertions;

    #[test]
    fn parses_singular_and_plural_insertions() {
        assert_eq!(
            parse_insertions(" 1 file changed, 1 insertion(+)\n"),
            1
        );
        assert_eq!(
            parse_insertions(" 3 files changed, 42 insertions(+), 7 deletions(-)\n"),
            42
        );
    }

    #[test]
    fn missing_insertion_phrase_is_zero() {
        assert_eq!(parse_insertions(" 1 file changed, 5 deletions(-)\n"), 0);
        assert_eq!(parse_insertions(""), 0);
    }
}
