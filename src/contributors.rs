use crate::error::Result;
use crate::model::CommitRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Display data for one canonical identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The static email-to-identity mapping loaded from `contributors.json`.
///
/// `ids` may map many emails to one canonical id. Identities listed in
/// `team` get the secondary team-share percentage in quarterly reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributors {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub ids: HashMap<String, String>,
    #[serde(default)]
    pub info: HashMap<String, ContributorInfo>,
    #[serde(default)]
    pub team: Vec<String>,
}

impl Contributors {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn is_team(&self, id: &str) -> bool {
        self.team.iter().any(|t| t == id)
    }
}

/// Outcome of attributing extracted commits to canonical identities.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Commits per canonical id, merged across all emails mapped to it.
    pub claimed: BTreeMap<String, Vec<CommitRecord>>,
    /// Emails with no id mapping, ordered by descending contribution.
    pub unclaimed: Vec<String>,
    /// Inserted lines over all non-ignored commits, claimed or not.
    pub grand_total: u64,
}

/// Fold commits into a [`Resolution`]. Ignored emails contribute to no
/// total; everything else lands either under a canonical id or in the
/// unclaimed list.
pub fn resolve(commits: Vec<CommitRecord>, contributors: &Contributors) -> Resolution {
    let ignored: HashSet<&str> = contributors.ignore.iter().map(String::as_str).collect();

    let mut by_email: BTreeMap<String, Vec<CommitRecord>> = BTreeMap::new();
    let mut grand_total = 0u64;
    for commit in commits {
        if ignored.contains(commit.author_email.as_str()) {
            continue;
        }
        grand_total += commit.inserted_lines;
        by_email
            .entry(commit.author_email.clone())
            .or_default()
            .push(commit);
    }

    let mut ranked: Vec<(String, Vec<CommitRecord>)> = by_email.into_iter().collect();
    ranked.sort_by_cached_key(|(email, commits)| {
        let total: u64 = commits.iter().map(|c| c.inserted_lines).sum();
        (Reverse(total), email.clone())
    });

    let mut claimed: BTreeMap<String, Vec<CommitRecord>> = BTreeMap::new();
    let mut unclaimed = Vec::new();
    for (email, commits) in ranked {
        match contributors.ids.get(&email) {
            Some(id) => claimed.entry(id.clone()).or_default().extend(commits),
            None => unclaimed.push(email),
        }
    }

    Resolution {
        claimed,
        unclaimed,
        grand_total,
    }
}
