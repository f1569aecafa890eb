use crate::error::Result;
use crate::util::run_git;
use console::style;
use serde::Deserialize;
use std::path::Path;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gtally/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RepoName {
    name: String,
}

#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub synced: usize,
    pub failed: usize,
}

/// Names of an organization's source repositories, first page only.
pub fn list_repos(
    agent: &ureq::Agent,
    org: &str,
    per_page: u32,
    token: Option<&str>,
) -> Result<Vec<String>> {
    let url = format!("https://api.github.com/orgs/{org}/repos?type=sources&per_page={per_page}");
    let mut request = agent
        .get(&url)
        .set("Accept", "application/vnd.github+json")
        .set("X-GitHub-Api-Version", API_VERSION)
        .set("User-Agent", USER_AGENT);
    if let Some(token) = token {
        request = request.set("Authorization", &format!("Bearer {token}"));
    }

    let repos: Vec<RepoName> = request.call()?.into_json()?;
    Ok(repos.into_iter().map(|r| r.name).collect())
}

/// Clone or update every non-skipped repository of `org` under
/// `{workdir}/{org}`. A failure on one repository is reported and does
/// not abort its siblings.
pub fn sync_org(
    agent: &ureq::Agent,
    org: &str,
    skip: &[String],
    workdir: &Path,
    per_page: u32,
    token: Option<&str>,
) -> Result<SyncOutcome> {
    let names = list_repos(agent, org, per_page, token)?;
    let org_dir = workdir.join(org);
    std::fs::create_dir_all(&org_dir)?;

    let mut outcome = SyncOutcome::default();
    for name in names {
        if skip.iter().any(|s| s == &name) {
            continue;
        }
        println!("{} {org}/{name}", style("Syncing").green().bold());
        match sync_repo(org, &name, &org_dir) {
            Ok(()) => outcome.synced += 1,
            Err(err) => {
                outcome.failed += 1;
                eprintln!("{} {org}/{name}: {err}", style("warning:").yellow().bold());
            }
        }
    }
    Ok(outcome)
}

fn sync_repo(org: &str, name: &str, org_dir: &Path) -> Result<()> {
    let path = org_dir.join(name);
    if path.is_dir() {
        run_git(&path, &["pull"])?;
    } else {
        let url = format!("https://github.com/{org}/{name}.git");
        run_git(org_dir, &["clone", &url])?;
    }
    Ok(())
}

pub fn exec(workdir: &Path, orgs: &[String], skip: &[String], per_page: u32) -> anyhow::Result<()> {
    let token = std::env::var("GITHUB_TOKEN").ok();
    let agent = ureq::AgentBuilder::new().build();

    let mut total = SyncOutcome::default();
    for org in orgs {
        match sync_org(&agent, org, skip, workdir, per_page, token.as_deref()) {
            Ok(outcome) => {
                total.synced += outcome.synced;
                total.failed += outcome.failed;
            }
            Err(err) => {
                eprintln!(
                    "{} listing repositories for {org} failed: {err}",
                    style("warning:").yellow().bold()
                );
            }
        }
    }

    println!(
        "{} {} repositories synced, {} failed",
        style("Done").bold(),
        total.synced,
        total.failed
    );
    Ok(())
}
