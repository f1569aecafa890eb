use crate::cli::CommonArgs;
use crate::contributors::{resolve, Contributors, Resolution};
use crate::git::GitRepo;
use crate::model::CommitRecord;
use crate::{aggregate, report};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let contributors = Contributors::load(&common.contributors)
        .with_context(|| format!("Failed to load {}", common.contributors.display()))?;

    let commits = collect_workdir_commits(&common.workdir)
        .context("Failed to extract commit history")?;

    let Resolution {
        claimed,
        unclaimed,
        grand_total,
    } = resolve(commits, &contributors);

    let entries = aggregate::all_time(claimed, &contributors);
    let now = Utc::now();
    let reports = aggregate::quarters(&entries, now);

    report::write_artifacts(&common.out, &entries, &unclaimed, grand_total, &reports, now)
        .context("Failed to write report artifacts")?;

    println!(
        "{} {} contributors, {} unclaimed emails, {} lines total",
        style("Generated").green().bold(),
        entries.len(),
        unclaimed.len(),
        grand_total
    );
    Ok(())
}

/// Walk `{workdir}/{org}/{repo}` and extract every repository's commits.
fn collect_workdir_commits(workdir: &Path) -> crate::error::Result<Vec<CommitRecord>> {
    let mut commits = Vec::new();
    for org_dir in read_subdirs(workdir)? {
        for repo_dir in read_subdirs(&org_dir)? {
            println!("{} {}", style("Reading").cyan().bold(), repo_dir.display());
            let repo = GitRepo::open(&repo_dir)?;
            commits.extend(repo.collect_commits()?);
        }
    }
    Ok(commits)
}

fn read_subdirs(dir: &Path) -> crate::error::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
