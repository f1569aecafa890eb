use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gtally")]
#[command(about = "Contribution tally and report generator for git organizations")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, default_value = "repos", help = "Directory holding the local working copies")]
    pub workdir: PathBuf,

    #[arg(long, default_value = "contributors.json", help = "Path to the contributor mapping file")]
    pub contributors: PathBuf,

    #[arg(long, default_value = ".", help = "Directory to write generated reports into")]
    pub out: PathBuf,
}

#[derive(Args, Clone)]
pub struct SyncArgs {
    #[arg(long = "org", required = true, help = "Organization to sync (repeatable)")]
    pub orgs: Vec<String>,

    #[arg(long = "skip", help = "Repository name to exclude from syncing (repeatable)")]
    pub skip: Vec<String>,

    #[arg(long, default_value_t = 100, help = "Page size for the repository listing")]
    pub per_page: u32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone or update the repositories of the given organizations
    Sync {
        #[clap(flatten)]
        args: SyncArgs,
    },
    /// Aggregate commit history from existing working copies and render reports
    Generate,
    /// Sync, then generate
    Run {
        #[clap(flatten)]
        args: SyncArgs,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync { args } => {
                crate::sync::exec(&self.common.workdir, &args.orgs, &args.skip, args.per_page)
            }
            Commands::Generate => crate::generate::exec(&self.common),
            Commands::Run { args } => {
                crate::sync::exec(&self.common.workdir, &args.orgs, &args.skip, args.per_page)?;
                crate::generate::exec(&self.common)
            }
        }
    }
}
