use crate::error::Result;
use crate::model::{ClaimedEntry, QuarterReport};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// The all-time contributions table.
pub fn render_overview(entries: &[ClaimedEntry], grand_total: u64) -> String {
    let mut out = String::from(
        "# Contributors\n\n\
         Below is a table of contributions by users.\n\n\
         | Name | Contributions |   |   |\n\
         |------|:-------------:|:-:|---|\n",
    );

    for entry in entries {
        let name = match &entry.info.link {
            Some(link) => format!("[{}]({})", entry.info.name, link),
            None => entry.info.name.clone(),
        };
        let name = if entry.team {
            format!("**{name}**")
        } else {
            name
        };
        let github = entry
            .info
            .github
            .as_deref()
            .map(|github| format!("[GitHub](https://github.com/{github})"))
            .unwrap_or_default();

        out.push_str(&format!(
            "|{name}|{}|({}%)|{github}\n",
            entry.contributions,
            percentage(entry.contributions, grand_total)
        ));
    }

    out.push_str(
        "\nIf you would like to list your contributions, please edit \
         [contributors.json](./contributors.json) and add the corresponding information.\n",
    );
    out
}

/// The quarterly breakdown: one section per window, each a transposed
/// table of names, contributions, share of the window total, and share
/// of the team-only total (blank for non-team identities).
pub fn render_history(reports: &[QuarterReport], now: DateTime<Utc>) -> String {
    let mut out = String::from(
        "# Historical Contributions\n\n\
         Below is a table of contributions split by yearly quarter.\n",
    );

    for report in reports {
        let start = report.bucket.start.format("%Y-%m");
        let end = if report.bucket.end > now {
            "Present".to_string()
        } else {
            report.bucket.end.format("%Y-%m").to_string()
        };

        let names = join_cells(report.rows.iter().map(|r| r.name.clone()));
        let aligns = join_cells(report.rows.iter().map(|_| ":-:".to_string()));
        let counts = join_cells(report.rows.iter().map(|r| r.contributions.to_string()));
        let shares = join_cells(
            report
                .rows
                .iter()
                .map(|r| format!("{}%", percentage(r.contributions, report.total))),
        );
        let team_shares = join_cells(report.rows.iter().map(|r| {
            if r.team {
                format!("{}%", percentage(r.contributions, report.team_total))
            } else {
                String::new()
            }
        }));

        out.push_str(&format!(
            "\n## {start} to {end}\n\n{names}\n{aligns}\n{counts}\n{shares}\n{team_shares}\n"
        ));
    }

    out
}

fn join_cells<I: Iterator<Item = String>>(cells: I) -> String {
    cells.collect::<Vec<_>>().join("|")
}

fn percentage(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", part as f64 / whole as f64 * 100.0)
}

/// Write all four artifacts into `out_dir`, overwriting previous runs.
pub fn write_artifacts(
    out_dir: &Path,
    entries: &[ClaimedEntry],
    unclaimed: &[String],
    grand_total: u64,
    reports: &[QuarterReport],
    now: DateTime<Utc>,
) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let mut claimed_json = serde_json::to_string_pretty(entries)?;
    claimed_json.push('\n');
    fs::write(out_dir.join("generated_contrib.json"), claimed_json)?;

    let mut unclaimed_json = serde_json::to_string_pretty(unclaimed)?;
    unclaimed_json.push('\n');
    fs::write(out_dir.join("generated_unclaimed.json"), unclaimed_json)?;

    fs::write(
        out_dir.join("README.md"),
        render_overview(entries, grand_total),
    )?;
    fs::write(out_dir.join("HISTORY.md"), render_history(reports, now))?;

    Ok(())
}
