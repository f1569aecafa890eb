use crate::contributors::Contributors;
use crate::model::{ClaimedEntry, CommitRecord, QuarterBucket, QuarterReport, QuarterRow};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// All-time aggregation: one entry per canonical id that has an `info`
/// record, sorted by descending contributions (ties broken by id).
///
/// Ids mapped in `ids` but missing from `info` are dropped entirely;
/// they count neither as claimed nor as unclaimed.
pub fn all_time(
    claimed: BTreeMap<String, Vec<CommitRecord>>,
    contributors: &Contributors,
) -> Vec<ClaimedEntry> {
    let mut entries: Vec<ClaimedEntry> = claimed
        .into_iter()
        .filter_map(|(id, mut commits)| {
            let info = contributors.info.get(&id)?.clone();
            commits.sort_by(|a, b| {
                a.author_date
                    .cmp(&b.author_date)
                    .then_with(|| a.hash.cmp(&b.hash))
            });
            let contributions = commits.iter().map(|c| c.inserted_lines).sum();
            let team = contributors.is_team(&id);
            Some(ClaimedEntry {
                id,
                contributions,
                commits,
                info,
                team,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.contributions
            .cmp(&a.contributions)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries
}

/// Quarterly aggregation over the fixed epoch-to-present windows. Rows
/// keep the all-time ordering of `entries`; identities with no
/// contribution inside a window are omitted from that window's rows.
pub fn quarters(entries: &[ClaimedEntry], now: DateTime<Utc>) -> Vec<QuarterReport> {
    QuarterBucket::sequence(now)
        .into_iter()
        .map(|bucket| {
            let rows: Vec<QuarterRow> = entries
                .iter()
                .filter_map(|entry| {
                    let contributions: u64 = entry
                        .commits
                        .iter()
                        .filter(|c| bucket.contains(&c.author_date))
                        .map(|c| c.inserted_lines)
                        .sum();
                    (contributions > 0).then(|| QuarterRow {
                        name: entry.info.name.clone(),
                        team: entry.team,
                        contributions,
                    })
                })
                .collect();

            let total = rows.iter().map(|r| r.contributions).sum();
            let team_total = rows.iter().filter(|r| r.team).map(|r| r.contributions).sum();

            QuarterReport {
                bucket,
                rows,
                total,
                team_total,
            }
        })
        .collect()
}
