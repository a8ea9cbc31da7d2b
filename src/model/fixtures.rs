// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{BuildStatus, CommitSummary};

const FEED_LEN: usize = 120;
const FEED_HEAD_AT: u64 = 1_766_000_000;
const COMMIT_SPACING_SECS: u64 = 1_700;

const AUTHORS: [&str; 5] = ["kira", "mbeck", "jtao", "ofeld", "ana.ruiz"];

const BRANCHES: [&str; 3] = ["main", "release-1.4", "perf-rewrite"];

const MESSAGES: [&str; 8] = [
    "Fix off-by-one in feed windowing",
    "Speed up branch index rebuild",
    "Retry flaky artifact upload step",
    "Teach the collector about nested suites",
    "Drop dead snapshot columns\n\nThey were superseded by the event log.",
    "Quiet a noisy shutdown warning",
    "Pin builder image to the tested digest",
    "Make queue draining observable",
];

fn pseudo_sha(index: usize) -> String {
    let hash = (index as u64).wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    format!("{hash:016x}{:024x}", hash.rotate_left(17))
}

fn status_for(index: usize) -> BuildStatus {
    match index % 9 {
        0 => BuildStatus::Failed,
        4 => BuildStatus::InProgress,
        7 => BuildStatus::Unknown,
        _ => BuildStatus::Passed,
    }
}

/// Deterministic demo feed, newest first, spanning several branches.
pub(crate) fn commit_feed() -> Vec<CommitSummary> {
    (0..FEED_LEN)
        .map(|index| CommitSummary {
            sha: pseudo_sha(index),
            author: AUTHORS[index % AUTHORS.len()].to_owned(),
            branch: BRANCHES[index % BRANCHES.len()].to_owned(),
            message: MESSAGES[index % MESSAGES.len()].to_owned(),
            status: status_for(index),
            committed_at: FEED_HEAD_AT - index as u64 * COMMIT_SPACING_SECS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::commit_feed;

    #[test]
    fn feed_is_deterministic_and_newest_first() {
        let first = commit_feed();
        let second = commit_feed();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0].committed_at > pair[1].committed_at));
    }

    #[test]
    fn feed_shas_are_unique() {
        let feed = commit_feed();
        let mut shas: Vec<&str> = feed.iter().map(|commit| commit.sha.as_str()).collect();
        shas.sort_unstable();
        shas.dedup();
        assert_eq!(shas.len(), feed.len());
    }
}
