// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Outcome of the most recent build for a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Passed,
    Failed,
    InProgress,
    Unknown,
}

impl BuildStatus {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Passed => "●",
            Self::Failed => "✖",
            Self::InProgress => "◐",
            Self::Unknown => "○",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::InProgress => "in progress",
            Self::Unknown => "unknown",
        }
    }
}

/// One row of the commits feed, as served over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub author: String,
    pub branch: String,
    pub message: String,
    pub status: BuildStatus,
    /// Commit time as Unix seconds.
    pub committed_at: u64,
}

impl CommitSummary {
    /// The abbreviated hash shown in list views.
    pub fn short_sha(&self) -> &str {
        let end = self.sha.char_indices().nth(7).map_or(self.sha.len(), |(idx, _)| idx);
        &self.sha[..end]
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
