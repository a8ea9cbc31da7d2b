// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The fixture feed service.
//!
//! An in-memory commit feed with branch filtering and opaque cursor paging, exposed two ways:
//! over HTTP (axum router, for external tools driving the documented contract) and in-process
//! through [`client::FixtureClient`] for the terminal dashboard.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::api::{Envelope, PageCursors};
use crate::model::{fixtures, CommitSummary};
use crate::params::Params;

mod client;

pub use client::FixtureClient;

pub const COMMITS_ENDPOINT: &str = "/api/0/commits/";
pub const BRANCHES_ENDPOINT: &str = "/api/0/branches/";

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Filter/paging selection for one feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub branch: Option<String>,
    pub cursor: Option<String>,
}

impl FeedFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            branch: non_empty(params.get("branch")),
            cursor: non_empty(params.get("cursor")),
        }
    }

    fn from_query_map(query: &HashMap<String, String>) -> Self {
        Self {
            branch: non_empty(query.get("branch").map(String::as_str)),
            cursor: non_empty(query.get("cursor").map(String::as_str)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|raw| !raw.is_empty()).map(str::to_owned)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    BadCursor { token: String },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCursor { token } => write!(f, "unknown pagination cursor '{token}'"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Immutable in-memory commit feed with a fixed page size.
#[derive(Debug)]
pub struct FixtureStore {
    commits: Vec<CommitSummary>,
    page_size: usize,
}

impl FixtureStore {
    pub fn new(commits: Vec<CommitSummary>, page_size: usize) -> Self {
        Self { commits, page_size: page_size.max(1) }
    }

    /// The built-in demo feed.
    pub fn demo() -> Self {
        Self::new(fixtures::commit_feed(), DEFAULT_PAGE_SIZE)
    }

    pub fn demo_with_page_size(page_size: usize) -> Self {
        Self::new(fixtures::commit_feed(), page_size)
    }

    /// Distinct branch names, in feed order.
    pub fn branches(&self) -> Vec<String> {
        let mut branches = Vec::new();
        for commit in &self.commits {
            if !branches.iter().any(|known| known == &commit.branch) {
                branches.push(commit.branch.clone());
            }
        }
        branches
    }

    /// One page of the (optionally branch-filtered) feed.
    ///
    /// The previous-token minted for the feed start is the empty token; a client translates it
    /// back into the absence of a cursor.
    pub fn page(&self, filter: &FeedFilter) -> Result<Envelope<Vec<CommitSummary>>, FeedError> {
        let offset = match &filter.cursor {
            None => 0,
            Some(token) => decode_cursor(token)?,
        };

        let rows: Vec<&CommitSummary> = self
            .commits
            .iter()
            .filter(|commit| filter.branch.as_deref().map_or(true, |branch| commit.branch == branch))
            .collect();

        let total = rows.len();
        let start = offset.min(total);
        let end = (start + self.page_size).min(total);

        let data = rows[start..end].iter().map(|commit| (*commit).clone()).collect();
        let next = (end < total).then(|| encode_cursor(end));
        let previous = (start > 0).then(|| {
            let back = start.saturating_sub(self.page_size);
            if back == 0 {
                String::new()
            } else {
                encode_cursor(back)
            }
        });

        Ok(Envelope { data, pagination: PageCursors { next, previous } })
    }
}

fn encode_cursor(offset: usize) -> String {
    STANDARD.encode(format!("o:{offset}"))
}

fn decode_cursor(token: &str) -> Result<usize, FeedError> {
    let bad = || FeedError::BadCursor { token: token.to_owned() };
    let bytes = STANDARD.decode(token).map_err(|_| bad())?;
    let text = std::str::from_utf8(&bytes).map_err(|_| bad())?;
    let raw = text.strip_prefix("o:").ok_or_else(bad)?;
    raw.parse::<usize>().map_err(|_| bad())
}

/// The HTTP surface over a shared store.
pub fn router(store: Arc<FixtureStore>) -> Router {
    Router::new()
        .route(COMMITS_ENDPOINT, get(commits))
        .route(BRANCHES_ENDPOINT, get(branches))
        .with_state(store)
}

struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl From<FeedError> for ApiFailure {
    fn from(error: FeedError) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: error.to_string() }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

async fn commits(
    State(store): State<Arc<FixtureStore>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Vec<CommitSummary>>>, ApiFailure> {
    let filter = FeedFilter::from_query_map(&query);
    Ok(Json(store.page(&filter)?))
}

async fn branches(State(store): State<Arc<FixtureStore>>) -> Json<Vec<String>> {
    Json(store.branches())
}

#[cfg(test)]
mod tests;
