// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use rstest::{fixture, rstest};

use super::{branches, commits, FeedError, FeedFilter, FixtureStore};
use crate::model::{BuildStatus, CommitSummary};

fn commit(sha: &str, branch: &str) -> CommitSummary {
    CommitSummary {
        sha: sha.to_owned(),
        author: "kira".to_owned(),
        branch: branch.to_owned(),
        message: format!("commit {sha}"),
        status: BuildStatus::Passed,
        committed_at: 1_760_000_000,
    }
}

fn shas(page: &[CommitSummary]) -> Vec<&str> {
    page.iter().map(|commit| commit.sha.as_str()).collect()
}

#[fixture]
fn store() -> FixtureStore {
    FixtureStore::new(
        vec![
            commit("aaaaaaa", "main"),
            commit("bbbbbbb", "release-1.4"),
            commit("ccccccc", "main"),
            commit("ddddddd", "main"),
            commit("eeeeeee", "release-1.4"),
        ],
        2,
    )
}

#[rstest]
fn first_page_has_no_previous_token(store: FixtureStore) {
    let envelope = store.page(&FeedFilter::default()).expect("page");
    assert_eq!(shas(&envelope.data), ["aaaaaaa", "bbbbbbb"]);
    assert!(envelope.pagination.previous.is_none());
    assert!(envelope.pagination.next.is_some());
}

#[rstest]
fn cursors_walk_the_feed_and_back(store: FixtureStore) {
    let first = store.page(&FeedFilter::default()).expect("first page");
    let second_filter =
        FeedFilter { cursor: first.pagination.next.clone(), ..FeedFilter::default() };
    let second = store.page(&second_filter).expect("second page");
    assert_eq!(shas(&second.data), ["ccccccc", "ddddddd"]);

    // stepping back from the second page addresses the feed start: the empty token
    assert_eq!(second.pagination.previous.as_deref(), Some(""));

    let third_filter =
        FeedFilter { cursor: second.pagination.next.clone(), ..FeedFilter::default() };
    let third = store.page(&third_filter).expect("third page");
    assert_eq!(shas(&third.data), ["eeeeeee"]);
    assert!(third.pagination.next.is_none());
    assert!(third.pagination.previous.is_some());
}

#[rstest]
fn branch_filter_narrows_the_feed(store: FixtureStore) {
    let filter = FeedFilter { branch: Some("release-1.4".to_owned()), cursor: None };
    let envelope = store.page(&filter).expect("page");
    assert_eq!(shas(&envelope.data), ["bbbbbbb", "eeeeeee"]);
    assert!(envelope.pagination.next.is_none());
}

#[rstest]
#[case::not_base64("!!!")]
#[case::wrong_shape("bm9wZQ==")]
#[case::not_a_number("bzpsb3Rz")]
fn malformed_cursors_are_rejected(store: FixtureStore, #[case] token: &str) {
    let filter = FeedFilter { branch: None, cursor: Some(token.to_owned()) };
    let err = store.page(&filter).expect_err("bad cursor");
    assert_eq!(err, FeedError::BadCursor { token: token.to_owned() });
}

#[rstest]
fn an_offset_past_the_feed_yields_an_empty_page(store: FixtureStore) {
    let filter = FeedFilter { branch: None, cursor: Some(super::encode_cursor(999)) };
    let envelope = store.page(&filter).expect("page");
    assert!(envelope.data.is_empty());
    assert!(envelope.pagination.next.is_none());
    assert!(envelope.pagination.previous.is_some());
}

#[rstest]
fn branches_are_distinct_in_feed_order(store: FixtureStore) {
    assert_eq!(store.branches(), ["main", "release-1.4"]);
}

#[test]
fn demo_feed_pages_cleanly() {
    let store = FixtureStore::demo();
    let envelope = store.page(&FeedFilter::default()).expect("page");
    assert_eq!(envelope.data.len(), super::DEFAULT_PAGE_SIZE);
    assert!(envelope.pagination.next.is_some());
}

#[rstest]
#[tokio::test]
async fn commits_handler_maps_query_parameters(store: FixtureStore) {
    let store = Arc::new(store);
    let mut query = HashMap::new();
    query.insert("branch".to_owned(), "main".to_owned());

    let response = commits(State(Arc::clone(&store)), Query(query))
        .await
        .unwrap_or_else(|_| panic!("commits handler failed"));
    assert_eq!(shas(&response.0.data), ["aaaaaaa", "ccccccc"]);
}

#[rstest]
#[tokio::test]
async fn commits_handler_reports_bad_cursors(store: FixtureStore) {
    let store = Arc::new(store);
    let mut query = HashMap::new();
    query.insert("cursor".to_owned(), "!!!".to_owned());

    let failure = match commits(State(store), Query(query)).await {
        Ok(_) => panic!("expected a failure"),
        Err(failure) => failure,
    };
    assert_eq!(failure.status, axum::http::StatusCode::BAD_REQUEST);
    assert!(failure.message.contains("cursor"));
}

#[rstest]
#[tokio::test]
async fn branches_handler_lists_branches(store: FixtureStore) {
    let response = branches(State(Arc::new(store))).await;
    assert_eq!(response.0, ["main", "release-1.4"]);
}
