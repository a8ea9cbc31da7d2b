// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use super::{FeedFilter, FixtureStore};
use crate::api::{ApiError, ApiRequest, FetchClient, FetchFuture};
use crate::model::CommitSummary;

/// In-process fetch client over a shared [`FixtureStore`].
///
/// The configurable latency makes the demo dashboard exercise real asynchrony (dimmed
/// refreshes, superseded responses) without a network in between.
pub struct FixtureClient {
    store: Arc<FixtureStore>,
    latency: Duration,
}

impl FixtureClient {
    pub fn new(store: Arc<FixtureStore>) -> Self {
        Self { store, latency: Duration::ZERO }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl FetchClient<Vec<CommitSummary>> for FixtureClient {
    fn fetch(&self, request: ApiRequest) -> FetchFuture<Vec<CommitSummary>> {
        let store = Arc::clone(&self.store);
        let latency = self.latency;
        let filter = FeedFilter::from_params(&request.params);
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            store.page(&filter).map_err(|error| ApiError::new(Some(400), error.to_string()))
        })
    }
}
