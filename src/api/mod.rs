// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The remote resource contract.
//!
//! A paginated resource answers a GET-style request (endpoint path plus query parameters) with an
//! [`Envelope`]: the payload and two opaque cursor tokens. [`FetchClient`] is the transport seam;
//! any implementation of it is substitutable, and the controller depends on nothing else.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::params::{self, Params};

/// Opaque pagination tokens from a response envelope.
///
/// `None` means no further page exists in that direction. The empty token is reserved for the
/// unparameterized first page; everything else is forwarded verbatim and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursors {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// The response envelope every paginated endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub pagination: PageCursors,
}

/// A transport-level failure: network error, non-success HTTP status, bad payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status_code: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self { status_code, message: message.into() }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "request failed ({code}): {}", self.message),
            None => write!(f, "request failed: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// One GET-style request: an endpoint path and the parameter snapshot taken at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub params: Params,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, params: Params) -> Self {
        Self { path: path.into(), params }
    }

    /// The full request target, e.g. `/api/0/commits/?branch=main`.
    pub fn url(&self) -> String {
        let query = params::encode(&self.params);
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        }
    }
}

pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<Envelope<T>, ApiError>> + Send>>;

/// The transport seam. Implementations must not block; cancellation and timeouts, if any, are
/// theirs to report as an [`ApiError`].
pub trait FetchClient<T>: Send + Sync {
    fn fetch(&self, request: ApiRequest) -> FetchFuture<T>;
}
