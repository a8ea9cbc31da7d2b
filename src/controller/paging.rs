// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Forward/backward navigation affordances, derived as data rather than widgets.

use crate::api::PageCursors;
use crate::params::Params;

/// Query key holding the opaque cursor in cursor-based paging.
pub const CURSOR_PARAM: &str = "cursor";
/// Query key holding the absolute page index in index-based paging; page zero omits the key.
pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingOptions {
    pub use_next_previous: bool,
}

impl PagingOptions {
    /// Cursor-based paging over the envelope's `next`/`previous` tokens.
    pub fn next_previous() -> Self {
        Self { use_next_previous: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

impl PageDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// One clickable affordance: the partial parameter set a host merges by following it.
///
/// Following a link never resets other filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub direction: PageDirection,
    pub partial: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingLinks {
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
}

impl PagingLinks {
    pub(crate) fn derive(options: PagingOptions, cursors: &PageCursors, params: &Params) -> Self {
        if options.use_next_previous {
            Self {
                previous: cursors
                    .previous
                    .as_deref()
                    .map(|token| cursor_link(PageDirection::Previous, token)),
                next: cursors.next.as_deref().map(|token| cursor_link(PageDirection::Next, token)),
            }
        } else {
            let page = params.get(PAGE_PARAM).and_then(|raw| raw.parse::<u64>().ok()).unwrap_or(0);
            Self {
                previous: (page > 0).then(|| index_link(PageDirection::Previous, page - 1)),
                next: cursors.next.is_some().then(|| index_link(PageDirection::Next, page + 1)),
            }
        }
    }
}

fn cursor_link(direction: PageDirection, token: &str) -> PageLink {
    // An empty token addresses the unparameterized first page; merging an empty value clears
    // the cursor key instead of forwarding it.
    let mut partial = Params::new();
    partial.set(CURSOR_PARAM, token);
    PageLink { direction, partial }
}

fn index_link(direction: PageDirection, page: u64) -> PageLink {
    let mut partial = Params::new();
    if page == 0 {
        partial.set(PAGE_PARAM, "");
    } else {
        partial.set_number(PAGE_PARAM, page as i64);
    }
    PageLink { direction, partial }
}
