use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::catalog::{CatalogFetcher, ListingRequest};
use crate::models::{CatalogPage, MediaItem, MediaKind};
use crate::sort::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub kind: MediaKind,
    pub genre_id: Option<i64>,
    pub sort: SortKey,
}

impl ListKey {
    pub fn new(kind: MediaKind, genre_id: Option<i64>, sort: SortKey) -> Self {
        Self {
            kind,
            genre_id: genre_id.filter(|g| *g != 0),
            sort,
        }
    }

    fn request(&self, page: u32) -> ListingRequest {
        ListingRequest::new(self.kind, self.genre_id, self.sort, page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { page: u32, added: usize },
    // Empty page, now or on an earlier load.
    Exhausted,
    InFlight,
    Superseded,
}

#[derive(Debug)]
struct FeedState {
    key: ListKey,
    generation: u64,
    items: Vec<MediaItem>,
    page: u32,
    has_more: bool,
    loading: bool,
}

impl FeedState {
    fn fresh(key: ListKey, generation: u64) -> Self {
        Self {
            key,
            generation,
            items: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
        }
    }
}

pub struct CatalogFeed {
    fetcher: CatalogFetcher,
    // Never held across an await.
    state: Mutex<FeedState>,
}

impl CatalogFeed {
    pub fn new(fetcher: CatalogFetcher, key: ListKey) -> Self {
        Self {
            fetcher,
            state: Mutex::new(FeedState::fresh(key, 0)),
        }
    }

    pub fn with_first_page(fetcher: CatalogFetcher, key: ListKey, first: CatalogPage) -> Self {
        let mut state = FeedState::fresh(key, 0);
        state.page = 1;
        state.has_more = !first.items.is_empty();
        state.items = first.items;
        Self {
            fetcher,
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn key(&self) -> ListKey {
        self.lock().key
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    // false when `key` is already current.
    pub fn switch_to(&self, key: ListKey) -> bool {
        let mut state = self.lock();
        if state.key == key {
            return false;
        }
        let generation = state.generation + 1;
        *state = FeedState::fresh(key, generation);
        debug!(kind = %key.kind, genre = ?key.genre_id, sort = ?key.sort, "Feed reset");
        true
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let (request, generation) = {
            let mut state = self.lock();
            if state.loading {
                return LoadOutcome::InFlight;
            }
            if !state.has_more {
                return LoadOutcome::Exhausted;
            }
            state.loading = true;
            (state.key.request(state.page + 1), state.generation)
        };

        let mut guard = LoadingGuard {
            feed: self,
            generation,
            armed: true,
        };
        let page = self.fetcher.fetch_catalog(&request).await;
        guard.armed = false;

        let mut state = self.lock();
        if state.generation != generation {
            return LoadOutcome::Superseded;
        }
        state.loading = false;

        if page.items.is_empty() {
            state.has_more = false;
            info!(
                kind = %request.kind,
                page = request.page,
                total = state.items.len(),
                "Feed reached the end"
            );
            return LoadOutcome::Exhausted;
        }

        let added = page.items.len();
        state.items.extend(page.items);
        state.page = request.page;
        state.has_more = page.has_more;
        LoadOutcome::Appended {
            page: request.page,
            added,
        }
    }
}

struct LoadingGuard<'a> {
    feed: &'a CatalogFeed,
    generation: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.feed.lock();
        if state.generation == self.generation {
            state.loading = false;
        }
    }
}
