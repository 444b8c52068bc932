use chrono::{Days, NaiveDate, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::TmdbError;
use crate::models::{
    CatalogPage, Episode, Genre, MediaItem, MediaKind, MovieDetails, RawMedia, SeasonDetails,
    SeriesDetails,
};
use crate::ratings::{movie_rating, series_rating, RatingResolver};
use crate::sort::SortKey;
use crate::tmdb::TmdbApi;
use crate::utils::{language_name, round_vote_average};

pub const DEFAULT_MIN_VOTES: u32 = 100;
pub const TOP_RATED_MIN_VOTES: u32 = 1000;
pub const LATEST_SERIES_MIN_VOTES: u32 = 1;
pub const LATEST_SERIES_WINDOW_DAYS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingRequest {
    pub kind: MediaKind,
    pub genre_id: Option<i64>,
    pub sort: SortKey,
    pub page: u32,
}

impl ListingRequest {
    pub fn new(kind: MediaKind, genre_id: Option<i64>, sort: SortKey, page: u32) -> Self {
        Self {
            kind,
            genre_id: genre_id.filter(|g| *g != 0),
            sort,
            page: page.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub curated: bool,
}

impl UpstreamQuery {
    fn curated(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
            curated: true,
        }
    }

    fn discover(kind: MediaKind) -> Self {
        Self {
            endpoint: format!("/discover/{}", kind.path_segment()),
            params: Vec::new(),
            curated: false,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
    }
}

// Discover combines filters with AND, so the latest-series order widens by
// lowering the vote floor alone. A network allow-list would narrow it.
pub fn build_query(req: &ListingRequest, today: NaiveDate) -> UpstreamQuery {
    let mut query = match (req.sort, req.genre_id, req.kind) {
        (SortKey::Popular, None, MediaKind::Movie) => UpstreamQuery::curated("/movie/popular"),
        (SortKey::Popular, None, MediaKind::Series) => {
            UpstreamQuery::curated("/trending/tv/week")
        }
        (SortKey::TopRated, None, kind) => {
            UpstreamQuery::curated(format!("/{}/top_rated", kind.path_segment()))
        }
        (_, _, kind) => UpstreamQuery::discover(kind),
    };

    query.set("page", req.page);
    query.set("language", "en-US");
    query.set("include_adult", "false");
    if query.curated {
        return query;
    }

    query.set("vote_count.gte", DEFAULT_MIN_VOTES);
    if let Some(genre) = req.genre_id {
        query.set("with_genres", genre);
    }
    query.set("sort_by", req.sort.sort_by(req.kind));

    match (req.sort, req.kind) {
        (SortKey::TopRated, _) => query.set("vote_count.gte", TOP_RATED_MIN_VOTES),
        (SortKey::Latest, MediaKind::Series) => {
            let window_start = today
                .checked_sub_days(Days::new(LATEST_SERIES_WINDOW_DAYS))
                .unwrap_or(today);
            query.set("vote_count.gte", LATEST_SERIES_MIN_VOTES);
            query.set("first_air_date.gte", window_start);
            query.set("first_air_date.lte", today);
        }
        (SortKey::Latest, MediaKind::Movie) => query.set("release_date.lte", today),
        _ => {}
    }

    query
}

#[derive(Clone)]
pub struct CatalogFetcher {
    tmdb: Arc<dyn TmdbApi>,
    ratings: RatingResolver,
}

impl CatalogFetcher {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        let ratings = RatingResolver::new(tmdb.clone());
        Self { tmdb, ratings }
    }

    pub async fn fetch_catalog(&self, req: &ListingRequest) -> CatalogPage {
        let query = build_query(req, Utc::now().date_naive());
        let upstream = match self.tmdb.list(&query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    kind = %req.kind,
                    endpoint = %query.endpoint,
                    page = req.page,
                    error = %e,
                    "Listing request failed"
                );
                return CatalogPage::empty(req.page);
            }
        };

        let records = upstream
            .results
            .into_iter()
            .filter(|r| !query.curated || r.has_poster_and_score())
            .map(|r| (req.kind, r))
            .collect::<Vec<_>>();
        let items = self.decorate(records).await;
        debug!(
            kind = %req.kind,
            endpoint = %query.endpoint,
            page = req.page,
            items = items.len(),
            "Fetched listing page"
        );
        CatalogPage::new(req.page, upstream.total_pages, items)
    }

    pub async fn search(&self, query: &str, page: u32) -> CatalogPage {
        let page = page.max(1);
        let query = query.trim();
        if query.is_empty() {
            return CatalogPage::empty(page);
        }
        let upstream = match self.tmdb.search_multi(query, page).await {
            Ok(p) => p,
            Err(e) => {
                warn!(query, page, error = %e, "Search request failed");
                return CatalogPage::empty(page);
            }
        };
        let records = upstream
            .results
            .into_iter()
            .filter_map(|r| r.search_kind().map(|kind| (kind, r)))
            .collect::<Vec<_>>();
        let items = self.decorate(records).await;
        CatalogPage::new(page, upstream.total_pages, items)
    }

    pub async fn genres(&self, kind: MediaKind) -> Vec<Genre> {
        match self.tmdb.genres(kind).await {
            Ok(genres) => genres,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Genre list request failed");
                Vec::new()
            }
        }
    }

    pub async fn movie_details(&self, id: i64) -> Option<MovieDetails> {
        let mut details = self
            .tmdb
            .movie_details(id)
            .await
            .map_err(|e| log_detail_failure("movie", id, &e))
            .ok()?;
        details.content_rating = movie_rating(details.release_dates.as_ref());
        details.language = details.original_language.as_deref().map(language_name);
        details.vote_average = round_vote_average(details.vote_average);
        info!(id, title = %details.title, rating = %details.content_rating, "Resolved movie");
        Some(details)
    }

    pub async fn series_details(&self, id: i64) -> Option<SeriesDetails> {
        let mut details = self
            .tmdb
            .tv_details(id)
            .await
            .map_err(|e| log_detail_failure("series", id, &e))
            .ok()?;
        details.content_rating = series_rating(details.content_ratings.as_ref());
        details.language = details.original_language.as_deref().map(language_name);
        details.vote_average = round_vote_average(details.vote_average);
        info!(id, name = %details.name, rating = %details.content_rating, "Resolved series");
        Some(details)
    }

    pub async fn season(&self, tv_id: i64, season: u32) -> Option<SeasonDetails> {
        self.tmdb
            .season_details(tv_id, season)
            .await
            .map_err(|e| log_detail_failure("season", tv_id, &e))
            .ok()
    }

    pub async fn episode(&self, tv_id: i64, season: u32, episode: u32) -> Option<Episode> {
        let mut found = self
            .tmdb
            .episode_details(tv_id, season, episode)
            .await
            .map_err(|e| log_detail_failure("episode", tv_id, &e))
            .ok()?;
        found.vote_average = round_vote_average(found.vote_average);
        Some(found)
    }

    // Keeps input order; records without a title are dropped.
    async fn decorate(&self, records: Vec<(MediaKind, RawMedia)>) -> Vec<MediaItem> {
        let ratings = join_all(
            records
                .iter()
                .map(|(kind, raw)| self.ratings.resolve(raw.id, *kind)),
        )
        .await;

        records
            .into_iter()
            .zip(ratings)
            .filter_map(|((kind, raw), rating)| {
                let id = raw.id;
                let item = raw.into_item(kind, rating);
                if item.is_none() {
                    debug!(id, kind = %kind, "Dropping record without a title");
                }
                item
            })
            .collect()
    }
}

fn log_detail_failure(what: &str, id: i64, err: &TmdbError) {
    if err.is_not_found() {
        debug!(what, id, "Not found upstream");
    } else {
        warn!(what, id, error = %err, "Detail request failed");
    }
}
