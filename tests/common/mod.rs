#![allow(dead_code)]

use async_trait::async_trait;
use cinecatalog::catalog::UpstreamQuery;
use cinecatalog::error::{TmdbError, TmdbResult};
use cinecatalog::models::{
    Episode, Genre, ListPage, MediaKind, MovieDetails, RawMedia, SeasonDetails, SeriesDetails,
};
use cinecatalog::ratings::{ContentRatings, ReleaseDates};
use cinecatalog::tmdb::TmdbApi;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

/// In-memory metadata provider. Listings are keyed by endpoint and page;
/// anything not registered answers 404.
#[derive(Default)]
pub struct FakeTmdb {
    listings: HashMap<(String, u32), Vec<Value>>,
    failing_endpoints: HashSet<String>,
    release_dates: HashMap<i64, Value>,
    content_ratings: HashMap<i64, Value>,
    rating_delays: HashMap<i64, Duration>,
    rating_barrier: Option<Arc<Barrier>>,
    movies: HashMap<i64, Value>,
    shows: HashMap<i64, Value>,
    seasons: HashMap<(i64, u32), Value>,
    search_results: Vec<Value>,
    genres: Vec<Genre>,
    list_delay: Option<Duration>,
    pub list_calls: Mutex<Vec<UpstreamQuery>>,
    pub rating_calls: Mutex<Vec<(MediaKind, i64)>>,
}

impl FakeTmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, endpoint: &str, page: u32, results: Vec<Value>) -> Self {
        self.listings.insert((endpoint.to_string(), page), results);
        self
    }

    pub fn failing(mut self, endpoint: &str) -> Self {
        self.failing_endpoints.insert(endpoint.to_string());
        self
    }

    pub fn with_release_dates(mut self, id: i64, countries: Value) -> Self {
        self.release_dates.insert(id, json!({ "id": id, "results": countries }));
        self
    }

    pub fn with_content_ratings(mut self, id: i64, ratings: Value) -> Self {
        self.content_ratings.insert(id, json!({ "id": id, "results": ratings }));
        self
    }

    /// Slows one item's certification lookup so completion order differs
    /// from listing order.
    pub fn with_rating_delay(mut self, id: i64, delay: Duration) -> Self {
        self.rating_delays.insert(id, delay);
        self
    }

    /// Every certification lookup waits until `parties` lookups are
    /// pending at the same time.
    pub fn with_rating_barrier(mut self, parties: usize) -> Self {
        self.rating_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    async fn before_rating(&self, kind: MediaKind, id: i64) {
        self.rating_calls.lock().unwrap().push((kind, id));
        if let Some(barrier) = &self.rating_barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.rating_delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn with_movie(mut self, id: i64, details: Value) -> Self {
        self.movies.insert(id, details);
        self
    }

    pub fn with_show(mut self, id: i64, details: Value) -> Self {
        self.shows.insert(id, details);
        self
    }

    pub fn with_season(mut self, tv_id: i64, season: u32, details: Value) -> Self {
        self.seasons.insert((tv_id, season), details);
        self
    }

    pub fn with_search(mut self, results: Vec<Value>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_genres(mut self, genres: &[(i64, &str)]) -> Self {
        self.genres = genres
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn requested_pages(&self) -> Vec<String> {
        self.list_calls
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.param("page").unwrap_or_default().to_string())
            .collect()
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> TmdbResult<T> {
    Ok(serde_json::from_value(value.clone())?)
}

fn not_found<T>(endpoint: String) -> TmdbResult<T> {
    Err(TmdbError::status(endpoint, 404))
}

#[async_trait]
impl TmdbApi for FakeTmdb {
    async fn list(&self, query: &UpstreamQuery) -> TmdbResult<ListPage<RawMedia>> {
        self.list_calls.lock().unwrap().push(query.clone());
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_endpoints.contains(&query.endpoint) {
            return Err(TmdbError::status(query.endpoint.clone(), 500));
        }
        let page: u32 = query
            .param("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let results = self
            .listings
            .get(&(query.endpoint.clone(), page))
            .cloned()
            .unwrap_or_default();
        let total_pages = self
            .listings
            .keys()
            .filter(|(endpoint, _)| endpoint == &query.endpoint)
            .count();
        decode(&json!({
            "page": page,
            "results": results,
            "total_pages": total_pages,
            "total_results": 0
        }))
    }

    async fn search_multi(&self, _query: &str, page: u32) -> TmdbResult<ListPage<RawMedia>> {
        if self.failing_endpoints.contains("/search/multi") {
            return Err(TmdbError::status("/search/multi", 500));
        }
        decode(&json!({
            "page": page,
            "results": self.search_results,
            "total_pages": 1
        }))
    }

    async fn genres(&self, kind: MediaKind) -> TmdbResult<Vec<Genre>> {
        let endpoint = format!("/genre/{}/list", kind.path_segment());
        if self.failing_endpoints.contains(&endpoint) {
            return Err(TmdbError::status(endpoint, 500));
        }
        Ok(self.genres.clone())
    }

    async fn movie_release_dates(&self, id: i64) -> TmdbResult<ReleaseDates> {
        self.before_rating(MediaKind::Movie, id).await;
        match self.release_dates.get(&id) {
            Some(value) => decode(value),
            None => not_found(format!("/movie/{id}/release_dates")),
        }
    }

    async fn tv_content_ratings(&self, id: i64) -> TmdbResult<ContentRatings> {
        self.before_rating(MediaKind::Series, id).await;
        match self.content_ratings.get(&id) {
            Some(value) => decode(value),
            None => not_found(format!("/tv/{id}/content_ratings")),
        }
    }

    async fn movie_details(&self, id: i64) -> TmdbResult<MovieDetails> {
        match self.movies.get(&id) {
            Some(value) => decode(value),
            None => not_found(format!("/movie/{id}")),
        }
    }

    async fn tv_details(&self, id: i64) -> TmdbResult<SeriesDetails> {
        match self.shows.get(&id) {
            Some(value) => decode(value),
            None => not_found(format!("/tv/{id}")),
        }
    }

    async fn season_details(&self, tv_id: i64, season: u32) -> TmdbResult<SeasonDetails> {
        match self.seasons.get(&(tv_id, season)) {
            Some(value) => decode(value),
            None => not_found(format!("/tv/{tv_id}/season/{season}")),
        }
    }

    async fn episode_details(
        &self,
        tv_id: i64,
        season: u32,
        episode: u32,
    ) -> TmdbResult<Episode> {
        let found = self.seasons.get(&(tv_id, season)).and_then(|s| {
            s.get("episodes")?
                .as_array()?
                .iter()
                .find(|e| e.get("episode_number").and_then(Value::as_u64) == Some(episode as u64))
                .cloned()
        });
        match found {
            Some(value) => decode(&value),
            None => not_found(format!("/tv/{tv_id}/season/{season}/episode/{episode}")),
        }
    }
}

pub fn movie(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_title": title,
        "overview": format!("{title} overview"),
        "poster_path": format!("/poster-{id}.jpg"),
        "backdrop_path": format!("/backdrop-{id}.jpg"),
        "popularity": 100.0,
        "vote_average": 7.25,
        "vote_count": 500,
        "original_language": "en",
        "genre_ids": [28],
        "release_date": "2023-05-01"
    })
}

pub fn show(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "original_name": name,
        "overview": format!("{name} overview"),
        "poster_path": format!("/poster-{id}.jpg"),
        "popularity": 80.0,
        "vote_average": 8.04,
        "vote_count": 900,
        "original_language": "en",
        "genre_ids": [18],
        "first_air_date": "2022-09-01",
        "origin_country": ["US"]
    })
}

/// Movies numbered `first..first + count`, titled after their id.
pub fn movies(first: i64, count: i64) -> Vec<Value> {
    (first..first + count)
        .map(|id| movie(id, &format!("Movie {id}")))
        .collect()
}

pub fn release(country: &str, entries: &[(&str, u8)]) -> Value {
    let dates: Vec<Value> = entries
        .iter()
        .map(|(cert, kind)| json!({ "certification": cert, "type": kind }))
        .collect();
    json!({ "iso_3166_1": country, "release_dates": dates })
}

pub fn rating(country: &str, value: &str) -> Value {
    json!({ "iso_3166_1": country, "rating": value })
}
