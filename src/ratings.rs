use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::TmdbResult;
use crate::models::MediaKind;
use crate::tmdb::TmdbApi;

pub const NOT_RATED: &str = "NR";
pub const COUNTRY_PRIORITY: [&str; 5] = ["SG", "US", "GB", "AU", "MY"];

// Theatrical release type.
const THEATRICAL: u8 = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<CountryReleases>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ReleaseCert>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseCert {
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(rename = "type", default)]
    pub release_type: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRatings {
    #[serde(default)]
    pub results: Vec<RatingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingEntry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: Option<String>,
}

pub fn movie_certification(data: &ReleaseDates) -> Option<String> {
    pick_certification(&data.results, |r| r.iso_3166_1.as_str(), country_movie_cert)
}

pub fn series_certification(data: &ContentRatings) -> Option<String> {
    pick_certification(&data.results, |r| r.iso_3166_1.as_str(), |r| {
        non_blank(r.rating.as_deref())
    })
}

pub fn movie_rating(data: Option<&ReleaseDates>) -> String {
    certification_or_not_rated(data.and_then(movie_certification))
}

pub fn series_rating(data: Option<&ContentRatings>) -> String {
    certification_or_not_rated(data.and_then(series_certification))
}

// The only place a missing or failed certification turns into "NR".
fn certification_or_not_rated(cert: Option<String>) -> String {
    cert.unwrap_or_else(|| NOT_RATED.to_string())
}

fn pick_certification<'a, T>(
    entries: &'a [T],
    country: impl Fn(&T) -> &str,
    cert: impl Fn(&'a T) -> Option<&'a str>,
) -> Option<String> {
    COUNTRY_PRIORITY
        .iter()
        .find_map(|code| {
            entries
                .iter()
                .filter(|e| country(*e) == *code)
                .find_map(&cert)
        })
        .or_else(|| entries.iter().find_map(&cert))
        .map(str::to_string)
}

fn country_movie_cert(entry: &CountryReleases) -> Option<&str> {
    let theatrical = entry
        .release_dates
        .iter()
        .filter(|d| d.release_type == Some(THEATRICAL))
        .find_map(|d| non_blank(d.certification.as_deref()));
    theatrical.or_else(|| {
        entry
            .release_dates
            .iter()
            .find_map(|d| non_blank(d.certification.as_deref()))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct RatingResolver {
    tmdb: Arc<dyn TmdbApi>,
}

impl RatingResolver {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self { tmdb }
    }

    pub async fn resolve(&self, id: i64, kind: MediaKind) -> String {
        let cert = self.lookup(id, kind).await.unwrap_or_else(|e| {
            debug!(id, kind = %kind, error = %e, "Certification lookup failed");
            None
        });
        certification_or_not_rated(cert)
    }

    async fn lookup(&self, id: i64, kind: MediaKind) -> TmdbResult<Option<String>> {
        match kind {
            MediaKind::Movie => {
                let data = self.tmdb.movie_release_dates(id).await?;
                Ok(movie_certification(&data))
            }
            MediaKind::Series => {
                let data = self.tmdb.tv_content_ratings(id).await?;
                Ok(series_certification(&data))
            }
        }
    }
}
