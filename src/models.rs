use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ratings::{ContentRatings, ReleaseDates};
use crate::utils::round_vote_average;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "series" | "show" | "shows" => Ok(MediaKind::Series),
            other => Err(anyhow::anyhow!(
                "media kind must be 'movie' or 'tv' (got '{}')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    pub id: i64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

impl RawMedia {
    pub fn search_kind(&self) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaKind::Movie),
            Some("tv") => Some(MediaKind::Series),
            _ => None,
        }
    }

    pub fn has_poster_and_score(&self) -> bool {
        non_empty(self.poster_path.as_deref()).is_some()
            && self.vote_average.is_some_and(|v| v > 0.0)
    }

    pub fn into_item(self, kind: MediaKind, content_rating: String) -> Option<MediaItem> {
        let title = match kind {
            MediaKind::Movie => non_empty(self.title.as_deref()),
            MediaKind::Series => non_empty(self.name.as_deref()),
        }?
        .to_string();

        let core = ItemCore {
            id: self.id,
            title,
            overview: self.overview.filter(|s| !s.is_empty()),
            poster_path: self.poster_path.filter(|s| !s.is_empty()),
            backdrop_path: self.backdrop_path.filter(|s| !s.is_empty()),
            popularity: self.popularity.unwrap_or(0.0),
            vote_average: round_vote_average(self.vote_average.unwrap_or(0.0)),
            vote_count: self.vote_count.unwrap_or(0),
            original_language: self.original_language.unwrap_or_default(),
            genre_ids: self.genre_ids,
            content_rating,
        };

        Some(match kind {
            MediaKind::Movie => MediaItem::Movie {
                core,
                original_title: self.original_title,
                release_date: self.release_date.filter(|s| !s.is_empty()),
            },
            MediaKind::Series => MediaItem::Series {
                core,
                original_name: self.original_name,
                first_air_date: self.first_air_date.filter(|s| !s.is_empty()),
                origin_country: self.origin_country,
            },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCore {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub original_language: String,
    pub genre_ids: Vec<i64>,
    pub content_rating: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum MediaItem {
    #[serde(rename = "movie")]
    Movie {
        #[serde(flatten)]
        core: ItemCore,
        original_title: Option<String>,
        release_date: Option<String>,
    },
    #[serde(rename = "tv")]
    Series {
        #[serde(flatten)]
        core: ItemCore,
        original_name: Option<String>,
        first_air_date: Option<String>,
        origin_country: Vec<String>,
    },
}

impl MediaItem {
    pub fn core(&self) -> &ItemCore {
        match self {
            MediaItem::Movie { core, .. } | MediaItem::Series { core, .. } => core,
        }
    }

    pub fn id(&self) -> i64 {
        self.core().id
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Movie { .. } => MediaKind::Movie,
            MediaItem::Series { .. } => MediaKind::Series,
        }
    }

    pub fn title(&self) -> &str {
        &self.core().title
    }

    pub fn date(&self) -> Option<&str> {
        match self {
            MediaItem::Movie { release_date, .. } => release_date.as_deref(),
            MediaItem::Series { first_air_date, .. } => first_air_date.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub items: Vec<MediaItem>,
}

impl CatalogPage {
    pub fn new(page: u32, total_pages: u32, items: Vec<MediaItem>) -> Self {
        Self {
            page,
            total_pages,
            has_more: !items.is_empty(),
            items,
        }
    }

    pub fn empty(page: u32) -> Self {
        Self::new(page, 0, Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default, skip_serializing)]
    pub release_dates: Option<ReleaseDates>,
    #[serde(default)]
    pub content_rating: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default, skip_serializing)]
    pub content_ratings: Option<ContentRatings>,
    #[serde(default)]
    pub content_rating: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    pub episode_number: u32,
    pub season_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub guest_stars: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    pub season_number: u32,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawMedia {
        serde_json::from_value(value).expect("raw media deserialize")
    }

    #[test]
    fn movie_record_becomes_tagged_movie_item() {
        let item = raw(json!({
            "id": 27205,
            "title": "Inception",
            "original_title": "Inception",
            "poster_path": "/inception.jpg",
            "vote_average": 8.369,
            "vote_count": 36000,
            "original_language": "en",
            "release_date": "2010-07-15",
            "genre_ids": [28, 878]
        }))
        .into_item(MediaKind::Movie, "PG-13".to_string())
        .expect("valid movie");

        assert_eq!(item.kind(), MediaKind::Movie);
        assert_eq!(item.title(), "Inception");
        assert_eq!(item.core().vote_average, 8.4);
        assert_eq!(item.date(), Some("2010-07-15"));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["kind"], "movie");
        assert_eq!(value["content_rating"], "PG-13");
        assert_eq!(value["id"], 27205);
    }

    #[test]
    fn series_needs_a_name_and_drops_blank_dates() {
        let nameless = raw(json!({ "id": 1, "title": "Wrong field" }));
        assert!(nameless
            .into_item(MediaKind::Series, "NR".to_string())
            .is_none());

        let show = raw(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "",
            "origin_country": ["US"]
        }))
        .into_item(MediaKind::Series, "M18".to_string())
        .expect("valid series");
        assert_eq!(show.kind(), MediaKind::Series);
        assert_eq!(show.date(), None);
        let value = serde_json::to_value(&show).unwrap();
        assert_eq!(value["kind"], "tv");
        assert_eq!(value["kind"], serde_json::to_value(MediaKind::Series).unwrap());
        assert_eq!(value["origin_country"], json!(["US"]));
    }

    #[test]
    fn poster_and_score_filter_rejects_blank_poster_or_zero_votes() {
        assert!(!raw(json!({ "id": 1, "poster_path": "", "vote_average": 7.0 }))
            .has_poster_and_score());
        assert!(!raw(json!({ "id": 1, "poster_path": "/p.jpg", "vote_average": 0.0 }))
            .has_poster_and_score());
        assert!(!raw(json!({ "id": 1, "poster_path": "/p.jpg" })).has_poster_and_score());
        assert!(raw(json!({ "id": 1, "poster_path": "/p.jpg", "vote_average": 6.1 }))
            .has_poster_and_score());
    }

    #[test]
    fn media_kind_parses_aliases() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert!("person".parse::<MediaKind>().is_err());
    }

    #[test]
    fn list_page_tolerates_missing_metadata() {
        let page: ListPage<RawMedia> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
