use serde::Serialize;

use crate::models::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Popular,
    TopRated,
    LowestRated,
    MostVoted,
    Latest,
    Oldest,
    HighestRevenue,
    TitleAsc,
    TitleDesc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
}

static MOVIE_SORTS: [SortKey; 9] = [
    SortKey::Popular,
    SortKey::TopRated,
    SortKey::LowestRated,
    SortKey::MostVoted,
    SortKey::Latest,
    SortKey::Oldest,
    SortKey::HighestRevenue,
    SortKey::TitleAsc,
    SortKey::TitleDesc,
];

static SERIES_SORTS: [SortKey; 8] = [
    SortKey::Popular,
    SortKey::TopRated,
    SortKey::LowestRated,
    SortKey::MostVoted,
    SortKey::Latest,
    SortKey::Oldest,
    SortKey::TitleAsc,
    SortKey::TitleDesc,
];

impl SortKey {
    pub fn available(kind: MediaKind) -> &'static [SortKey] {
        match kind {
            MediaKind::Movie => &MOVIE_SORTS,
            MediaKind::Series => &SERIES_SORTS,
        }
    }

    pub fn value(&self, kind: MediaKind) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::TopRated => "top_rated",
            _ => self.sort_by(kind),
        }
    }

    pub fn sort_by(&self, kind: MediaKind) -> &'static str {
        match (self, kind) {
            (SortKey::Popular, _) => "popularity.desc",
            (SortKey::TopRated, _) => "vote_average.desc",
            (SortKey::LowestRated, _) => "vote_average.asc",
            (SortKey::MostVoted, _) => "vote_count.desc",
            (SortKey::Latest, MediaKind::Movie) => "release_date.desc",
            (SortKey::Latest, MediaKind::Series) => "first_air_date.desc",
            (SortKey::Oldest, MediaKind::Movie) => "release_date.asc",
            (SortKey::Oldest, MediaKind::Series) => "first_air_date.asc",
            (SortKey::HighestRevenue, _) => "revenue.desc",
            (SortKey::TitleAsc, MediaKind::Movie) => "original_title.asc",
            (SortKey::TitleAsc, MediaKind::Series) => "name.asc",
            (SortKey::TitleDesc, MediaKind::Movie) => "original_title.desc",
            (SortKey::TitleDesc, MediaKind::Series) => "name.desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Popular => "Popular",
            SortKey::TopRated => "Top Rated",
            SortKey::LowestRated => "Lowest Rated",
            SortKey::MostVoted => "Most Voted",
            SortKey::Latest => "Latest Release",
            SortKey::Oldest => "Oldest Release",
            SortKey::HighestRevenue => "Highest Revenue",
            SortKey::TitleAsc => "Title A-Z",
            SortKey::TitleDesc => "Title Z-A",
        }
    }

    // `popularity.desc` is read as `popular`.
    pub fn parse(kind: MediaKind, value: &str) -> Option<SortKey> {
        let value = value.trim();
        if value == "popularity.desc" {
            return Some(SortKey::Popular);
        }
        Self::available(kind)
            .iter()
            .copied()
            .find(|key| key.value(kind) == value)
    }

    pub fn parse_or_default(kind: MediaKind, value: Option<&str>) -> SortKey {
        value
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| Self::parse(kind, v))
            .unwrap_or_default()
    }

    pub fn options(kind: MediaKind) -> Vec<SortOption> {
        Self::available(kind)
            .iter()
            .map(|key| SortOption {
                value: key.value(kind),
                label: key.label(),
            })
            .collect()
    }
}
