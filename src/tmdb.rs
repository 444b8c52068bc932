use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::catalog::UpstreamQuery;
use crate::config::Config;
use crate::error::{TmdbError, TmdbResult};
use crate::models::{
    Episode, Genre, GenreList, ListPage, MediaKind, MovieDetails, RawMedia, SeasonDetails,
    SeriesDetails,
};
use crate::ratings::{ContentRatings, ReleaseDates};

const LANGUAGE: &str = "en-US";

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn list(&self, query: &UpstreamQuery) -> TmdbResult<ListPage<RawMedia>>;
    async fn search_multi(&self, query: &str, page: u32) -> TmdbResult<ListPage<RawMedia>>;
    async fn genres(&self, kind: MediaKind) -> TmdbResult<Vec<Genre>>;
    async fn movie_release_dates(&self, id: i64) -> TmdbResult<ReleaseDates>;
    async fn tv_content_ratings(&self, id: i64) -> TmdbResult<ContentRatings>;
    async fn movie_details(&self, id: i64) -> TmdbResult<MovieDetails>;
    async fn tv_details(&self, id: i64) -> TmdbResult<SeriesDetails>;
    async fn season_details(&self, tv_id: i64, season: u32) -> TmdbResult<SeasonDetails>;
    async fn episode_details(&self, tv_id: i64, season: u32, episode: u32)
        -> TmdbResult<Episode>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let user_agent = format!("cinecatalog/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.tmdb_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> TmdbResult<T> {
        let url = self.url(endpoint, params);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            debug!(endpoint, status = status.as_u16(), "TMDB request rejected");
            return Err(TmdbError::status(endpoint, status.as_u16()));
        }
        let text = res.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn list(&self, query: &UpstreamQuery) -> TmdbResult<ListPage<RawMedia>> {
        let params: Vec<(&str, &str)> = query
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.get_json(&query.endpoint, &params).await
    }

    async fn search_multi(&self, query: &str, page: u32) -> TmdbResult<ListPage<RawMedia>> {
        let page = page.to_string();
        self.get_json(
            "/search/multi",
            &[
                ("query", query),
                ("page", page.as_str()),
                ("include_adult", "false"),
                ("language", LANGUAGE),
            ],
        )
        .await
    }

    async fn genres(&self, kind: MediaKind) -> TmdbResult<Vec<Genre>> {
        let endpoint = format!("/genre/{}/list", kind.path_segment());
        let list: GenreList = self.get_json(&endpoint, &[("language", LANGUAGE)]).await?;
        Ok(list.genres)
    }

    async fn movie_release_dates(&self, id: i64) -> TmdbResult<ReleaseDates> {
        self.get_json(&format!("/movie/{id}/release_dates"), &[])
            .await
    }

    async fn tv_content_ratings(&self, id: i64) -> TmdbResult<ContentRatings> {
        self.get_json(&format!("/tv/{id}/content_ratings"), &[])
            .await
    }

    async fn movie_details(&self, id: i64) -> TmdbResult<MovieDetails> {
        self.get_json(
            &format!("/movie/{id}"),
            &[
                ("append_to_response", "credits,release_dates"),
                ("language", LANGUAGE),
            ],
        )
        .await
    }

    async fn tv_details(&self, id: i64) -> TmdbResult<SeriesDetails> {
        self.get_json(
            &format!("/tv/{id}"),
            &[
                ("append_to_response", "credits,content_ratings"),
                ("language", LANGUAGE),
            ],
        )
        .await
    }

    async fn season_details(&self, tv_id: i64, season: u32) -> TmdbResult<SeasonDetails> {
        self.get_json(
            &format!("/tv/{tv_id}/season/{season}"),
            &[("language", LANGUAGE)],
        )
        .await
    }

    async fn episode_details(
        &self,
        tv_id: i64,
        season: u32,
        episode: u32,
    ) -> TmdbResult<Episode> {
        self.get_json(
            &format!("/tv/{tv_id}/season/{season}/episode/{episode}"),
            &[("language", LANGUAGE)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_attaches_key_and_encodes_values() {
        let client = TmdbClient::new(&Config::new("k3y").with_tmdb_base("http://tmdb.test/3"))
            .expect("client builds");
        let url = client.url(
            "/search/multi",
            &[("query", "the office & co"), ("vote_count.gte", "100")],
        );
        assert_eq!(
            url,
            "http://tmdb.test/3/search/multi?api_key=k3y&query=the%20office%20%26%20co&vote_count.gte=100"
        );
    }
}
