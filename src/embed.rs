use anyhow::Context;
use reqwest::{redirect, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::models::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedTarget {
    pub kind: MediaKind,
    pub id: i64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl EmbedTarget {
    pub fn movie(id: i64) -> Self {
        Self {
            kind: MediaKind::Movie,
            id,
            season: None,
            episode: None,
        }
    }

    pub fn series(id: i64) -> Self {
        Self {
            kind: MediaKind::Series,
            id,
            season: None,
            episode: None,
        }
    }

    pub fn season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }
}

#[derive(Debug, Clone)]
pub struct AvailabilityProber {
    client: Client,
    base_url: String,
}

impl AvailabilityProber {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Redirects stay visible: a 302 from the provider counts as available.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build embed HTTP client")?;
        Ok(Self {
            client,
            base_url: config.embed_base_url.clone(),
        })
    }

    pub fn embed_url(&self, target: &EmbedTarget) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.base_url,
            target.kind.path_segment(),
            target.id
        );
        if target.kind == MediaKind::Series {
            if let Some(season) = target.season {
                url.push_str(&format!("/{season}"));
                if let Some(episode) = target.episode {
                    url.push_str(&format!("/{episode}"));
                }
            }
        }
        url
    }

    // 200 and 302 count as available. Never cached.
    pub async fn probe(&self, target: &EmbedTarget) -> bool {
        let url = self.embed_url(target);
        match self.client.head(&url).send().await {
            Ok(res) => {
                let status = res.status();
                debug!(url = %url, status = status.as_u16(), "Embed probe answered");
                is_available_status(status)
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Embed probe failed");
                false
            }
        }
    }
}

fn is_available_status(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::FOUND
}
