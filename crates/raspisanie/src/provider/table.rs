//! Sources that publish one HTML table page per group (togudv.ru).

use super::ScheduleProvider;
use crate::config::SourcesConfig;
use crate::error::{Result, ScheduleError};
use crate::fetch::Fetcher;
use crate::resolver::resolve;
use crate::table::{listing_to_groups, parse_group_listing, parse_schedule_page};
use crate::types::{pair_time_table, Group, Schedule, ScheduleData};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use url::Url;

pub struct TableProvider<F> {
    slug: String,
    groups_url: Url,
    fetcher: Arc<F>,
}

impl<F: Fetcher> TableProvider<F> {
    pub fn new(slug: &str, fetcher: Arc<F>, sources: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            slug: slug.to_lowercase(),
            groups_url: Url::parse(&sources.table_groups_url)?,
            fetcher,
        })
    }

    /// Fetches the listing page and maps group labels to ids.
    async fn fetch_listing(&self) -> Result<BTreeMap<String, String>> {
        let html = self.fetcher.fetch(self.groups_url.as_str()).await?;
        let listing = parse_group_listing(&html);
        if listing.is_empty() {
            return Err(ScheduleError::ListingUnavailable {
                url: self.groups_url.to_string(),
            });
        }
        Ok(listing)
    }

    fn group_url(&self, group_id: &str) -> Result<Url> {
        Ok(self.groups_url.join(&format!("{group_id}/"))?)
    }

    fn provider_name(&self) -> String {
        self.groups_url
            .host_str()
            .map(|host| host.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| self.slug.clone())
    }
}

#[async_trait]
impl<F: Fetcher> ScheduleProvider for TableProvider<F> {
    fn slug(&self) -> &str {
        &self.slug
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let listing = self.fetch_listing().await?;
        info!(slug = %self.slug, groups = listing.len(), "Listed groups");
        Ok(listing_to_groups(&listing))
    }

    async fn get_schedule(&self, group: &str) -> Result<ScheduleData> {
        let listing = self.fetch_listing().await?;
        let resolution = resolve(group, &listing)?;

        let source = self.group_url(&resolution.id)?;
        let html = self.fetcher.fetch(source.as_str()).await?;
        let days = parse_schedule_page(&html, &self.groups_url);

        info!(
            slug = %self.slug,
            group = %resolution.label,
            group_id = %resolution.id,
            days = days.len(),
            "Parsed table schedule"
        );

        Ok(ScheduleData::Table(Schedule {
            provider: self.provider_name(),
            group: resolution.label,
            group_id: resolution.id,
            source: source.to_string(),
            retrieved_at: Utc::now(),
            pair_times: pair_time_table(),
            days,
        }))
    }
}
