//! Sources that embed their data in page scripts (dnevuch.ru).

use super::ScheduleProvider;
use crate::config::SourcesConfig;
use crate::embedded::{extract, extract_lenient, ScriptVariable};
use crate::error::{Result, ScheduleError};
use crate::fetch::Fetcher;
use crate::types::{Group, ScheduleData};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

pub struct EmbeddedProvider<F> {
    slug: String,
    base_url: String,
    fetcher: Arc<F>,
}

impl<F: Fetcher> EmbeddedProvider<F> {
    pub fn new(slug: &str, fetcher: Arc<F>, sources: &SourcesConfig) -> Self {
        let slug = slug.to_lowercase();
        let base_url = sources.embedded_url_template.replace("{slug}", &slug);
        Self {
            slug,
            base_url,
            fetcher,
        }
    }

    /// Page URL of one group's schedule.
    fn schedule_url(&self, group: &str) -> Result<String> {
        let url = Url::parse_with_params(&self.base_url, &[("group", group)])?;
        Ok(url.to_string())
    }
}

/// Reads a string field, accepting numbers too.
fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn group_from_item(item: &Value) -> Option<Group> {
    let label = text_field(item, "number").or_else(|| text_field(item, "name"))?;
    Some(Group {
        display_name: label.clone(),
        internal_id: label,
        direction: text_field(item, "direction").or_else(|| text_field(item, "faculty")),
    })
}

#[async_trait]
impl<F: Fetcher> ScheduleProvider for EmbeddedProvider<F> {
    fn slug(&self) -> &str {
        &self.slug
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let page = self.fetcher.fetch(&self.base_url).await?;
        let groups = extract(&page, ScriptVariable::Groups)?.ok_or_else(|| {
            ScheduleError::ListingUnavailable {
                url: self.base_url.clone(),
            }
        })?;

        let items = groups.as_array().map(Vec::as_slice).unwrap_or_default();
        let listed: Vec<Group> = items.iter().filter_map(group_from_item).collect();
        if listed.len() < items.len() {
            warn!(
                slug = %self.slug,
                skipped = items.len() - listed.len(),
                "Skipped group entries without a label"
            );
        }

        info!(slug = %self.slug, groups = listed.len(), "Listed groups");
        Ok(listed)
    }

    async fn get_schedule(&self, group: &str) -> Result<ScheduleData> {
        let url = self.schedule_url(group)?;
        let page = self.fetcher.fetch(&url).await?;

        match extract(&page, ScriptVariable::Schedule)? {
            Some(schedule) => {
                info!(slug = %self.slug, group = %group, "Extracted embedded schedule");
                Ok(ScheduleData::Embedded(schedule))
            }
            None => {
                let hint = extract_lenient(&page, ScriptVariable::Info)
                    .and_then(|info| text_field(&info, "url"));
                Err(ScheduleError::ScheduleNotFound {
                    group: group.to_string(),
                    hint,
                })
            }
        }
    }
}
