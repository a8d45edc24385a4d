//! Schedule sources and the registry that picks one per source id.

mod alias;
mod embedded;
mod table;

pub use alias::source_slug;
pub use embedded::EmbeddedProvider;
pub use table::TableProvider;

use crate::config::SourcesConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::types::{Group, ScheduleData};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// A source of groups and schedules.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Source id this provider serves, e.g. "togu".
    fn slug(&self) -> &str;

    /// Lists the groups the source knows.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Fetches the schedule of the group labelled `group`.
    async fn get_schedule(&self, group: &str) -> Result<ScheduleData>;
}

/// The provider selected for a source id.
pub enum Provider<F> {
    /// Data assigned to script variables in the page
    Embedded(EmbeddedProvider<F>),
    /// HTML tables, one page per group
    Table(TableProvider<F>),
}

type Constructor<F> = fn(&str, Arc<F>, &SourcesConfig) -> Result<Provider<F>>;

fn table_constructor<F: Fetcher>(
    slug: &str,
    fetcher: Arc<F>,
    sources: &SourcesConfig,
) -> Result<Provider<F>> {
    Ok(Provider::Table(TableProvider::new(slug, fetcher, sources)?))
}

/// Registered non-default strategies, keyed by source id.
fn registry<F: Fetcher>(sources: &SourcesConfig) -> Vec<(String, Constructor<F>)> {
    sources
        .table_slugs
        .iter()
        .map(|slug| (slug.to_lowercase(), table_constructor::<F> as Constructor<F>))
        .collect()
}

/// Picks the provider for `slug`, which may also be a university name.
///
/// Ids without a registered strategy fall back to the embedded-data one.
pub fn get_provider<F: Fetcher>(
    slug: &str,
    fetcher: Arc<F>,
    sources: &SourcesConfig,
) -> Result<Provider<F>> {
    let slug = source_slug(slug).unwrap_or_else(|| {
        warn!(name = %slug, "Unknown university name, using it as the source id");
        slug.trim().to_lowercase()
    });
    match registry::<F>(sources)
        .into_iter()
        .find(|(registered, _)| *registered == slug)
    {
        Some((_, construct)) => {
            debug!(slug = %slug, "Using table provider");
            construct(&slug, fetcher, sources)
        }
        None => {
            debug!(slug = %slug, "Using embedded-data provider");
            Ok(Provider::Embedded(EmbeddedProvider::new(&slug, fetcher, sources)))
        }
    }
}

#[async_trait]
impl<F: Fetcher> ScheduleProvider for Provider<F> {
    fn slug(&self) -> &str {
        match self {
            Provider::Embedded(provider) => provider.slug(),
            Provider::Table(provider) => provider.slug(),
        }
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        match self {
            Provider::Embedded(provider) => provider.list_groups().await,
            Provider::Table(provider) => provider.list_groups().await,
        }
    }

    async fn get_schedule(&self, group: &str) -> Result<ScheduleData> {
        match self {
            Provider::Embedded(provider) => provider.get_schedule(group).await,
            Provider::Table(provider) => provider.get_schedule(group).await,
        }
    }
}
