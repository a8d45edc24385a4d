//! Class-schedule scraper for university timetable sites.
//!
//! Two kinds of sources are supported: pages that embed their data as
//! script-assigned JSON (dnevuch.ru) and pages that publish one HTML table
//! per group (togudv.ru). Both end up as a [`ScheduleData`] through the
//! [`ScheduleProvider`] picked by [`get_provider`].

pub mod config;
pub mod embedded;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod table;
pub mod types;

pub use config::{Config, FetcherConfig, SourcesConfig};
pub use error::{Result, ScheduleError};
pub use fetch::{Fetcher, HttpFetcher};
pub use provider::{get_provider, Provider, ScheduleProvider};
pub use types::{Day, Group, Lesson, PairInfo, Room, Schedule, ScheduleData, Teacher, WeekType};
