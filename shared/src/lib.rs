//! Shared library for the Notion relay.
//!
//! This crate provides the error taxonomy, configuration, Notion client and the
//! row mapping used by the relay Lambda, plus the record types the widget
//! consumes.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod models;
pub mod notion;

pub use auth::{verify_widget_key, WIDGET_KEY_HEADER};
pub use config::{NotionCredentials, RelayConfig};
pub use error::{Error, Result};
pub use mapping::{FieldMapping, ScheduleField, ScheduleKind};
pub use models::{ErrorBody, InfoBody, NormalizedRecord, RelayResponse};
pub use notion::{DatabaseSource, NotionClient, NotionPage, QueryPage};
