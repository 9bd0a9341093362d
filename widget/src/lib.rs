//! Canvas widget for the Notion relay.
//!
//! Fetches normalized records from the relay, keeps them in host-synced state,
//! and renders them as a list or as a month calendar.

pub mod calendar;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod list;
pub mod store;

pub use calendar::{CalendarEvent, CalendarView, DayCell};
pub use client::{RecordFetcher, RelayClient};
pub use config::WidgetConfig;
pub use controller::Widget;
pub use error::{Result, WidgetError};
pub use list::ListView;
pub use store::{JsonFileStore, MemoryStore, StateStore, SyncedState, WidgetState};
