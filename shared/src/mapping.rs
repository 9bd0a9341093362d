//! Declarative mapping from Notion page properties to `NormalizedRecord`.
//!
//! Which properties hold the title and the schedule differs per database, so
//! the names are resolved once at cold start instead of being probed inline.

use std::fmt;
use std::str::FromStr;

use crate::models::NormalizedRecord;
use crate::notion::{NotionPage, PropertyValue};
use crate::{Error, Result};

pub const DEFAULT_TITLE_PLACEHOLDER: &str = "No Title";
pub const DEFAULT_STATUS_PLACEHOLDER: &str = "No Status";

/// How a schedule property is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Select,
    Status,
    Date,
}

impl FromStr for ScheduleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "select" => Ok(ScheduleKind::Select),
            "status" => Ok(ScheduleKind::Status),
            "date" => Ok(ScheduleKind::Date),
            other => Err(Error::Config(format!(
                "Unknown schedule kind '{}' (expected select, status or date)",
                other
            ))),
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScheduleKind::Select => "select",
            ScheduleKind::Status => "status",
            ScheduleKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// One `Property:kind` entry of the schedule lookup chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleField {
    pub property: String,
    pub kind: ScheduleKind,
}

impl ScheduleField {
    pub fn new(property: impl Into<String>, kind: ScheduleKind) -> Self {
        Self {
            property: property.into(),
            kind,
        }
    }
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.property, self.kind)
    }
}

impl FromStr for ScheduleField {
    type Err = Error;

    /// Parses `Status:select`. The property name may itself contain `:`, the
    /// kind is taken from after the last one.
    fn from_str(s: &str) -> Result<Self> {
        let (property, kind) = s.trim().rsplit_once(':').ok_or_else(|| {
            Error::Config(format!(
                "Schedule field '{}' must look like Property:kind",
                s.trim()
            ))
        })?;
        let property = property.trim();
        if property.is_empty() {
            return Err(Error::Config(format!(
                "Schedule field '{}' has an empty property name",
                s.trim()
            )));
        }
        Ok(Self::new(property, kind.parse()?))
    }
}

/// Property names and placeholders used to normalize rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Title candidates, first present wins.
    pub title_properties: Vec<String>,
    /// Schedule candidates, first one yielding a value wins.
    pub schedule_fields: Vec<ScheduleField>,
    pub title_placeholder: String,
    pub status_placeholder: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            title_properties: vec!["Name".to_string(), "이름".to_string()],
            schedule_fields: vec![
                ScheduleField::new("Status", ScheduleKind::Select),
                ScheduleField::new("Status", ScheduleKind::Status),
                ScheduleField::new("Date", ScheduleKind::Date),
            ],
            title_placeholder: DEFAULT_TITLE_PLACEHOLDER.to_string(),
            status_placeholder: DEFAULT_STATUS_PLACEHOLDER.to_string(),
        }
    }
}

impl FieldMapping {
    /// Parse a comma-separated list of title property names.
    pub fn parse_title_properties(raw: &str) -> Result<Vec<String>> {
        let names: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if names.is_empty() {
            return Err(Error::Config(
                "NOTION_TITLE_PROPERTIES names no properties".to_string(),
            ));
        }
        Ok(names)
    }

    /// Parse a comma-separated list of `Property:kind` entries.
    pub fn parse_schedule_fields(raw: &str) -> Result<Vec<ScheduleField>> {
        let fields = raw
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ScheduleField>>>()?;

        if fields.is_empty() {
            return Err(Error::Config(
                "NOTION_SCHEDULE_FIELDS names no properties".to_string(),
            ));
        }
        Ok(fields)
    }

    /// Map one page into the widget's shape.
    pub fn normalize(&self, page: &NotionPage) -> NormalizedRecord {
        NormalizedRecord {
            id: page.id.clone(),
            title: self
                .extract_title(page)
                .unwrap_or_else(|| self.title_placeholder.clone()),
            status: self
                .extract_status(page)
                .unwrap_or_else(|| self.status_placeholder.clone()),
        }
    }

    /// Map every page, preserving order.
    pub fn normalize_all(&self, pages: &[NotionPage]) -> Vec<NormalizedRecord> {
        pages.iter().map(|page| self.normalize(page)).collect()
    }

    fn extract_title(&self, page: &NotionPage) -> Option<String> {
        self.title_properties
            .iter()
            .find_map(|name| page.properties.get(name))
            .and_then(|value| match value {
                PropertyValue::Title { title } => title.first(),
                PropertyValue::RichText { rich_text } => rich_text.first(),
                _ => None,
            })
            .map(|segment| segment.plain_text.clone())
    }

    fn extract_status(&self, page: &NotionPage) -> Option<String> {
        self.schedule_fields.iter().find_map(|field| {
            let value = page.properties.get(&field.property)?;
            match (field.kind, value) {
                (ScheduleKind::Select, PropertyValue::Select { select }) => {
                    select.as_ref().map(|option| option.name.clone())
                }
                (ScheduleKind::Status, PropertyValue::Status { status }) => {
                    status.as_ref().map(|option| option.name.clone())
                }
                (ScheduleKind::Date, PropertyValue::Date { date }) => {
                    date.as_ref().map(|date| date.to_schedule_string())
                }
                _ => None,
            }
        })
    }
}
