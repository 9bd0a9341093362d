//! Flat list view of the fetched records.

use std::fmt;

use crate::store::WidgetState;

pub const HEADER: &str = "Notion Tasks";
pub const EMPTY_MESSAGE: &str = "No items found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub status: String,
}

/// What the list variant shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub refresh_label: &'static str,
    pub error_line: Option<String>,
    pub empty_message: Option<&'static str>,
    /// Records in response order.
    pub items: Vec<ListItem>,
}

impl ListView {
    pub fn build(state: &WidgetState) -> Self {
        let refresh_label = if state.loading { "Refreshing..." } else { "Refresh" };

        let error_line = (!state.error_msg.is_empty()).then(|| {
            format!("Error: {}. (Check URL or Notion Token)", state.error_msg)
        });

        let empty_message = (!state.loading && state.data.is_empty() && state.error_msg.is_empty())
            .then_some(EMPTY_MESSAGE);

        let items = state
            .data
            .iter()
            .map(|record| ListItem {
                title: record.title.clone(),
                status: record.status.clone(),
            })
            .collect();

        Self {
            refresh_label,
            error_line,
            empty_message,
            items,
        }
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", HEADER, self.refresh_label)?;
        if let Some(error) = &self.error_line {
            writeln!(f, "{}", error)?;
        }
        if let Some(message) = self.empty_message {
            writeln!(f, "{}", message)?;
        }
        for item in &self.items {
            writeln!(f, "  {:<30} ({})", item.title, item.status)?;
        }
        Ok(())
    }
}
