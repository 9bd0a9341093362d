//! Widget lifecycle: fetch-on-mount, manual refresh, month navigation.
//!
//! State lives behind an async mutex that is never held across the relay
//! call, so a manual refresh can overlap a fetch already in flight. Whichever
//! response lands last wins.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::calendar::CalendarView;
use crate::client::RecordFetcher;
use crate::list::ListView;
use crate::store::{StateStore, SyncedState, WidgetState};
use crate::Result;

pub struct Widget<F, S> {
    fetcher: F,
    state: Mutex<SyncedState<S>>,
    mounted: AtomicBool,
}

impl<F: RecordFetcher, S: StateStore> Widget<F, S> {
    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            state: Mutex::new(SyncedState::load(store)),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Copy of the current synced state.
    pub async fn snapshot(&self) -> WidgetState {
        self.state.lock().await.view().clone()
    }

    /// Run the first fetch if nothing was ever loaded.
    ///
    /// Fires at most once per widget instance, and only when data is empty,
    /// nothing is loading and no error is shown. Returns whether a fetch ran.
    pub async fn mount(&self) -> Result<bool> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            debug!("Widget already mounted");
            return Ok(false);
        }

        let needs_fetch = self.state.lock().await.view().needs_initial_fetch();
        if !needs_fetch {
            return Ok(false);
        }

        info!("No data yet, fetching on mount");
        self.load_data().await?;
        Ok(true)
    }

    /// User-initiated reload. Ignores the loading flag.
    pub async fn refresh(&self) -> Result<()> {
        self.load_data().await
    }

    /// Fetch from the relay and apply the outcome.
    ///
    /// Fetch failures are recorded in `errorMsg` and keep the previous data.
    /// Only state-store failures are returned as errors.
    pub async fn load_data(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.set_loading(true)?;
            if let Err(e) = state.set_error_msg("") {
                // A persisted loading flag would block every later mount.
                if let Err(reset) = state.set_loading(false) {
                    warn!("Failed to reset loading flag: {}", reset);
                }
                return Err(e);
            }
        }

        let outcome = self.fetcher.fetch().await;

        let mut state = self.state.lock().await;
        let applied = match outcome {
            Ok(response) => match response.results {
                Some(results) => {
                    info!("Loaded {} records", results.len());
                    state.set_data(results)
                }
                None => {
                    warn!("Relay response had no results; keeping current data");
                    Ok(())
                }
            },
            Err(e) => {
                error!("Failed to fetch notion data: {}", e);
                state.set_error_msg(e.to_string())
            }
        };
        let reset = state.set_loading(false);

        applied.and(reset)
    }

    /// Show the previous month. Returns the new offset.
    pub async fn prev_month(&self) -> Result<i32> {
        self.shift_month(-1).await
    }

    /// Show the next month. Returns the new offset.
    pub async fn next_month(&self) -> Result<i32> {
        self.shift_month(1).await
    }

    async fn shift_month(&self, delta: i32) -> Result<i32> {
        let mut state = self.state.lock().await;
        let offset = state.view().month_offset.saturating_add(delta);
        state.set_month_offset(offset)?;
        Ok(offset)
    }

    pub async fn list_view(&self) -> ListView {
        ListView::build(self.state.lock().await.view())
    }

    pub async fn calendar_view(&self, today: NaiveDate) -> Result<CalendarView> {
        let state = self.state.lock().await;
        let view = state.view();
        CalendarView::build(&view.data, today, view.month_offset)
    }
}
