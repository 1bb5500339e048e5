use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::app::services::{FeedError, StationFeedService};
use crate::domain::clock::Clock;
use crate::domain::marker_board::{
    MarkerBoard, MarkerSnapshot, RefreshOutcome, RefreshTrigger, Viewport,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("marker board lock poisoned")]
    BoardLockPoisoned,
    #[error("station refresh failed: {0}")]
    Feed(#[from] FeedError),
}

/// Keeps the shared marker board in step with the station feed.
///
/// Refreshes may overlap; the board's generation counter decides which
/// result is kept.
#[derive(Clone)]
pub struct MarkerSyncService {
    board: Arc<Mutex<MarkerBoard>>,
    feed: StationFeedService,
    clock: Arc<dyn Clock>,
}

impl MarkerSyncService {
    pub fn new(feed: StationFeedService, clock: Arc<dyn Clock>, viewport: Option<Viewport>) -> Self {
        Self {
            board: Arc::new(Mutex::new(MarkerBoard::new(viewport))),
            feed,
            clock,
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) -> Result<(), SyncError> {
        let mut board = self.board.lock().map_err(|_| SyncError::BoardLockPoisoned)?;
        board.set_viewport(viewport);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<MarkerSnapshot, SyncError> {
        let board = self.board.lock().map_err(|_| SyncError::BoardLockPoisoned)?;
        Ok(board.snapshot())
    }

    /// Returns `Ok(None)` when no viewport has been set yet.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<Option<RefreshOutcome>, SyncError> {
        let ticket = {
            let mut board = self.board.lock().map_err(|_| SyncError::BoardLockPoisoned)?;
            board.begin_refresh(trigger)
        };
        let Some(ticket) = ticket else {
            tracing::debug!(trigger = trigger.as_str(), "refresh skipped without viewport");
            return Ok(None);
        };

        let stations = match self.feed.fetch_viewport(&ticket.viewport).await {
            Ok(stations) => stations,
            Err(error) => {
                tracing::warn!(
                    generation = ticket.generation.0,
                    trigger = trigger.as_str(),
                    error = %error,
                    "marker refresh failed"
                );
                return Err(SyncError::Feed(error));
            }
        };

        let outcome = {
            let mut board = self.board.lock().map_err(|_| SyncError::BoardLockPoisoned)?;
            board.complete_refresh(&ticket, stations, self.clock.now())
        };

        match outcome {
            RefreshOutcome::Applied {
                generation,
                marker_count,
            } => tracing::info!(
                generation = generation.0,
                marker_count,
                trigger = trigger.as_str(),
                "markers replaced"
            ),
            RefreshOutcome::Stale { generation, latest } => tracing::debug!(
                generation = generation.0,
                latest = latest.0,
                "stale refresh discarded"
            ),
            RefreshOutcome::EmptyKept { generation } => tracing::debug!(
                generation = generation.0,
                "empty refresh; keeping markers"
            ),
        }

        Ok(Some(outcome))
    }

    /// Fires a timer refresh every `period`. Each refresh runs as its own task
    /// so a slow provider never delays the next tick.
    pub async fn run_refresh_loop(self, period: Duration) {
        let mut interval = actix_web::rt::time::interval(period);

        loop {
            interval.tick().await;

            let sync = self.clone();
            actix_web::rt::spawn(async move {
                if let Err(error) = sync.refresh(RefreshTrigger::Timer).await {
                    tracing::debug!(error = %error, "timer refresh ended with error");
                }
            });
        }
    }
}
