use serde::{Deserialize, Serialize};

use crate::domain::clock::{TimestampMs, timestamp_to_iso8601};
use crate::domain::geo::{Coordinates, ViewportBounds};
use crate::domain::models::RankedStation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Generation(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub bounds: ViewportBounds,
    pub reference: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Idle,
    Timer,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Idle => "idle",
            RefreshTrigger::Timer => "timer",
        }
    }
}

/// Stamp carried by an in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshTicket {
    pub generation: Generation,
    pub viewport: Viewport,
    pub trigger: RefreshTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied {
        generation: Generation,
        marker_count: usize,
    },
    Stale {
        generation: Generation,
        latest: Generation,
    },
    EmptyKept {
        generation: Generation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerState {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub title: String,
    pub position: Coordinates,
    pub state: MarkerState,
    pub station: RankedStation,
}

impl Marker {
    pub fn for_station(station: RankedStation) -> Self {
        let state = if station.station.is_available() {
            MarkerState::Available
        } else {
            MarkerState::Unavailable
        };

        Self {
            title: station.station.name.clone(),
            position: station.station.coordinates(),
            state,
            station,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSnapshot {
    pub generation: Option<Generation>,
    pub latest_issued: Generation,
    pub viewport: Option<Viewport>,
    pub updated_at: Option<String>,
    pub markers: Vec<Marker>,
}

/// Current marker set for one map view.
///
/// Every dispatched refresh takes the next generation; a result is applied
/// only if no newer refresh was dispatched after it, so the last-issued
/// refresh wins regardless of the order in which responses arrive.
#[derive(Debug, Clone, Default)]
pub struct MarkerBoard {
    issued: u64,
    applied: Option<Generation>,
    viewport: Option<Viewport>,
    markers: Vec<Marker>,
    updated_at: Option<TimestampMs>,
}

impl MarkerBoard {
    pub fn new(viewport: Option<Viewport>) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    pub fn latest_issued(&self) -> Generation {
        Generation(self.issued)
    }

    /// Returns `None` until a viewport is known.
    pub fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Option<RefreshTicket> {
        let viewport = self.viewport?;
        self.issued += 1;

        Some(RefreshTicket {
            generation: Generation(self.issued),
            viewport,
            trigger,
        })
    }

    pub fn complete_refresh(
        &mut self,
        ticket: &RefreshTicket,
        stations: Vec<RankedStation>,
        at: TimestampMs,
    ) -> RefreshOutcome {
        let latest = self.latest_issued();
        if ticket.generation < latest {
            return RefreshOutcome::Stale {
                generation: ticket.generation,
                latest,
            };
        }

        if stations.is_empty() {
            return RefreshOutcome::EmptyKept {
                generation: ticket.generation,
            };
        }

        // markers are replaced wholesale; no identity is kept between refreshes
        self.markers = stations.into_iter().map(Marker::for_station).collect();
        self.applied = Some(ticket.generation);
        self.updated_at = Some(at);

        RefreshOutcome::Applied {
            generation: ticket.generation,
            marker_count: self.markers.len(),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn snapshot(&self) -> MarkerSnapshot {
        MarkerSnapshot {
            generation: self.applied,
            latest_issued: self.latest_issued(),
            viewport: self.viewport,
            updated_at: self.updated_at.map(timestamp_to_iso8601),
            markers: self.markers.clone(),
        }
    }
}
