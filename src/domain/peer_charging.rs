use serde::Serialize;
use thiserror::Error;

pub const NEARBY_THRESHOLD_M: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChargerType {
    Type2,
    #[serde(rename = "CCS2")]
    Ccs2,
    #[serde(rename = "CHAdeMO")]
    Chademo,
}

impl ChargerType {
    pub fn label(&self) -> &'static str {
        match self {
            ChargerType::Type2 => "Type2",
            ChargerType::Ccs2 => "CCS2",
            ChargerType::Chademo => "CHAdeMO",
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, ChargerType::Ccs2 | ChargerType::Chademo)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerCharger {
    pub id: u32,
    pub name: &'static str,
    pub rating: f64,
    pub reviews: u32,
    pub distance: &'static str,
    pub price: &'static str,
    pub charger_type: ChargerType,
    pub available: bool,
    pub response_time: &'static str,
    pub verified: bool,
    pub image: &'static str,
    pub description: &'static str,
    pub amenities: &'static [&'static str],
}

impl PeerCharger {
    /// Parses display distances such as `300m` or `1.2km`.
    pub fn distance_meters(&self) -> Option<f64> {
        let raw = self.distance.trim();
        if let Some(km) = raw.strip_suffix("km") {
            return km.trim().parse::<f64>().ok().map(|value| value * 1000.0);
        }
        raw.strip_suffix('m')
            .and_then(|m| m.trim().parse::<f64>().ok())
    }

    /// Chat address derived from the display name, e.g. `Sarah M.` -> `Sarah-M`.
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .replacen('.', "", 1)
    }
}

pub const PEER_CHARGERS: &[PeerCharger] = &[
    PeerCharger {
        id: 1,
        name: "Sarah M.",
        rating: 4.9,
        reviews: 47,
        distance: "300m",
        price: "$0.20/kWh",
        charger_type: ChargerType::Type2,
        available: true,
        response_time: "~5 min",
        verified: true,
        image: "👩‍💼",
        description: "Home garage charging available. Easy access, safe neighborhood.",
        amenities: &["Covered", "WiFi", "Restroom"],
    },
    PeerCharger {
        id: 2,
        name: "Mike R.",
        rating: 4.7,
        reviews: 33,
        distance: "850m",
        price: "$0.18/kWh",
        charger_type: ChargerType::Ccs2,
        available: true,
        response_time: "~10 min",
        verified: true,
        image: "👨‍💻",
        description: "Fast charging available in my driveway. Usually available weekends.",
        amenities: &["Fast Charging", "Security Cam"],
    },
    PeerCharger {
        id: 3,
        name: "Jennifer L.",
        rating: 5.0,
        reviews: 62,
        distance: "1.2km",
        price: "$0.22/kWh",
        charger_type: ChargerType::Type2,
        available: false,
        response_time: "~3 min",
        verified: true,
        image: "👩‍🔬",
        description: "Premium charging setup with monitoring. Very reliable service.",
        amenities: &["Covered", "WiFi", "Snacks", "Monitoring"],
    },
    PeerCharger {
        id: 4,
        name: "Alex K.",
        rating: 4.8,
        reviews: 29,
        distance: "950m",
        price: "$0.19/kWh",
        charger_type: ChargerType::Chademo,
        available: true,
        response_time: "~7 min",
        verified: false,
        image: "👨‍🎓",
        description: "Student housing area. Flexible timing, great for overnight charging.",
        amenities: &["24/7 Access", "Student Discount"],
    },
    PeerCharger {
        id: 5,
        name: "Maria S.",
        rating: 4.6,
        reviews: 18,
        distance: "1.8km",
        price: "$0.16/kWh",
        charger_type: ChargerType::Type2,
        available: true,
        response_time: "~15 min",
        verified: true,
        image: "👩‍🍳",
        description: "Family home with electric setup. Kid-friendly area, coffee available.",
        amenities: &["Kid-friendly", "Coffee", "Pet-friendly"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerTab {
    All,
    #[default]
    Available,
    Nearby,
    Fast,
}

impl PeerTab {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(PeerTab::All),
            "available" => Some(PeerTab::Available),
            "nearby" => Some(PeerTab::Nearby),
            "fast" => Some(PeerTab::Fast),
            _ => None,
        }
    }

    fn matches(&self, charger: &PeerCharger) -> bool {
        match self {
            PeerTab::All => true,
            PeerTab::Available => charger.available,
            PeerTab::Nearby => charger
                .distance_meters()
                .is_some_and(|meters| meters < NEARBY_THRESHOLD_M),
            PeerTab::Fast => charger.charger_type.is_fast(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerFilter {
    pub query: String,
    pub charger_type: Option<ChargerType>,
    pub tab: PeerTab,
}

impl PeerFilter {
    /// Unknown type values match every charger; an unknown tab falls back to
    /// the default `available` tab.
    pub fn new(query: Option<&str>, charger_type: Option<&str>, tab: Option<&str>) -> Self {
        let charger_type = match charger_type.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if value == "type2" => Some(ChargerType::Type2),
            Some(value) if value == "ccs2" => Some(ChargerType::Ccs2),
            Some(value) if value == "chademo" => Some(ChargerType::Chademo),
            _ => None,
        };

        Self {
            query: query.unwrap_or_default().trim().to_lowercase(),
            charger_type,
            tab: tab.and_then(PeerTab::parse).unwrap_or_default(),
        }
    }

    pub fn matches(&self, charger: &PeerCharger) -> bool {
        let matches_search = self.query.is_empty()
            || charger.name.to_lowercase().contains(&self.query)
            || charger.description.to_lowercase().contains(&self.query)
            || charger
                .amenities
                .iter()
                .any(|amenity| amenity.to_lowercase().contains(&self.query));
        let matches_type = self
            .charger_type
            .is_none_or(|kind| charger.charger_type == kind);

        matches_search && matches_type && self.tab.matches(charger)
    }

    pub fn apply(&self) -> Vec<&'static PeerCharger> {
        PEER_CHARGERS
            .iter()
            .filter(|charger| self.matches(charger))
            .collect()
    }
}

pub fn find_peer_charger(id: u32) -> Option<&'static PeerCharger> {
    PEER_CHARGERS.iter().find(|charger| charger.id == id)
}

pub fn find_host_by_slug(slug: &str) -> Option<&'static PeerCharger> {
    PEER_CHARGERS
        .iter()
        .find(|charger| charger.slug().eq_ignore_ascii_case(slug.trim()))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeerRequestError {
    #[error("charger not found")]
    NotFound,
    #[error("{name} is currently busy. Try messaging them to check availability.")]
    Busy { name: &'static str },
}

/// Sends a charging request to a host; only available hosts accept one.
pub fn request_charging(id: u32) -> Result<(&'static PeerCharger, String), PeerRequestError> {
    let charger = find_peer_charger(id).ok_or(PeerRequestError::NotFound)?;
    if !charger.available {
        return Err(PeerRequestError::Busy { name: charger.name });
    }

    let message = format!(
        "{} will respond in {}. You'll receive a notification once confirmed.",
        charger.name, charger.response_time
    );
    Ok((charger, message))
}
