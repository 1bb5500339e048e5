use serde::{Deserialize, Serialize};

pub const PROFILE_UPDATED_TITLE: &str = "Profile Updated";
pub const PROFILE_UPDATED_MESSAGE: &str = "Your profile information has been saved successfully.";

const GREEN_MILES_PER_KWH: f64 = 0.89;
const CARBON_LBS_PER_TREE: f64 = 22.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl Default for ProfileDetails {
    fn default() -> Self {
        Self {
            name: "Alex Johnson".to_string(),
            email: "alex.johnson@email.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            location: "San Francisco, CA".to_string(),
        }
    }
}

impl ProfileDetails {
    /// First letter of each name part, e.g. "AJ".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// Fields left out of the request keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, current: ProfileDetails) -> ProfileDetails {
        let pick = |update: Option<String>, current: String| {
            update.map(|value| value.trim().to_string()).unwrap_or(current)
        };

        ProfileDetails {
            name: pick(self.name, current.name),
            email: pick(self.email, current.email),
            phone: pick(self.phone, current.phone),
            location: pick(self.location, current.location),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_charges: u32,
    pub total_kwh: u32,
    pub carbon_saved_lbs: u32,
    pub rating: f64,
    pub money_spent: f64,
    pub money_earned: f64,
}

pub const USER_STATS: UserStats = UserStats {
    total_charges: 47,
    total_kwh: 1234,
    carbon_saved_lbs: 156,
    rating: 4.9,
    money_spent: 245.67,
    money_earned: 89.34,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub fast_charging: f64,
    pub normal_charging: f64,
    pub peer_to_peer: f64,
}

pub const MONTHLY_EXPENSES: ExpenseBreakdown = ExpenseBreakdown {
    fast_charging: 156.23,
    normal_charging: 67.89,
    peer_to_peer: 21.55,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingSummary {
    pub sessions_hosted: u32,
    pub kwh_provided: u32,
    pub host_rating: f64,
}

pub const HOSTING_SUMMARY: HostingSummary = HostingSummary {
    sessions_hosted: 12,
    kwh_provided: 248,
    host_rating: 4.8,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub carbon_saved_lbs: u32,
    pub green_miles: u32,
    pub trees_planted: u32,
}

impl EnvironmentalImpact {
    pub fn from_stats(stats: &UserStats) -> Self {
        Self {
            carbon_saved_lbs: stats.carbon_saved_lbs,
            green_miles: (f64::from(stats.total_kwh) * GREEN_MILES_PER_KWH).round() as u32,
            trees_planted: (f64::from(stats.carbon_saved_lbs) / CARBON_LBS_PER_TREE).round() as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u32,
    pub make: &'static str,
    pub model: &'static str,
    pub year: u16,
    pub battery: &'static str,
    pub efficiency: &'static str,
    pub is_primary: bool,
    pub current_charge_percent: u8,
    pub range_left_miles: u32,
}

pub const VEHICLES: &[Vehicle] = &[
    Vehicle {
        id: 1,
        make: "Tesla",
        model: "Model 3",
        year: 2023,
        battery: "75kWh",
        efficiency: "4.1 mi/kWh",
        is_primary: true,
        current_charge_percent: 87,
        range_left_miles: 245,
    },
    Vehicle {
        id: 2,
        make: "BMW",
        model: "iX3",
        year: 2022,
        battery: "80kWh",
        efficiency: "3.8 mi/kWh",
        is_primary: false,
        current_charge_percent: 87,
        range_left_miles: 245,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingSession {
    pub id: u32,
    pub date: &'static str,
    pub location: &'static str,
    pub duration: &'static str,
    pub kwh: f64,
    pub cost: f64,
    #[serde(rename = "type")]
    pub charging_type: &'static str,
}

pub const CHARGING_HISTORY: &[ChargingSession] = &[
    ChargingSession {
        id: 1,
        date: "2024-01-15",
        location: "Evadoom Station Alpha",
        duration: "2h 15m",
        kwh: 45.5,
        cost: 15.93,
        charging_type: "Fast Charging",
    },
    ChargingSession {
        id: 2,
        date: "2024-01-12",
        location: "Sarah M. (Peer)",
        duration: "4h 30m",
        kwh: 32.2,
        cost: 6.44,
        charging_type: "Peer-to-Peer",
    },
    ChargingSession {
        id: 3,
        date: "2024-01-10",
        location: "PowerHub Central",
        duration: "1h 45m",
        kwh: 28.8,
        cost: 7.20,
        charging_type: "Normal Charging",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDashboard {
    pub details: ProfileDetails,
    pub initials: String,
    pub stats: UserStats,
    pub expenses: ExpenseBreakdown,
    pub hosting: HostingSummary,
    pub impact: EnvironmentalImpact,
    pub vehicles: &'static [Vehicle],
    pub charging_history: &'static [ChargingSession],
}

pub fn dashboard(details: ProfileDetails) -> ProfileDashboard {
    ProfileDashboard {
        initials: details.initials(),
        details,
        stats: USER_STATS,
        expenses: MONTHLY_EXPENSES,
        hosting: HOSTING_SUMMARY,
        impact: EnvironmentalImpact::from_stats(&USER_STATS),
        vehicles: VEHICLES,
        charging_history: CHARGING_HISTORY,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EnvironmentalImpact, ProfileDetails, ProfileUpdate, USER_STATS, VEHICLES, dashboard,
    };

    #[test]
    fn impact_is_derived_from_stats() {
        let impact = EnvironmentalImpact::from_stats(&USER_STATS);

        assert_eq!(impact.carbon_saved_lbs, 156);
        assert_eq!(impact.green_miles, 1098);
        assert_eq!(impact.trees_planted, 7);
    }

    #[test]
    fn dashboard_carries_initials_and_primary_vehicle() {
        let dashboard = dashboard(ProfileDetails::default());

        assert_eq!(dashboard.initials, "AJ");
        assert_eq!(dashboard.charging_history.len(), 3);
        assert_eq!(
            VEHICLES.iter().filter(|vehicle| vehicle.is_primary).count(),
            1
        );
    }

    #[test]
    fn update_replaces_only_sent_fields() {
        let update = ProfileUpdate {
            name: Some("  Sam Rivera ".to_string()),
            location: Some("Oakland, CA".to_string()),
            ..ProfileUpdate::default()
        };

        let details = update.apply(ProfileDetails::default());

        assert_eq!(details.name, "Sam Rivera");
        assert_eq!(details.location, "Oakland, CA");
        assert_eq!(details.email, "alex.johnson@email.com");
        assert_eq!(details.initials(), "SR");
    }
}
