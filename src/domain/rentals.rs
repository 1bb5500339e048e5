use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EquipmentType {
    Portable,
    #[serde(rename = "Heavy Duty")]
    HeavyDuty,
    Emergency,
    Commercial,
}

impl EquipmentType {
    pub fn label(&self) -> &'static str {
        match self {
            EquipmentType::Portable => "Portable",
            EquipmentType::HeavyDuty => "Heavy Duty",
            EquipmentType::Emergency => "Emergency",
            EquipmentType::Commercial => "Commercial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
    Available,
    Limited,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentalPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl RentalPeriod {
    /// Anything other than `weekly` or `monthly` is billed daily.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("weekly") => RentalPeriod::Weekly,
            Some("monthly") => RentalPeriod::Monthly,
            _ => RentalPeriod::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RentalPeriod::Daily => "daily",
            RentalPeriod::Weekly => "weekly",
            RentalPeriod::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalEquipment {
    pub id: u32,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub power: &'static str,
    pub battery_capacity: &'static str,
    pub charging_speed: &'static str,
    pub daily_rate: u32,
    pub weekly_rate: u32,
    pub monthly_rate: u32,
    pub rating: f64,
    pub reviews: u32,
    pub availability: Availability,
    pub features: &'static [&'static str],
    pub image: &'static str,
    pub description: &'static str,
    pub delivery: bool,
    pub setup_included: bool,
}

impl RentalEquipment {
    pub fn rate_for(&self, period: RentalPeriod) -> u32 {
        match period {
            RentalPeriod::Daily => self.daily_rate,
            RentalPeriod::Weekly => self.weekly_rate,
            RentalPeriod::Monthly => self.monthly_rate,
        }
    }
}

pub const RENTAL_EQUIPMENT: &[RentalEquipment] = &[
    RentalEquipment {
        id: 1,
        name: "EcoGen Portable Pro",
        equipment_type: EquipmentType::Portable,
        power: "3.5kW",
        battery_capacity: "50kWh",
        charging_speed: "Up to 22kW",
        daily_rate: 45,
        weekly_rate: 280,
        monthly_rate: 950,
        rating: 4.8,
        reviews: 127,
        availability: Availability::Available,
        features: &[
            "Weatherproof",
            "Mobile App Control",
            "Solar Compatible",
            "Quiet Operation",
        ],
        image: "🔋",
        description: "Perfect for home emergency backup and overnight EV charging. Lightweight and portable.",
        delivery: true,
        setup_included: true,
    },
    RentalEquipment {
        id: 2,
        name: "PowerMax Heavy Duty",
        equipment_type: EquipmentType::HeavyDuty,
        power: "10kW",
        battery_capacity: "150kWh",
        charging_speed: "Up to 50kW",
        daily_rate: 95,
        weekly_rate: 620,
        monthly_rate: 2100,
        rating: 4.9,
        reviews: 89,
        availability: Availability::Limited,
        features: &[
            "Fast Charging",
            "Multiple Outputs",
            "Professional Grade",
            "24/7 Monitoring",
        ],
        image: "⚡",
        description: "High-capacity generator for commercial use or multiple vehicle charging.",
        delivery: true,
        setup_included: true,
    },
    RentalEquipment {
        id: 3,
        name: "QuickCharge Emergency",
        equipment_type: EquipmentType::Emergency,
        power: "2kW",
        battery_capacity: "25kWh",
        charging_speed: "Up to 11kW",
        daily_rate: 25,
        weekly_rate: 150,
        monthly_rate: 500,
        rating: 4.6,
        reviews: 203,
        availability: Availability::Available,
        features: &[
            "Compact Design",
            "Quick Deployment",
            "Emergency Ready",
            "USB Ports",
        ],
        image: "🚨",
        description: "Compact emergency charging solution for unexpected situations.",
        delivery: true,
        setup_included: false,
    },
    RentalEquipment {
        id: 4,
        name: "CommercialMax Pro",
        equipment_type: EquipmentType::Commercial,
        power: "25kW",
        battery_capacity: "500kWh",
        charging_speed: "Up to 150kW",
        daily_rate: 185,
        weekly_rate: 1200,
        monthly_rate: 4500,
        rating: 5.0,
        reviews: 34,
        availability: Availability::Available,
        features: &[
            "Ultra Fast Charging",
            "Fleet Ready",
            "Grid Integration",
            "Professional Installation",
        ],
        image: "🏭",
        description: "Enterprise-grade solution for commercial fleets and high-demand applications.",
        delivery: true,
        setup_included: true,
    },
    RentalEquipment {
        id: 5,
        name: "SolarSync Hybrid",
        equipment_type: EquipmentType::Portable,
        power: "5kW",
        battery_capacity: "75kWh",
        charging_speed: "Up to 32kW",
        daily_rate: 65,
        weekly_rate: 400,
        monthly_rate: 1350,
        rating: 4.7,
        reviews: 156,
        availability: Availability::Available,
        features: &[
            "Solar Integration",
            "Grid Backup",
            "Smart Scheduling",
            "Weather Resistant",
        ],
        image: "☀️",
        description: "Hybrid solar-compatible generator for sustainable charging solutions.",
        delivery: true,
        setup_included: true,
    },
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalFilter {
    pub query: String,
    pub category: Option<String>,
}

impl RentalFilter {
    pub fn new(query: Option<&str>, category: Option<&str>) -> Self {
        let category = category
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty() && value != "all");

        Self {
            query: query.unwrap_or_default().trim().to_lowercase(),
            category,
        }
    }

    pub fn matches(&self, equipment: &RentalEquipment) -> bool {
        let matches_search = self.query.is_empty()
            || equipment.name.to_lowercase().contains(&self.query)
            || equipment.description.to_lowercase().contains(&self.query);
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| equipment.equipment_type.label().to_lowercase() == category);

        matches_search && matches_category
    }

    pub fn apply(&self) -> Vec<&'static RentalEquipment> {
        RENTAL_EQUIPMENT
            .iter()
            .filter(|equipment| self.matches(equipment))
            .collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RentalRequestError {
    #[error("equipment not found")]
    NotFound,
    #[error("{name} is currently not available for rental.")]
    Unavailable { name: &'static str },
}

pub fn request_rental(id: u32) -> Result<(&'static RentalEquipment, String), RentalRequestError> {
    request_rental_from(RENTAL_EQUIPMENT, id)
}

pub fn request_rental_from(
    catalog: &[RentalEquipment],
    id: u32,
) -> Result<(&RentalEquipment, String), RentalRequestError> {
    let equipment = catalog
        .iter()
        .find(|equipment| equipment.id == id)
        .ok_or(RentalRequestError::NotFound)?;

    if equipment.availability == Availability::Unavailable {
        return Err(RentalRequestError::Unavailable {
            name: equipment.name,
        });
    }

    let message = format!(
        "Your request for {} has been submitted. We'll contact you shortly.",
        equipment.name
    );
    Ok((equipment, message))
}

#[cfg(test)]
mod tests {
    use super::{
        Availability, RENTAL_EQUIPMENT, RentalEquipment, RentalFilter, RentalPeriod,
        RentalRequestError, request_rental, request_rental_from,
    };

    fn ids(filter: &RentalFilter) -> Vec<u32> {
        filter.apply().iter().map(|equipment| equipment.id).collect()
    }

    #[test]
    fn category_filter_is_case_insensitive_and_all_matches_everything() {
        assert_eq!(ids(&RentalFilter::new(None, Some("portable"))), vec![1, 5]);
        assert_eq!(ids(&RentalFilter::new(None, Some("HEAVY DUTY"))), vec![2]);
        assert_eq!(ids(&RentalFilter::new(None, Some("all"))).len(), RENTAL_EQUIPMENT.len());
        assert_eq!(ids(&RentalFilter::new(None, None)).len(), RENTAL_EQUIPMENT.len());
    }

    #[test]
    fn search_covers_name_and_description() {
        assert_eq!(ids(&RentalFilter::new(Some("solar"), None)), vec![5]);
        assert_eq!(ids(&RentalFilter::new(Some("fleets"), Some("commercial"))), vec![4]);
        assert!(ids(&RentalFilter::new(Some("fleets"), Some("portable"))).is_empty());
    }

    #[test]
    fn rate_follows_selected_period() {
        let equipment = &RENTAL_EQUIPMENT[0];
        assert_eq!(equipment.rate_for(RentalPeriod::parse(None)), 45);
        assert_eq!(equipment.rate_for(RentalPeriod::parse(Some("Weekly"))), 280);
        assert_eq!(equipment.rate_for(RentalPeriod::parse(Some("monthly"))), 950);
        assert_eq!(RentalPeriod::parse(Some("hourly")), RentalPeriod::Daily);
    }

    #[test]
    fn rental_request_confirms_available_equipment() {
        let (equipment, message) = request_rental(2).expect("limited stock is still rentable");
        assert_eq!(equipment.name, "PowerMax Heavy Duty");
        assert_eq!(
            message,
            "Your request for PowerMax Heavy Duty has been submitted. We'll contact you shortly."
        );
        assert_eq!(request_rental(42), Err(RentalRequestError::NotFound));
    }

    #[test]
    fn unavailable_equipment_cannot_be_requested() {
        let catalog = vec![RentalEquipment {
            availability: Availability::Unavailable,
            ..RENTAL_EQUIPMENT[2].clone()
        }];

        let error = request_rental_from(&catalog, 3).expect_err("equipment is rented out");

        assert_eq!(
            error,
            RentalRequestError::Unavailable {
                name: "QuickCharge Emergency"
            }
        );
        assert_eq!(
            error.to_string(),
            "QuickCharge Emergency is currently not available for rental."
        );
    }
}
