use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for recipient organizations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Food categories a donation may belong to and a recipient may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Produce,
    Dairy,
    Bakery,
    Meat,
    PreparedMeals,
    Frozen,
    Pantry,
    Beverages,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 8] = [
        FoodCategory::Produce,
        FoodCategory::Dairy,
        FoodCategory::Bakery,
        FoodCategory::Meat,
        FoodCategory::PreparedMeals,
        FoodCategory::Frozen,
        FoodCategory::Pantry,
        FoodCategory::Beverages,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Produce => "produce",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Bakery => "bakery",
            FoodCategory::Meat => "meat",
            FoodCategory::PreparedMeals => "prepared_meals",
            FoodCategory::Frozen => "frozen",
            FoodCategory::Pantry => "pantry",
            FoodCategory::Beverages => "beverages",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a category label does not name a known [`FoodCategory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown food category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for FoodCategory {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "produce" | "fruit" | "vegetables" => Ok(FoodCategory::Produce),
            "dairy" => Ok(FoodCategory::Dairy),
            "bakery" | "bread" => Ok(FoodCategory::Bakery),
            "meat" | "protein" => Ok(FoodCategory::Meat),
            "prepared_meals" | "prepared" | "cooked" => Ok(FoodCategory::PreparedMeals),
            "frozen" => Ok(FoodCategory::Frozen),
            "pantry" | "dry_goods" | "canned" => Ok(FoodCategory::Pantry),
            "beverages" | "drinks" => Ok(FoodCategory::Beverages),
            _ => Err(UnknownCategory(raw.trim().to_string())),
        }
    }
}

/// Coordinates expressed in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Validated perishable donation. Built through [`super::intake::DonationGuard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub quantity: u32,
    pub category: FoodCategory,
    /// Hours remaining until the donation expires.
    pub expiry_hours: f64,
    pub origin: GeoPoint,
}

/// Receiving window advertised by a recipient. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupWindow {
    pub day: Weekday,
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl fmt::Display for PickupWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.opens.format("%H:%M"),
            self.closes.format("%H:%M")
        )
    }
}

/// Recipient organization able to take a share of a donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub accepted_categories: BTreeSet<FoodCategory>,
    pub capacity: u32,
    pub location: GeoPoint,
    pub reliability: f64,
    pub recent_donations: u32,
    #[serde(default)]
    pub schedule: Vec<PickupWindow>,
}

impl Candidate {
    pub fn accepts(&self, category: FoodCategory) -> bool {
        self.accepted_categories.contains(&category)
    }
}

/// Candidate as seen by a scorer during one allocation round: the caller's record paired with
/// the capacity still available in the current call.
#[derive(Debug, Clone, Copy)]
pub struct CandidateView<'a> {
    pub candidate: &'a Candidate,
    pub capacity: u32,
}

impl<'a> CandidateView<'a> {
    /// View carrying the record's own capacity, useful outside the allocation loop.
    pub fn fresh(candidate: &'a Candidate) -> Self {
        Self {
            candidate,
            capacity: candidate.capacity,
        }
    }
}

/// One share of a donation assigned to a recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub allocated_quantity: u32,
    pub score: f64,
}
