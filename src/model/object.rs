//! Tracked objects: one close-approach record as served by the feed.
//!
//! Field names follow the feed's snake_case JSON so that the persisted
//! observed set and the feed payload share a single schema.

use serde::{Deserialize, Serialize};

/// A near-Earth object and its close-approach entries.
///
/// Identity is [`TrackedObject::id`]; every other field is descriptive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    #[serde(rename = "neo_reference_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub nasa_jpl_url: String,

    #[serde(default)]
    pub absolute_magnitude_h: f64,

    #[serde(default)]
    pub estimated_diameter: EstimatedDiameter,

    #[serde(rename = "is_potentially_hazardous_asteroid", default)]
    pub hazardous: bool,

    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,

    #[serde(default)]
    pub links: Links,
}

impl TrackedObject {
    /// The first close-approach entry, which drives filtering and ordering.
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }
}

/// One pass of the object near an orbiting body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    /// Calendar date of the approach, `YYYY-MM-DD`.
    pub close_approach_date: String,

    #[serde(default)]
    pub epoch_date_close_approach: i64,

    #[serde(default)]
    pub relative_velocity: RelativeVelocity,

    #[serde(default)]
    pub miss_distance: MissDistance,

    pub orbiting_body: String,
}

/// Velocities are kept as the feed's decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default)]
    pub kilometers_per_second: String,
    #[serde(default)]
    pub kilometers_per_hour: String,
    #[serde(default)]
    pub miles_per_hour: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    #[serde(default)]
    pub astronomical: String,
    #[serde(default)]
    pub lunar: String,
    #[serde(default)]
    pub kilometers: String,
    #[serde(default)]
    pub miles: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diameter {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

impl Diameter {
    /// Midpoint of the estimate.
    pub fn mean(&self) -> f64 {
        f64::midpoint(self.estimated_diameter_min, self.estimated_diameter_max)
    }
}

/// Size estimates in several units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default)]
    pub kilometers: Diameter,
    #[serde(default)]
    pub meters: Diameter,
    #[serde(default)]
    pub miles: Diameter,
    #[serde(default)]
    pub feet: Diameter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, rename = "self")]
    pub self_link: String,
}
