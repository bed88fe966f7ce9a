//! The fixed listings schema and the domain constants checks rely on.

pub const ID: &str = "id";
pub const NEIGHBOURHOOD_GROUP: &str = "neighbourhood_group";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const PRICE: &str = "price";
pub const LAST_REVIEW: &str = "last_review";

/// Columns of a listings table, in file order.
pub const EXPECTED_COLUMNS: [&str; 16] = [
    "id",
    "name",
    "host_id",
    "host_name",
    "neighbourhood_group",
    "neighbourhood",
    "latitude",
    "longitude",
    "room_type",
    "price",
    "minimum_nights",
    "number_of_reviews",
    "last_review",
    "reviews_per_month",
    "calculated_host_listings_count",
    "availability_365",
];

/// The five boroughs; `neighbourhood_group` must take exactly these values.
pub const EXPECTED_GROUPS: [&str; 5] = ["Manhattan", "Brooklyn", "Queens", "Bronx", "Staten Island"];

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive membership; a missing value is never inside.
    pub fn contains(&self, value: Option<f64>) -> bool {
        matches!(value, Some(v) if v >= self.min && v <= self.max)
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Longitude range of the New York City area.
pub const LONGITUDE_BOUNDS: Bounds = Bounds::new(-74.25, -73.50);

/// Latitude range of the New York City area.
pub const LATITUDE_BOUNDS: Bounds = Bounds::new(40.5, 41.2);
