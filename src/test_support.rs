//! Shared fixtures for unit tests: synthetic listings tables and temp stores.

use crate::artifact::{ArtifactDraft, ArtifactManifest, ArtifactStore, FsArtifactStore};
use crate::dataset::Dataset;
use crate::dataset::schema::{EXPECTED_COLUMNS, EXPECTED_GROUPS};
use csv::StringRecord;
use std::path::Path;
use tempfile::TempDir;

/// One synthetic listing; unspecified columns get plausible filler.
#[derive(Debug, Clone)]
pub(crate) struct Listing {
    pub id: usize,
    pub group: String,
    pub latitude: String,
    pub longitude: String,
    pub price: String,
    pub last_review: String,
}

impl Listing {
    pub(crate) fn new(id: usize, group: &str, latitude: f64, longitude: f64, price: f64) -> Self {
        Self {
            id,
            group: group.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            price: price.to_string(),
            last_review: "2019-05-21".to_string(),
        }
    }

    pub(crate) fn with_price(mut self, price: &str) -> Self {
        self.price = price.to_string();
        self
    }

    pub(crate) fn with_last_review(mut self, last_review: &str) -> Self {
        self.last_review = last_review.to_string();
        self
    }

    fn record(&self) -> StringRecord {
        EXPECTED_COLUMNS
            .iter()
            .map(|column| match *column {
                "id" => self.id.to_string(),
                "name" => format!("Listing {}", self.id),
                "host_id" => (1000 + self.id).to_string(),
                "host_name" => "Host".to_string(),
                "neighbourhood_group" => self.group.clone(),
                "neighbourhood" => "Somewhere".to_string(),
                "latitude" => self.latitude.clone(),
                "longitude" => self.longitude.clone(),
                "room_type" => "Private room".to_string(),
                "price" => self.price.clone(),
                "last_review" => self.last_review.clone(),
                _ => "1".to_string(),
            })
            .collect()
    }
}

/// Build a full-schema dataset from listings.
pub(crate) fn listings_dataset(listings: &[Listing]) -> Dataset {
    let columns = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = listings.iter().map(Listing::record).collect();
    Dataset::new(columns, rows).unwrap()
}

/// `n` in-bounds listings cycling through all boroughs, prices offset by `price_shift`.
pub(crate) fn sample_listings(n: usize, price_shift: f64) -> Vec<Listing> {
    (0..n)
        .map(|i| {
            let group = EXPECTED_GROUPS[i % EXPECTED_GROUPS.len()];
            let price = 20.0 + ((i * 37) % 280) as f64 + price_shift;
            let latitude = 40.6 + ((i * 13) % 50) as f64 / 100.0;
            let longitude = -74.1 + ((i * 7) % 50) as f64 / 100.0;
            Listing::new(i + 1, group, latitude, longitude, price)
        })
        .collect()
}

/// Shorthand for a full-schema dataset of `n` sample listings.
pub(crate) fn sample_dataset(n: usize, price_shift: f64) -> Dataset {
    listings_dataset(&sample_listings(n, price_shift))
}

/// A fresh store rooted inside a temp directory.
pub(crate) fn create_test_store() -> (TempDir, FsArtifactStore) {
    let temp = TempDir::new().unwrap();
    let store = FsArtifactStore::new(temp.path().join("store"));
    (temp, store)
}

/// Publish a single-file artifact whose file is named after the artifact.
pub(crate) fn publish_file(
    store: &FsArtifactStore,
    dir: &Path,
    name: &str,
    artifact_type: &str,
    content: &str,
) -> ArtifactManifest {
    let staging = dir.join("staging").join(store.list().unwrap().len().to_string());
    std::fs::create_dir_all(&staging).unwrap();
    let file = staging.join(name);
    std::fs::write(&file, content).unwrap();

    store
        .publish(&ArtifactDraft::new(name, artifact_type, "test fixture").with_file(&file))
        .unwrap()
}
