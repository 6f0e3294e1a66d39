//! Geographic adjustments: travel cost, distance, and region friction
//! between a soldier's home station and the billet location.
//!
//! # Reference
//!
//! - Sinnott, R. W. (1984). "Virtues of the Haversine". Sky and Telescope
//!   68(2), 159. Great-circle distance formula.

use super::{CostLayer, LayerContext, LayerReport};
use crate::models::CostMatrix;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolves locations to distances, regions, and dollar travel costs.
///
/// Every method returns `None` for locations the model does not know;
/// [`GeographicLayer`] then leaves the pair untouched and counts it as
/// degraded instead of failing the run.
pub trait TravelCostModel: Send + Sync + std::fmt::Debug {
    /// Region tag for a known location.
    fn region_of(&self, location: &str) -> Option<&str>;

    /// Great-circle miles between two known locations.
    fn distance_miles(&self, from: &str, to: &str) -> Option<f64>;

    /// Estimated movement cost in dollars for one soldier.
    fn travel_cost(&self, from: &str, to: &str, duration_days: u32, cross_region: bool)
        -> Option<f64>;
}

/// A named point with a region tag.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, clamped to [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, clamped to [-180, 180].
    pub lon: f64,
    /// Region tag used for cross-region checks.
    pub region: String,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64, region: impl Into<String>) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lon: lon.clamp(-180.0, 180.0),
            region: region.into(),
        }
    }
}

const EARTH_RADIUS_MILES: f64 = 3958.8;
const MAX_DISTANCE_MILES: f64 = 15_000.0;

fn haversine_miles(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (lon2 - lon1) / 2.0;
    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Great-circle travel model over a registered location table.
///
/// Movement cost is a distance-tiered base fare plus a per-diem charge for
/// the tour duration. Tiers approximate ground moves under 500 miles,
/// domestic flights under 3000, and intercontinental lift beyond that.
#[derive(Debug, Clone, Default)]
pub struct HaversineTravelModel {
    locations: HashMap<String, GeoPoint>,
}

impl HaversineTravelModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location; replaces any previous point under the same name.
    pub fn with_location(mut self, name: impl Into<String>, point: GeoPoint) -> Self {
        self.locations.insert(name.into(), point);
        self
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl TravelCostModel for HaversineTravelModel {
    fn region_of(&self, location: &str) -> Option<&str> {
        self.locations.get(location).map(|p| p.region.as_str())
    }

    fn distance_miles(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.locations.get(from)?;
        let b = self.locations.get(to)?;
        Some(haversine_miles(a, b).min(MAX_DISTANCE_MILES))
    }

    fn travel_cost(
        &self,
        from: &str,
        to: &str,
        duration_days: u32,
        cross_region: bool,
    ) -> Option<f64> {
        let miles = self.distance_miles(from, to)?;
        let base = if miles < 500.0 {
            150.0 + 0.67 * miles
        } else if miles < 3000.0 {
            400.0 + 0.15 * miles
        } else {
            1200.0 + 0.20 * miles
        };
        let per_diem = if cross_region { 200.0 } else { 150.0 };
        let days = duration_days.clamp(1, 365) as f64;
        Some(base + per_diem * days)
    }
}

/// Travel cost, distance, and region adjustments per soldier/billet pair.
pub struct GeographicLayer {
    model: Arc<dyn TravelCostModel>,
    duration_days: u32,
}

impl GeographicLayer {
    /// Default tour length priced into the travel cost, in days.
    pub const DEFAULT_DURATION_DAYS: u32 = 14;

    pub fn new(model: Arc<dyn TravelCostModel>) -> Self {
        Self {
            model,
            duration_days: Self::DEFAULT_DURATION_DAYS,
        }
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }
}

impl std::fmt::Debug for GeographicLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeographicLayer")
            .field("duration_days", &self.duration_days)
            .finish()
    }
}

impl CostLayer for GeographicLayer {
    fn name(&self) -> &'static str {
        "geography"
    }

    fn description(&self) -> &'static str {
        "travel cost, distance, and region adjustments"
    }

    fn apply(&self, matrix: &mut CostMatrix, context: &LayerContext) -> LayerReport {
        let weight = context.policy.get("travel_cost_weight");
        let per_thousand = context.policy.get("distance_penalty_per_1000");
        let cross_penalty = context.policy.get("cross_region_penalty");
        let same_bonus = context.policy.get("same_region_bonus");

        let mut report = LayerReport::default();
        let mut unresolved: HashSet<&str> = HashSet::new();

        for (row, soldier) in context.soldiers.iter().enumerate() {
            for (col, billet) in context.billets.iter().enumerate() {
                let from = soldier.home_location.as_str();
                let to = billet.location.as_str();
                if from.is_empty() || to.is_empty() {
                    report.degraded += 1;
                    continue;
                }

                let resolved = (
                    self.model.distance_miles(from, to),
                    self.model.region_of(from),
                    self.model.region_of(to),
                );
                let (Some(miles), Some(from_region), Some(to_region)) = resolved else {
                    for location in [from, to] {
                        if self.model.region_of(location).is_none()
                            && unresolved.insert(location)
                        {
                            tracing::warn!(location, "unknown location; geographic terms skipped");
                        }
                    }
                    report.degraded += 1;
                    continue;
                };

                let cross = from_region != to_region;
                let Some(travel) = self.model.travel_cost(from, to, self.duration_days, cross)
                else {
                    report.degraded += 1;
                    continue;
                };

                let region_term = if cross { cross_penalty } else { same_bonus };
                let delta = weight * travel + per_thousand * miles / 1000.0 + region_term;
                if delta != 0.0 {
                    matrix.add(row, col, delta);
                    report.adjusted += 1;
                    report.total_delta += delta;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Billet, PolicyConfiguration, Soldier};

    fn equator(lon: f64, region: &str) -> GeoPoint {
        GeoPoint::new(0.0, lon, region)
    }

    fn make_model() -> HaversineTravelModel {
        HaversineTravelModel::new()
            .with_location("benning", equator(0.0, "southeast"))
            .with_location("stewart", equator(2.0, "southeast"))
            .with_location("lewis", equator(30.0, "northwest"))
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0, "r");
        let b = GeoPoint::new(1.0, 0.0, "r");
        let miles = haversine_miles(&a, &b);
        assert!((miles - 69.1).abs() < 0.5);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let model = make_model();
        let out = model.distance_miles("benning", "lewis");
        let back = model.distance_miles("lewis", "benning");
        assert!((out.unwrap() - back.unwrap()).abs() < 1e-9);
        assert!(model.distance_miles("benning", "benning").unwrap() < 1e-9);
        assert!(model.distance_miles("benning", "nowhere").is_none());
    }

    #[test]
    fn test_travel_cost_tiers_and_per_diem() {
        let model = make_model();
        // benning -> stewart is ~138 miles: ground tier, same region.
        let short = model.travel_cost("benning", "stewart", 14, false).unwrap();
        let miles = model.distance_miles("benning", "stewart").unwrap();
        assert!((short - (150.0 + 0.67 * miles + 150.0 * 14.0)).abs() < 1e-6);

        // benning -> lewis is ~2073 miles: flight tier, cross region.
        let long = model.travel_cost("benning", "lewis", 14, true).unwrap();
        let far = model.distance_miles("benning", "lewis").unwrap();
        assert!((long - (400.0 + 0.15 * far + 200.0 * 14.0)).abs() < 1e-6);

        // Duration zero is billed as a single day.
        let day = model.travel_cost("benning", "stewart", 0, false).unwrap();
        assert!((day - (150.0 + 0.67 * miles + 150.0)).abs() < 1e-6);
    }

    fn geography_fixture() -> (Vec<Soldier>, Vec<Billet>, PolicyConfiguration) {
        let soldiers = vec![
            Soldier::new(0, "S-1", "11B", 5).with_home("benning"),
            Soldier::new(1, "S-2", "11B", 5).with_home("lewis"),
        ];
        let billets = vec![Billet::new(0, "B-1", "11B").with_location("stewart")];
        let policy = PolicyConfiguration::zeroed()
            .with_weight("distance_penalty_per_1000", 100.0)
            .with_weight("cross_region_penalty", 500.0)
            .with_weight("same_region_bonus", -300.0);
        (soldiers, billets, policy)
    }

    #[test]
    fn test_layer_composes_distance_and_region_terms() {
        let (soldiers, billets, policy) = geography_fixture();
        let model = make_model();
        let near = model.distance_miles("benning", "stewart").unwrap();
        let far = model.distance_miles("lewis", "stewart").unwrap();

        let layer = GeographicLayer::new(Arc::new(model));
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            vec!["S-1".to_string(), "S-2".to_string()],
            vec!["B-1".to_string()],
        );
        let report = layer.apply(&mut matrix, &context);

        assert_eq!(report.adjusted, 2);
        assert_eq!(report.degraded, 0);
        assert!((matrix.get(0, 0) - (100.0 * near / 1000.0 - 300.0)).abs() < 1e-9);
        assert!((matrix.get(1, 0) - (100.0 * far / 1000.0 + 500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_location_skips_pair_and_counts_degraded() {
        let soldiers = vec![
            Soldier::new(0, "S-1", "11B", 5).with_home("atlantis"),
            Soldier::new(1, "S-2", "11B", 5).with_home("benning"),
            Soldier::new(2, "S-3", "11B", 5), // no home on file
        ];
        let billets = vec![Billet::new(0, "B-1", "11B").with_location("stewart")];
        let policy = PolicyConfiguration::new("defaults");
        let layer = GeographicLayer::new(Arc::new(make_model()));
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            vec!["B-1".to_string()],
        );

        let report = layer.apply(&mut matrix, &context);

        assert_eq!(report.degraded, 2);
        assert_eq!(report.adjusted, 1);
        assert!(matrix.get(0, 0).abs() < 1e-10);
        assert!(matrix.get(2, 0).abs() < 1e-10);
        assert!(matrix.get(1, 0) > 0.0);
    }
}
