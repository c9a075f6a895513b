//! Country layer: boundary features and their projected shapes.

use super::{AzimuthalEquidistant, ProjectedShape};
use geo_types::{Coord, MultiPolygon};
use std::collections::HashMap;

/// A named country boundary decoded from the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// Stable identity used to reconcile feature sets.
    pub id: String,
    /// Display name; empty when the dataset has none.
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// A feature together with its current projection.
#[derive(Debug, Clone)]
pub struct ProjectedCountry {
    pub feature: CountryFeature,
    pub shape: ProjectedShape,
    /// Label anchor in view space.
    pub centroid: Option<Coord<f64>>,
}

impl ProjectedCountry {
    fn new(feature: CountryFeature) -> Self {
        Self {
            feature,
            shape: ProjectedShape::default(),
            centroid: None,
        }
    }

    fn reproject(&mut self, projection: &AzimuthalEquidistant) {
        self.shape = ProjectedShape::project(projection, &self.feature.geometry);
        self.centroid = self.shape.centroid();
    }
}

/// Counts of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// All country shapes drawn by the map, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct CountryLayer {
    countries: Vec<ProjectedCountry>,
}

impl CountryLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectedCountry> {
        self.countries.iter()
    }

    /// Replaces the feature set, matching entries by feature id.
    ///
    /// Existing entries whose id reappears keep their slot's projection
    /// until the next [`CountryLayer::reproject`]; ids that disappear are
    /// removed. Order follows the incoming features.
    pub fn reconcile(&mut self, features: Vec<CountryFeature>) -> ReconcileStats {
        let mut existing: HashMap<String, ProjectedCountry> = self
            .countries
            .drain(..)
            .map(|c| (c.feature.id.clone(), c))
            .collect();

        let mut stats = ReconcileStats::default();
        for feature in features {
            let entry = match existing.remove(&feature.id) {
                Some(mut current) => {
                    stats.updated += 1;
                    if current.feature != feature {
                        current.feature = feature;
                        current.shape = ProjectedShape::default();
                        current.centroid = None;
                    }
                    current
                }
                None => {
                    stats.entered += 1;
                    ProjectedCountry::new(feature)
                }
            };
            self.countries.push(entry);
        }
        stats.exited = existing.len();

        stats
    }

    /// Recomputes every shape and label anchor.
    pub fn reproject(&mut self, projection: &AzimuthalEquidistant) {
        for country in &mut self.countries {
            country.reproject(projection);
        }
    }
}
