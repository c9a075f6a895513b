//! TopoJSON decoding.
//!
//! Decodes an arc-encoded topology into per-country boundary geometries.
//! Quantized topologies (with a `transform`) store arcs as delta-encoded
//! integer positions; unquantized ones store absolute lon/lat positions.

use super::CountryFeature;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Errors produced while decoding a topology document.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("invalid topology JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a Topology document, found type {0:?}")]
    NotATopology(String),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
}

/// Quantization transform of a topology.
#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

/// A geometry object as stored in the topology. Kept loose so that null
/// and unsupported geometry types decode without failing the document.
#[derive(Debug, Clone, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    geometries: Option<Vec<RawGeometry>>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, RawGeometry>,
}

/// A decoded topology: absolute arc coordinates plus named objects.
#[derive(Debug, Clone)]
pub struct Topology {
    arcs: Vec<Vec<Coord<f64>>>,
    objects: BTreeMap<String, RawGeometry>,
}

impl Topology {
    /// Parses a TopoJSON document and decodes its arcs.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_slice(bytes)?;
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology(raw.kind));
        }

        let arcs = raw
            .arcs
            .iter()
            .map(|arc| decode_arc(arc, raw.transform.as_ref()))
            .collect();

        Ok(Self {
            arcs,
            objects: raw.objects,
        })
    }

    /// Names of the objects stored in this topology.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Converts the named object into country features.
    ///
    /// Geometries that are null, non-areal, or reference missing arcs are
    /// skipped without failing the whole object.
    pub fn features(&self, object: &str) -> Result<Vec<CountryFeature>, TopologyError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;

        let members: Vec<&RawGeometry> = match root.kind.as_deref() {
            Some("GeometryCollection") => root.geometries.iter().flatten().collect(),
            _ => vec![root],
        };

        let features = members
            .into_iter()
            .enumerate()
            .filter_map(|(index, geometry)| self.convert_geometry(index, geometry))
            .collect();

        Ok(features)
    }

    fn convert_geometry(&self, index: usize, geometry: &RawGeometry) -> Option<CountryFeature> {
        let id = geometry
            .id
            .as_ref()
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| index.to_string());

        let name = geometry
            .properties
            .as_ref()
            .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let arcs = geometry.arcs.as_ref();
        let polygons: Vec<Polygon<f64>> = match (geometry.kind.as_deref(), arcs) {
            (Some("Polygon"), Some(arcs)) => {
                let rings: Vec<Vec<i64>> = serde_json::from_value(arcs.clone()).ok()?;
                self.polygon(&rings).into_iter().collect()
            }
            (Some("MultiPolygon"), Some(arcs)) => {
                let polys: Vec<Vec<Vec<i64>>> = serde_json::from_value(arcs.clone()).ok()?;
                polys.iter().filter_map(|rings| self.polygon(rings)).collect()
            }
            (kind, _) => {
                log::debug!("Skipping geometry {} of type {:?}", id, kind);
                return None;
            }
        };

        if polygons.is_empty() {
            log::debug!("Geometry {} ({}) has no usable rings", id, name);
            return None;
        }

        Some(CountryFeature {
            id,
            name,
            geometry: MultiPolygon(polygons),
        })
    }

    /// Builds a polygon from ring arc references. The first ring is the
    /// exterior; a polygon without a usable exterior is dropped.
    fn polygon(&self, rings: &[Vec<i64>]) -> Option<Polygon<f64>> {
        let mut rings = rings.iter().map(|refs| self.ring(refs));
        let exterior = rings.next()??;
        let interiors: Vec<LineString<f64>> = rings.flatten().map(LineString).collect();
        Some(Polygon::new(LineString(exterior), interiors))
    }

    /// Stitches arcs into a ring. Consecutive arcs share their boundary
    /// point, so the last point is dropped before appending the next arc.
    /// A negative reference `~i` means arc `i` traversed backwards.
    fn ring(&self, refs: &[i64]) -> Option<Vec<Coord<f64>>> {
        let mut points: Vec<Coord<f64>> = Vec::new();

        for &r in refs {
            let (index, reversed) = if r < 0 {
                ((!r) as usize, true)
            } else {
                (r as usize, false)
            };
            let arc = self.arcs.get(index)?;

            points.pop();
            if reversed {
                points.extend(arc.iter().rev());
            } else {
                points.extend(arc.iter());
            }
        }

        let first = *points.first()?;
        while points.len() < 4 {
            points.push(first);
        }
        Some(points)
    }
}

/// Decodes one arc into absolute coordinates.
fn decode_arc(positions: &[Vec<f64>], transform: Option<&Transform>) -> Vec<Coord<f64>> {
    let mut x = 0.0;
    let mut y = 0.0;

    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| match transform {
            Some(t) => {
                x += p[0];
                y += p[1];
                Coord {
                    x: x * t.scale[0] + t.translate[0],
                    y: y * t.scale[1] + t.translate[1],
                }
            }
            None => Coord { x: p[0], y: p[1] },
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Two unit-square countries sharing the arc x = 1, quantized.
    pub(crate) fn two_country_fixture() -> Vec<u8> {
        json!({
            "type": "Topology",
            "transform": { "scale": [1.0, 1.0], "translate": [0.0, 0.0] },
            "arcs": [
                [[1, 0], [0, 1]],
                [[1, 1], [-1, 0], [0, -1], [1, 0]],
                [[1, 0], [1, 0], [0, 1], [-1, 0]]
            ],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": "001", "arcs": [[0, 1]],
                          "properties": { "name": "Westland" } },
                        { "type": "Polygon", "id": 2, "arcs": [[2, -1]],
                          "properties": { "name": "Eastland" } },
                        { "type": null, "id": "003" }
                    ]
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_decodes_quantized_arcs() {
        let topology = Topology::from_slice(&two_country_fixture()).unwrap();
        assert_eq!(topology.arcs[0], vec![Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]);
        assert_eq!(topology.arcs[1].last(), Some(&Coord { x: 1.0, y: 0.0 }));
    }

    #[test]
    fn test_features_stitch_shared_arcs() {
        let topology = Topology::from_slice(&two_country_fixture()).unwrap();
        let features = topology.features("countries").unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "001");
        assert_eq!(features[0].name, "Westland");
        assert_eq!(features[1].id, "2");
        assert_eq!(features[1].name, "Eastland");

        let west: Vec<Coord<f64>> = features[0].geometry.0[0].exterior().0.clone();
        assert_eq!(
            west,
            vec![
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 1.0, y: 1.0 },
                Coord { x: 0.0, y: 1.0 },
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
            ]
        );

        // Eastland walks arc 0 backwards to close its ring.
        let east = features[1].geometry.0[0].exterior();
        assert_eq!(east.0.first(), east.0.last());
        assert!(east.0.contains(&Coord { x: 2.0, y: 1.0 }));
    }

    #[test]
    fn test_unquantized_multipolygon() {
        let doc = json!({
            "type": "Topology",
            "arcs": [
                [[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 10.0]],
                [[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 20.0]]
            ],
            "objects": {
                "land": { "type": "MultiPolygon", "arcs": [[[0]], [[1]]] }
            }
        });
        let topology = Topology::from_slice(doc.to_string().as_bytes()).unwrap();
        let features = topology.features("land").unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "0");
        assert!(features[0].name.is_empty());
        assert_eq!(features[0].geometry.0.len(), 2);
        assert_eq!(features[0].geometry.0[1].exterior().0[0], Coord { x: 20.0, y: 20.0 });
    }

    #[test]
    fn test_bad_arc_reference_drops_feature() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": "ok", "arcs": [[0]] },
                        { "type": "Polygon", "id": "bad", "arcs": [[7]] },
                        { "type": "Point", "id": "pt", "coordinates": [0, 0] }
                    ]
                }
            }
        });
        let topology = Topology::from_slice(doc.to_string().as_bytes()).unwrap();
        let features = topology.features("countries").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "ok");
    }

    #[test]
    fn test_rejects_non_topology() {
        let doc = json!({ "type": "FeatureCollection", "features": [] });
        let err = Topology::from_slice(doc.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, TopologyError::NotATopology(ref k) if k == "FeatureCollection"));

        let err = Topology::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, TopologyError::Parse(_)));
    }

    #[test]
    fn test_missing_object() {
        let topology = Topology::from_slice(&two_country_fixture()).unwrap();
        assert_eq!(topology.object_names().collect::<Vec<_>>(), vec!["countries"]);
        assert!(matches!(
            topology.features("land"),
            Err(TopologyError::MissingObject(_))
        ));
    }
}
