// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for triangulations.
//!
//! Only the gluings are stored; the skeleton is recomputed on load. Each
//! glued face pair appears once, from the side with the smaller
//! `(tet, face)`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::perm::Perm4;
use crate::triangulation::Triangulation;

/// Serializable representation of a triangulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationData {
    pub tetrahedra: usize,
    pub gluings: Vec<GluingData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GluingData {
    pub tet: usize,
    pub face: usize,
    pub adjacent: usize,
    pub perm: Perm4,
}

impl Triangulation {
    /// Serializes the gluings to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_data()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Rebuilds a triangulation from [`to_json`](Self::to_json) output.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: TriangulationData =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_data(&data)
    }

    /// Gluing list, each pair recorded once.
    pub fn to_data(&self) -> TriangulationData {
        let mut gluings = Vec::new();
        for (tet, data) in self.tets.iter().enumerate() {
            for (face, gluing) in data.adj.iter().enumerate() {
                let Some(g) = gluing else { continue };
                let adjacent_face = g.perm.image(face);
                if (tet, face) < (g.tet, adjacent_face) {
                    gluings.push(GluingData {
                        tet,
                        face,
                        adjacent: g.tet,
                        perm: g.perm,
                    });
                }
            }
        }
        TriangulationData {
            tetrahedra: self.tets.len(),
            gluings,
        }
    }

    /// Builds a triangulation from a gluing list, checking every gluing.
    pub fn from_data(data: &TriangulationData) -> Result<Self> {
        let mut tri = Triangulation::new();
        tri.new_tetrahedra(data.tetrahedra);
        for g in &data.gluings {
            tri.join(g.tet, g.face, g.adjacent, g.perm)?;
        }
        Ok(tri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    #[test]
    fn json_round_trip_keeps_gluings() {
        let tri = samples::figure_eight();
        let json = tri.to_json().unwrap();
        let back = Triangulation::from_json(&json).unwrap();
        assert!(back.is_identical_to(&tri));
        assert_eq!(tri.to_data().gluings.len(), 4);
    }

    #[test]
    fn conflicting_gluings_are_rejected() {
        let data = TriangulationData {
            tetrahedra: 1,
            gluings: vec![
                GluingData {
                    tet: 0,
                    face: 0,
                    adjacent: 0,
                    perm: Perm4::new([1, 0, 2, 3]).unwrap(),
                },
                GluingData {
                    tet: 0,
                    face: 1,
                    adjacent: 0,
                    perm: Perm4::new([0, 2, 1, 3]).unwrap(),
                },
            ],
        };
        assert!(matches!(
            Triangulation::from_data(&data),
            Err(Error::FaceAlreadyGlued { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            Triangulation::from_json("{\"tetrahedra\": 1}"),
            Err(Error::Serialization(_))
        ));
    }
}
