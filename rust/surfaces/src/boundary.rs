// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary slopes of spun-normal surfaces.

use crate::error::{Error, Result};
use crate::surface::NormalSurface;

impl NormalSurface {
    /// For each cusp, the algebraic intersection numbers of the surface's
    /// boundary curves with the cusp's meridian and longitude.
    ///
    /// Only the quadrilateral coordinates take part, so this works for
    /// spun-normal surfaces with infinitely many triangles.
    ///
    /// # Errors
    ///
    /// [`Error::FailedPrecondition`] unless the triangulation carries a
    /// peripheral-curve provider that can produce slope equations, is
    /// oriented, and has a torus link at every vertex, all ideal; also if
    /// the encoding stores octagons. [`Error::Overflow`] if a sum leaves
    /// the 64-bit range.
    pub fn boundary_intersections(&self) -> Result<Vec<(i64, i64)>> {
        let Some(provider) = self.tri.peripheral_curves() else {
            return Err(Error::FailedPrecondition(
                "boundary intersections need peripheral curves on every cusp".into(),
            ));
        };
        if !self.tri.is_oriented() {
            return Err(Error::FailedPrecondition(
                "boundary intersections need an oriented triangulation".into(),
            ));
        }
        if self.enc.stores_octagons() {
            return Err(Error::FailedPrecondition(
                "boundary intersections do not apply to almost normal encodings".into(),
            ));
        }
        let all_tori = self
            .tri
            .vertices()
            .iter()
            .all(|v| v.is_ideal() && v.is_link_orientable() && v.link_euler_char() == 0);
        if !all_tori {
            return Err(Error::FailedPrecondition(
                "boundary intersections need every vertex link to be a torus".into(),
            ));
        }

        let equations = provider.slope_equations().ok_or_else(|| {
            Error::FailedPrecondition("peripheral curves could not produce slope equations".into())
        })?;
        let n = self.tri.size();
        if equations.tets() != n {
            return Err(Error::FailedPrecondition(format!(
                "slope equations cover {} tetrahedra, not {n}",
                equations.tets()
            )));
        }

        let quads = (0..n)
            .flat_map(|t| (0..3).map(move |k| (t, k)))
            .map(|(t, k)| {
                self.quads(t, k)
                    .to_i64()
                    .ok_or(Error::Overflow("boundary intersections"))
            })
            .collect::<Result<Vec<i64>>>()?;
        let pair = |row: &[i64]| -> Option<i64> {
            row.iter()
                .zip(&quads)
                .try_fold(0i64, |acc, (&a, &q)| acc.checked_add(a.checked_mul(q)?))
        };

        (0..equations.cusps())
            .map(|cusp| {
                let meridian = pair(equations.meridian(cusp));
                let longitude = pair(equations.longitude(cusp));
                meridian
                    .zip(longitude)
                    .ok_or(Error::Overflow("boundary intersections"))
            })
            .collect()
    }
}
