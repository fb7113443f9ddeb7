// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for surface arithmetic and ordering.

use std::sync::Arc;

use normal_surfaces::{LargeInteger, NormalCoords, NormalSurface};
use normal_triangulation::{samples, Triangulation};
use num_traits::Zero;
use proptest::prelude::*;

fn two_closed() -> Arc<Triangulation> {
    samples::disjoint_union(&[samples::closed_one_tet(), samples::closed_one_tet()]).snapshot()
}

// Standard coordinates on two one-tetrahedron components
fn coords() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..6, 14)
}

fn standard(tri: &Arc<Triangulation>, values: &[i64]) -> NormalSurface {
    NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, values).unwrap()
}

fn sum(a: &NormalSurface, b: &NormalSurface) -> NormalSurface {
    (a + b).unwrap()
}

proptest! {
    #[test]
    fn addition_commutes(a in coords(), b in coords()) {
        let tri = two_closed();
        let (a, b) = (standard(&tri, &a), standard(&tri, &b));
        prop_assert_eq!(sum(&a, &b), sum(&b, &a));
    }

    #[test]
    fn addition_associates(a in coords(), b in coords(), c in coords()) {
        let tri = two_closed();
        let (a, b, c) = (standard(&tri, &a), standard(&tri, &b), standard(&tri, &c));
        prop_assert_eq!(sum(&sum(&a, &b), &c), sum(&a, &sum(&b, &c)));
    }

    #[test]
    fn euler_char_is_additive(a in coords(), b in coords()) {
        let tri = two_closed();
        let (a, b) = (standard(&tri, &a), standard(&tri, &b));
        prop_assert_eq!(sum(&a, &b).euler_char(), &a.euler_char() + &b.euler_char());
    }

    #[test]
    fn scalar_identities(v in coords()) {
        let tri = two_closed();
        let s = standard(&tri, &v);
        prop_assert!((&s * 0).is_empty());
        prop_assert_eq!(&s * 1, s.clone());
        prop_assert_eq!(&s * 2, s.double_surface());
    }

    #[test]
    fn scalar_distributes(v in coords(), a in 0u64..5, b in 0u64..5) {
        let tri = two_closed();
        let s = standard(&tri, &v);
        prop_assert_eq!(&s * (a + b), sum(&(&s * a), &(&s * b)));
    }

    #[test]
    fn scaling_down_is_primitive(v in coords(), k in 1u64..5) {
        prop_assume!(v.iter().any(|&x| x != 0));
        let tri = two_closed();
        let mut s = &standard(&tri, &v) * k;
        let factor = s.scale_down().unwrap();
        prop_assert!(factor > LargeInteger::zero());
        prop_assert_eq!(&s * factor.to_i64().unwrap() as u64, &standard(&tri, &v) * k);
        prop_assert_eq!(s.scale_down().unwrap(), LargeInteger::new(1));
    }

    #[test]
    fn ordering_is_total(a in coords(), b in coords(), c in coords()) {
        let tri = two_closed();
        let (a, b, c) = (standard(&tri, &a), standard(&tri, &b), standard(&tri, &c));
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a == b, a.cmp(&b).is_eq());
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    #[test]
    fn zero_octagons_change_nothing(v in coords()) {
        let tri = two_closed();
        let plain = standard(&tri, &v);
        let mut padded = Vec::with_capacity(20);
        for block in v.chunks(7) {
            padded.extend_from_slice(block);
            padded.extend_from_slice(&[0, 0, 0]);
        }
        let almost =
            NormalSurface::from_ints(tri.clone(), NormalCoords::AlmostNormal, &padded).unwrap();
        prop_assert_eq!(&almost, &plain);
        prop_assert_eq!(almost.euler_char(), plain.euler_char());
        prop_assert!(almost.normal());
    }

    #[test]
    fn multiples_of_a_vertex_link(k in 1u64..8) {
        let tri = samples::closed_one_tet().snapshot();
        let link = standard(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        let s = &link * k;
        prop_assert!(s.is_vertex_linking());
        prop_assert_eq!(s.is_vertex_link(), Some(0));
        prop_assert_eq!(s.euler_char(), LargeInteger::new(2 * k as i64));
    }

    #[test]
    fn components_sum_back(links in 0u64..4, discs in 0u64..4) {
        prop_assume!(links + discs > 0);
        let tri = samples::folded_tetrahedron().snapshot();
        let link = standard(&tri, &[1, 1, 1, 1, 0, 0, 0]);
        let disc = standard(&tri, &[1, 1, 0, 0, 0, 1, 0]);
        let s = sum(&(&link * links), &(&disc * discs));

        let pieces = s.components().unwrap();
        prop_assert_eq!(pieces.len() as u64, links + discs);
        let mut total = NormalSurface::empty(tri.clone());
        let mut euler = LargeInteger::zero();
        for piece in &pieces {
            prop_assert!(piece.is_connected().unwrap());
            euler = &euler + &piece.euler_char();
            total = sum(&total, piece);
        }
        prop_assert_eq!(total, s.clone());
        prop_assert_eq!(euler, s.euler_char());
    }
}
