// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text and XML forms of a surface.
//!
//! The XML element stores only non-zero coordinates as `index value` pairs:
//!
//! ```text
//! <surface len="7" enc="279" name="link"> 0 1 1 1 2 1 3 1
//!   <euler value="2"/>
//! </surface>
//! ```

use std::fmt;
use std::sync::Arc;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use normal_triangulation::Triangulation;
use num_traits::Zero;

use super::NormalSurface;
use crate::encoding::NormalEncoding;
use crate::error::{Error, Result};
use crate::integer::LargeInteger;
use crate::vector::NormalVector;

impl fmt::Display for NormalSurface {
    /// `t0 t1 t2 t3 ; q0 q1 q2 [; o0 o1 o2]` per tetrahedron, joined by
    /// ` || `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in 0..self.tri.size() {
            if t > 0 {
                f.write_str(" || ")?;
            }
            write!(
                f,
                "{} {} {} {} ; {} {} {}",
                self.triangles(t, 0),
                self.triangles(t, 1),
                self.triangles(t, 2),
                self.triangles(t, 3),
                self.quads(t, 0),
                self.quads(t, 1),
                self.quads(t, 2)
            )?;
            if self.enc.stores_octagons() {
                write!(
                    f,
                    " ; {} {} {}",
                    self.octs(t, 0),
                    self.octs(t, 1),
                    self.octs(t, 2)
                )?;
            }
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn bool_tag(out: &mut String, name: &str, value: Option<bool>) {
    if let Some(v) = value {
        out.push_str(&format!("  <{name} value=\"{}\"/>\n", if v { 'T' } else { 'F' }));
    }
}

impl NormalSurface {
    /// Appends the `<surface>` element. With `properties`, every property
    /// already computed is written as a child tag.
    pub fn write_xml_data(&self, out: &mut String, properties: bool) {
        out.push_str(&format!(
            "<surface len=\"{}\" enc=\"{}\"",
            self.vector.len(),
            self.enc.int_value()
        ));
        if !self.name.is_empty() {
            out.push_str(&format!(" name=\"{}\"", escape(&self.name)));
        }
        out.push('>');
        for (i, x) in self.vector.iter().enumerate() {
            if !x.is_zero() {
                out.push_str(&format!(" {i} {x}"));
            }
        }
        if properties {
            out.push('\n');
            if let Some(e) = self.cache.euler.get() {
                out.push_str(&format!("  <euler value=\"{e}\"/>\n"));
            }
            bool_tag(out, "orbl", self.cache.orientable.get());
            bool_tag(out, "twosided", self.cache.two_sided.get());
            bool_tag(out, "connected", self.cache.connected.get());
            bool_tag(out, "realbdry", self.cache.real_boundary.get());
            bool_tag(out, "compact", self.cache.compact.get());
        }
        out.push_str("</surface>\n");
    }

    /// Reads a `<surface>` element written by
    /// [`write_xml_data`](Self::write_xml_data). Property tags are trusted
    /// and seed the cache.
    pub fn from_xml(tri: Arc<Triangulation>, text: &str) -> Result<NormalSurface> {
        let (_, element) = surface_element(text)
            .map_err(|e| Error::InvalidArgument(format!("malformed surface element: {e}")))?;

        let mut len = None;
        let mut enc = None;
        let mut name = String::new();
        for (key, value) in element.attributes {
            match key {
                "len" => {
                    len = Some(value.parse::<usize>().map_err(|_| {
                        Error::InvalidArgument(format!("bad vector length {value:?}"))
                    })?)
                }
                "enc" => {
                    let raw = value.parse::<i32>().map_err(|_| {
                        Error::InvalidArgument(format!("bad encoding {value:?}"))
                    })?;
                    enc = Some(NormalEncoding::from_int_value(raw)?);
                }
                "name" => name = unescape(value),
                _ => {}
            }
        }
        let (Some(len), Some(enc)) = (len, enc) else {
            return Err(Error::InvalidArgument(
                "surface element needs len and enc".into(),
            ));
        };

        let mut vector = NormalVector::zeros(len);
        for (index, value) in element.entries {
            if index >= len {
                return Err(Error::InvalidArgument(format!(
                    "coordinate {index} is out of range for length {len}"
                )));
            }
            vector.entries_mut()[index] = value
                .parse::<LargeInteger>()
                .map_err(|_| Error::InvalidArgument(format!("bad coordinate {value:?}")))?;
        }

        let mut surface = NormalSurface::new(tri, enc, vector)?;
        surface.name = name;
        for (key, value) in element.properties {
            let flag = match value {
                "T" => Some(true),
                "F" => Some(false),
                _ => None,
            };
            match (key, flag) {
                ("euler", _) => {
                    if let Ok(e) = value.parse::<LargeInteger>() {
                        let _ = surface.cache.euler.set(e);
                    }
                }
                ("orbl", Some(v)) => surface.cache.orientable.set(v),
                ("twosided", Some(v)) => surface.cache.two_sided.set(v),
                ("connected", Some(v)) => surface.cache.connected.set(v),
                ("realbdry", Some(v)) => surface.cache.real_boundary.set(v),
                ("compact", Some(v)) => surface.cache.compact.set(v),
                _ => tracing::debug!(tag = key, "ignoring unknown surface property"),
            }
        }
        Ok(surface)
    }
}

// =========================================================================
// Parser
// =========================================================================

struct SurfaceElement<'a> {
    attributes: Vec<(&'a str, &'a str)>,
    entries: Vec<(usize, &'a str)>,
    properties: Vec<(&'a str, &'a str)>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)
}

/// `key="value"`
fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_while1(is_name_char), char('='), quoted)(input)
}

/// `index value`, where value may be `inf`
fn entry(input: &str) -> IResult<&str, (usize, &str)> {
    separated_pair(
        map_res(digit1, |s: &str| s.parse::<usize>()),
        multispace1,
        alt((tag("inf"), recognize(pair(opt(char('-')), digit1)))),
    )(input)
}

/// `<name value="..."/>`
fn property(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(
        char('<'),
        separated_pair(
            take_while1(is_name_char),
            multispace1,
            preceded(tag("value="), quoted),
        ),
        preceded(multispace0, tag("/>")),
    )(input)
}

fn surface_element(input: &str) -> IResult<&str, SurfaceElement<'_>> {
    let (input, (attributes, entries, properties)) = delimited(
        preceded(multispace0, tag("<surface")),
        tuple((
            terminated(
                many0(preceded(multispace1, attribute)),
                preceded(multispace0, char('>')),
            ),
            many0(preceded(multispace0, entry)),
            many0(preceded(multispace0, property)),
        )),
        preceded(multispace0, tag("</surface>")),
    )(input)?;
    Ok((
        input,
        SurfaceElement {
            attributes,
            entries,
            properties,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::NormalCoords;
    use normal_triangulation::samples;

    #[test]
    fn display_lists_blocks() {
        let tri = samples::figure_eight().snapshot();
        let s = NormalSurface::from_ints(
            tri,
            NormalCoords::Standard,
            &[1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        )
        .unwrap();
        assert_eq!(s.to_string(), "1 0 0 0 ; 0 1 0 || 0 0 0 0 ; 0 0 0");

        let oct = NormalSurface::from_ints(
            samples::ball().snapshot(),
            NormalCoords::AlmostNormal,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
        )
        .unwrap();
        assert_eq!(oct.to_string(), "0 0 0 0 ; 0 0 0 ; 0 1 0");
    }

    #[test]
    fn xml_round_trip_keeps_name_and_properties() {
        let tri = samples::closed_one_tet().snapshot();
        let mut s =
            NormalSurface::from_ints(tri.clone(), NormalCoords::Standard, &[1, 1, 1, 1, 0, 0, 0])
                .unwrap();
        s.set_name("link <v0> & co");
        assert!(s.is_orientable().unwrap());
        s.euler_char();

        let mut xml = String::new();
        s.write_xml_data(&mut xml, true);
        assert!(xml.starts_with("<surface len=\"7\" enc=\"279\" name=\"link &lt;v0&gt; &amp; co\">"));
        assert!(xml.contains(" 0 1 1 1 2 1 3 1"));
        assert!(xml.contains("<euler value=\"2\"/>"));
        assert!(xml.contains("<orbl value=\"T\"/>"));

        let back = NormalSurface::from_xml(tri, &xml).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.name(), "link <v0> & co");
        assert_eq!(back.cache.euler.get(), Some(&LargeInteger::new(2)));
        assert_eq!(back.cache.orientable.get(), Some(true));
    }

    #[test]
    fn xml_writes_infinity() {
        let tri = samples::ball().snapshot();
        let s = NormalSurface::new(
            tri.clone(),
            NormalEncoding::standard(),
            NormalVector::from(vec![
                LargeInteger::Infinity,
                LargeInteger::new(0),
                LargeInteger::new(0),
                LargeInteger::new(0),
                LargeInteger::new(0),
                LargeInteger::new(0),
                LargeInteger::new(0),
            ]),
        )
        .unwrap();
        let mut xml = String::new();
        s.write_xml_data(&mut xml, false);
        assert_eq!(xml, "<surface len=\"7\" enc=\"279\"> 0 inf</surface>\n");
        let back = NormalSurface::from_xml(tri, &xml).unwrap();
        assert!(back.triangles(0, 0).is_infinite());
        assert!(!back.is_compact());
    }

    #[test]
    fn quad_elements_are_completed() {
        let tri = samples::folded_tetrahedron().snapshot();
        let s = NormalSurface::from_xml(tri, r#"<surface len="3" enc="515"> 1 1</surface>"#)
            .unwrap();
        assert_eq!(s.triangles(0, 0), LargeInteger::new(1));
        assert_eq!(s.encoding().block_width(), 7);
    }

    #[test]
    fn malformed_elements_are_rejected() {
        let tri = samples::ball().snapshot();
        for text in [
            "<surface len=\"7\"> 0 1</surface>",
            "<surface len=\"7\" enc=\"279\"> 9 1</surface>",
            "<surface len=\"7\" enc=\"279\"> 0 x</surface>",
            "<surface len=\"3\" enc=\"279\"></surface>",
            "<surf len=\"7\" enc=\"279\"></surf>",
        ] {
            assert!(
                matches!(
                    NormalSurface::from_xml(tri.clone(), text),
                    Err(Error::InvalidArgument(_))
                ),
                "{text}"
            );
        }
    }
}
