//! Converting basic SVG shapes to path data.
//!
//! Shapes arrive either as a plain attribute record (element name plus
//! `(name, value)` pairs) or as a single XML element string.

use std::io::Cursor;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::errors::{Error, Result};
use crate::path::{parse_path, path_to_string, PathArray, Segment};
use crate::types::{attr_split, strp};

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline(Vec<f64>),
    Polygon(Vec<f64>),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: Option<f64>,
        ry: Option<f64>,
    },
    /// Font glyphs already carry path data.
    Glyph(String),
}

impl Shape {
    /// Attributes which define the geometry of the named shape.
    pub fn geometry_attrs(name: &str) -> Option<&'static [&'static str]> {
        Some(match name {
            "line" => &["x1", "y1", "x2", "y2"],
            "polyline" | "polygon" => &["points"],
            "circle" => &["cx", "cy", "r"],
            "ellipse" => &["cx", "cy", "rx", "ry"],
            "rect" => &["x", "y", "width", "height", "rx", "ry"],
            "glyph" => &["d"],
            _ => return None,
        })
    }

    /// Build a shape from an element name and its attributes.
    ///
    /// Missing numeric attributes are taken as zero.
    pub fn from_attrs(name: &str, attrs: &[(String, String)]) -> Result<Self> {
        if Self::geometry_attrs(name).is_none() {
            return Err(Error::UnsupportedShape(name.to_string()));
        }
        let get = |key: &str| attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        let num = |key: &str| -> Result<f64> {
            Ok(get(key).map(strp).transpose()?.unwrap_or_default())
        };
        let opt = |key: &str| -> Result<Option<f64>> {
            Ok(get(key).map(strp).transpose()?.filter(|v| *v != 0.))
        };
        let points = || -> Result<Vec<f64>> {
            let points = get("points").unwrap_or_default();
            attr_split(points).map(|v| strp(&v)).collect()
        };

        Ok(match name {
            "line" => Self::Line {
                x1: num("x1")?,
                y1: num("y1")?,
                x2: num("x2")?,
                y2: num("y2")?,
            },
            "polyline" => Self::Polyline(points()?),
            "polygon" => Self::Polygon(points()?),
            "circle" => Self::Circle {
                cx: num("cx")?,
                cy: num("cy")?,
                r: num("r")?,
            },
            "ellipse" => Self::Ellipse {
                cx: num("cx")?,
                cy: num("cy")?,
                rx: num("rx")?,
                ry: num("ry")?,
            },
            "rect" => Self::Rect {
                x: num("x")?,
                y: num("y")?,
                width: num("width")?,
                height: num("height")?,
                rx: opt("rx")?,
                ry: opt("ry")?,
            },
            _ => Self::Glyph(get("d").unwrap_or_default().to_string()),
        })
    }

    /// Read the first element of an XML fragment such as `<circle r="5"/>`.
    pub fn from_element(xml: &str) -> Result<Self> {
        let (name, attrs) = first_element(xml)?;
        Self::from_attrs(&name, &attrs)
    }

    pub fn to_path(&self) -> Result<PathArray> {
        let seg = Segment::raw;
        Ok(match self {
            Self::Line { x1, y1, x2, y2 } => {
                PathArray::new(vec![seg('M', &[*x1, *y1]), seg('L', &[*x2, *y2])])
            }
            Self::Polyline(points) | Self::Polygon(points) => {
                if points.is_empty() || points.len() % 2 != 0 {
                    return Err(Error::InvalidValue(
                        "points".to_string(),
                        format!("{} values", points.len()),
                    ));
                }
                let mut path: PathArray = points
                    .chunks_exact(2)
                    .enumerate()
                    .map(|(i, p)| seg(if i == 0 { 'M' } else { 'L' }, p))
                    .collect();
                if matches!(self, Self::Polygon(_)) {
                    path.push(seg('z', &[]));
                }
                path
            }
            Self::Circle { cx, cy, r } => ellipse_path(*cx, *cy, *r, *r),
            Self::Ellipse { cx, cy, rx, ry } => ellipse_path(*cx, *cy, *rx, *ry),
            Self::Rect {
                x,
                y,
                width: w,
                height: h,
                rx,
                ry,
            } => {
                let (x, y, w, h) = (*x, *y, *w, *h);
                if rx.is_none() && ry.is_none() {
                    return Ok(PathArray::new(vec![
                        seg('M', &[x, y]),
                        seg('h', &[w]),
                        seg('v', &[h]),
                        seg('H', &[x]),
                        seg('Z', &[]),
                    ]));
                }
                // each radius defaults to the other, and is clamped to half the side
                let mut rx = rx.or(*ry).unwrap_or_default();
                let mut ry = ry.unwrap_or(rx);
                if rx * 2. > w {
                    rx -= (rx * 2. - w) / 2.;
                }
                if ry * 2. > h {
                    ry -= (ry * 2. - h) / 2.;
                }
                PathArray::new(vec![
                    seg('M', &[x + rx, y]),
                    seg('h', &[w - rx * 2.]),
                    seg('s', &[rx, 0., rx, ry]),
                    seg('v', &[h - ry * 2.]),
                    seg('s', &[0., ry, -rx, ry]),
                    seg('h', &[-w + rx * 2.]),
                    seg('s', &[-rx, 0., -rx, -ry]),
                    seg('v', &[-h + ry * 2.]),
                    seg('s', &[0., -ry, rx, -ry]),
                ])
            }
            Self::Glyph(d) => parse_path(d)?,
        })
    }
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathArray {
    PathArray::new(vec![
        Segment::raw('M', &[cx - rx, cy]),
        Segment::raw('a', &[rx, ry, 0., 1., 0., 2. * rx, 0.]),
        Segment::raw('a', &[rx, ry, 0., 1., 0., -2. * rx, 0.]),
    ])
}

/// Name and attributes of the first start / empty tag in `xml`.
fn first_element(xml: &str) -> Result<(String, Vec<(String, String)>)> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(Error::from_err)? {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8(e.name().into_inner().to_vec())
                    .map_err(Error::from_err)?;
                let attrs = e
                    .attributes()
                    .map(|a| {
                        let aa = a.map_err(Error::from_err)?;
                        let key = String::from_utf8(aa.key.into_inner().to_vec())
                            .map_err(Error::from_err)?;
                        let value = aa.unescape_value().map_err(Error::from_err)?.into_owned();
                        Ok((key, value))
                    })
                    .collect::<Result<Vec<_>>>()?;
                return Ok((name, attrs));
            }
            Event::Eof => return Err(Error::UnsupportedShape("no element".to_string())),
            _ => {}
        }
    }
}

/// Replace a shape element with an equivalent `<path>` element.
///
/// Non-geometry attributes such as `class` or `fill` are carried over
/// in their original order, followed by the new `d` attribute.
pub fn shape_to_path_element(xml: &str, decimals: Option<u32>) -> Result<String> {
    let (name, attrs) = first_element(xml)?;
    let shape = Shape::from_attrs(&name, &attrs)?;
    let d = match &shape {
        // glyph data is passed through untouched
        Shape::Glyph(d) => d.clone(),
        _ => path_to_string(&shape.to_path()?, decimals)?,
    };

    let geometry = Shape::geometry_attrs(&name).unwrap_or_default();
    let mut bs = BytesStart::new("path");
    for (k, v) in attrs.iter().filter(|(k, _)| !geometry.contains(&k.as_str())) {
        bs.push_attribute(Attribute::from((k.as_str(), v.as_str())));
    }
    bs.push_attribute(("d", d.as_str()));

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Empty(bs))
        .map_err(Error::from_err)?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(Error::from_err)
}
