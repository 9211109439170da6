//! Coordinate resolution — model-space boxes (0–1000) to device pixels.
//!
//! Every rounding step is half-to-even on exact integer ratios, so results
//! do not depend on floating-point representation.

use serde::{Deserialize, Serialize};

/// Side length of the model's normalized coordinate space.
pub const NORMALIZED_SCALE: i64 = 1000;

/// Physical screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Integers pulled out of a box string, in order. Always at least two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBox(Vec<i64>);

impl NormalizedBox {
    pub fn values(&self) -> &[i64] {
        &self.0
    }
}

/// Absolute pixel position on the device screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCoordinate {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for DeviceCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Collect every run of ASCII digits in `raw`, ignoring brackets, quotes and
/// separators. Returns `None` for fewer than two numbers or an overflowing run.
pub fn parse_box(raw: &str) -> Option<NormalizedBox> {
    let values = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (values.len() >= 2).then_some(NormalizedBox(values))
}

/// Map a box onto the screen.
///
/// Two numbers are a point. Four numbers are a rectangle: both corners are
/// scaled first, then the midpoint of the scaled corners is taken. Any other
/// count does not resolve.
pub fn to_device(norm: &NormalizedBox, screen: ScreenSize) -> Option<DeviceCoordinate> {
    let w = i64::from(screen.width);
    let h = i64::from(screen.height);
    match *norm.values() {
        [nx, ny] => Some(DeviceCoordinate {
            x: to_i32(scale(nx, w)?)?,
            y: to_i32(scale(ny, h)?)?,
        }),
        [x1, y1, x2, y2] => {
            let (x1, y1) = (scale(x1, w)?, scale(y1, h)?);
            let (x2, y2) = (scale(x2, w)?, scale(y2, h)?);
            Some(DeviceCoordinate {
                x: to_i32(round_half_even(x1.checked_add(x2)?, 2))?,
                y: to_i32(round_half_even(y1.checked_add(y2)?, 2))?,
            })
        }
        _ => None,
    }
}

/// `parse_box` followed by `to_device`.
pub fn resolve(raw: &str, screen: ScreenSize) -> Option<DeviceCoordinate> {
    to_device(&parse_box(raw)?, screen)
}

fn scale(value: i64, dimension: i64) -> Option<i64> {
    Some(round_half_even(value.checked_mul(dimension)?, NORMALIZED_SCALE))
}

/// `numerator / denominator` rounded half-to-even. Both operands are non-negative.
fn round_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

fn to_i32(value: i64) -> Option<i32> {
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FHD: ScreenSize = ScreenSize { width: 1920, height: 1080 };

    #[test]
    fn parse_box_ignores_formatting() {
        assert_eq!(parse_box("[17,980,50,990]").unwrap().values(), &[17, 980, 50, 990]);
        assert_eq!(parse_box("'(500, 500)'").unwrap().values(), &[500, 500]);
        assert_eq!(parse_box("<point>12 34</point>").unwrap().values(), &[12, 34]);
    }

    #[test]
    fn parse_box_needs_two_numbers() {
        assert!(parse_box("").is_none());
        assert!(parse_box("[500]").is_none());
        assert!(parse_box("center").is_none());
    }

    #[test]
    fn parse_box_rejects_overflow() {
        assert!(parse_box("[1, 99999999999999999999999]").is_none());
    }

    #[test]
    fn point_scales_per_axis() {
        let p = resolve("[500, 500]", FHD).unwrap();
        assert_eq!(p, DeviceCoordinate { x: 960, y: 540 });

        let p = resolve("[0, 1000]", FHD).unwrap();
        assert_eq!(p, DeviceCoordinate { x: 0, y: 1080 });
    }

    #[test]
    fn point_matches_rounded_formula() {
        for (nx, ny) in [(1, 1), (17, 980), (333, 667), (999, 3), (125, 875)] {
            let p = resolve(&format!("[{nx}, {ny}]"), FHD).unwrap();
            let ex = (nx as f64 * 1920.0 / 1000.0).round() as i32;
            let ey = (ny as f64 * 1080.0 / 1000.0).round() as i32;
            assert_eq!((p.x, p.y), (ex, ey), "box [{nx}, {ny}]");
        }
    }

    #[test]
    fn rectangle_scales_corners_then_centers() {
        // x: 33 and 96 -> 64.5 -> 64; y: 1058 and 1069 -> 1063.5 -> 1064
        let p = resolve("[17,980,50,990]", FHD).unwrap();
        assert_eq!(p, DeviceCoordinate { x: 64, y: 1064 });
    }

    #[test]
    fn rectangle_even_midpoint_is_exact() {
        let p = resolve("[100, 100, 200, 300]", ScreenSize::new(1000, 1000)).unwrap();
        assert_eq!(p, DeviceCoordinate { x: 150, y: 200 });
    }

    #[test]
    fn other_counts_do_not_resolve() {
        assert!(resolve("[1, 2, 3]", FHD).is_none());
        assert!(resolve("[1, 2, 3, 4, 5]", FHD).is_none());
    }

    #[test]
    fn half_even_rounding() {
        assert_eq!(round_half_even(5, 2), 2);
        assert_eq!(round_half_even(7, 2), 4);
        assert_eq!(round_half_even(1500, 1000), 2);
        assert_eq!(round_half_even(2500, 1000), 2);
        assert_eq!(round_half_even(2501, 1000), 3);
    }
}
