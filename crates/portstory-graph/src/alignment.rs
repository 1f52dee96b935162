use serde::{Deserialize, Serialize};

/// Compass sector a port sits in on its node's border.
///
/// Sectors are 45° wide, start at 0° = East and proceed counter-clockwise. The
/// boundaries lie halfway between two compass directions (22.5°, 67.5°, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortAlignment {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl PortAlignment {
    const SECTORS: [PortAlignment; 8] = [
        PortAlignment::East,
        PortAlignment::NorthEast,
        PortAlignment::North,
        PortAlignment::NorthWest,
        PortAlignment::West,
        PortAlignment::SouthWest,
        PortAlignment::South,
        PortAlignment::SouthEast,
    ];

    /// Alignment of the `index`-th of `count` sibling ports.
    pub fn for_ordinal(index: usize, count: usize) -> Self {
        if count == 0 {
            return PortAlignment::East;
        }
        let degrees = (360.0 * index as f64 / count as f64).round() as i64;
        Self::from_degrees(degrees)
    }

    pub fn from_degrees(degrees: i64) -> Self {
        let degrees = degrees.rem_euclid(360);
        let sector = ((2 * degrees + 45) / 90) as usize % 8;
        Self::SECTORS[sector]
    }

    /// Center angle of the sector in degrees.
    pub fn degrees(self) -> f64 {
        let sector = Self::SECTORS
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default();
        sector as f64 * 45.0
    }
}
