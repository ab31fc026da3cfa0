use serde::Serialize;

/// Half-width in degrees of the box used when the geocoder gives us nothing usable.
pub const FALLBACK_BOX_DEG: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Returns `None` unless both components are finite and inside
    /// lat [-90, 90], lon [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// `[south, north, west, east]` in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Parses the 4-tuple order used by the geocoder. Anything that is not
    /// exactly four finite, ordered values is rejected.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let &[south, north, west, east] = values else {
            return None;
        };
        let bbox = Self { south, north, west, east };
        bbox.is_valid().then_some(bbox)
    }

    pub fn around(point: Coordinate) -> Self {
        Self {
            south: point.lat - FALLBACK_BOX_DEG,
            north: point.lat + FALLBACK_BOX_DEG,
            west: point.lon - FALLBACK_BOX_DEG,
            east: point.lon + FALLBACK_BOX_DEG,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.south, self.north, self.west, self.east]
            .iter()
            .all(|v| v.is_finite())
            && self.south <= self.north
            && self.west <= self.east
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.south, b.north, b.west, b.east]
    }
}

/// Coarse rectangular stand-in for a landslide susceptibility map.
#[derive(Debug)]
pub struct LandslideZone {
    pub name: &'static str,
    pub lat_range: (f64, f64),
    pub lon_range: (f64, f64),
}

impl LandslideZone {
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.lat_range.0..=self.lat_range.1).contains(&point.lat)
            && (self.lon_range.0..=self.lon_range.1).contains(&point.lon)
    }
}

pub const LANDSLIDE_ZONES: &[LandslideZone] = &[
    LandslideZone {
        name: "Himalayan Region",
        lat_range: (26.5, 35.5),
        lon_range: (73.0, 97.5),
    },
    LandslideZone {
        name: "Western Ghats",
        lat_range: (8.0, 21.0),
        lon_range: (72.8, 78.0),
    },
];

pub fn landslide_zone(point: Coordinate) -> Option<&'static LandslideZone> {
    LANDSLIDE_ZONES.iter().find(|z| z.contains(point))
}
