//! Station and line-station records.

use serde::{Deserialize, Serialize};

use super::{LineId, LineStationId, StationId};

/// Geographic position of a station (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    /// Parse a `"lng,lat"` pair. Returns `None` for anything malformed.
    ///
    /// ```
    /// use fare_engine::domain::Coordinates;
    ///
    /// let c = Coordinates::parse_lng_lat("120.21,30.25").unwrap();
    /// assert_eq!(c.lng, 120.21);
    /// assert_eq!(c.lat, 30.25);
    /// assert!(Coordinates::parse_lng_lat("120.21").is_none());
    /// ```
    pub fn parse_lng_lat(s: &str) -> Option<Self> {
        let (lng, lat) = s.split_once(',')?;
        Some(Self {
            lng: lng.trim().parse().ok()?,
            lat: lat.trim().parse().ok()?,
        })
    }
}

/// A station record.
///
/// A physical interchange may appear as several records that share a
/// display name, one per line. Transfer detection relies on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub code: String,
    /// The line this record is primarily associated with.
    pub line_id: LineId,
    pub coordinates: Option<Coordinates>,
    pub is_active: bool,
}

impl Station {
    /// Create an active station with no coordinates.
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        code: impl Into<String>,
        line_id: LineId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            line_id,
            coordinates: None,
            is_active: true,
        }
    }
}

/// Assignment of a station to a position on a line.
///
/// `seq` is 1-based and expected to be unique within its line; the graph
/// builder tolerates data where it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStation {
    pub id: LineStationId,
    pub line_id: LineId,
    pub station_id: StationId,
    pub seq: u32,
}

impl LineStation {
    pub fn new(id: LineStationId, line_id: LineId, station_id: StationId, seq: u32) -> Self {
        Self {
            id,
            line_id,
            station_id,
            seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coordinates_with_spaces() {
        let c = Coordinates::parse_lng_lat(" 120.1 , 30.2 ").unwrap();
        assert_eq!(c.lng, 120.1);
        assert_eq!(c.lat, 30.2);
    }

    #[test]
    fn parse_coordinates_rejects_garbage() {
        assert!(Coordinates::parse_lng_lat("").is_none());
        assert!(Coordinates::parse_lng_lat("a,b").is_none());
        assert!(Coordinates::parse_lng_lat("1.0;2.0").is_none());
    }

    #[test]
    fn new_station_is_active() {
        let s = Station::new(StationId(1), "武林广场", "S1", LineId(1));
        assert!(s.is_active);
        assert!(s.coordinates.is_none());
    }
}
