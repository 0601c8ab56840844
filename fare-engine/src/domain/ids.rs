//! Numeric identifier types.
//!
//! Lines, stations and line-station rows all come from the topology store
//! keyed by integer ids. Wrapping them keeps a `LineId` from being passed
//! where a `StationId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw id value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                $name(v)
            }
        }
    };
}

id_type!(
    /// Identity of a [`Line`](super::Line).
    LineId,
    "LineId"
);

id_type!(
    /// Identity of a [`Station`](super::Station) record.
    StationId,
    "StationId"
);

id_type!(
    /// Identity of a [`LineStation`](super::LineStation) row.
    ///
    /// Ride nodes in the graph reuse this id, so a `NodeId` and the
    /// `LineStationId` it was built from always hold the same value.
    LineStationId,
    "LineStationId"
);

id_type!(
    /// Identity of a ride node in the routing graph.
    NodeId,
    "NodeId"
);

impl From<LineStationId> for NodeId {
    fn from(id: LineStationId) -> Self {
        NodeId(id.0)
    }
}
