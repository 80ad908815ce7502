use time::OffsetDateTime;

use crate::geo::MapPoint;

/// A position fix as supplied by a location source.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub pos: MapPoint,

    /// Estimated accuracy radius in meters, if the source reports one.
    pub accuracy_m: Option<f64>,

    /// When the fix was taken.
    pub time: Option<OffsetDateTime>,
}

impl From<MapPoint> for Location {
    fn from(pos: MapPoint) -> Self {
        Self {
            pos,
            accuracy_m: None,
            time: None,
        }
    }
}
