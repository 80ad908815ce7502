pub use self::location_builder::*;

pub mod location_builder {

    use crate::{geo::MapPoint, location::Location};
    use time::OffsetDateTime;

    #[derive(Debug)]
    pub struct LocationBuild {
        location: Location,
    }

    impl LocationBuild {
        pub fn pos(mut self, lat: f64, lng: f64) -> Self {
            self.location.pos = MapPoint::new(lat, lng);
            self
        }
        pub fn accuracy_m(mut self, accuracy_m: f64) -> Self {
            self.location.accuracy_m = Some(accuracy_m);
            self
        }
        pub fn time(mut self, time: OffsetDateTime) -> Self {
            self.location.time = Some(time);
            self
        }
        pub fn finish(self) -> Location {
            self.location
        }
    }

    impl Location {
        pub fn build() -> LocationBuild {
            LocationBuild {
                location: MapPoint::default().into(),
            }
        }
    }
}
