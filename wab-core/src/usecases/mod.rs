mod error;
mod resolve_address;


pub use self::{error::Error, resolve_address::*};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, gateways::geocode};
}
