//! Record shapes served by the API
//!
//! Each submodule owns one record and the conversion from its provider payload:
//! - Location: the durable, cached geocoding result
//! - Weather: one forecast day
//! - Restaurant: one business search hit
//! - Trail: one trail search hit

pub mod location;
pub mod restaurant;
pub mod trail;
pub mod weather;

pub use location::Location;
pub use restaurant::Restaurant;
pub use trail::Trail;
pub use weather::Weather;
