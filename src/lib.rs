//! Day-granularity dates for the Garmin Connect API.
//!
//! Connect sends days either as `"yyyy-mm-dd"` strings or as bare epoch
//! milliseconds, and sometimes as `null`. [`Date`] accepts all three.

pub mod date;
pub mod error;
mod util;
pub mod zone;

pub use date::Date;
pub use error::{DecodeError, Field, ParseError, ZoneError};
pub use zone::Zone;
