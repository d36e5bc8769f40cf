pub mod domain;
pub mod error;
pub mod nis;

pub use domain::{RawStatus, UpsSnapshot};
pub use error::{FieldParseError, NisError};
pub use nis::{DecodeMode, NisClient};
