pub mod fields;
pub mod raw_status;
pub mod ups_snapshot;

pub use raw_status::RawStatus;
pub use ups_snapshot::UpsSnapshot;
