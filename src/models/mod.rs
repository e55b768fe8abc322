/// Birth information and derived age
pub mod identity;
/// Decoded payload bytes, generations and field tables
pub mod payload;
/// Pixel-space geometry
pub mod point;
/// Decoded input image
pub mod raw_image;
/// Boundary record
pub mod response;

pub use identity::{AgeResult, BirthDate, IdentityFacts};
pub use payload::{FieldTable, PayloadFormat, RawPayload};
pub use point::Point;
pub use raw_image::RawImage;
pub use response::VerificationResponse;
