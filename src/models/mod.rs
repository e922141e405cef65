// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchRecord, ProfileDocument};
pub use requests::LikeRequest;
pub use responses::{ErrorResponse, MessageResponse, ProfilesResponse};
