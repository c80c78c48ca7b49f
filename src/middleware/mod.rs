pub mod auth;
pub mod response;

pub use auth::BearerClaims;
pub use response::envelope_errors;
