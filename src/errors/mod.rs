pub mod types;
pub mod classification;

pub use types::GatewayError;
pub use classification::ErrorClassification;
