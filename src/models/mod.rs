pub mod request;
pub mod scan;
pub mod generator;
pub mod report;

pub use request::*;
pub use scan::*;
pub use generator::*;
pub use report::*;
