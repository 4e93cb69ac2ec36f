pub mod chunker;
pub mod envelope;
pub mod error;
pub mod model;
pub mod service;
pub mod sink;

pub use error::*;
pub use model::*;
pub use service::*;
pub use sink::*;
