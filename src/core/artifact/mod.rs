pub mod inspector;
pub mod path;

pub use inspector::{inspect, InspectionReport};
pub use path::ArtifactDescriptor;
