//! modcheck — contract checks for multi-loader Minecraft mod builds.
//!
//! Given a declarative property file and a repository's directory layout,
//! the pipeline derives the intended build target, computes the single legal
//! artifact path per loader, inspects the built jar, and classifies its
//! bytecode mapping convention against the loader's expectation. A separate
//! resolver acquires pinned test-time dependencies from Modrinth,
//! CurseForge, or direct URLs.

pub mod cli;
pub mod core;

pub use crate::core::context::BuildContext;
pub use crate::core::error::{CheckError, CheckResult};
pub use crate::core::loader::LoaderType;
pub use crate::core::mapping::MappingType;
