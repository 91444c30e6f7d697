// ─── Validation Pipeline ───
// Fail-fast orchestrator: properties -> structure -> context, then per
// active loader: path resolution -> inspection -> classification. The first
// hard failure from any component aborts the whole run; there is no
// partial-success reporting beyond the failing diagnostic.

use std::path::Path;

use tracing::info;

use crate::core::artifact::{inspect, ArtifactDescriptor};
use crate::core::context::BuildContext;
use crate::core::error::CheckResult;
use crate::core::loader::LoaderType;
use crate::core::mapping::{MappingEvidence, MappingScores, MappingVerdict, VerdictStatus};
use crate::core::properties::BuildProperties;
use crate::core::report::{LoaderReport, ValidationReport};
use crate::core::structure;

/// Resolve the read-only build context from the property file and the
/// repository layout.
pub fn load_context(root: &Path, properties_path: &Path) -> CheckResult<BuildContext> {
    let properties = BuildProperties::load(properties_path)?;
    let detected = structure::detect_loaders(root);
    BuildContext::resolve(properties, detected)
}

/// Run the full validation chain for every active loader.
pub fn run_validation(root: &Path, properties_path: &Path) -> CheckResult<ValidationReport> {
    let context = load_context(root, properties_path)?;

    let mut loaders = Vec::new();
    for loader in context.active_loaders.clone() {
        info!("Validating artifact for {}", loader);
        loaders.push(validate_loader(root, &context, loader)?);
    }

    Ok(ValidationReport {
        mod_id: context.mod_id,
        mod_version: context.mod_version,
        minecraft_version: context.minecraft_version,
        loader_multi: context.loader_multi,
        loaders,
        status: VerdictStatus::Pass,
    })
}

/// Validate one loader's artifact: resolve its path, inspect the archive,
/// classify its mapping convention.
pub fn validate_loader(
    root: &Path,
    context: &BuildContext,
    loader: LoaderType,
) -> CheckResult<LoaderReport> {
    let descriptor = ArtifactDescriptor::resolve(context, Some(loader))?;
    let artifact = descriptor.absolute_path(root);

    let inspection = inspect(&artifact, loader)?;

    let evidence = MappingEvidence::from_archive(&artifact)?;
    let scores = MappingScores::of(&evidence);
    let verdict = MappingVerdict::judge(loader, scores);
    verdict.require_pass()?;

    Ok(LoaderReport {
        loader,
        artifact: descriptor.relative_path(),
        entry_count: inspection.entry_count,
        metadata_entry: inspection.metadata_entry,
        mapping_type: verdict.classified,
        scores,
        mapping_status: verdict.status,
    })
}
