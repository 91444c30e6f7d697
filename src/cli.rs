//! Command-line surface.
//!
//! Thin glue over the core pipeline: argument parsing, loader selection,
//! and rendering of the structured reports in either `key=value` or JSON
//! form. All validation semantics live in `core`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::artifact::{inspect, ArtifactDescriptor};
use crate::core::deps::{DependencyManifest, DependencyResolver};
use crate::core::error::CheckResult;
use crate::core::loader::LoaderType;
use crate::core::mapping::{MappingEvidence, MappingScores, MappingVerdict};
use crate::core::pipeline;

/// Contract checks for multi-loader Minecraft mod builds
#[derive(Parser, Debug)]
#[command(
    name = "modcheck",
    about = "Contract checks for multi-loader Minecraft mod builds",
    version,
    long_about = "modcheck validates a mod repository's declared configuration against its \
                  physical layout, derives the expected build artifact path per loader, \
                  inspects the built jar and classifies its mapping convention, and resolves \
                  pinned test-time dependencies."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        default_value = ".",
        help = "Repository root"
    )]
    pub root: PathBuf,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = "gradle.properties",
        help = "Property file path, relative to the root"
    )]
    pub properties: PathBuf,

    #[arg(
        short = 'f',
        long,
        global = true,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the full validation pipeline for every active loader")]
    Validate,

    #[command(about = "Print the expected artifact path for a loader")]
    Path(LoaderSelect),

    #[command(about = "Inspect a built artifact's archive structure")]
    Inspect(LoaderSelect),

    #[command(about = "Classify the mapping convention inside a built artifact")]
    Classify(ClassifyArgs),

    #[command(about = "Resolve and download pinned test-time dependencies")]
    Deps(DepsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct LoaderSelect {
    #[arg(
        short = 'l',
        long,
        value_name = "LOADER",
        help = "Loader selection (required for multi-loader projects)"
    )]
    pub loader: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(
        short = 'l',
        long,
        value_name = "LOADER",
        help = "Loader whose expectation the classification is judged against"
    )]
    pub loader: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Explicit artifact path (skips path resolution)"
    )]
    pub artifact: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DepsArgs {
    #[arg(
        short = 'l',
        long,
        value_name = "LOADER",
        help = "Loader to resolve dependencies for (required for multi-loader projects)"
    )]
    pub loader: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        default_value = "dependencies.yml",
        help = "Dependency manifest path, relative to the root"
    )]
    pub manifest: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "run/mods",
        help = "Destination directory for downloaded files, relative to the root"
    )]
    pub dest: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub async fn run(args: CliArgs) -> CheckResult<()> {
    let root = args.root.clone();
    let properties_path = root.join(&args.properties);

    match &args.command {
        Commands::Validate => {
            let report = pipeline::run_validation(&root, &properties_path)?;
            match args.format {
                OutputFormat::Human => println!("{report}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Path(select) => {
            let context = pipeline::load_context(&root, &properties_path)?;
            let requested = parse_loader(select.loader.as_deref())?;
            let descriptor = ArtifactDescriptor::resolve(&context, requested)?;
            match args.format {
                OutputFormat::Human => println!("{descriptor}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&descriptor)?),
            }
        }

        Commands::Inspect(select) => {
            let context = pipeline::load_context(&root, &properties_path)?;
            let requested = parse_loader(select.loader.as_deref())?;
            let descriptor = ArtifactDescriptor::resolve(&context, requested)?;
            let report = inspect(&descriptor.absolute_path(&root), descriptor.loader)?;
            match args.format {
                OutputFormat::Human => {
                    println!("artifact={}", report.path.display());
                    println!("entries={}", report.entry_count);
                    println!("metadata_entry={}", report.metadata_entry);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Classify(classify) => {
            let requested = parse_loader(classify.loader.as_deref())?;
            let (artifact, loader) = match &classify.artifact {
                Some(path) => (root.join(path), requested),
                None => {
                    let context = pipeline::load_context(&root, &properties_path)?;
                    let descriptor = ArtifactDescriptor::resolve(&context, requested)?;
                    (descriptor.absolute_path(&root), Some(descriptor.loader))
                }
            };

            let evidence = MappingEvidence::from_archive(&artifact)?;
            let scores = MappingScores::of(&evidence);

            match loader {
                Some(loader) => {
                    let verdict = MappingVerdict::judge(loader, scores);
                    match args.format {
                        OutputFormat::Human => {
                            println!("mapping_type={}", verdict.classified);
                            println!("score_intermediary={}", scores.intermediary);
                            println!("score_srg={}", scores.srg);
                            println!("score_mojmap={}", scores.mojmap);
                            println!("mapping_status={}", verdict.status);
                        }
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&verdict)?)
                        }
                    }
                    verdict.require_pass()?;
                }
                None => match args.format {
                    OutputFormat::Human => {
                        println!("mapping_type={}", scores.classify());
                        println!("score_intermediary={}", scores.intermediary);
                        println!("score_srg={}", scores.srg);
                        println!("score_mojmap={}", scores.mojmap);
                    }
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scores)?),
                },
            }
        }

        Commands::Deps(deps) => {
            let context = pipeline::load_context(&root, &properties_path)?;
            let requested = parse_loader(deps.loader.as_deref())?;
            // Dependency resolution is loader-specific; reuse the artifact
            // selection rules to pick and validate the loader.
            let descriptor = ArtifactDescriptor::resolve(&context, requested)?;

            let manifest = DependencyManifest::load(&root.join(&deps.manifest))?;
            let resolver = DependencyResolver::new()?;
            let resolution = resolver
                .run(
                    manifest.as_ref(),
                    descriptor.loader,
                    &context.minecraft_version,
                    &root.join(&deps.dest),
                )
                .await?;

            match args.format {
                OutputFormat::Human => print!("{resolution}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolution)?),
            }
        }
    }

    Ok(())
}

fn parse_loader(raw: Option<&str>) -> CheckResult<Option<LoaderType>> {
    raw.map(str::parse).transpose()
}
