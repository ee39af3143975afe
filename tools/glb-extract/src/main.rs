//! glb-extract - export raw mesh dumps as glTF binary (.glb) files
//!
//! Reads a mesh manifest (attribute layout + raw vertex/index files) and
//! writes a single self-contained GLB container.

use anyhow::{Context, Result};
use clap::Parser;
use glb_extract::options::parse_mode;
use glb_extract::{ExtractOptions, MeshManifest, MeshSource};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "glb-extract")]
#[command(about = "Export a raw interleaved mesh as a glTF binary (.glb) file")]
#[command(version)]
struct Cli {
    /// Path to the mesh manifest (TOML)
    manifest: PathBuf,

    /// Output .glb file (must not exist; default: timestamped name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Primitive mode (points, lines, line-loop, line-strip, triangles, triangle-strip, triangle-fan)
    #[arg(short, long)]
    mode: Option<String>,

    /// Map an attribute alias to a glTF semantic (e.g. a_uv=TEXCOORD_0)
    #[arg(long = "map", value_name = "ALIAS=SEMANTIC", value_parser = parse_mapping)]
    mappings: Vec<(String, String)>,

    /// Alias of the attribute that receives min/max bounds
    #[arg(long)]
    position_alias: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_mapping(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((alias, semantic)) if !alias.is_empty() && !semantic.is_empty() => {
            Ok((alias.to_string(), semantic.to_string()))
        }
        _ => Err(format!("expected ALIAS=SEMANTIC, got '{s}'")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let manifest = MeshManifest::load(&cli.manifest)?;
    let base_dir = cli.manifest.parent().unwrap_or(Path::new("."));
    let mesh = manifest.load_mesh(base_dir)?;

    let mut options = manifest
        .apply_options(ExtractOptions::default(), base_dir)?
        .with_generator(concat!("glb-extract ", env!("CARGO_PKG_VERSION")));
    if let Some(output) = cli.output {
        options.output = output;
    }
    if let Some(mode) = &cli.mode {
        options.render_mode =
            parse_mode(mode).with_context(|| format!("Unknown primitive mode: {mode}"))?;
    }
    if let Some(alias) = cli.position_alias {
        options.position_alias = alias;
    }
    for (alias, semantic) in cli.mappings {
        options.attribute_map.insert(alias, semantic);
    }

    tracing::info!(
        "Exporting {} vertices / {} indices {:?} -> {:?}",
        mesh.vertex_count(),
        mesh.index_count(),
        cli.manifest,
        options.output
    );
    glb_extract::extract(&mesh, &options)
        .with_context(|| format!("Failed to export {}", options.output.display()))?;
    tracing::info!("Done!");

    Ok(())
}
