//! Command-line wrapper: reads the two header files from disk, runs the
//! generation pipeline in-process, and prints a summary (optionally
//! writing the generated files and the raw JSON response out).

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use convgen::{BackendSettings, GenerateRequest, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "convgen", about = "Generate versioned headers and converters from a before/after header pair")]
struct Args {
    /// Root struct name seeding the generation.
    #[arg(long, default_value = "ExamplePort")]
    root: String,

    /// Path to the legacy header file.
    #[arg(long)]
    old_header: PathBuf,

    /// Path to the updated header file.
    #[arg(long)]
    new_header: PathBuf,

    /// Backend identifier: cloud, offline or local.
    #[arg(long, default_value = "cloud")]
    backend: String,

    /// Optional model override passed to the backend.
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Skip the base64 zip payload in the response.
    #[arg(long)]
    no_archive: bool,

    /// Directory to write the four generated files into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Optional file to write the raw JSON response to.
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let settings = BackendSettings::from_env();

    if args.backend == "cloud" && settings.cloud_api_key.is_none() {
        eprintln!("[warning] OPENAI_API_KEY is not set; the cloud backend will be rejected");
    }

    let old_header = fs::read_to_string(&args.old_header)
        .with_context(|| format!("reading {}", args.old_header.display()))?;
    let new_header = fs::read_to_string(&args.new_header)
        .with_context(|| format!("reading {}", args.new_header.display()))?;

    let mut request = GenerateRequest::new(args.root, old_header, new_header)
        .with_backend(args.backend)
        .with_temperature(args.temperature)
        .with_archive(!args.no_archive);
    if let Some(model) = args.model {
        request = request.with_model(model);
    }

    let pipeline = Pipeline::new(settings);
    let response = match pipeline.run(&request).await {
        Ok(response) => response,
        Err(err) => {
            eprintln!("generation failed ({}): {err}", err.status_code());
            std::process::exit(1);
        }
    };

    if let Some(path) = args.dump_json {
        fs::write(&path, serde_json::to_string_pretty(&response)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote response to {}", path.display());
    }

    if let Some(dir) = args.out_dir {
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        for file in &response.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.content)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        println!("Wrote {} files to {}", response.files.len(), dir.display());
    }

    println!("Root: {}", response.root);
    println!("Files:");
    for file in &response.files {
        println!("  - {} ({} bytes of content)", file.name, file.content.len());
    }
    if response.archive_base64.is_some() {
        println!("Archive: present");
    } else {
        println!("Archive: not requested");
    }

    Ok(())
}
