use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use zoomgraph::serialize::{BundleSerializer, D3Serializer, JsonSerializer};
use zoomgraph::{build_scene, ExportOptions, Exporter, OutputFormat, PlotModel};

#[derive(Parser, Debug)]
#[command(name = "zoomgraph")]
#[command(
    about = "Turn a static plot description into an interactive pan/zoom d3 bundle",
    long_about = None
)]
struct Args {
    /// Plot model JSON file (reads stdin when omitted)
    model: Option<PathBuf>,

    /// Export options JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: html or json (overrides the config file)
    #[arg(long)]
    format: Option<String>,

    /// Figure id prefix (overrides the config file)
    #[arg(long)]
    id_prefix: Option<String>,
}

fn load_options(args: &Args) -> Result<ExportOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ExportOptions::from_json(&text).context("Failed to parse config file")?
        }
        None => ExportOptions::default(),
    };

    if let Some(format) = &args.format {
        options.format = match format.as_str() {
            "html" => OutputFormat::Html,
            "json" => OutputFormat::Json,
            other => anyhow::bail!("Unknown output format '{}': expected html or json", other),
        };
    }
    if let Some(prefix) = &args.id_prefix {
        options.id_prefix = prefix.clone();
    }
    Ok(options)
}

fn read_model(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read plot model {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read plot model from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let options = load_options(&args)?;
    let issuer = options.issuer().context("Invalid figure id prefix")?;

    let input = read_model(args.model.as_ref())?;
    let model = PlotModel::from_json(&input).context("Failed to parse plot model")?;

    let built = build_scene(&model, &issuer, &options).context("Failed to build scene")?;
    for diagnostic in &built.diagnostics {
        log::warn!("{}", diagnostic);
    }

    let bundle = Exporter::new(&options).export(&built.scene);
    let output = match options.format {
        OutputFormat::Html => D3Serializer.serialize(&bundle),
        OutputFormat::Json => JsonSerializer { pretty: true }.serialize(&bundle),
    }
    .context("Failed to serialize bundle")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.as_bytes())
        .context("Failed to write bundle to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
