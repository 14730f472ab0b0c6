use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use fontsnap::logging::{LogLevel, init_logging};
use fontsnap::media::guess_image_mime;
use fontsnap::render::confidence_percent;
use fontsnap::{
    ActionOutcome, DataUri, FontSnapConfig, GeminiModel, IdentifyFontRequest, SuggestFontsRequest,
};
use serde::Serialize;

/// Identify fonts in images with a generative AI model.
#[derive(Debug, Parser)]
#[command(name = "fontsnap", version, about)]
struct Cli {
    /// Model name, e.g. gemini-2.5-flash (overrides FONTSNAP_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Log level: error, warn, info, debug or trace (FONTSNAP_LOG wins when set)
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web UI and JSON API
    Serve {
        /// Address to listen on (overrides FONTSNAP_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Identify the font in an image file or URL
    Identify(IdentifyArgs),
    /// Suggest fonts matching a description
    Suggest {
        description: String,

        /// Print the raw JSON outcome
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct IdentifyArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the raw JSON outcome
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Local image file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Remote image URL
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let mut config = FontSnapConfig::from_env().context("invalid configuration")?;
    if let Some(model) = &cli.model {
        config.model = GeminiModel::from_string(model.as_str());
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            let service = Arc::new(config.build_service()?);
            let app = fontsnap::server::create_app(service, config.body_limit);
            fontsnap::server::serve(config.bind, app)
                .await
                .context("server error")?;
        }
        Command::Identify(args) => {
            let service = config.build_service()?;
            let request = match (args.source.file, args.source.url) {
                (Some(path), _) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let Some(mime_type) = guess_image_mime(&bytes, Some(path.as_path())) else {
                        bail!("{} is not a recognised image", path.display());
                    };
                    IdentifyFontRequest::from_data_uri(DataUri::from_bytes(&bytes, mime_type).to_string())
                }
                (None, Some(url)) => IdentifyFontRequest::from_url(url),
                (None, None) => bail!("either --file or --url is required"),
            };

            let outcome = service.identify_font(&request).await;
            print_outcome(&outcome, args.json, |font| {
                format!(
                    "{:<32} {:>4}%  {}",
                    font.font_name,
                    confidence_percent(font.confidence_level),
                    font.purchase_link
                )
            })?;
        }
        Command::Suggest { description, json } => {
            let service = config.build_service()?;
            let outcome = service
                .suggest_fonts(&SuggestFontsRequest { description })
                .await;
            print_outcome(&outcome, json, |font| {
                format!(
                    "{:<32} {:>4}%  {}",
                    font.font_name,
                    confidence_percent(font.confidence),
                    font.purchase_url
                )
            })?;
        }
    }

    Ok(())
}

fn print_outcome<T: Serialize>(
    outcome: &ActionOutcome<T>,
    json: bool,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else if let Some(fonts) = outcome.suggestions() {
        for font in fonts {
            println!("{}", line(font));
        }
    }

    if let Some(error) = outcome.error_message() {
        if !json {
            eprintln!("{}", error);
        }
        std::process::exit(1);
    }
    Ok(())
}
