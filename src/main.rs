//! vanity-quote - CLI tool to price vanity configurations and export quotes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vanity_core::export::{
    capture_preview, quote_pdf_filename, try_decode_share_link, FilePreviewCapture,
    HttpQuoteMailer,
};
use vanity_core::{
    build_quote, encode_share_link, render_quote_pdf, render_quote_summary, send_quote_email,
    validate_configuration, CustomerInfo, QuoteArtifact, QuoteSettings, VanityConfiguration,
};

/// Price bathroom vanity configurations and export quotes.
#[derive(Parser, Debug)]
#[command(name = "vanity-quote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML): branding, share URL, mail service, rates
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a configuration and print the breakdown
    Price {
        /// Configuration JSON file
        input: PathBuf,
    },

    /// Check a configuration without pricing it
    Validate {
        /// Configuration JSON file
        input: PathBuf,
    },

    /// Write a PDF quote
    Pdf {
        /// Configuration JSON file
        input: PathBuf,

        /// Output PDF path (defaults to a timestamped file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        quote: QuoteArgs,
    },

    /// Print a shareable link for a configuration
    Share {
        /// Configuration JSON file
        input: PathBuf,

        /// Base URL of the designer page (overrides settings)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Decode a share link back into a configuration
    Decode {
        /// Full link, query string or `config=...` value
        link: String,
    },

    /// E-mail a quote through the configured mail service
    Email {
        /// Configuration JSON file
        input: PathBuf,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Send without the PDF attachment
        #[arg(long)]
        no_pdf: bool,

        #[command(flatten)]
        quote: QuoteArgs,
    },
}

/// Options shared by commands that build a quote document.
#[derive(clap::Args, Debug)]
struct QuoteArgs {
    /// Pre-rendered JPEG preview of the vanity
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Customer name printed on the quote
    #[arg(long)]
    customer_name: Option<String>,

    /// Customer e-mail printed on the quote
    #[arg(long)]
    customer_email: Option<String>,
}

impl QuoteArgs {
    fn customer(&self) -> Option<CustomerInfo> {
        if self.customer_name.is_none() && self.customer_email.is_none() {
            return None;
        }
        Some(CustomerInfo::new(
            self.customer_name.clone().unwrap_or_default(),
            self.customer_email.clone().unwrap_or_default(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => QuoteSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => QuoteSettings::default(),
    };

    match &args.command {
        Command::Price { input } => price(&args, &settings, input),
        Command::Validate { input } => validate(&args, &settings, input),
        Command::Pdf {
            input,
            output,
            quote,
        } => pdf(&settings, input, output.as_deref(), quote).await,
        Command::Share { input, base_url } => share(&settings, input, base_url.as_deref()),
        Command::Decode { link } => decode(link),
        Command::Email {
            input,
            to,
            no_pdf,
            quote,
        } => email(&settings, input, to, *no_pdf, quote).await,
    }
}

fn load_configuration(path: &Path) -> Result<VanityConfiguration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = VanityConfiguration::from_json(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("Loaded configuration: {}", config.size_label());
    Ok(config)
}

/// Validate, price and optionally attach a preview.
async fn load_quote(
    settings: &QuoteSettings,
    input: &Path,
    quote: &QuoteArgs,
) -> Result<QuoteArtifact> {
    let config = load_configuration(input)?;
    let artifact = build_quote(
        &config,
        &settings.rate_table(),
        quote.customer(),
        chrono::Utc::now(),
    )
    .context("Configuration cannot be quoted")?;

    let preview = match &quote.preview {
        Some(path) => capture_preview(&FilePreviewCapture::new(path)).await,
        None => None,
    };
    Ok(artifact.with_preview(preview))
}

fn price(args: &Args, settings: &QuoteSettings, input: &Path) -> Result<()> {
    let config = load_configuration(input)?;
    let artifact = build_quote(&config, &settings.rate_table(), None, chrono::Utc::now())
        .context("Configuration cannot be priced")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifact.pricing)?);
    } else {
        print!("{}", render_quote_summary(&artifact, &settings.branding));
    }
    Ok(())
}

fn validate(args: &Args, settings: &QuoteSettings, input: &Path) -> Result<()> {
    let config = load_configuration(input)?;
    let validation = validate_configuration(&config, &settings.rate_table());

    if args.json {
        let report = serde_json::json!({
            "passed": validation.passed,
            "warnings": validation.warnings,
            "errors": validation
                .errors
                .iter()
                .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    info!("Validation passed");
    Ok(())
}

async fn pdf(
    settings: &QuoteSettings,
    input: &Path,
    output: Option<&Path>,
    quote: &QuoteArgs,
) -> Result<()> {
    let artifact = load_quote(settings, input, quote).await?;
    let bytes = render_quote_pdf(&artifact, &settings.branding)
        .context("Failed to render quote PDF")?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(quote_pdf_filename(&artifact.created_at)));

    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(
        "Generated quote {}: {}",
        artifact.reference,
        output_path.display()
    );
    Ok(())
}

fn share(settings: &QuoteSettings, input: &Path, base_url: Option<&str>) -> Result<()> {
    let config = load_configuration(input)?;
    let base_url = base_url.unwrap_or(&settings.share_base_url);
    let link = encode_share_link(base_url, &config)?;
    println!("{}", link);
    Ok(())
}

fn decode(link: &str) -> Result<()> {
    let shared = try_decode_share_link(link).context("Link does not carry a configuration")?;
    info!("Decoded share link (version {})", shared.version());
    let config = shared.into_configuration();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn email(
    settings: &QuoteSettings,
    input: &Path,
    to: &str,
    no_pdf: bool,
    quote: &QuoteArgs,
) -> Result<()> {
    let mailer = HttpQuoteMailer::from_settings(&settings.mail)
        .context("Mail service is not configured")?;
    let artifact = load_quote(settings, input, quote).await?;

    let pdf = if no_pdf {
        None
    } else {
        Some(
            render_quote_pdf(&artifact, &settings.branding)
                .context("Failed to render quote PDF")?,
        )
    };

    send_quote_email(
        &mailer,
        &artifact,
        &settings.branding,
        to,
        pdf.as_deref(),
    )
    .await
    .with_context(|| format!("Failed to e-mail quote {}", artifact.reference))?;

    Ok(())
}
