use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use nictate_capture::Config;
use nictate_client::{BiometricBackend, BiometricClient};
use nictate_core::blink::BlinkDetector;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "nictate", about = "Nictate capture pipeline diagnostics")]
struct Cli {
    /// Bearer token for the portal API (defaults to $NICTATE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a still image to the enrollment endpoint
    Enroll {
        /// Image file to submit
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Submit a still image to the verification endpoint
    Verify {
        /// Image file to submit
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Show face registration status for the authenticated account
    Status,
    /// Replay an EAR trace through the blink state machine
    Replay {
        /// File with one combined EAR sample per line, 100 ms apart
        #[arg(short, long)]
        trace: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Enroll { image } => {
            let ack = client(&config)
                .enroll(&read_image(&image)?, &token(cli.token)?)
                .await?;
            if ack.succeeded() {
                println!(
                    "enrolled: {}",
                    ack.message.unwrap_or_else(|| "ok".to_string())
                );
            } else {
                println!("endpoint answered but reported no success");
            }
        }
        Commands::Verify { image } => {
            let ack = client(&config)
                .verify(&read_image(&image)?, &token(cli.token)?)
                .await?;
            println!("verified: {}", ack.succeeded());
            if let Some(message) = ack.message {
                println!("message:  {message}");
            }
        }
        Commands::Status => {
            let status = client(&config).status(&token(cli.token)?).await?;
            println!("registered: {}", status.has_face_registered);
            println!("verified:   {}", status.is_verified);
        }
        Commands::Replay { trace } => replay(&trace, &config)?,
    }

    Ok(())
}

fn client(config: &Config) -> BiometricClient {
    BiometricClient::new(config.api_base_url.clone(), config.submit_timeout())
}

fn token(arg: Option<String>) -> Result<String> {
    arg.or_else(|| std::env::var("NICTATE_TOKEN").ok())
        .context("no token: pass --token or set NICTATE_TOKEN")
}

fn read_image(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    // Sanity-decode so a broken file fails here, not at the endpoint.
    image::load_from_memory(&bytes).context("file is not a decodable image")?;
    Ok(BASE64.encode(bytes))
}

/// Feed an EAR trace through the blink machine and print every transition.
fn replay(path: &Path, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let samples: Vec<f32> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.parse::<f32>().with_context(|| format!("bad EAR sample: {l}")))
        .collect::<Result<_>>()?;

    let mut machine = BlinkDetector::new(config.blink_config());
    let base = Instant::now();

    for (i, ear) in samples.iter().enumerate() {
        let now = base + Duration::from_millis(i as u64 * config.tick_interval_ms);
        let tick = machine.tick(*ear, now);
        println!(
            "{i:>4}  ear={ear:.3}  {tick:?}  count={}",
            machine.blink_count()
        );
    }

    println!("total blinks: {}", machine.blink_count());
    Ok(())
}
