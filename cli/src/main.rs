//! Boltzmann CLI - upload a digit image and get a prediction
//!
//! # Main Commands
//!
//! ```bash
//! boltzmann predict digit7.png          # Upload, then predict
//! boltzmann upload digit7.png           # Upload only, print the durable URL
//! boltzmann classify https://.../x.png  # Predict for an already hosted image
//! boltzmann config                      # Show resolved endpoints
//! boltzmann mock-server --port 8787     # Local asset host + predictor
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use boltzmann_cli::{
    mock, settings, CliResult, ConfigReport, ConsoleLogger, MockConfig, NativeClient, Overrides,
    PredictBehavior,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "boltzmann")]
#[command(about = "Upload a handwritten digit and ask the RBM demo service what it is", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EndpointArgs {
    /// Asset host base URL (default: Cloudinary)
    #[arg(long, global = true)]
    asset_host: Option<String>,

    /// Asset host upload preset
    #[arg(long, global = true)]
    upload_preset: Option<String>,

    /// Asset host namespace
    #[arg(long, global = true)]
    cloud_name: Option<String>,

    /// Prediction endpoint URL
    #[arg(long, global = true)]
    predict_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl From<EndpointArgs> for Overrides {
    fn from(args: EndpointArgs) -> Self {
        Overrides {
            asset_host: args.asset_host,
            upload_preset: args.upload_preset,
            cloud_name: args.cloud_name,
            predict_url: args.predict_url,
            timeout_secs: args.timeout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and predict its digit
    Predict {
        /// Image file (any file is accepted)
        image: PathBuf,

        /// Print the final session snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload an image and print its durable URL
    Upload {
        /// Image file (any file is accepted)
        image: PathBuf,
    },

    /// Predict the digit of an already hosted image
    Classify {
        /// Durable asset URL
        url: String,
    },

    /// Show the resolved endpoints and timeouts
    Config,

    /// Run local mocks of the asset host and the predictor
    MockServer {
        /// Port to listen on
        #[arg(short, long, default_value = "8787")]
        port: u16,

        /// Always predict this digit (default: read it from the file name)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=9))]
        digit: Option<u8>,

        /// Delay before each prediction answer, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    ConsoleLogger::init(ConsoleLogger::level_for(cli.verbose));

    let overrides = Overrides::from(cli.endpoints);

    let result = match cli.command {
        Commands::Predict { image, json } => cmd_predict(&image, json, &overrides).await,
        Commands::Upload { image } => cmd_upload(&image, &overrides).await,
        Commands::Classify { url } => cmd_classify(&url, &overrides).await,
        Commands::Config => cmd_config(&overrides),
        Commands::MockServer {
            port,
            digit,
            delay_ms,
        } => cmd_mock_server(port, digit, delay_ms).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn client(overrides: &Overrides) -> CliResult<NativeClient> {
    let config = settings::load(overrides)?;
    NativeClient::new(config)
}

async fn cmd_predict(image: &Path, json: bool, overrides: &Overrides) -> CliResult<()> {
    let client = client(overrides)?;
    eprintln!("📤 Uploading: {}", image.display());

    let (url, digit) = client.upload_and_predict(image).await?;
    eprintln!("   Hosted at: {}", url);

    if json {
        println!("{}", serde_json::to_string_pretty(&client.snapshot())?);
    } else {
        println!("Predicted Digit: {}", digit);
    }
    Ok(())
}

async fn cmd_upload(image: &Path, overrides: &Overrides) -> CliResult<()> {
    let client = client(overrides)?;
    eprintln!("📤 Uploading: {}", image.display());

    let url = client.upload(image).await?;
    println!("{}", url);
    Ok(())
}

async fn cmd_classify(url: &str, overrides: &Overrides) -> CliResult<()> {
    let client = client(overrides)?;
    eprintln!("🔍 Classifying: {}", url);

    let digit = client.classify(url).await?;
    println!("Predicted Digit: {}", digit);
    Ok(())
}

fn cmd_config(overrides: &Overrides) -> CliResult<()> {
    let config = settings::load(overrides)?;
    let report = ConfigReport::from(config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn cmd_mock_server(port: u16, digit: Option<u8>, delay_ms: u64) -> CliResult<()> {
    let config = MockConfig {
        predict: match digit {
            Some(d) => PredictBehavior::Digit(d),
            None => PredictBehavior::Infer { fallback: 0 },
        },
        predict_delay: Duration::from_millis(delay_ms),
        ..MockConfig::default()
    };
    mock::serve(port, config).await?;
    Ok(())
}
