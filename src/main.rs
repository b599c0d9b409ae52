use content_wizard::api::GenerationClient;
use content_wizard::config::{AppConfig, ProviderConfig};
use content_wizard::content::{Format, GenerationRequest, GenerationResult, Tone, WordCount};
use content_wizard::error::{ValidationError, WizardError};
use content_wizard::export::FileExporter;
use content_wizard::prompt::build_request_prompt;
use content_wizard::state::ViewController;
use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Generate articles, blog posts, essays and reports about any topic.
#[derive(Parser, Debug)]
#[command(name = "content-wizard", version, about)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "CONTENT_WIZARD_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate content and print it
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Provider name from the config (defaults to the active one)
        #[arg(short, long)]
        provider: Option<String>,

        /// Also save the result as <topic>-<format>.txt
        #[arg(short, long)]
        export: bool,

        /// Directory for exported files
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the prompt that would be sent, without calling any provider
    Prompt {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Check that a provider is configured and reachable
    Check {
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init,
}

#[derive(Args, Debug, Clone)]
struct RequestArgs {
    /// What to write about
    #[arg(short, long, default_value_t = String::new())]
    topic: String,

    /// Target length in words (100-2000)
    #[arg(short, long)]
    words: Option<u32>,

    #[arg(long, value_enum)]
    tone: Option<Tone>,

    #[arg(short, long, value_enum)]
    format: Option<Format>,
}

impl RequestArgs {
    /// Overlays the flags on top of the configured defaults.
    fn to_request(&self, config: &AppConfig) -> Result<GenerationRequest, ValidationError> {
        let mut request = config.defaults.request(self.topic.clone());
        if let Some(words) = self.words {
            request.word_count = WordCount::new(words)?;
        }
        if let Some(tone) = self.tone {
            request.tone = tone;
        }
        if let Some(format) = self.format {
            request.format = format;
        }
        Ok(request)
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn select_provider<'a>(
    config: &'a AppConfig,
    name: Option<&str>,
) -> anyhow::Result<&'a ProviderConfig> {
    let name = name.unwrap_or(&config.active_provider);
    config.get_provider(name).ok_or_else(|| {
        let known: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
        anyhow!("Unknown provider '{}' (configured: {})", name, known.join(", "))
    })
}

/// One-line summary shown while the request is in flight.
fn describe_request(request: &GenerationRequest) -> String {
    format!(
        "{} on \"{}\" ({} words, {})",
        request.format.label(),
        request.topic.trim(),
        request.word_count,
        request.tone.label()
    )
}

/// Paragraphs separated by one blank line, with stray whitespace dropped.
fn render_output(output: &GenerationResult) -> String {
    output.paragraphs().join("\n\n")
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_file);

    match cli.command {
        Command::Config { action } => {
            match action {
                ConfigAction::Path => println!("{}", config_path.display()),
                ConfigAction::Show => {
                    let config = AppConfig::load_from(&config_path);
                    print!("{}", toml::to_string_pretty(&config)?);
                }
                ConfigAction::Init => {
                    if config_path.exists() {
                        println!("Config already exists at {}", config_path.display());
                    } else {
                        AppConfig::default()
                            .save_to(&config_path)
                            .with_context(|| format!("Failed to write {:?}", config_path))?;
                        println!("Wrote default config to {}", config_path.display());
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Prompt { request } => {
            let config = AppConfig::load_from(&config_path);
            let request = match request.to_request(&config) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            if let Err(e) = request.validate() {
                eprintln!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", build_request_prompt(&request));
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { provider } => {
            let config = AppConfig::load_from(&config_path);
            let provider = select_provider(&config, provider.as_deref())?;
            let client = GenerationClient::from_config(provider);
            match client.check_availability().await {
                Ok(()) => {
                    println!("{} ({}) is available", provider.name, provider.active_model);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{} is not available: {}", provider.name, e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Generate {
            request,
            provider,
            export,
            out_dir,
        } => {
            let config = AppConfig::load_from(&config_path);
            let request = match request.to_request(&config) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            let provider = select_provider(&config, provider.as_deref())?;
            let export_dir = out_dir
                .or_else(|| config.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));

            let mut controller = ViewController::new(
                GenerationClient::from_config(provider),
                Box::new(FileExporter::new(export_dir)),
                request,
            );

            eprintln!("Writing {}...", describe_request(&controller.state().request));
            match controller.generate().await {
                Ok(output) => println!("{}", render_output(output)),
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }

            if export {
                match controller.export() {
                    Ok(Some(path)) => eprintln!("Exported to {}", path.display()),
                    Ok(None) => {}
                    Err(e @ WizardError::Export(_)) => {
                        eprintln!("{}", e);
                        return Ok(ExitCode::FAILURE);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
