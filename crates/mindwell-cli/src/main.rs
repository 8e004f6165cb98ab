use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use mindwell_cli::commands::{self, OutputFormat, SaveTarget};
use mindwell_cli::config::{self, MindwellConfig};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "mindwell",
    about = "Score SCL-90 and Emotion Health self-assessments",
    version
)]
struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered instruments
    Instruments,
    /// Print the question bank of an instrument
    Questions {
        /// Instrument id, e.g. scl90 or emotion_health
        instrument: String,
    },
    /// Score an answer file
    Score(ScoreArgs),
    /// Compare one user's two most recent saved SCL-90 records
    Compare(HistoryArgs),
    /// Show one user's SCL-90 trend since their first saved record
    Trend(HistoryArgs),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Instrument id, e.g. scl90 or emotion_health
    instrument: String,
    /// JSON object mapping question id to answer value
    #[arg(long)]
    answers: PathBuf,
    /// Reject incomplete or out-of-range answer sets
    #[arg(long)]
    strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Save the scored assessment as a record under this directory
    #[arg(long, requires = "user")]
    save: Option<PathBuf>,
    /// User the saved record belongs to
    #[arg(long)]
    user: Option<Uuid>,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Record files, or directories searched for them
    #[arg(required = true)]
    records: Vec<PathBuf>,
    /// User whose records to read; required when the records span users
    #[arg(long)]
    user: Option<Uuid>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    match cli.command {
        Command::Instruments => print!("{}", commands::list_instruments()),
        Command::Questions { instrument } => {
            print!("{}", commands::list_questions(&instrument)?)
        }
        Command::Score(args) => {
            let config = config::load_config(&config_path)?;
            let policy = commands::effective_policy(config.policy, args.strict);
            let answers = commands::read_answers(&args.answers)?;
            let save = match (args.save, args.user) {
                (Some(dir), Some(user_id)) => Some(SaveTarget { dir, user_id }),
                _ => None,
            };
            let output =
                commands::score(&args.instrument, answers, &policy, args.format, save.as_ref())?;
            println!("{output}");
        }
        Command::Compare(args) => {
            let records = commands::load_records(&args.records, args.user)?;
            let comparison = commands::compare(&records, args.user)?;
            println!("{}", commands::render_comparison(&comparison, args.format)?);
        }
        Command::Trend(args) => {
            let records = commands::load_records(&args.records, args.user)?;
            let trend = commands::trend(&records, args.user)?;
            println!("{}", commands::render_trend(&trend, args.format)?);
        }
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let config = config::load_config(&config_path)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommand::Init { force } => {
                if config_path.exists() && !force {
                    return Err(eyre::eyre!(
                        "config already exists at {} (use --force to overwrite)",
                        config_path.display()
                    ));
                }
                config::save_config(&config_path, &MindwellConfig::default())?;
                println!("{}", config_path.display());
            }
            ConfigCommand::Path => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
