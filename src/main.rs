use anyhow::Result;
use attendance_tracker::OutputFormat;
use attendance_tracker::commands;
use attendance_tracker::config::{self, Backend, Config};
use attendance_tracker::records::{RecordEdit, YearMonth};
use attendance_tracker::remote::RemoteClient;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "attend")]
#[command(about = "Clock-in/clock-out attendance tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clock in with a title for the shift
    In {
        #[arg(help = "What you are working on")]
        title: String,
    },
    /// Clock out of the open record
    Out,
    /// Show the open record, if any
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List records
    List {
        #[arg(long, help = "Only records in this month (YYYY-MM)")]
        month: Option<YearMonth>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Edit a record; working hours are recomputed
    Edit {
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, help = "New date (YYYY/MM/DD)")]
        date: Option<String>,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New clock-in time (HH:MM[:SS])")]
        clock_in: Option<String>,
        #[arg(long, help = "New clock-out time (HH:MM[:SS])")]
        clock_out: Option<String>,
    },
    /// Delete a record
    Delete {
        #[arg(help = "Record ID")]
        id: String,
    },
    /// Monthly hours and estimated pay
    Summary {
        #[arg(long, help = "Month (YYYY-MM), defaults to the current month")]
        month: Option<YearMonth>,
        #[arg(long, help = "Hourly rate, overrides pay.hourly_rate")]
        rate: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Export closed records to an .ics file
    Export {
        #[arg(long, short, help = "Output file path")]
        output: PathBuf,
        #[arg(long, help = "Only records in this month (YYYY-MM)")]
        month: Option<YearMonth>,
    },
    /// Import records from an .ics file
    Import {
        #[arg(help = "Input file path")]
        file: PathBuf,
        #[arg(long, help = "Preview changes without applying")]
        dry_run: bool,
    },
    /// Script endpoint operations
    Remote(RemoteArgs),
    /// OAuth authentication for Google Calendar
    Oauth(OauthArgs),
    /// Create Google Calendar events for closed records
    Sync {
        #[arg(help = "Record IDs to sync")]
        ids: Vec<String>,
        #[arg(long, help = "Sync every closed record")]
        all: bool,
        #[arg(long, help = "Only records in this month (YYYY-MM)")]
        month: Option<YearMonth>,
        #[arg(long, help = "Preview without calling Google")]
        dry_run: bool,
    },
    /// Read or change configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct RemoteArgs {
    #[command(subcommand)]
    action: RemoteAction,
}

#[derive(Subcommand)]
enum RemoteAction {
    /// List records held by the script
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check in through the script
    In { title: String },
    /// Check out of a calendar event through the script
    Out {
        #[arg(help = "Event ID returned at check-in")]
        event_id: String,
        #[arg(long, default_value = "", help = "Title of the shift")]
        title: String,
        #[arg(long, help = "Check-out time (HH:MM), defaults to now")]
        time: Option<String>,
    },
}

#[derive(Args)]
struct OauthArgs {
    #[command(subcommand)]
    action: OauthAction,
}

#[derive(Subcommand)]
enum OauthAction {
    /// Authenticate with Google (browser consent + loopback redirect)
    Login,
    /// Show current authentication status
    Status,
    /// Remove cached tokens
    Logout,
    /// Store the OAuth client secret in the system keyring ("" removes it)
    Secret { value: String },
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_tracker=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config() -> Result<Config> {
    let path = config::config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
    }
    config::load()
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Config commands must work even when the current file fails validation
    let config = match &cli.command {
        Commands::Config(_) => config::load_from_path(config::config_path()?)?,
        _ => load_config()?,
    };
    let now = Local::now().naive_local();
    let remote = || -> Result<RemoteClient> { Ok(RemoteClient::new(config.remote_url()?)) };
    let backend = config.storage.backend;

    match &cli.command {
        Commands::In { title } => match backend {
            Backend::Local => {
                let repo = commands::local_repository(&config)?;
                commands::clock::clock_in(&repo, title, now)?;
            }
            Backend::Remote => {
                commands::remote::check_in(&remote()?, title)?;
            }
        },
        Commands::Out => match backend {
            Backend::Local => {
                let repo = commands::local_repository(&config)?;
                commands::clock::clock_out(&repo, now)?;
            }
            Backend::Remote => {
                commands::remote::check_out_latest(&remote()?, now)?;
            }
        },
        Commands::Status { format } => {
            let repo = commands::local_repository(&config)?;
            commands::clock::status(&repo, now, *format)?;
        }
        Commands::List { month, format } => match backend {
            Backend::Local => {
                let repo = commands::local_repository(&config)?;
                commands::records::list(&repo, *month, *format)?;
            }
            Backend::Remote => commands::remote::list(&remote()?, *format)?,
        },
        Commands::Edit {
            id,
            date,
            title,
            clock_in,
            clock_out,
        } => {
            let repo = commands::local_repository(&config)?;
            let edit = RecordEdit {
                date: date.clone(),
                title: title.clone(),
                clock_in_time: clock_in.clone(),
                clock_out_time: clock_out.clone(),
            };
            commands::records::edit(&repo, id, edit)?;
        }
        Commands::Delete { id } => {
            let repo = commands::local_repository(&config)?;
            commands::records::delete(&repo, id)?;
        }
        Commands::Summary {
            month,
            rate,
            format,
        } => {
            let repo = commands::local_repository(&config)?;
            let month = month.unwrap_or_else(|| YearMonth::of(now.date()));
            let rate = rate.unwrap_or(config.pay.hourly_rate);
            if !rate.is_finite() || rate < 0.0 {
                anyhow::bail!("Hourly rate must be a non-negative number");
            }
            commands::records::summary(&repo, month, rate, *format)?;
        }
        Commands::Export { output, month } => {
            let repo = commands::local_repository(&config)?;
            commands::ical::export(&repo, output, *month)?;
        }
        Commands::Import { file, dry_run } => {
            let repo = commands::local_repository(&config)?;
            commands::ical::import(&repo, file, *dry_run)?;
        }
        Commands::Remote(args) => {
            let client = remote()?;
            match &args.action {
                RemoteAction::List { format } => commands::remote::list(&client, *format)?,
                RemoteAction::In { title } => {
                    commands::remote::check_in(&client, title)?;
                }
                RemoteAction::Out {
                    event_id,
                    title,
                    time,
                } => {
                    commands::remote::check_out(&client, event_id, title, time.as_deref(), now)?;
                }
            }
        }
        Commands::Oauth(args) => match &args.action {
            OauthAction::Login => {
                tokio::runtime::Runtime::new()?.block_on(commands::oauth::login(&config))?;
            }
            OauthAction::Status => {
                tokio::runtime::Runtime::new()?.block_on(commands::oauth::status(&config))?;
            }
            OauthAction::Logout => commands::oauth::logout(&config)?,
            OauthAction::Secret { value } => commands::oauth::store_secret(&config, value)?,
        },
        Commands::Sync {
            ids,
            all,
            month,
            dry_run,
        } => {
            let repo = commands::local_repository(&config)?;
            tokio::runtime::Runtime::new()?.block_on(commands::sync::sync(
                &repo, &config, ids, *all, *month, *dry_run,
            ))?;
        }
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
            ConfigAction::Set { key, value } => {
                commands::config::set(&config::config_path()?, key, value)?
            }
        },
    }

    Ok(())
}
