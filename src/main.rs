use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use orderdesk::config::{Config, ConfigError, IdentityConfig};
use orderdesk::identity::IdentityError;
use orderdesk::routes::{Navigation, RouteTable};
use orderdesk::{Claims, Credentials, FileStore, HttpIdentityProvider, LoginOutcome, SessionError, SessionManager};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

type Manager = SessionManager<HttpIdentityProvider, FileStore>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid --field '{0}': expected key=value")]
    InvalidField(String),
    #[error("invalid --json credentials: {0}")]
    InvalidJson(serde_json::Error),
    #[error("output serialization failed: {0}")]
    Output(#[from] serde_json::Error),
    #[error("--json credentials must be a JSON object")]
    CredentialsNotObject,
    #[error("login rejected by identity provider (status {status})")]
    Rejected { status: u16 },
}

#[derive(Parser, Debug)]
#[command(name = "orderdesk", about = "Orders client: sign in, sign out, inspect the session")]
struct Cli {
    /// Identity Provider endpoint; overrides `ORDERDESK_IDENTITY_URL`.
    #[arg(long)]
    identity_url: Option<String>,

    /// Token storage file; overrides `ORDERDESK_STORE_PATH`.
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a token and persist it.
    Login(LoginArgs),
    /// Forget the persisted token.
    Logout,
    /// Show whether a session is stored and who it belongs to.
    Status,
    /// Resolve a client path against the route table and the current session.
    Route { path: String },
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Credential field, repeatable: `--field email=ada@example.com`.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Whole credentials object as JSON.
    #[arg(long, conflicts_with = "fields")]
    json: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::debug!(identity_url = %config.identity.url, store = %config.store_path.display(), "config loaded");

    let provider = HttpIdentityProvider::new(&config.identity)?;
    let mut manager = SessionManager::new(provider, FileStore::new(config.store_path));

    // Startup check: an unreadable stored token is reported, not fatal, so
    // `logout` can still clear it.
    let restore_error = manager.check_auth().err();
    if let Some(e) = &restore_error {
        tracing::warn!(error = %e, "stored session could not be restored");
    }

    match cli.command {
        Command::Login(args) => login(&mut manager, &args).await,
        Command::Logout => {
            manager.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Status => status(&manager, restore_error.as_ref()),
        Command::Route { path } => {
            route(&manager, &path);
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.identity_url {
        let timeouts = config.identity.timeouts;
        config.identity = IdentityConfig { timeouts, ..IdentityConfig::new(url)? };
    }
    if let Some(path) = &cli.store {
        config.store_path.clone_from(path);
    }
    Ok(config)
}

fn parse_credentials(args: &LoginArgs) -> Result<Credentials, CliError> {
    if let Some(raw) = &args.json {
        return match serde_json::from_str::<Value>(raw).map_err(CliError::InvalidJson)? {
            Value::Object(map) => Ok(Credentials::from(map)),
            _ => Err(CliError::CredentialsNotObject),
        };
    }

    let mut map = Map::new();
    for field in &args.fields {
        match field.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                map.insert(key.trim().to_owned(), Value::String(value.to_owned()));
            }
            _ => return Err(CliError::InvalidField(field.clone())),
        }
    }
    Ok(Credentials::from(map))
}

async fn login(manager: &mut Manager, args: &LoginArgs) -> Result<(), CliError> {
    let credentials = parse_credentials(args)?;
    match manager.login(&credentials).await? {
        LoginOutcome::Authenticated(claims) => {
            println!("signed in as {}", display_name(&claims));
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(())
        }
        LoginOutcome::Rejected { status, body } => {
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            Err(CliError::Rejected { status })
        }
    }
}

fn status(manager: &Manager, restore_error: Option<&SessionError>) -> Result<(), CliError> {
    if let Some(e) = restore_error {
        println!("authenticated: false (stored token unreadable: {e})");
        return Ok(());
    }

    println!("authenticated: {}", manager.is_authenticated());
    if let Some(claims) = manager.user() {
        println!("user: {}", display_name(claims));
        if let Some(exp) = claims.expires_at() {
            println!("expires at (unix, not enforced): {exp}");
        }
        println!("{}", serde_json::to_string_pretty(claims)?);
    }
    Ok(())
}

fn route(manager: &Manager, path: &str) {
    match RouteTable::default().navigate(path, manager.session()) {
        Navigation::Render(m) => {
            let chain: Vec<String> = m.views.iter().map(ToString::to_string).collect();
            println!("render {}", chain.join(" > "));
            for (name, value) in &m.params {
                println!("  {name} = {value}");
            }
        }
        Navigation::Redirect(target) => println!("redirect {target}"),
        Navigation::NotFound => println!("not found"),
    }
}

fn display_name(claims: &Claims) -> String {
    claims
        .name()
        .or_else(|| claims.email())
        .map(str::to_owned)
        .or_else(|| claims.subject())
        .unwrap_or_else(|| "(unnamed user)".to_owned())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
