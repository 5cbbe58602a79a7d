use anyhow::{bail, Context, Result};
use brandkit_completion::{CompletionAdapter, COMPLETION_API_KEY_ENV};
use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor, DEFAULT_PROBE_URL};
use brandkit_core::ClientError;
use brandkit_gateway::{FileStorage, Gateway, GatewayConfig};
use brandkit_stores::{friendly_message, ProjectDraft, Stores};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brandkit", version, about = "Branding workspace from the terminal")]
struct Cli {
    /// Where the signed-in session is kept between runs
    #[arg(
        long,
        global = true,
        env = "BRANDKIT_SESSION_FILE",
        default_value = ".brandkit/session.json"
    )]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the network is reachable
    Probe {
        #[arg(long, default_value = DEFAULT_PROBE_URL)]
        url: String,
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
    /// Ask the branding assistant
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BRANDKIT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: String,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BRANDKIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List projects, or create one
    Projects {
        #[arg(long)]
        create: Option<String>,
        #[arg(long, requires = "create")]
        description: Option<String>,
    },
    /// List tracked keywords, or add or remove one
    Keywords {
        #[arg(long, conflicts_with = "remove")]
        add: Option<String>,
        #[arg(long, default_value_t = 0)]
        volume: i64,
        #[arg(long, default_value_t = 0)]
        trend: i32,
        #[arg(long)]
        remove: Option<String>,
    },
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// The remote assistant when a key is configured, the local responder
/// otherwise.
fn completion_adapter() -> CompletionAdapter {
    match CompletionAdapter::from_env() {
        Ok(adapter) => adapter,
        Err(error) => {
            tracing::warn!(%error, "{COMPLETION_API_KEY_ENV} not set, answering locally");
            CompletionAdapter::builder(tower::service_fn(|_prompt: String| async {
                Err::<String, _>(ClientError::QuotaExceeded("no API key configured".into()))
            }))
            .build()
        }
    }
}

fn gateway(session_file: PathBuf) -> Result<Arc<Gateway>> {
    let config = GatewayConfig::from_env().context("store configuration")?;
    Ok(Gateway::builder(config)
        .session_storage(FileStorage::new(session_file))
        .self_check_on_start(false)
        .build())
}

fn stores(session_file: PathBuf) -> Result<Stores> {
    Ok(Stores::new(gateway(session_file)?, completion_adapter()))
}

fn fail(error: ClientError) -> anyhow::Error {
    anyhow::anyhow!(friendly_message(&error))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Probe { url, timeout_secs } => {
            let monitor = ConnectivityMonitor::http(
                url,
                ConnectivityConfig::builder()
                    .timeout(Duration::from_secs(timeout_secs))
                    .build(),
            );
            if monitor.check_connection().await {
                println!("online");
            } else {
                println!("offline");
                std::process::exit(1);
            }
        }
        Command::Ask { prompt } => {
            let prompt = prompt.join(" ");
            // Exchanges are only saved when the store is configured.
            let reply = match GatewayConfig::from_env() {
                Ok(_) => stores(cli.session_file)?.conversation().ask(&prompt).await,
                Err(_) => Some(completion_adapter().generate_response(&prompt).await),
            };
            match reply {
                Some(reply) => println!("{reply}"),
                None => bail!("prompt is empty"),
            }
        }
        Command::Signup {
            email,
            password,
            full_name,
        } => {
            let stores = stores(cli.session_file)?;
            let user = stores
                .auth()
                .sign_up(&email, &password, &full_name)
                .await
                .map_err(fail)?;
            println!("signed up as {}", user.email.as_deref().unwrap_or(&user.id));
        }
        Command::Login { email, password } => {
            let stores = stores(cli.session_file)?;
            let user = stores.auth().sign_in(&email, &password).await.map_err(fail)?;
            println!("signed in as {}", user.email.as_deref().unwrap_or(&user.id));
        }
        Command::Logout => {
            stores(cli.session_file)?
                .auth()
                .sign_out()
                .await
                .map_err(fail)?;
            println!("signed out");
        }
        Command::Whoami => {
            let stores = stores(cli.session_file)?;
            stores.auth().check_user().await;
            match stores.auth().user() {
                Some(user) => {
                    println!("{}", serde_json::to_string_pretty(&user)?);
                }
                None => bail!(stores
                    .auth()
                    .error()
                    .unwrap_or_else(|| "not signed in".to_string())),
            }
        }
        Command::Projects {
            create,
            description,
        } => {
            let stores = stores(cli.session_file)?;
            let projects = stores.projects();
            if let Some(title) = create {
                let project = projects
                    .create_project(ProjectDraft {
                        title,
                        description,
                        ..Default::default()
                    })
                    .await
                    .map_err(fail)?;
                println!("created {}", project.id);
                return Ok(());
            }
            projects.fetch_projects().await;
            if let Some(error) = projects.projects().error() {
                bail!(error);
            }
            for project in projects.projects().items() {
                println!(
                    "{}\t{}\t{}%\t{}",
                    project.id, project.status, project.progress, project.title
                );
            }
        }
        Command::Keywords {
            add,
            volume,
            trend,
            remove,
        } => {
            let stores = stores(cli.session_file)?;
            let research = stores.market_research();
            if let Some(keyword) = add {
                let keyword = research
                    .add_keyword(&keyword, volume, trend)
                    .await
                    .map_err(fail)?;
                println!("tracking {} ({})", keyword.keyword, keyword.id);
                return Ok(());
            }
            if let Some(id) = remove {
                research.remove_keyword(&id).await;
                if let Some(error) = research.keywords().error() {
                    bail!(error);
                }
                println!("removed {id}");
                return Ok(());
            }
            research.fetch_keywords().await;
            if let Some(error) = research.keywords().error() {
                bail!(error);
            }
            for keyword in research.keywords().items() {
                println!(
                    "{}\t{}\t{}\t{}",
                    keyword.id, keyword.search_volume, keyword.trend_score, keyword.keyword
                );
            }
        }
    }

    Ok(())
}
