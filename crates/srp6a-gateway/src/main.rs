// srp6a-gateway - TCP demo server/client for the srp6a core
//
// Everything the core itself stays silent on — transport framing, user
// record persistence, logging policy, CLI surface — lives here instead.

mod client_task;
mod config;
mod log;
mod server_task;
mod store;
mod wire;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand_core::{OsRng, RngCore};
use tokio::net::TcpListener;

use srp6a::{GroupParams, ServerDriverConfig};

use config::get_config;
use server_task::ServerTaskConfig;
use store::UserStore;

const DEFAULT_CONFIG: &str = "srp6a.conf";
const DEFAULT_PORT: i64 = 5054;

#[derive(Parser, Debug)]
#[command(name = "srp6a-gateway")]
#[command(about = "SRP-6a demo authentication server and client")]
#[command(version)]
struct Args {
    /// Configuration file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the TCP authentication server.
    Serve,
    /// Derive a verifier for (identity, password) and append it to the
    /// configured users file.
    Enroll { identity: String, password: String },
    /// Run one client-side exchange against a running server.
    Client {
        identity: String,
        password: String,
        #[arg(long, default_value = "127.0.0.1:5054")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    {
        let mut config = get_config().lock();
        if !config.set_source(&args.config, "Srp6a_") {
            eprintln!("Warning: could not read configuration file {}, using defaults.", args.config);
        }
    }

    let log_dir = {
        let config = get_config().lock();
        let dir = config.get_string_default("LogsDir", "");
        if dir.is_empty() {
            None
        } else {
            Some(dir)
        }
    };
    log::initialize_logging(log_dir.as_deref(), "info");

    let group = Arc::new(GroupParams::default());

    match args.command {
        Command::Serve => run_server(group).await,
        Command::Enroll { identity, password } => run_enroll(&group, &identity, &password),
        Command::Client { identity, password, addr } => {
            let addr: SocketAddr = addr.parse()?;
            let key = client_task::run_client(addr, group, identity.as_bytes(), password.as_bytes()).await?;
            tracing::info!("authenticated, session key = {}", store::encode_hex(&key));
            Ok(())
        }
    }
}

fn run_enroll(group: &GroupParams, identity: &str, password: &str) -> anyhow::Result<()> {
    let users_file = {
        let config = get_config().lock();
        config.get_string_default("UsersFile", "users.conf")
    };

    let mut salt = vec![0u8; 32];
    OsRng.try_fill_bytes(&mut salt).map_err(|_| anyhow::anyhow!("failed to draw salt from OS RNG"))?;

    let store = UserStore::new();
    store.enroll(group, identity.as_bytes(), salt.clone(), password.as_bytes())?;
    let record = store.lookup(identity.as_bytes()).expect("just enrolled");

    UserStore::append_record_to_file(&users_file, &record)?;
    tracing::info!("enrolled {identity} into {users_file}");
    Ok(())
}

async fn run_server(group: Arc<GroupParams>) -> anyhow::Result<()> {
    tracing::info!("srp6a-gateway v{}", env!("CARGO_PKG_VERSION"));

    let (users_file, bind_ip, port, enumeration_resistance, timeout_ms) = {
        let config = get_config().lock();
        (
            config.get_string_default("UsersFile", "users.conf"),
            config.get_string_default("BindIP", "0.0.0.0"),
            config.get_int_default("Port", DEFAULT_PORT),
            config.get_bool_default("UserEnumerationResistance", true),
            config.get_int_default("ExchangeTimeoutMs", 10_000),
        )
    };

    let store = UserStore::load_from_file(&users_file)?;
    tracing::info!("loaded users from {users_file}");

    let mut server_secret = vec![0u8; 32];
    OsRng
        .try_fill_bytes(&mut server_secret)
        .map_err(|_| anyhow::anyhow!("failed to draw server secret from OS RNG"))?;

    let task_config = ServerTaskConfig {
        group,
        driver_config: ServerDriverConfig {
            user_enumeration_resistance: enumeration_resistance,
            server_secret,
        },
        exchange_timeout: Duration::from_millis(timeout_ms as u64),
    };

    let bind_addr = format!("{bind_ip}:{port}");
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {bind_addr}");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        let store = store.clone();
                        let task_config = task_config.clone();
                        tokio::spawn(async move {
                            server_task::handle_client(stream, addr, store, task_config).await;
                        });
                    }
                    Err(e) => tracing::error!("failed to accept connection: {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down...");
                break;
            }
        }
    }

    Ok(())
}
