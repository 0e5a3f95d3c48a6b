use std::num::NonZeroU16;
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use log::LevelFilter;
use tokio::signal;

mod error;
mod process;
mod routes;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .filter(Some("tower_http"), LevelFilter::Debug)
        .filter(Some("shell_shim_server"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    let CliArgs {
        host,
        port,
        shell,
        shell_arg,
        working_dir,
    } = CliArgs::parse();

    log::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_version = shell_shim_api::api::VERSION;
        "Initializing server"
    );

    if let Some(dir) = &working_dir {
        log::info!(path:debug = dir; "running commands in working directory");
    }
    log::info!(shell:display = shell, arg:display = shell_arg; "using shell");
    let shell = process::Shell::new(shell, shell_arg).with_working_dir(working_dir);

    let router = routes::app(shell);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!(
        addr:display = host,
        port:display = port;
        "listening to TCP"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[derive(Parser)]
struct CliArgs {
    /// The host address for the shell-shim server.
    #[arg(
        long,
        value_name = "URI",
        value_hint = ValueHint::Hostname,
        default_value = "0.0.0.0",
        env = "SHELL_SHIM_HOST",
    )]
    host: String,
    /// The host port for the shell-shim server.
    #[arg(
        short,
        long,
        value_name = "PORT",
        value_hint = ValueHint::Other,
        default_value = "5000",
        env = "SHELL_SHIM_PORT",
    )]
    port: NonZeroU16,
    /// The shell that interprets the received commands.
    #[arg(
        long,
        value_name = "PATH",
        value_hint = ValueHint::CommandName,
        default_value = process::DEFAULT_SHELL,
        env = "SHELL_SHIM_SHELL",
    )]
    shell: String,
    /// The flag that makes the shell read the command from its next argument.
    #[arg(
        long,
        value_name = "ARG",
        default_value = process::DEFAULT_SHELL_ARG,
        allow_hyphen_values = true,
        env = "SHELL_SHIM_SHELL_ARG",
    )]
    shell_arg: String,
    /// Working directory of all commands, defaults to the one of the server.
    #[arg(
        long,
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        env = "SHELL_SHIM_WORKING_DIR",
    )]
    working_dir: Option<PathBuf>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT (ctrl+c) handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!("received SIGINT (ctrl+c), shutting down"),
        () = terminate => log::info!("received SIGTERM, shutting down"),
    }
}
