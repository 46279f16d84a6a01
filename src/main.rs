mod config;
mod dirs;
mod logs;
mod rsa;
mod server;
mod types;

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use serde::Serialize;

use crate::config::{CommonConfig, PathSet};
use crate::server::config::ServerConfig;
use crate::server::factory::{self, ServerFactory};
use crate::types::claim::Claim;

#[derive(Parser, Debug)]
#[command(author, version = env!("FOOAPI_VERSION"), about)]
struct FooArgs {
    /// Config directory. Defaults to `$FOOAPI_CONFIG`, then `/etc/fooapi` for
    /// root or `~/.config/fooapi`.
    #[arg(long, global = true)]
    config_path: Option<PathBuf>,

    /// Data directory. Defaults to `$FOOAPI_DATA`, then `/var/lib/fooapi` for
    /// root or `~/.local/share/fooapi`.
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,

    /// Print server configuration data (JSON) and exit.
    #[arg(long, global = true)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server. This is the default command.
    Serve,

    /// Mint a bearer token signed with the server's key and print it.
    Token(TokenArgs),
}

#[derive(Args, Debug)]
struct TokenArgs {
    /// Subject (caller name) of the token.
    #[arg(long, short)]
    subject: String,

    /// Value of a `Permission` claim, e.g. `Read` or `Write`. Repeatable.
    #[arg(long = "permission", short)]
    permissions: Vec<String>,

    /// Token lifetime in seconds, overrides `authn.token.expiry`.
    #[arg(long)]
    expiry: Option<u64>,
}

async fn run(args: FooArgs) -> Result<()> {
    let ps = PathSet::new(args.config_path, args.data_path)?;
    let cfg: ServerConfig = ps.load_config("server", ServerConfig::default)?;

    if args.print_config {
        return pretty_json(cfg);
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&ps, cfg).await,
        Command::Token(token_args) => token(cfg, token_args),
    }
}

async fn serve(ps: &PathSet, cfg: ServerConfig) -> Result<()> {
    logs::init_logger(&ps.data_path, "fooapi", &cfg.logs)?;
    info!(
        "Starting fooapi {}, api versions {:?}",
        env!("FOOAPI_VERSION"),
        cfg.api_versions
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
    );

    let factory = ServerFactory::new(cfg)?;
    let srv = factory.build_server()?;
    srv.run().await.context("run restful server")
}

fn token(mut cfg: ServerConfig, args: TokenArgs) -> Result<()> {
    if let Some(expiry) = args.expiry {
        if expiry == 0 {
            bail!("expiry must be greater than 0");
        }
        cfg.authn.token.expiry = expiry;
    }

    let claims: Vec<Claim> = args.permissions.into_iter().map(Claim::permission).collect();
    let resp = factory::issue_token(&cfg, args.subject, claims).context("generate token")?;

    pretty_json(resp)
}

fn pretty_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = FooArgs::parse();
    match run(args).await {
        Ok(()) => {}
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
