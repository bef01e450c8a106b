use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagebox")]
#[command(about = "Slug-addressed HTML/JS page store with a public route", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $PAGEBOX_CONFIG or config/pagebox.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Delete every stored page and the page directory
    Purge,
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind, overriding server.bind_addr
    #[arg(long)]
    pub address: Option<SocketAddr>,
}
