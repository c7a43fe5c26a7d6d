pub mod discover;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lanprobe")]
#[command(about = "Finds the devices living on the private IPv4 ranges.")]
pub struct CommandLine {
    /// Only print the results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep 10.0.x.x, 172.16.0-15.x and 192.168.x.x for hosts, ports and MACs
    #[command(alias = "d")]
    Discover,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
