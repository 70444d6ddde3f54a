//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

use sondewatch_frame::DEFAULT_SOURCE;

#[derive(Parser)]
#[command(name = "sondewatch", about = "radiosonde tracker for the SondeHub map")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short = 'c', global = true, default_value = "tracker.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the tracker daemon (telemetry poll loop + URL publisher)
    Track(TrackOpts),
    /// Poll the published URL text and redirect the display on change
    Frame(FrameOpts),
    /// Print the station map URL and exit
    Url(UrlOpts),
}

#[derive(clap::Args)]
pub struct TrackOpts {
    /// Telemetry poll interval in seconds
    #[arg(long, default_value = "5")]
    pub poll_interval_secs: u64,
}

#[derive(clap::Args)]
pub struct FrameOpts {
    /// URL of the published text, e.g. http://host/sondehub_url.txt
    #[arg(long)]
    pub url: String,

    /// Polling interval in seconds
    #[arg(long, default_value = "10")]
    pub poll_interval_secs: u64,

    /// Delay before steady-state polling begins, giving the initially
    /// opened map time to load
    #[arg(long, default_value = "30")]
    pub startup_delay_secs: u64,

    /// Source shown until the first differing fetch
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub initial: String,

    /// Print changed URLs to stdout instead of opening a browser
    #[arg(long)]
    pub print: bool,
}

#[derive(clap::Args)]
pub struct UrlOpts {
    /// Include a serial filter in the URL
    #[arg(long)]
    pub serial: Option<String>,
}
