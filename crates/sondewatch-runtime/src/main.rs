//! sondewatch: radiosonde tracker and map-frame poller binary.
//! Single binary embedding the tracker daemon, the viewer-side frame
//! poller, and a URL printing helper.

use clap::Parser;

mod cli;
mod config;
mod track_loop;

use sondewatch_frame::{BrowserTarget, DisplayTarget, FramePoller, HttpUrlFetcher, StdoutTarget};
use sondewatch_telemetry::SondeHubClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Track(opts) => {
            let config = config::Config::load(&args.config)?;
            let _guard = init_logging(config.application.log_dir.as_deref());

            tracing::info!("sondewatch tracker starting");

            let fetcher = SondeHubClient::new(config.sondehub.api_base.clone());
            track_loop::run_daemon(opts, config, fetcher).await?;
        }
        cli::Command::Frame(opts) => {
            let _guard = init_logging(None);

            let fetcher = HttpUrlFetcher::new(&opts.url);
            let startup_delay = std::time::Duration::from_secs(opts.startup_delay_secs);
            let poll_interval = std::time::Duration::from_secs(opts.poll_interval_secs);

            tracing::info!("polling {} every {}s", opts.url, opts.poll_interval_secs);

            let mut target: Box<dyn DisplayTarget> = if opts.print {
                Box::new(StdoutTarget)
            } else {
                Box::new(BrowserTarget)
            };
            // Show the initial source right away, like a page loading
            // its embedded map before the first poll lands.
            target.set_source(&opts.initial);
            FramePoller::new(fetcher, target, opts.initial)
                .run(startup_delay, poll_interval)
                .await;
        }
        cli::Command::Url(opts) => {
            let config = config::Config::load(&args.config)?;
            let mut url = config
                .map_url()
                .with_center(config.location.station_lat, config.location.station_lon);
            if let Some(serial) = opts.serial {
                url = url.with_serial(serial);
            }
            println!("{}", url.build());
        }
    }

    Ok(())
}

/// Env-filtered logging to stderr, or to a daily-rolling file when the
/// tracker config names a log directory. The returned guard must stay
/// alive for the file writer to flush.
fn init_logging(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = std::env::var("SONDEWATCH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::new(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sonde_tracker.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
