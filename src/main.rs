//! Webtoon Download - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use indicatif::ProgressBar;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, EnvFilter};

use webtoon_downloader::{
    cli::Args,
    config::{
        default_config_dir,
        loader::{load_series_dir, DOWNLOADER_CONFIG_FILE, SERIES_CONFIG_DIR},
        validation::validate_base_url,
        validate_config, Config,
    },
    context::AppContext,
    download::{DownloadQueue, QueueEvent, RunState},
    error::{exit_codes, Error, Result},
    metadata::{fetch_populated_episode, fetch_populated_series, MetadataCache, SeriesId},
    output::{
        create_episode_bar, print_banner, print_config_summary, print_error, print_info,
        print_success, print_summary, print_warning,
    },
    WebtoonClient,
};

// Workers and their page downloads all run as tasks on this one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            let code = match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
                Error::Fetch { .. } | Error::Parse(_) | Error::Http(_) | Error::UrlParse(_) => {
                    exit_codes::SITE_ERROR
                }
                Error::DirectoryExists(_)
                | Error::InvalidFilename(_)
                | Error::WorkerPanicked(_)
                | Error::Io(_) => exit_codes::DOWNLOAD_ERROR,
                Error::Cancelled | Error::QueueClosed => exit_codes::ABORT,
                Error::SeriesFailed(_) => exit_codes::SOME_SERIES_FAILED,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let config = load_config(&args)?;
    let site = validate_base_url(&config.site.base_url)?;
    let library = config.library_path()?.to_path_buf();

    let title_nos: Vec<u32> = config.series.iter().map(|s| s.title_no).collect();
    print_config_summary(
        &title_nos,
        config.queue.workers,
        &library.display().to_string(),
    );

    let client = WebtoonClient::new(site, &config.site.user_agent)?;
    let context = AppContext::new(client, MetadataCache::new(), library);
    let queue = DownloadQueue::start(context.clone(), &config.queue)?;

    let cancel = queue.cancellation_token();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() && !cancel.is_cancelled() {
                print_warning("Interrupted, stopping downloads...");
                cancel.cancel();
            }
        }
    });

    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_episode_bar()
    };
    let progress = tokio::spawn(track_progress(queue.subscribe(), bar.clone()));

    let mut run_state = RunState::default();
    for title_no in title_nos {
        if cancel.is_cancelled() {
            break;
        }

        let id = SeriesId::new(title_no);
        match enqueue_series(&context, &queue, id, &bar).await {
            Ok(queued) => run_state.mark_series_queued(queued),
            Err(Error::QueueClosed) => break,
            Err(e) => {
                bar.suspend(|| print_error(&format!("Failed to process {}: {}", id, e)));
                run_state.mark_series_failed();
            }
        }
    }

    // Shutdown cancels the token itself, so check for an interrupt first.
    let was_interrupted = cancel.is_cancelled();
    let summary = queue.shutdown().await?;
    let _ = progress.await;
    bar.finish_and_clear();

    print_summary(&run_state, &summary);

    if was_interrupted {
        return Err(Error::Cancelled);
    }
    if run_state.series_failed > 0 {
        return Err(Error::SeriesFailed(run_state.series_failed));
    }

    print_success("All queued episodes processed");
    Ok(())
}

/// Load the configuration directory, merge CLI overrides and validate.
fn load_config(args: &Args) -> Result<Config> {
    let config_dir = args
        .config_dir
        .clone()
        .or_else(default_config_dir)
        .ok_or_else(|| Error::MissingConfig("configuration directory".to_string()))?;

    let mut config = if config_dir.join(DOWNLOADER_CONFIG_FILE).exists() {
        Config::load_dir(&config_dir)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_dir.join(DOWNLOADER_CONFIG_FILE).display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config {
            series: load_series_dir(&config_dir.join(SERIES_CONFIG_DIR))?,
            ..Default::default()
        }
    };

    args.merge_into_config(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Fetch a series and every free episode, enqueueing episodes as they are
/// populated. Returns the number of queued episodes.
async fn enqueue_series(
    context: &AppContext,
    queue: &DownloadQueue,
    id: SeriesId,
    bar: &ProgressBar,
) -> Result<u64> {
    let series = fetch_populated_series(&context.client, &context.cache, id).await?;
    bar.suspend(|| {
        print_info(&format!(
            "{} '{}': {} free episodes",
            id, series.title, series.free_episode_count
        ))
    });

    let mut queued = 0;
    for episode_id in series.free_episode_ids() {
        let episode = match fetch_populated_episode(&context.client, &context.cache, episode_id)
            .await
        {
            Ok(episode) => episode,
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}", episode_id, e);
                continue;
            }
        };

        queue.enqueue(episode).await?;
        bar.inc_length(1);
        queued += 1;
    }

    Ok(queued)
}

/// Advance the progress bar from queue events until the queue is gone.
async fn track_progress(
    mut events: tokio::sync::broadcast::Receiver<QueueEvent>,
    bar: ProgressBar,
) {
    loop {
        match events.recv().await {
            Ok(QueueEvent::Started(id)) => bar.set_message(id.to_string()),
            Ok(_) => bar.inc(1),
            Err(RecvError::Lagged(skipped)) => bar.inc(skipped),
            Err(RecvError::Closed) => break,
        }
    }
}
