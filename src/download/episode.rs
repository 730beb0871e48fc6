//! Episode page downloading.

use std::path::Path;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::api::WebtoonClient;
use crate::error::{Error, Result};
use crate::fs::{page_filename, strip_type_param};
use crate::metadata::{Episode, EpisodePage};

/// Download every page of `episode` into a newly created `destination`.
///
/// Fails with [`Error::DirectoryExists`] before any request is made when the
/// destination is already present; callers treat that as "already
/// downloaded". Pages are fetched concurrently. If any page fails the
/// episode fails, after the remaining pages have finished.
pub async fn download_episode(
    client: &WebtoonClient,
    episode: &Episode,
    series_slug: &str,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<Vec<EpisodePage>> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::create_dir(destination).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::DirectoryExists(destination.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    }

    download_pages_into(client, episode, series_slug, destination, cancel).await
}

/// Download the pages of `episode` into an existing directory.
///
/// Pages whose file is already present are not requested again. Returned
/// pages are sorted by index and all carry their local path.
pub async fn download_pages_into(
    client: &WebtoonClient,
    episode: &Episode,
    series_slug: &str,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<Vec<EpisodePage>> {
    let pages = episode.pages();
    let total = pages.len();

    let mut downloads: FuturesUnordered<_> = pages
        .into_iter()
        .map(|page| download_page(client, page, series_slug, destination, cancel))
        .collect();

    let mut completed = Vec::with_capacity(total);
    let mut first_error = None;

    while let Some(result) = downloads.next().await {
        match result {
            Ok(page) => {
                tracing::debug!("{}: page {}/{} done", episode.id(), page.index, total);
                completed.push(page);
            }
            Err(e) => {
                if !matches!(e, Error::Cancelled) {
                    tracing::warn!("{}: page download failed: {}", episode.id(), e);
                }
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    completed.sort_by_key(|page| page.index);
    Ok(completed)
}

/// Download one page image, skipping the request when the file exists.
async fn download_page(
    client: &WebtoonClient,
    mut page: EpisodePage,
    series_slug: &str,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<EpisodePage> {
    let output_path = destination.join(page_filename(series_slug, &page));

    if tokio::fs::try_exists(&output_path).await? {
        tracing::debug!("Skipping existing file: {}", output_path.display());
        page.mark_complete(output_path);
        return Ok(page);
    }

    let url = strip_type_param(&page.url);
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        response = client.get_image(&url) => response?,
    };

    let mut file = File::create(&output_path).await?;
    match write_body(&mut file, response, cancel).await {
        Ok(()) => {}
        // An interrupted page stays on disk as far as it got.
        Err(Error::Cancelled) => return Err(Error::Cancelled),
        Err(e) => {
            drop(file);
            discard_partial(&output_path).await;
            return Err(e);
        }
    }

    page.mark_complete(output_path);
    Ok(page)
}

/// Stream a response body into `file`.
///
/// Cancellation is only observed between chunks; a chunk that has been
/// received is always written in full and flushed.
async fn write_body(
    file: &mut File,
    response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut stream = response.bytes_stream();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                file.flush().await?;
                return Err(Error::Cancelled);
            }
            next = stream.next() => next,
        };

        let Some(chunk) = next else { break };
        file.write_all(&chunk?).await?;
    }

    file.flush().await?;
    Ok(())
}

async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Could not remove partial file {}: {}", path.display(), e);
    }
}
