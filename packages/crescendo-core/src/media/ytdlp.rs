//! Reference resolution backed by the `yt-dlp` executable.
//!
//! First stage (`resolve`) asks for a flat JSON description of the reference,
//! which is either a single item or a playlist with `entries`. Second stage
//! (`resolve_stream`) asks for the direct URL of the best audio format.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::traits::TrackResolver;
use crate::constants::DEFAULT_TRACK_TITLE;
use crate::error::{ResolutionError, ResolveResult};
use crate::room::Track;

/// Resolver that shells out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    program: PathBuf,
}

impl YtDlpResolver {
    /// Creates a resolver that runs `program` (usually just `yt-dlp`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the executable and returns stdout on success.
    async fn run(&self, args: &[&str]) -> ResolveResult<String> {
        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ResolutionError::Process(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("unknown error")
                .trim()
                .to_string();
            return Err(ResolutionError::NotFound(reason));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(&self, reference: &str) -> ResolveResult<Vec<Track>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ResolutionError::InvalidReference(
                "a reference is required".to_string(),
            ));
        }

        log::debug!("[Resolver] Resolving reference {}", reference);
        let json = self
            .run(&["-J", "--flat-playlist", "--no-warnings", "--", reference])
            .await?;
        let tracks = parse_info_json(&json, reference)?;
        log::info!(
            "[Resolver] {} resolved to {} track(s)",
            reference,
            tracks.len()
        );
        Ok(tracks)
    }

    async fn resolve_stream(&self, track: &Track) -> ResolveResult<String> {
        let stdout = self
            .run(&[
                "-f",
                "bestaudio",
                "-g",
                "--no-playlist",
                "--no-warnings",
                "--",
                track.source_ref(),
            ])
            .await?;
        parse_stream_url(&stdout)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output Parsing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct InfoJson {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    webpage_url: Option<String>,
    /// Present only for playlists. Unavailable entries come through as `null`.
    #[serde(default)]
    entries: Option<Vec<Option<EntryJson>>>,
}

#[derive(Deserialize)]
struct EntryJson {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Parses `yt-dlp -J --flat-playlist` output into tracks.
pub(crate) fn parse_info_json(json: &str, reference: &str) -> ResolveResult<Vec<Track>> {
    let info: InfoJson =
        serde_json::from_str(json).map_err(|e| ResolutionError::Parse(e.to_string()))?;

    match info.entries {
        Some(entries) => {
            let tracks: Vec<Track> = entries
                .into_iter()
                .flatten()
                .filter_map(|entry| {
                    let url = entry.url?;
                    let title = entry.title.unwrap_or_else(|| DEFAULT_TRACK_TITLE.to_string());
                    Some(Track::new(url, title))
                })
                .collect();
            if tracks.is_empty() {
                return Err(ResolutionError::NoTracks(reference.to_string()));
            }
            Ok(tracks)
        }
        None => {
            let source = info.webpage_url.unwrap_or_else(|| reference.to_string());
            let title = info.title.unwrap_or_else(|| DEFAULT_TRACK_TITLE.to_string());
            Ok(vec![Track::new(source, title)])
        }
    }
}

/// Takes the first URL printed by `yt-dlp -g`.
pub(crate) fn parse_stream_url(stdout: &str) -> ResolveResult<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ResolutionError::Parse("no stream URL in output".to_string()))
}
