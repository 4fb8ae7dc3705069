//! Audio extraction from media links.
//!
//! Resolves a link with yt-dlp, downloads the provider's audio-only stream,
//! and normalizes the file name so every downstream artifact can be derived
//! from one sanitized base name.

use crate::error::{Result, SammendragError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// A locally stored audio file plus the sanitized stem used to name all
/// downstream artifacts.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    /// Path to the extracted audio file.
    pub path: PathBuf,
    /// Sanitized, extension-free file stem.
    pub base_name: String,
}

/// Extract the audio track from a media link.
///
/// Downloads the first audio-only stream the provider offers into
/// `sound_dir` and forces the `audio_format` extension on the result.
/// The final file lands at `sound_dir/{base_name}.{audio_format}`.
///
/// If anything fails after the download has started, the partially
/// downloaded file is removed. The destination is overwritten if a
/// previous run left a file of the same name.
#[instrument(skip(sound_dir), fields(link = %link))]
pub async fn extract(link: &str, sound_dir: &Path, audio_format: &str) -> Result<AudioArtifact> {
    std::fs::create_dir_all(sound_dir)?;

    let title = resolve_title(link).await?;
    let base_name = sanitize_title(&title);
    if base_name.is_empty() {
        return Err(SammendragError::Resolution(format!(
            "Media title {:?} sanitized to an empty base name",
            title
        )));
    }

    info!("Resolved \"{}\" -> base name {}", title, base_name);

    // Remove whatever this failed attempt leaves behind, unless disarmed.
    let mut guard = StagingGuard::new(sound_dir, &base_name);

    download_audio(link, sound_dir, &base_name).await?;
    let downloaded = find_downloaded_file(sound_dir, &base_name)?;

    let target = sound_dir.join(format!("{}.{}", base_name, audio_format));
    if downloaded != target {
        std::fs::rename(&downloaded, &target)
            .map_err(|e| SammendragError::Download(format!("Could not rename audio file: {e}")))?;
    }

    guard.disarm();
    debug!("Audio extracted to {}", target.display());

    Ok(AudioArtifact {
        path: target,
        base_name,
    })
}

/// Resolve the media title via yt-dlp metadata.
async fn resolve_title(link: &str) -> Result<String> {
    let output = Command::new("yt-dlp")
        .args(["--dump-json", "--no-download", "--no-warnings", "--no-playlist", link])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SammendragError::ToolNotFound("yt-dlp".to_string())
            } else {
                SammendragError::Resolution(format!("Failed to run yt-dlp: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SammendragError::Resolution(format!(
            "Link {} is invalid or unreachable: {}",
            link,
            stderr.trim()
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| SammendragError::Resolution(format!("Failed to parse yt-dlp output: {}", e)))?;

    Ok(json["title"].as_str().unwrap_or("Unknown_Title").to_string())
}

/// Download the first audio-only stream to `{dir}/{base_name}.<ext>`.
///
/// No quality negotiation; `bestaudio` is the provider's own audio-only
/// selection and we take what it gives us.
async fn download_audio(link: &str, dir: &Path, base_name: &str) -> Result<()> {
    let template = dir.join(format!("{}.%(ext)s", base_name));

    let output = Command::new("yt-dlp")
        .arg("-f")
        .arg("bestaudio")
        .arg("--output")
        .arg(template.to_str().unwrap_or_default())
        .arg("--no-playlist")
        .arg("--force-overwrites")
        .arg("--quiet")
        .arg("--no-warnings")
        .arg(link)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SammendragError::ToolNotFound("yt-dlp".to_string())
            } else {
                SammendragError::Download(format!("yt-dlp execution failed: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SammendragError::Download(format!(
            "yt-dlp failed: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

/// Locate the downloaded file regardless of the container the provider chose.
fn find_downloaded_file(dir: &Path, base_name: &str) -> Result<PathBuf> {
    for ext in &["mp3", "m4a", "webm", "opus", "ogg", "mp4"] {
        let candidate = dir.join(format!("{}.{}", base_name, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Fallback: scan for a matching prefix
    let entries = std::fs::read_dir(dir)
        .map_err(|e| SammendragError::Download(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(base_name) {
            return Ok(entry.path());
        }
    }

    Err(SammendragError::Download(
        "Audio file not found after download".into(),
    ))
}

/// Sanitize a media title into a file stem: whitespace becomes underscores
/// and characters that are unsafe in file names are dropped.
pub fn sanitize_title(title: &str) -> String {
    let unsafe_chars = Regex::new(r#"[\\/:*?"<>|'`]"#).expect("Invalid regex");
    let cleaned = unsafe_chars.replace_all(title, "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('.')
        .to_string()
}

/// Removes staged files with the guarded stem when dropped armed.
struct StagingGuard {
    dir: PathBuf,
    stem: String,
    armed: bool,
}

impl StagingGuard {
    fn new(dir: &Path, stem: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(entries) = std::fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with(&self.stem) {
                    let _ = std::fs::remove_file(entry.path());
                }
            }
        }
    }
}
