//! Wire-level request and response bodies.
//!
//! Field names are camelCase to match the bundled web frontend.

use std::path::Path;

use seedwright_fsops::{DirectoryEntry, Listing};
use seedwright_jobs::{JobResult, TorrentJobRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const SIZE_STEP: f64 = 1024.0;
const DIRECTORY_SIZE: &str = "-";

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short summary of the problem type.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Occurrence-specific explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Per-field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON pointer to the offending field.
    pub pointer: String,
    /// Machine-readable reason.
    pub message: String,
}

/// One child of a listed directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntryView {
    /// Entry name.
    pub name: String,
    /// Absolute path of the entry.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Human-readable size, `-` for directories.
    pub size: String,
    /// Raw size in bytes, 0 for directories.
    pub bytes: u64,
}

impl From<DirectoryEntry> for FileEntryView {
    fn from(entry: DirectoryEntry) -> Self {
        let size = if entry.is_directory {
            DIRECTORY_SIZE.to_string()
        } else {
            format_size(entry.size_bytes)
        };
        Self {
            name: entry.name,
            path: display_path(&entry.absolute_path),
            is_directory: entry.is_directory,
            size,
            bytes: entry.size_bytes,
        }
    }
}

/// Response body for `GET /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// Directory that was listed.
    pub current_path: String,
    /// Parent directory, `null` at the browse root.
    pub parent_path: Option<String>,
    /// Children, directories first.
    pub files: Vec<FileEntryView>,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            current_path: display_path(&listing.current_path),
            parent_path: listing.parent_path.as_deref().map(display_path),
            files: listing.entries.into_iter().map(FileEntryView::from).collect(),
        }
    }
}

/// Piece size as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PieceSizeInput {
    /// `"pieceSize": 20`
    Number(serde_json::Number),
    /// `"pieceSize": "20"`
    Text(String),
}

impl PieceSizeInput {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Number(number) => Some(number.to_string()),
            Self::Text(text) if text.trim().is_empty() => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Request body for `POST /api/create`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTorrentRequest {
    /// File or directory to describe.
    pub source_path: String,
    /// Tracker announce URL.
    pub announce_url: String,
    /// Artifact name; `.torrent` is appended when missing.
    pub output_name: String,
    /// Optional piece-size exponent.
    pub piece_size: Option<PieceSizeInput>,
}

impl CreateTorrentRequest {
    /// Validate the body into a job request.
    ///
    /// # Errors
    ///
    /// Returns the job validation error listing every rejected field.
    pub fn into_job_request(self) -> JobResult<TorrentJobRequest> {
        let piece_size = self.piece_size.and_then(PieceSizeInput::into_text);
        TorrentJobRequest::new(
            self.source_path,
            self.announce_url,
            self.output_name,
            piece_size.as_deref(),
        )
    }
}

/// Success body for `POST /api/create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTorrentResponse {
    /// Always `true`.
    pub success: bool,
    /// Fixed confirmation message.
    pub message: String,
    /// Absolute path of the written metafile.
    pub output_path: String,
    /// Tool stdout.
    pub logs: String,
    /// Job correlation id.
    pub job_id: Uuid,
}

/// Failure body for `POST /api/create` when the tool could not produce a metafile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTorrentFailure {
    /// Always `false`.
    pub success: bool,
    /// Failure reason.
    pub error: String,
    /// Tool exit code, `null` when it never ran or was signalled.
    pub code: Option<i32>,
    /// Tool stderr followed by stdout.
    pub logs: String,
    /// Job correlation id.
    pub job_id: Uuid,
}

/// Response body for `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    /// Fixed confirmation message.
    pub message: String,
    /// Absolute path of the stored file.
    pub path: String,
}

/// Render a byte count with 1024-based units and at most two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= SIZE_STEP && unit < SIZE_UNITS.len() - 1 {
        scaled /= SIZE_STEP;
        unit += 1;
    }
    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn format_size_matches_frontend_expectations() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1000), "1000 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2_621_440), "2.5 MB");
        assert_eq!(format_size(1_234_567), "1.18 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_size(5 * 1024_u64.pow(5)), "5120 TB");
    }

    #[test]
    fn listing_response_uses_frontend_field_names() -> anyhow::Result<()> {
        let listing = Listing {
            current_path: PathBuf::from("/data/movies"),
            parent_path: Some(PathBuf::from("/data")),
            entries: vec![
                DirectoryEntry {
                    name: "extras".to_string(),
                    absolute_path: PathBuf::from("/data/movies/extras"),
                    is_directory: true,
                    size_bytes: 0,
                },
                DirectoryEntry {
                    name: "film.mkv".to_string(),
                    absolute_path: PathBuf::from("/data/movies/film.mkv"),
                    is_directory: false,
                    size_bytes: 1536,
                },
            ],
        };
        let value = serde_json::to_value(ListingResponse::from(listing))?;
        assert_eq!(
            value,
            json!({
                "currentPath": "/data/movies",
                "parentPath": "/data",
                "files": [
                    {"name": "extras", "path": "/data/movies/extras", "isDirectory": true, "size": "-", "bytes": 0},
                    {"name": "film.mkv", "path": "/data/movies/film.mkv", "isDirectory": false, "size": "1.5 KB", "bytes": 1536}
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn root_listing_serializes_null_parent() -> anyhow::Result<()> {
        let listing = Listing {
            current_path: PathBuf::from("/data"),
            parent_path: None,
            entries: Vec::new(),
        };
        let value = serde_json::to_value(ListingResponse::from(listing))?;
        assert_eq!(value["parentPath"], serde_json::Value::Null);
        Ok(())
    }

    #[test]
    fn piece_size_accepts_numbers_and_strings() -> anyhow::Result<()> {
        let numeric: CreateTorrentRequest = serde_json::from_value(json!({
            "sourcePath": "/data/a", "announceUrl": "https://t", "outputName": "a", "pieceSize": 18
        }))?;
        assert_eq!(numeric.into_job_request()?.piece_size().get(), 18);

        let text: CreateTorrentRequest = serde_json::from_value(json!({
            "sourcePath": "/data/a", "announceUrl": "https://t", "outputName": "a", "pieceSize": "22"
        }))?;
        assert_eq!(text.into_job_request()?.piece_size().get(), 22);

        let blank: CreateTorrentRequest = serde_json::from_value(json!({
            "sourcePath": "/data/a", "announceUrl": "https://t", "outputName": "a", "pieceSize": ""
        }))?;
        assert_eq!(blank.into_job_request()?.piece_size().get(), 21);
        Ok(())
    }

    #[test]
    fn missing_fields_become_validation_errors() -> anyhow::Result<()> {
        let body: CreateTorrentRequest = serde_json::from_value(json!({"pieceSize": 2.5}))?;
        let Err(err) = body.into_job_request() else {
            panic!("empty body should be rejected");
        };
        assert_eq!(err.violations().len(), 4);
        Ok(())
    }

    #[test]
    fn create_failure_keeps_null_code() -> anyhow::Result<()> {
        let body = CreateTorrentFailure {
            success: false,
            error: "external tool terminated by signal".to_string(),
            code: None,
            logs: String::new(),
            job_id: Uuid::nil(),
        };
        let value = serde_json::to_value(body)?;
        assert_eq!(value["code"], serde_json::Value::Null);
        assert_eq!(value["jobId"], json!(Uuid::nil()));
        Ok(())
    }
}
