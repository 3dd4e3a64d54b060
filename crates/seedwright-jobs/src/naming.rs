//! Artifact naming.

/// Extension every generated metafile carries.
pub const TORRENT_EXTENSION: &str = ".torrent";

/// Ensure `input` ends with [`TORRENT_EXTENSION`], appending it when absent.
///
/// The input is otherwise returned unchanged; confinement to a bare file name is
/// enforced when the request is validated, not here.
#[must_use]
pub fn derive_name(input: &str) -> String {
    if input.ends_with(TORRENT_EXTENSION) {
        input.to_string()
    } else {
        format!("{input}{TORRENT_EXTENSION}")
    }
}
