//! Shell scripts standing in for the external torrent-authoring tool.
//!
//! Scripts are POSIX `sh`; callers that spawn them should gate their tests on `cfg(unix)`.
//! Tests that exec freshly written scripts should run serially: a concurrent `fork`
//! in another test thread can hold the script's write descriptor open and make `exec`
//! fail with `ETXTBSY`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Write an executable `sh` script named `name` into `dir`.
///
/// # Errors
///
/// Returns an error if the script cannot be written or marked executable.
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))
        .with_context(|| format!("failed to write script '{}'", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to chmod script '{}'", path.display()))?;
    }
    Ok(path)
}

/// A tool that behaves like `mktorrent` on the happy path.
///
/// It validates that the positional source exists, writes a placeholder metafile to
/// the `-o` destination, and prints progress to stdout. A missing source produces an
/// error on stderr and exit status 1.
///
/// # Errors
///
/// Returns an error if the script cannot be written.
pub fn fake_mktorrent(dir: &Path) -> Result<PathBuf> {
    write_script(
        dir,
        "fake-mktorrent",
        r#"out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -l|-a) shift 2 ;;
    -*) shift ;;
    *) src="$1"; shift ;;
  esac
done
if [ ! -e "$src" ]; then
  echo "error: cannot stat '$src'" >&2
  exit 1
fi
echo "mktorrent (fake)"
printf 'd8:announce0:e' > "$out" || exit 1
echo "Writing metainfo file... done.""#,
    )
}

/// A tool that echoes each argument on its own stdout line and exits 0.
///
/// # Errors
///
/// Returns an error if the script cannot be written.
pub fn echo_args_tool(dir: &Path) -> Result<PathBuf> {
    write_script(
        dir,
        "echo-args",
        r#"for arg in "$@"; do
  printf '%s\n' "$arg"
done"#,
    )
}

/// A tool that prints the given text to stdout and stderr, then exits with `code`.
///
/// # Errors
///
/// Returns an error if the script cannot be written.
pub fn failing_tool(dir: &Path, code: i32, stdout: &str, stderr: &str) -> Result<PathBuf> {
    write_script(
        dir,
        "failing-tool",
        &format!(
            "printf '%s' '{}'\nprintf '%s' '{}' >&2\nexit {code}",
            shell_quote_body(stdout),
            shell_quote_body(stderr)
        ),
    )
}

/// A tool that writes `bytes` bytes to each of stdout and stderr before exiting 0.
///
/// Output well beyond a pipe buffer stalls the child unless both streams are drained.
///
/// # Errors
///
/// Returns an error if the script cannot be written.
pub fn chatty_tool(dir: &Path, bytes: usize) -> Result<PathBuf> {
    write_script(
        dir,
        "chatty-tool",
        &format!(
            "head -c {bytes} /dev/zero | tr '\\000' 'e' >&2\nhead -c {bytes} /dev/zero | tr '\\000' 'o'"
        ),
    )
}

/// A tool that kills itself with `SIGKILL`, so it never reports an exit code.
///
/// # Errors
///
/// Returns an error if the script cannot be written.
pub fn self_killing_tool(dir: &Path) -> Result<PathBuf> {
    write_script(dir, "self-killing-tool", "echo partial\nkill -9 $$")
}

/// Path inside `dir` that is guaranteed not to exist.
#[must_use]
pub fn missing_tool(dir: &Path) -> PathBuf {
    dir.join("definitely-not-installed-mktorrent")
}

fn shell_quote_body(value: &str) -> String {
    value.replace('\'', "'\\''")
}
