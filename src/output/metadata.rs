//! Code for writing metadata to file
use anyhow::Result;
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Information about the program build via `built` crate
#[allow(clippy::doc_markdown)]
#[allow(clippy::needless_raw_string_hashes)]
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// The git commit the program was built from, marked `-dirty` if there were local changes
fn git_commit() -> String {
    match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("{hash}-dirty"),
        (Some(hash), _) => hash.to_string(),
        (None, _) => "unknown".to_string(),
    }
}

/// The full contents of `metadata.toml`
#[derive(Serialize)]
struct Metadata<'a> {
    run: RunInfo<'a>,
    program: BuildInfo,
    platform: HostInfo,
}

/// Information about this invocation
#[derive(Serialize)]
struct RunInfo<'a> {
    /// Path to the model directory
    model_path: &'a Path,
    /// Local time at which the sweep started
    started: String,
    /// The command line the program was invoked with
    command_line: String,
}

/// Information about the program build, recorded by the build script
#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    profile: &'static str,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    git_commit: String,
}

impl BuildInfo {
    fn current() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            profile: built_info::PROFILE,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit: git_commit(),
        }
    }
}

/// The host the sweep runs on, as reported by `uname`
#[derive(Serialize)]
struct HostInfo {
    os: String,
    system: String,
    hostname: String,
    release: String,
    machine: String,
}

impl HostInfo {
    fn current() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow::anyhow!("Unable to determine platform info: {err}"))?;
        let lossy = |value: &std::ffi::OsStr| value.to_string_lossy().into_owned();

        Ok(Self {
            os: lossy(info.osname()),
            system: lossy(info.sysname()),
            hostname: lossy(info.nodename()),
            release: lossy(info.release()),
            machine: lossy(info.machine()),
        })
    }
}

/// Write metadata to the specified output path in TOML format
pub fn write_metadata(output_path: &Path, model_path: &Path) -> Result<()> {
    let metadata = Metadata {
        run: RunInfo {
            model_path,
            started: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            command_line: env::args().collect::<Vec<_>>().join(" "),
        },
        program: BuildInfo::current(),
        platform: HostInfo::current()?,
    };
    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_metadata() {
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), Path::new("demos/toy")).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let table: toml::Table = toml::from_str(&contents).unwrap();
        assert_eq!(table["run"]["model_path"].as_str(), Some("demos/toy"));
        assert_eq!(table["program"]["name"].as_str(), Some("ucsweep"));
        assert!(table["platform"]["machine"].is_str());
    }
}
