//! Unit-commitment scenario sweeps.
//!
//! For each demand scenario, slack penalty and renewable penetration factor, a mixed-integer
//! problem deciding which plants are on, when they start and how much they produce is built and
//! solved. Summary indicators for every combination are written to CSV.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod analysis;
pub mod cli;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod optimisation;
pub mod output;
pub mod parameter_set;
pub mod plant;
pub mod series;
pub mod settings;
pub mod sweep;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program
pub fn get_ucsweep_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No user config dir on this platform: fall back to the working directory
        return PathBuf::new();
    };
    config_dir.push("ucsweep");

    config_dir
}
