use anyhow::{Context as _, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "clipstack";

pub fn get_config_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_config_file(name).context("failed get path")
}

pub fn get_data_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_data_file(name).context("failed get path")
}

/// Get the path to a state file (e.g. logs).
pub fn get_state_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_state_file(name).context("failed get path")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_file_path_contains_prefix() {
        let path = get_data_file("history.db").unwrap();
        assert!(path.to_string_lossy().contains(APP_NAME));
        assert!(path.ends_with("history.db"));
    }
}
