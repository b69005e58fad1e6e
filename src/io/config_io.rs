use std::fs;
use std::path::Path;

use crate::io::board_io::BoardError;
use crate::model::config::BoardConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Read the board config. A missing file yields the defaults.
pub fn read_config(board_dir: &Path) -> Result<BoardConfig, BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BoardConfig::default()),
        Err(e) => {
            return Err(BoardError::Read {
                path: config_path,
                source: e,
            });
        }
    };
    let config: BoardConfig = toml::from_str(&config_text)?;
    Ok(config)
}

/// Write raw config text (e.g. a commented template)
pub fn write_config_text(board_dir: &Path, text: &str) -> Result<(), BoardError> {
    let config_path = board_dir.join(CONFIG_FILE);
    fs::write(&config_path, text).map_err(|e| BoardError::Write {
        path: config_path,
        source: e,
    })
}

/// Serialize and write a config
pub fn write_config(board_dir: &Path, config: &BoardConfig) -> Result<(), BoardError> {
    let text = toml::to_string_pretty(config)?;
    write_config_text(board_dir, &text)
}
