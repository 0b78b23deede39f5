//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;

/// Path of the JSON database file.
pub fn db_file() -> PathBuf {
    std::env::var("TIENDA_DB_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("db.json"))
}

/// Directory where database snapshots are written. Snapshots accumulate
/// without rotation; pruning is an operational task, not the server's.
pub fn backup_dir() -> PathBuf {
    std::env::var("TIENDA_BACKUP_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("backups"))
}

/// Listen address. `PORT` overrides the port (default 3000).
pub fn bind_addr() -> String {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(3000);
    format!("0.0.0.0:{}", port)
}
