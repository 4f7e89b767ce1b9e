//! Atomic pidfile I/O.
//!
//! Format: a single line holding the decimal PID.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the pidfile inside the server directory.
pub const PIDFILE_NAME: &str = "server.pid";

/// Location of the pidfile for a server directory.
pub fn pidfile_path(server_dir: &Path) -> PathBuf {
    server_dir.join(PIDFILE_NAME)
}

/// Write the pidfile atomically (temp file + rename).
pub fn write_pidfile(path: &Path, pid: u32) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let temp_path = path.with_extension("pid.tmp");
    fs::write(&temp_path, format!("{pid}\n"))?;
    fs::rename(&temp_path, path)
}

/// Read the PID recorded at `path`.
pub fn read_pidfile(path: &Path) -> io::Result<u32> {
    let content = fs::read_to_string(path)?;
    parse_pidfile_content(&content)
}

/// Delete the pidfile (idempotent, no error if missing).
pub fn delete_pidfile(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn parse_pidfile_content(content: &str) -> io::Result<u32> {
    content
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<u32>().ok())
        .filter(|pid| *pid > 0)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_pidfile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = pidfile_path(dir.path());

        write_pidfile(&path, 4242).expect("write failed");
        assert_eq!(read_pidfile(&path).expect("read failed"), 4242);
        assert!(!path.with_extension("pid.tmp").exists());

        delete_pidfile(&path).expect("delete failed");
        assert!(!path.exists());
        delete_pidfile(&path).expect("second delete failed");
    }

    #[test]
    fn garbage_is_invalid_data() {
        assert!(parse_pidfile_content("").is_err());
        assert!(parse_pidfile_content("java\n").is_err());
        assert!(parse_pidfile_content("0\n").is_err());
        assert_eq!(parse_pidfile_content(" 17 \n").expect("pid"), 17);
    }
}
