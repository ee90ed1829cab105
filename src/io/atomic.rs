//! Whole-file replacement through a sibling temp file.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::Result;

/// Serializes `value` as pretty JSON into a temp file next to `path`, syncs it
/// and renames it over `path`. Readers see either the old or the new file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("table.json");
        std::fs::write(&path, "stale").expect("seed");

        let mut table = BTreeMap::new();
        table.insert("GID028", "T-1201N");
        write_json_atomic(&path, &table).expect("write");

        let raw = std::fs::read_to_string(&path).expect("read");
        let back: BTreeMap<String, String> = serde_json::from_str(&raw).expect("json");
        assert_eq!(back.get("GID028").map(String::as_str), Some("T-1201N"));
        let leftovers = std::fs::read_dir(dir.path()).expect("dir").count();
        assert_eq!(leftovers, 1);
    }
}
