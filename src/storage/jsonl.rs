//! JSON Lines parsing.
//!
//! One game per line. Blank lines are skipped and lines that fail to parse
//! are logged and skipped, so one corrupt record doesn't hide the rest of
//! the log.

use std::io::BufRead;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::StorageError;

/// Parse every well-formed line from `reader`.
pub fn read_lines<T, R>(reader: R, source: &Path) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut entities = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(&line) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                skipped += 1;
                warn!("Failed to parse line {} in {:?}: {}", idx + 1, source, e);
            }
        }
    }

    debug!(
        "Read {} entities from {:?} ({} skipped)",
        entities.len(),
        source,
        skipped
    );
    Ok(entities)
}
