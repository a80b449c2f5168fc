use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Ordered log of submitted lines, oldest first.
///
/// Tracks a save watermark: the number of entries already known to be on disk,
/// so [`HistoryStore::append_to`] only writes what is new.
#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    entries: Vec<String>,
    last_saved: usize,
}

/// History shared between the read loop and the `history` built-in.
pub type SharedHistory = Arc<Mutex<HistoryStore>>;

/// Lock shared history, recovering the data if a holder panicked.
pub fn lock(history: &SharedHistory) -> MutexGuard<'_, HistoryStore> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedHistory {
        Arc::new(Mutex::new(self))
    }

    pub fn add(&mut self, line: &str) {
        self.entries.push(line.to_string());
    }

    /// Snapshot of all entries.
    pub fn list(&self) -> Vec<String> {
        self.entries.clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the history with the contents of a file.
    pub fn load_from(&mut self, path: &Path) -> io::Result<()> {
        self.entries = read_lines(path)?;
        self.last_saved = self.entries.len();
        Ok(())
    }

    /// Append the lines of a file to the history without touching the watermark.
    pub fn extend_from(&mut self, path: &Path) -> io::Result<usize> {
        let lines = read_lines(path)?;
        let count = lines.len();
        self.entries.extend(lines);
        Ok(count)
    }

    /// Write the whole history to `path`, truncating it.
    pub fn write_to(&mut self, path: &Path) -> io::Result<()> {
        Self::write_entries(File::create(path)?, &self.entries)?;
        self.last_saved = self.entries.len();
        Ok(())
    }

    /// Append the entries added since the last save or load to `path`.
    pub fn append_to(&mut self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let start = self.last_saved.min(self.entries.len());
        Self::write_entries(file, &self.entries[start..])?;
        self.last_saved = self.entries.len();
        Ok(())
    }

    fn write_entries(file: File, entries: &[String]) -> io::Result<()> {
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()
    }
}
