use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use credo_crypto::HashChainVerifier;
use credo_types::Digest;

use crate::entry::{EntryPayload, LedgerEntry};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{LedgerReader, LedgerWriter};

/// Flush/sync strategy for appends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// `fsync` after every append (safest, highest latency).
    #[default]
    EveryWrite,
    /// Rely on OS page-cache buffering (fastest, least durable).
    OsDefault,
}

/// Configuration for a [`FileLedger`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub sync_mode: SyncMode,
}

/// Append handle on the ledger file.
struct LedgerFile {
    file: File,
    /// Length of the file after the last complete record.
    len: u64,
    /// Set when a failed write could not be cut back. The file tail is
    /// unknown, so no further record may follow it.
    poisoned: bool,
}

impl LedgerFile {
    fn write_record(&mut self, record: &[u8], sync_mode: SyncMode) -> std::io::Result<()> {
        self.file.write_all(record)?;
        self.file.flush()?;
        if sync_mode == SyncMode::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Cut the file back to the last complete record.
    fn rollback(&mut self) -> std::io::Result<()> {
        self.file.set_len(self.len)?;
        self.file.sync_data()
    }
}

/// Durable ledger stored as one JSON record per line.
///
/// On-disk format:
/// ```text
/// {"sequence":0,"entry_type":"..","data":{..},"timestamp":"..","previous_hash":"00..","hash":".."}
/// {"sequence":1, ...}
/// ```
///
/// Opening re-derives every hash and link. Any deviation is fatal: the
/// ledger refuses to open and names the first offending sequence. Nothing
/// is repaired or truncated on load.
pub struct FileLedger<P> {
    path: PathBuf,
    config: LedgerConfig,
    /// Single writer. Held across link computation, the file write, and
    /// publication.
    writer: Mutex<LedgerFile>,
    /// Entries published after their record is fully on disk.
    entries: RwLock<Vec<LedgerEntry<P>>>,
}

impl<P: EntryPayload> FileLedger<P> {
    /// Open (or create) the ledger file at `path`, verifying the full chain.
    pub fn open(path: impl AsRef<Path>, config: LedgerConfig) -> LedgerResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            Self::load(path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();

        info!(path = %path.display(), entries = entries.len(), "ledger opened");

        Ok(Self {
            path: path.to_path_buf(),
            config,
            writer: Mutex::new(LedgerFile {
                file,
                len,
                poisoned: false,
            }),
            entries: RwLock::new(entries),
        })
    }

    /// Read and verify every record in `path`, in order.
    ///
    /// Fails fast on the first record that does not parse, is out of
    /// sequence, is not linked to its predecessor, whose hash does not
    /// match its contents, or whose bytes differ from the canonical
    /// encoding of what was parsed.
    pub fn load(path: impl AsRef<Path>) -> LedgerResult<Vec<LedgerEntry<P>>> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut entries: Vec<LedgerEntry<P>> = Vec::new();
        let mut expected_prev = Digest::ZERO;

        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let seq = index as u64;

            let entry: LedgerEntry<P> = serde_json::from_slice(&line).map_err(|e| {
                warn!(path = %path.display(), seq, error = %e, "unreadable ledger record");
                LedgerError::Integrity {
                    seq,
                    reason: format!("unreadable record: {e}"),
                }
            })?;

            if let Err(e) = HashChainVerifier::verify_link(seq, expected_prev, &entry) {
                warn!(path = %path.display(), seq, error = %e, "ledger chain broken");
                return Err(e.into());
            }

            // Unknown keys are dropped by the parser, so the stored bytes
            // must equal the re-encoded entry.
            let canonical =
                serde_json::to_vec(&entry).map_err(|e| LedgerError::Serialization(e.to_string()))?;
            if canonical != line {
                warn!(path = %path.display(), seq, "non-canonical ledger record");
                return Err(LedgerError::Integrity {
                    seq,
                    reason: "non-canonical record".into(),
                });
            }

            expected_prev = entry.hash();
            entries.push(entry);
        }

        debug!(path = %path.display(), loaded = entries.len(), "ledger loaded");
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

impl<P: EntryPayload> LedgerWriter<P> for FileLedger<P> {
    fn append(&self, payload: P) -> LedgerResult<LedgerEntry<P>> {
        let mut writer = self.writer.lock().map_err(|_| LedgerError::LockPoisoned)?;
        if writer.poisoned {
            return Err(LedgerError::WriterPoisoned);
        }

        let entry = {
            let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
            LedgerEntry::next_after(entries.last(), payload)?
        };

        let mut record =
            serde_json::to_vec(&entry).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        record.push(b'\n');

        if let Err(e) = writer.write_record(&record, self.config.sync_mode) {
            warn!(seq = entry.sequence(), error = %e, "ledger append failed; rolling back");
            if let Err(rollback) = writer.rollback() {
                warn!(error = %rollback, "ledger rollback failed; refusing further appends");
                writer.poisoned = true;
            }
            return Err(e.into());
        }
        writer.len += record.len() as u64;

        self.entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?
            .push(entry.clone());

        debug!(
            seq = entry.sequence(),
            entry_type = entry.entry_type(),
            hash = %entry.hash().short_hex(),
            "ledger append"
        );
        Ok(entry)
    }
}

impl<P: EntryPayload> LedgerReader<P> for FileLedger<P> {
    fn read_with<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&[LedgerEntry<P>]) -> T,
    {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(f(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Note;

    fn rewrite_line(path: &Path, index: usize, edit: impl FnOnce(&mut serde_json::Value)) {
        let text = fs::read_to_string(path).unwrap();
        let mut lines: Vec<String> = text.lines().map(String::from).collect();
        let mut value: serde_json::Value = serde_json::from_str(&lines[index]).unwrap();
        edit(&mut value);
        lines[index] = serde_json::to_string(&value).unwrap();
        fs::write(path, lines.join("\n") + "\n").unwrap();
    }

    #[test]
    fn open_creates_missing_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.jsonl");
        let ledger: FileLedger<Note> = FileLedger::open(&path, LedgerConfig::default()).unwrap();
        assert!(path.exists());
        assert!(ledger.is_empty().unwrap());
        assert_eq!(ledger.path(), path.as_path());
    }

    #[test]
    fn append_and_reopen_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let written = {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            vec![
                ledger.append(Note::text("a", "one")).unwrap(),
                ledger.append(Note::signed("a", "alice")).unwrap(),
                ledger.append(Note::text("b", "two")).unwrap(),
            ]
        };

        let reopened: FileLedger<Note> = FileLedger::open(&path, LedgerConfig::default()).unwrap();
        assert_eq!(reopened.entries().unwrap(), written);
        assert!(reopened.verify_integrity().unwrap());

        let next = reopened.append(Note::text("c", "three")).unwrap();
        assert_eq!(next.sequence(), 3);
        assert_eq!(next.previous_hash(), written[2].hash());
    }

    #[test]
    fn one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
        ledger.append(Note::text("a", "one")).unwrap();
        ledger.append(Note::text("a", "two")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["previous_hash"], "0".repeat(64));
    }

    #[test]
    fn tampered_data_refuses_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            ledger.append(Note::text("a", "one")).unwrap();
            ledger.append(Note::text("a", "two")).unwrap();
            ledger.append(Note::text("a", "three")).unwrap();
        }

        rewrite_line(&path, 1, |v| v["data"]["body"] = "forged".into());

        let err = FileLedger::<Note>::open(&path, LedgerConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.integrity_seq(), Some(1));
        assert!(err.to_string().contains("hash mismatch"));
    }

    #[test]
    fn unreadable_record_names_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            ledger.append(Note::text("a", "one")).unwrap();
        }
        let mut text = fs::read_to_string(&path).unwrap();
        text.push_str("{\"sequence\":1,\"entry_type\":\"te");
        fs::write(&path, text).unwrap();

        let err = FileLedger::<Note>::load(&path).unwrap_err();
        assert_eq!(err.integrity_seq(), Some(1));
    }

    #[test]
    fn deleted_record_breaks_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            for i in 0..3 {
                ledger.append(Note::text("a", &i.to_string())).unwrap();
            }
        }
        let text = fs::read_to_string(&path).unwrap();
        let kept: Vec<&str> = text.lines().enumerate().filter(|(i, _)| *i != 1).map(|(_, l)| l).collect();
        fs::write(&path, kept.join("\n") + "\n").unwrap();

        let err = FileLedger::<Note>::load(&path).unwrap_err();
        assert_eq!(err.integrity_seq(), Some(1));
    }

    #[test]
    fn non_canonical_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            ledger.append(Note::text("a", "one")).unwrap();
            ledger.append(Note::text("a", "two")).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        let spaced = text.replacen("\"sequence\":1,", "\"sequence\": 1,", 1);
        fs::write(&path, spaced).unwrap();

        let err = FileLedger::<Note>::load(&path).unwrap_err();
        assert_eq!(err.integrity_seq(), Some(1));
        assert!(err.to_string().contains("non-canonical"));
    }

    #[test]
    fn invalid_utf8_names_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
            ledger.append(Note::text("a", "one")).unwrap();
            ledger.append(Note::text("a", "two")).unwrap();
        }
        let mut bytes = fs::read(&path).unwrap();
        let second = bytes.iter().position(|&b| b == b'\n').unwrap() + 1;
        let body = second + bytes[second..].windows(3).position(|w| w == b"two").unwrap();
        bytes[body] = 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = FileLedger::<Note>::open(&path, LedgerConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.integrity_seq(), Some(1));
    }

    #[test]
    fn failed_rollback_stops_further_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = FileLedger::open(&path, LedgerConfig::default()).unwrap();
        ledger.append(Note::text("a", "one")).unwrap();

        // A read-only handle fails both the write and the truncation.
        {
            let mut writer = ledger.writer.lock().unwrap();
            writer.file = File::open(&path).unwrap();
        }

        assert!(matches!(
            ledger.append(Note::text("a", "two")),
            Err(LedgerError::Io(_))
        ));
        assert!(ledger.writer.lock().unwrap().poisoned);
        assert!(matches!(
            ledger.append(Note::text("a", "three")),
            Err(LedgerError::WriterPoisoned)
        ));
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn os_default_sync_mode_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let config = LedgerConfig {
            sync_mode: SyncMode::OsDefault,
        };
        let ledger = FileLedger::open(&path, config.clone()).unwrap();
        ledger.append(Note::text("a", "one")).unwrap();
        assert_eq!(ledger.config(), &config);
        assert_eq!(FileLedger::<Note>::load(&path).unwrap().len(), 1);
    }
}
