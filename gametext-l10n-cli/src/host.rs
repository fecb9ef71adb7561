//! Command line game host
//!
//! Player details come from flags; missing keys are appended to a ledger
//! file that translators can fill in and load back as a dictionary.

use gametext_l10n::{GameHost, PlayerGender, ledger_line};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error};

#[derive(Debug, Default)]
pub struct CliHost {
    player_name: Option<String>,
    gender: Option<PlayerGender>,
    ledger: Option<PathBuf>,
    /// Serializes ledger appends from concurrent reports
    write_lock: Mutex<()>,
}

impl CliHost {
    pub fn new(
        player_name: Option<String>,
        gender: Option<PlayerGender>,
        ledger: Option<PathBuf>,
    ) -> Self {
        CliHost {
            player_name,
            gender,
            ledger,
            write_lock: Mutex::new(()),
        }
    }

    fn append_to_ledger(&self, path: &Path, key: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", ledger_line(key))
    }
}

impl GameHost for CliHost {
    fn player_name(&self) -> Option<String> {
        self.player_name.clone()
    }

    fn player_gender(&self) -> Option<PlayerGender> {
        self.gender
    }

    fn report_missing_key(&self, key: &str) {
        let Some(path) = &self.ledger else {
            debug!(key, "No ledger configured, missing key not persisted");
            return;
        };
        if let Err(e) = self.append_to_ledger(path, key) {
            error!(path = %path.display(), key, error = %e, "Failed to write missing key");
        }
    }
}
