use crate::signed_attestation::InvalidAttestation;
use crate::{NotSafe, Safe, SignedAttestation};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};
use slog::{info, warn, Logger};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Duration;
use types::{Epoch, Hash256, PublicKeyBytes};

type Pool = r2d2::Pool<SqliteConnectionManager>;

/// We set the pool size to 1 for compatibility with locking_mode=EXCLUSIVE.
///
/// This is perhaps overkill in the presence of exclusive transactions, but has
/// the added bonus of preventing other processes from trying to use our slashing database.
pub const POOL_SIZE: u32 = 1;
#[cfg(not(test))]
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
#[cfg(test)]
pub const CONNECTION_TIMEOUT: Duration = Duration::from_millis(100);

/// The lowest and highest source epoch among a validator's signed attestations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SourceEpochBounds {
    pub lowest: Epoch,
    pub highest: Epoch,
}

/// The outcome of scanning one validator in `SlashingDatabase::scan_source_epochs`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SourceEpochReport {
    pub pubkey: PublicKeyBytes,
    /// `None` if the validator has not signed any attestations.
    pub bounds: Option<SourceEpochBounds>,
}

#[derive(Debug, Clone)]
pub struct SlashingDatabase {
    conn_pool: Pool,
}

impl SlashingDatabase {
    /// Open an existing database at the given `path`, or create one if none exists.
    pub fn open_or_create(path: &Path) -> Result<Self, NotSafe> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Create a slashing database at the given path.
    ///
    /// Error if a database (or any file) already exists at `path`.
    pub fn create(path: &Path) -> Result<Self, NotSafe> {
        let file = OpenOptions::new()
            .write(true)
            .read(true)
            .create_new(true)
            .open(path)?;

        Self::set_db_file_permissions(&file)?;
        let conn_pool = Self::open_conn_pool(path)?;
        let conn = conn_pool.get()?;

        conn.execute(
            "CREATE TABLE validators (
                id INTEGER PRIMARY KEY,
                public_key BLOB NOT NULL UNIQUE
            )",
            params![],
        )?;

        conn.execute(
            "CREATE TABLE signed_attestations (
                validator_id INTEGER,
                source_epoch INTEGER NOT NULL,
                target_epoch INTEGER NOT NULL,
                signing_root BLOB NOT NULL,
                FOREIGN KEY(validator_id) REFERENCES validators(id)
                UNIQUE (validator_id, target_epoch)
            )",
            params![],
        )?;

        Ok(Self { conn_pool })
    }

    /// Open an existing `SlashingDatabase` from disk.
    pub fn open(path: &Path) -> Result<Self, NotSafe> {
        let conn_pool = Self::open_conn_pool(path)?;
        Ok(Self { conn_pool })
    }

    /// Open a new connection pool with all of the necessary settings and tweaks.
    fn open_conn_pool(path: &Path) -> Result<Pool, NotSafe> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE)
            .with_init(Self::apply_pragmas);
        let conn_pool = Pool::builder()
            .max_size(POOL_SIZE)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)
            .map_err(|e| NotSafe::SQLError(format!("Unable to open database: {:?}", e)))?;
        Ok(conn_pool)
    }

    /// Apply the necessary settings to an SQLite connection.
    ///
    /// Most importantly, put the database into exclusive locking mode, so that threads are forced
    /// to serialise all DB access (to prevent slashable data being checked and signed in parallel).
    /// The exclusive locking mode also applies to other processes, so a second process opening
    /// the same database will be blocked.
    fn apply_pragmas(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "locking_mode", "EXCLUSIVE")?;
        Ok(())
    }

    /// Set the database file to readable and writable only by its owner (0600).
    #[cfg(unix)]
    fn set_db_file_permissions(file: &File) -> Result<(), NotSafe> {
        use std::os::unix::fs::PermissionsExt;

        let mut perm = file.metadata()?.permissions();
        perm.set_mode(0o600);
        file.set_permissions(perm)?;
        Ok(())
    }

    // TODO: add support for Windows ACLs
    #[cfg(windows)]
    fn set_db_file_permissions(_file: &File) -> Result<(), NotSafe> {
        Ok(())
    }

    /// Register a validator with the slashing protection database.
    ///
    /// This allows the validator to record their signatures in the database, and check
    /// for slashings. Registering an already-registered validator is a no-op.
    pub fn register_validator(&self, validator_pk: &PublicKeyBytes) -> Result<(), NotSafe> {
        self.register_validators(std::iter::once(validator_pk))
    }

    /// Register multiple validators with the slashing protection database.
    pub fn register_validators<'a>(
        &self,
        public_keys: impl Iterator<Item = &'a PublicKeyBytes>,
    ) -> Result<(), NotSafe> {
        let mut conn = self.conn_pool.get()?;
        let txn = conn.transaction()?;
        {
            let mut stmt =
                txn.prepare("INSERT OR IGNORE INTO validators (public_key) VALUES (?1)")?;

            for pubkey in public_keys {
                stmt.execute([pubkey.as_hex_string()])?;
            }
        }
        txn.commit()?;

        Ok(())
    }

    /// Get the database-internal ID for a validator, if it is registered.
    ///
    /// This is NOT the same as a validator index, and depends on the ordering that validators
    /// are registered with the slashing protection database (and may vary between machines).
    fn get_validator_id_opt(
        txn: &Transaction,
        public_key: &PublicKeyBytes,
    ) -> Result<Option<i64>, NotSafe> {
        Ok(txn
            .query_row(
                "SELECT id FROM validators WHERE public_key = ?1",
                params![&public_key.as_hex_string()],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Get the database-internal ID for a validator, erroring if it is not registered.
    fn get_validator_id(txn: &Transaction, public_key: &PublicKeyBytes) -> Result<i64, NotSafe> {
        Self::get_validator_id_opt(txn, public_key)?
            .ok_or(NotSafe::UnregisteredValidator(*public_key))
    }

    /// Check an attestation from `validator_pubkey` for slash safety.
    fn check_attestation(
        &self,
        txn: &Transaction,
        validator_pubkey: &PublicKeyBytes,
        att_source_epoch: Epoch,
        att_target_epoch: Epoch,
        att_signing_root: Hash256,
    ) -> Result<Safe, NotSafe> {
        // Although it's not required to avoid slashing, we disallow attestations
        // which are obviously invalid by virtue of their source epoch exceeding their target.
        if att_source_epoch > att_target_epoch {
            return Err(NotSafe::InvalidAttestation(
                InvalidAttestation::SourceExceedsTarget,
            ));
        }

        let validator_id = Self::get_validator_id(txn, validator_pubkey)?;

        // 1. Check for a double vote. Namely, an existing attestation with the same target epoch,
        //    and a different signing root.
        let same_target_att = txn
            .prepare(
                "SELECT source_epoch, target_epoch, signing_root
                 FROM signed_attestations
                 WHERE validator_id = ?1 AND target_epoch = ?2",
            )?
            .query_row(
                params![validator_id, att_target_epoch],
                SignedAttestation::from_row,
            )
            .optional()?;

        if let Some(existing_attestation) = same_target_att {
            return if existing_attestation.signing_root == att_signing_root {
                Ok(Safe::SameData)
            } else {
                Err(NotSafe::InvalidAttestation(InvalidAttestation::DoubleVote(
                    existing_attestation,
                )))
            };
        }

        // 2. Check that no previous vote is surrounding `attestation`.
        // If there is a surrounding attestation, we only return the most recent one.
        let surrounding_attestation = txn
            .prepare(
                "SELECT source_epoch, target_epoch, signing_root
                 FROM signed_attestations
                 WHERE validator_id = ?1 AND source_epoch < ?2 AND target_epoch > ?3
                 ORDER BY target_epoch DESC
                 LIMIT 1",
            )?
            .query_row(
                params![validator_id, att_source_epoch, att_target_epoch],
                SignedAttestation::from_row,
            )
            .optional()?;

        if let Some(prev) = surrounding_attestation {
            return Err(NotSafe::InvalidAttestation(
                InvalidAttestation::PrevSurroundsNew { prev },
            ));
        }

        // 3. Check that no previous vote is surrounded by `attestation`.
        // If there is a surrounded attestation, we only return the most recent one.
        let surrounded_attestation = txn
            .prepare(
                "SELECT source_epoch, target_epoch, signing_root
                 FROM signed_attestations
                 WHERE validator_id = ?1 AND source_epoch > ?2 AND target_epoch < ?3
                 ORDER BY target_epoch DESC
                 LIMIT 1",
            )?
            .query_row(
                params![validator_id, att_source_epoch, att_target_epoch],
                SignedAttestation::from_row,
            )
            .optional()?;

        if let Some(prev) = surrounded_attestation {
            return Err(NotSafe::InvalidAttestation(
                InvalidAttestation::NewSurroundsPrev { prev },
            ));
        }

        Ok(Safe::Valid)
    }

    /// Check an attestation for slash safety, and if it is safe, record it in the database.
    ///
    /// The checking and inserting happen atomically and exclusively. We enforce exclusivity
    /// to prevent concurrent checks and inserts from resulting in slashable data being inserted.
    pub fn record_attestation(
        &self,
        validator_pubkey: &PublicKeyBytes,
        source_epoch: Epoch,
        target_epoch: Epoch,
        signing_root: Hash256,
    ) -> Result<Safe, NotSafe> {
        let mut conn = self.conn_pool.get()?;
        let txn = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;

        let safe = self.check_attestation(
            &txn,
            validator_pubkey,
            source_epoch,
            target_epoch,
            signing_root,
        )?;

        if safe != Safe::SameData {
            let validator_id = Self::get_validator_id(&txn, validator_pubkey)?;
            txn.execute(
                "INSERT INTO signed_attestations (validator_id, source_epoch, target_epoch, signing_root)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    validator_id,
                    source_epoch,
                    target_epoch,
                    signing_root.as_bytes()
                ],
            )?;
        }

        txn.commit()?;
        Ok(safe)
    }

    fn source_epoch_bounds_for_id(
        txn: &Transaction,
        validator_id: i64,
    ) -> Result<Option<SourceEpochBounds>, NotSafe> {
        let (lowest, highest): (Option<Epoch>, Option<Epoch>) = txn.query_row(
            "SELECT MIN(source_epoch), MAX(source_epoch)
             FROM signed_attestations
             WHERE validator_id = ?1",
            params![validator_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(lowest
            .zip(highest)
            .map(|(lowest, highest)| SourceEpochBounds { lowest, highest }))
    }

    /// The lowest and highest source epochs `validator_pubkey` has attested from.
    ///
    /// Returns `Ok(None)` for a registered validator with no signed attestations.
    pub fn source_epoch_bounds(
        &self,
        validator_pubkey: &PublicKeyBytes,
    ) -> Result<Option<SourceEpochBounds>, NotSafe> {
        let mut conn = self.conn_pool.get()?;
        let txn = conn.transaction()?;
        let validator_id = Self::get_validator_id(&txn, validator_pubkey)?;
        Self::source_epoch_bounds_for_id(&txn, validator_id)
    }

    /// Logs and returns the source epoch bounds of each of `public_keys`, in order.
    ///
    /// All reads happen in a single transaction. Keys that are not registered are logged and
    /// left out of the result.
    pub fn scan_source_epochs<'a>(
        &self,
        public_keys: impl IntoIterator<Item = &'a PublicKeyBytes>,
        log: &Logger,
    ) -> Result<Vec<SourceEpochReport>, NotSafe> {
        let mut conn = self.conn_pool.get()?;
        let txn = conn.transaction()?;

        let mut reports = vec![];
        for pubkey in public_keys {
            let validator_id = match Self::get_validator_id_opt(&txn, pubkey)? {
                Some(id) => id,
                None => {
                    warn!(
                        log,
                        "Validator not in slashing database";
                        "pubkey" => pubkey.as_hex_string()
                    );
                    continue;
                }
            };

            let bounds = Self::source_epoch_bounds_for_id(&txn, validator_id)?;
            match bounds {
                Some(bounds) => info!(
                    log,
                    "Attestation source epochs";
                    "pubkey" => pubkey.as_hex_string(),
                    "lowest_source_epoch" => %bounds.lowest,
                    "highest_source_epoch" => %bounds.highest,
                ),
                None => info!(
                    log,
                    "No signed attestations";
                    "pubkey" => pubkey.as_hex_string()
                ),
            }

            reports.push(SourceEpochReport {
                pubkey: *pubkey,
                bounds,
            });
        }

        Ok(reports)
    }
}
