//! Vault controller
//!
//! Single owner of the session, the security configuration, the active
//! store view, and the blob cipher. Every external trigger (PIN
//! submission, activity signal, timer tick, visibility change) is a
//! `&mut self` method, so transitions are applied one at a time with no
//! interleaved partial update, and audit records are appended in commit
//! order.
//!
//! # Isolation Invariant
//!
//! The real encrypted blobs are written only while a real session is
//! active. A duress session is handed the decoy fixture wholesale and the
//! persistence helpers refuse to write in any other mode, so decoy state
//! can never reach the real store.

use tracing::{info, warn};
use uuid::Uuid;

use cardsnap_core::{
    fixtures, AuditEvent, AuditRecord, Card, SecuritySettings, UserSettings, VaultCipher,
    MAX_FAILED_ATTEMPTS, MAX_FREE_SCANS,
};

use crate::billing::PurchaseProvider;
use crate::clock::Clock;
use crate::error::{Result, VaultError};
use crate::extract::CardExtractor;
use crate::keystore::DeviceKeystore;
use crate::persist::{BlobStore, ITEMS_BLOB, SETTINGS_BLOB};
use crate::session::{Session, SessionMode, SessionState, UnlockOutcome};
use crate::store::VaultStore;
use crate::timer::LockTimer;

/// Result of a PIN submission, surfaced to the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinOutcome {
    /// Whether a session was unlocked
    pub ok: bool,
    /// Mode of the unlocked session
    pub mode: Option<SessionMode>,
    /// Attempts left before self-destruct, after a failure
    pub remaining_attempts: Option<u32>,
    /// Whether this submission triggered the self-destruct wipe
    pub wiped: bool,
}

/// Snapshot of the controller for status displays
#[derive(Debug, Clone)]
pub struct VaultStatus {
    pub state: SessionState,
    pub failed_attempts: u32,
    pub is_premium: bool,
    pub scan_count: u32,
    pub stealth_mode: bool,
    pub audit_len: usize,
}

/// The vault security core
pub struct VaultController<S: BlobStore, C: Clock> {
    blobs: S,
    clock: C,
    keystore: DeviceKeystore,
    cipher: VaultCipher,
    session: Session,
    settings: UserSettings,
    real_store: VaultStore,
    decoy_store: VaultStore,
    timer: LockTimer,
    overlay_active: bool,
}

impl<S: BlobStore, C: Clock> VaultController<S, C> {
    /// Initialize from the byte store
    ///
    /// A missing settings blob initializes defaults; an unreadable one is
    /// treated as no usable data and also falls back to defaults. Neither
    /// is an error.
    pub fn new(mut blobs: S, clock: C) -> Result<Self> {
        let keystore = DeviceKeystore::load_or_create(&mut blobs)?;
        let cipher = keystore.cipher()?;

        let settings = match blobs.get(SETTINGS_BLOB)? {
            Some(bytes) => cipher.open::<UserSettings>(&bytes).unwrap_or_else(|| {
                warn!("settings blob unreadable, falling back to defaults");
                UserSettings::default()
            }),
            None => UserSettings::default(),
        };

        let now = clock.now_ms();
        Ok(Self {
            blobs,
            clock,
            keystore,
            cipher,
            session: Session::new(),
            settings,
            real_store: VaultStore::new(),
            decoy_store: VaultStore::new(),
            timer: LockTimer::new(now),
            overlay_active: false,
        })
    }

    // ---- Authentication ----

    /// Evaluate a PIN submission
    ///
    /// Authentication failures are structured results, never errors; a
    /// triggered self-destruct is reported through `wiped`. Submissions
    /// while a session is already active are ignored: no audit record, no
    /// failure counting, no mode swap.
    pub fn submit_pin(&mut self, input: &str) -> PinOutcome {
        let now = self.clock.now_ms();
        let real_pin = self.settings.security.real_pin.clone();
        let duress_pin = self.settings.security.duress_pin.clone();
        let self_destruct = self.settings.security.self_destruct_enabled;

        match self
            .session
            .submit_pin(input, &real_pin, &duress_pin, self_destruct)
        {
            UnlockOutcome::Real => {
                self.timer.record_activity(now);
                self.real_store = self.load_real_items(now);
                self.settings
                    .logs
                    .record(AuditEvent::LoginSuccess, "Auth via main PIN", now);
                // Seeds the blob on first run, refreshes it after a fallback
                if let Err(e) = self.persist_items() {
                    warn!("items persistence failed after unlock: {}", e);
                }
                // Flushes audit records buffered while locked
                self.persist_settings_or_log();
                info!("real session unlocked");
                PinOutcome {
                    ok: true,
                    mode: Some(SessionMode::Real),
                    remaining_attempts: None,
                    wiped: false,
                }
            }
            UnlockOutcome::Duress => {
                self.timer.record_activity(now);
                self.decoy_store = VaultStore::from_cards(fixtures::decoy_cards(now));
                self.settings
                    .logs
                    .record(AuditEvent::DuressAccess, "Auth via duress PIN", now);
                info!("decoy session unlocked");
                PinOutcome {
                    ok: true,
                    mode: Some(SessionMode::Duress),
                    remaining_attempts: None,
                    wiped: false,
                }
            }
            UnlockOutcome::AlreadyUnlocked { mode } => PinOutcome {
                ok: true,
                mode: Some(mode),
                remaining_attempts: None,
                wiped: false,
            },
            UnlockOutcome::Failed {
                attempts,
                remaining,
                wipe_required,
            } => {
                self.settings.logs.record(
                    AuditEvent::LoginFailed,
                    format!("Attempt {}/{}", attempts, MAX_FAILED_ATTEMPTS),
                    now,
                );
                if wipe_required {
                    warn!(attempts, "self-destruct threshold reached");
                    self.wipe();
                    return PinOutcome {
                        ok: false,
                        mode: None,
                        remaining_attempts: Some(0),
                        wiped: true,
                    };
                }
                PinOutcome {
                    ok: false,
                    mode: None,
                    remaining_attempts: Some(remaining),
                    wiped: false,
                }
            }
        }
    }

    /// Explicit lock; preserves the failed-attempt count
    pub fn lock(&mut self) {
        if self.session.is_unlocked() {
            self.session.lock(false);
            info!("session locked");
        }
    }

    /// Explicit logout (alias of [`lock`](Self::lock))
    pub fn logout(&mut self) {
        self.lock();
    }

    /// Irreversibly erase all persisted and in-memory state
    ///
    /// The byte store is cleared (device secret included), settings reset
    /// to defaults, stores emptied, and the audit log cleared; the single
    /// surviving `DataWipe` record is appended after the clear.
    pub fn wipe(&mut self) {
        let now = self.clock.now_ms();

        if let Err(e) = self.blobs.clear() {
            warn!("byte store clear failed during wipe: {}", e);
        }
        self.settings = UserSettings::default();
        self.real_store.clear();
        self.decoy_store.clear();
        self.session.reset();

        self.settings
            .logs
            .record(AuditEvent::DataWipe, "Self-destruct triggered", now);

        // Fresh device secret so pre-wipe ciphertext is unrecoverable
        match DeviceKeystore::load_or_create(&mut self.blobs)
            .and_then(|ks| ks.cipher().map(|c| (ks, c)))
        {
            Ok((keystore, cipher)) => {
                self.keystore = keystore;
                self.cipher = cipher;
            }
            Err(e) => warn!("device key re-provisioning failed after wipe: {}", e),
        }

        warn!("all vault data wiped");
    }

    // ---- Security configuration ----

    /// Replace the security configuration; real sessions only
    pub fn update_security_config(&mut self, new: SecuritySettings) -> Result<()> {
        match self.session.mode() {
            Some(SessionMode::Real) => {}
            Some(SessionMode::Duress) => return Err(VaultError::DuressRestricted),
            None => return Err(VaultError::NotUnlocked),
        }
        new.validate()?;

        let now = self.clock.now_ms();
        self.settings.security = new;
        self.settings
            .logs
            .record(AuditEvent::SettingsChange, "Security settings updated", now);
        self.persist_settings()?;
        Ok(())
    }

    // ---- Activity & auto-lock ----

    /// Record a recognized user-interaction signal
    ///
    /// Also clears a stale timer-lock flag so the next lock screen render
    /// is not mislabeled; it never re-authenticates.
    pub fn record_activity(&mut self) {
        let now = self.clock.now_ms();
        self.timer.record_activity(now);
        self.session.clear_timer_flag();
    }

    /// Polling check; call every [`POLL_INTERVAL_MS`] milliseconds
    ///
    /// [`POLL_INTERVAL_MS`]: cardsnap_core::POLL_INTERVAL_MS
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        if self.session.is_unlocked()
            && self.settings.security.auto_lock_enabled
            && self
                .timer
                .is_expired(now, self.settings.security.auto_lock_timeout_ms)
        {
            self.session.lock(true);
            info!("auto-locked after idle timeout");
        }
    }

    /// The application moved to the background; the privacy overlay is
    /// applied synchronously, independent of the idle timeout
    pub fn background(&mut self) {
        if self.settings.security.screen_protection {
            self.overlay_active = true;
        }
    }

    /// The application returned to the foreground; removes the overlay and
    /// evaluates the elapsed-time rule once, immediately
    pub fn foreground(&mut self) {
        self.overlay_active = false;
        self.tick();
        let now = self.clock.now_ms();
        self.timer.record_activity(now);
    }

    /// Whether the privacy overlay is currently applied
    pub fn overlay_active(&self) -> bool {
        self.overlay_active
    }

    // ---- Vault contents ----

    /// The active store view: real items or the decoy fixture
    pub fn cards(&self) -> Result<&VaultStore> {
        match self.session.mode() {
            Some(SessionMode::Real) => Ok(&self.real_store),
            Some(SessionMode::Duress) => Ok(&self.decoy_store),
            None => Err(VaultError::NotUnlocked),
        }
    }

    /// Add a card to the real vault
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        self.require_real()?;
        self.real_store.add(card);
        self.persist_items()
    }

    /// Delete a card from the real vault
    pub fn delete_card(&mut self, id: Uuid) -> Result<()> {
        self.require_real()?;
        if !self.real_store.remove(id) {
            return Err(VaultError::CardNotFound(id.to_string()));
        }
        self.persist_items()
    }

    /// Record one access of a card in the active view
    ///
    /// In duress mode only the in-memory decoy counter moves; nothing is
    /// persisted.
    pub fn use_card(&mut self, id: Uuid) -> Result<u32> {
        match self.session.mode() {
            Some(SessionMode::Real) => {
                let count = self
                    .real_store
                    .record_use(id)
                    .ok_or_else(|| VaultError::CardNotFound(id.to_string()))?;
                self.persist_items()?;
                Ok(count)
            }
            Some(SessionMode::Duress) => self
                .decoy_store
                .record_use(id)
                .ok_or_else(|| VaultError::CardNotFound(id.to_string())),
            None => Err(VaultError::NotUnlocked),
        }
    }

    /// Scan a card image through the extraction collaborator
    ///
    /// Extraction failure creates no Item and changes no session state;
    /// the error is retryable by the caller.
    pub async fn scan_card(
        &mut self,
        extractor: &dyn CardExtractor,
        image: &[u8],
    ) -> Result<Card> {
        self.require_real()?;
        if !self.settings.is_premium && self.settings.scan_count >= MAX_FREE_SCANS {
            return Err(VaultError::ScanLimitReached);
        }

        let fields = extractor.extract(image).await?;

        let now = self.clock.now_ms();
        let card = Card::from_fields(fields, now);
        self.real_store.add(card.clone());
        self.settings.scan_count += 1;
        self.persist_items()?;
        self.persist_settings()?;
        Ok(card)
    }

    /// Run the purchase flow; on success premium is granted and logged
    pub async fn upgrade(&mut self, provider: &dyn PurchaseProvider) -> Result<()> {
        self.require_real()?;
        provider.purchase().await?;

        let now = self.clock.now_ms();
        self.settings.is_premium = true;
        self.settings.logs.record(
            AuditEvent::SettingsChange,
            "Premium subscription activated",
            now,
        );
        self.persist_settings()?;
        Ok(())
    }

    // ---- Introspection ----

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Active session mode, when unlocked
    pub fn mode(&self) -> Option<SessionMode> {
        self.session.mode()
    }

    /// Running failed-attempt count
    pub fn failed_attempts(&self) -> u32 {
        self.session.failed_attempts()
    }

    /// Full ordered audit trail
    pub fn audit_log(&self) -> &[AuditRecord] {
        self.settings.logs.entries()
    }

    /// Active security configuration
    pub fn security_settings(&self) -> &SecuritySettings {
        &self.settings.security
    }

    /// Whether premium is active
    pub fn is_premium(&self) -> bool {
        self.settings.is_premium
    }

    /// The underlying byte store
    pub fn blobs(&self) -> &S {
        &self.blobs
    }

    /// Snapshot for status displays
    pub fn status(&self) -> VaultStatus {
        VaultStatus {
            state: self.session.state(),
            failed_attempts: self.session.failed_attempts(),
            is_premium: self.settings.is_premium,
            scan_count: self.settings.scan_count,
            stealth_mode: self.settings.security.stealth_mode,
            audit_len: self.settings.logs.len(),
        }
    }

    // ---- Internals ----

    fn require_real(&self) -> Result<()> {
        match self.session.mode() {
            Some(SessionMode::Real) => Ok(()),
            Some(SessionMode::Duress) => Err(VaultError::DuressRestricted),
            None => Err(VaultError::NotUnlocked),
        }
    }

    fn load_real_items(&mut self, now: u64) -> VaultStore {
        match self.blobs.get(ITEMS_BLOB) {
            Ok(Some(bytes)) => match self.cipher.open::<Vec<Card>>(&bytes) {
                Some(cards) => VaultStore::from_cards(cards),
                None => {
                    warn!("items blob unreadable, falling back to starter set");
                    VaultStore::from_cards(fixtures::starter_cards(now))
                }
            },
            Ok(None) => VaultStore::from_cards(fixtures::starter_cards(now)),
            Err(e) => {
                warn!("items blob read failed: {}", e);
                VaultStore::from_cards(fixtures::starter_cards(now))
            }
        }
    }

    /// Full overwrite of the items blob; no-op outside a real session
    fn persist_items(&mut self) -> Result<()> {
        if self.session.mode() != Some(SessionMode::Real) {
            return Ok(());
        }
        let blob = self.cipher.seal(self.real_store.cards())?;
        self.blobs.set(ITEMS_BLOB, &blob)?;
        Ok(())
    }

    /// Full overwrite of the settings blob; no-op outside a real session
    fn persist_settings(&mut self) -> Result<()> {
        if self.session.mode() != Some(SessionMode::Real) {
            return Ok(());
        }
        let blob = self.cipher.seal(&self.settings)?;
        self.blobs.set(SETTINGS_BLOB, &blob)?;
        Ok(())
    }

    fn persist_settings_or_log(&mut self) {
        if let Err(e) = self.persist_settings() {
            warn!("settings persistence failed: {}", e);
        }
    }
}
