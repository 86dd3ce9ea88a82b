use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Open,
}

/// Statement log for the open transaction.
///
/// Statements are applied to the live tables as they run; the log is an
/// audit trail only. Rollback is performed by the caller reloading the
/// catalog from its snapshots.
#[derive(Debug)]
pub struct TransactionManager {
    state: TransactionState,
    log: Vec<String>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self {
            state: TransactionState::Idle,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == TransactionState::Open
    }

    /// Statements executed since BEGIN, in execution order
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Opens a transaction. BEGIN inside an open transaction restarts the log.
    pub fn begin(&mut self) {
        if self.is_open() {
            warn!("BEGIN inside an open transaction, discarding {} logged statements", self.log.len());
        }
        info!("transaction started");
        self.state = TransactionState::Open;
        self.log.clear();
    }

    /// Records an executed statement; a no-op outside a transaction
    pub fn record(&mut self, sql: &str) {
        if self.is_open() {
            self.log.push(sql.to_string());
        }
    }

    /// Closes the transaction and returns how many statements it ran
    pub fn commit(&mut self) -> usize {
        if !self.is_open() {
            warn!("COMMIT without an open transaction");
        }
        let operations = self.log.len();
        info!("transaction committed ({} operations)", operations);
        self.close();
        operations
    }

    /// Closes the transaction, dropping its log
    pub fn rollback(&mut self) {
        if !self.is_open() {
            warn!("ROLLBACK without an open transaction");
        }
        info!("transaction rolled back ({} operations discarded)", self.log.len());
        self.close();
    }

    fn close(&mut self) {
        self.state = TransactionState::Idle;
        self.log.clear();
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}
