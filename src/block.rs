use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Previous-hash sentinel of the genesis block, which has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One ledger record, identified by the SHA-256 digest of its fields.
///
/// Fields are public on purpose: the ledger detects post-construction
/// mutation (see `Chain::verify`), it does not prevent it. A block whose
/// fields are edited without recomputing `current_hash` is internally
/// inconsistent, and that inconsistency is the tamper signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    /// Position in the chain; genesis is 0, successors increase by 1.
    pub index: u64,
    /// Creation time, fixed at construction. Part of the identity hash.
    pub timestamp: DateTime<Utc>,
    /// Opaque payload. The ledger does not validate it.
    pub data: String,
    /// Identity hash of the preceding block, or `"0"` for genesis.
    pub previous_hash: String,
    /// This block's own identity hash, computed once at construction.
    pub current_hash: String,
}

impl Block {
    /// Create a block; `current_hash` is computed immediately from the
    /// other four fields.
    pub fn new(
        index: u64,
        timestamp: DateTime<Utc>,
        data: String,
        previous_hash: String,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data,
            previous_hash,
            current_hash: String::new(),
        };
        block.current_hash = block.calculate_hash();
        block
    }

    /// Recompute the identity hash from the present field values.
    ///
    /// The canonical string forms of `index`, `timestamp` (RFC 3339),
    /// `data` and `previous_hash` are concatenated in that fixed order,
    /// with no delimiters, and SHA-256 hashed. Pure and re-callable: the
    /// result diverges from the stored `current_hash` exactly when one of
    /// those fields changed after construction.
    pub fn calculate_hash(&self) -> String {
        let payload = format!(
            "{}{}{}{}",
            self.index,
            self.timestamp.to_rfc3339(),
            self.data,
            self.previous_hash,
        );
        compute_hash(payload.as_bytes())
    }
}

/// Compute the SHA-256 hex digest of some data.
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
