//! Append-only, tamper-evident ledger of hash-chained blocks.
//!
//! Every block's identity is the SHA-256 digest of its own fields, one of
//! which is the predecessor's digest. Nothing stops a holder of the chain
//! from editing a stored block in place — [`Chain::verify`] exists to
//! detect exactly that, by walking the links and recomputing every digest.

pub mod block;
pub mod chain;
pub mod clock;
pub mod error;

pub use block::{compute_hash, Block, GENESIS_PREVIOUS_HASH};
pub use chain::{Chain, VerifyOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, ShaleError};
