use crate::block::{Block, GENESIS_PREVIOUS_HASH};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ShaleError};
use std::fmt;
use tracing::warn;

/// Payload of the genesis block.
const GENESIS_DATA: &str = "Genesis Block";

/// Result of a full-chain verification pass.
///
/// Reports the earliest inconsistency only; the scan stops at the first
/// failing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Every linkage and integrity check passed.
    Valid,
    /// The block's stored `previous_hash` does not match its predecessor's
    /// recorded hash: a link was severed, or a block replaced.
    BrokenLink { index: u64 },
    /// The block's stored `current_hash` no longer matches a fresh
    /// recomputation: one of its identity fields was edited in place.
    HashMismatch { index: u64 },
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOutcome::Valid)
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyOutcome::Valid => write!(f, "chain is valid"),
            VerifyOutcome::BrokenLink { index } => {
                write!(f, "previous hash mismatch at block {}", index)
            }
            VerifyOutcome::HashMismatch { index } => {
                write!(f, "current hash invalid at block {}", index)
            }
        }
    }
}

/// An append-only ledger of hash-linked blocks.
///
/// The API only ever appends; it never removes, reorders, or rewrites
/// blocks. `blocks` is nevertheless public, and so are every block's
/// fields — editing them behind the ledger's back is the tamper scenario
/// [`Chain::verify`] is built to detect.
///
/// Single-writer, single-threaded by contract: a wrapper that shares a
/// `Chain` across threads must bring its own mutual exclusion around
/// `append` and `verify`.
pub struct Chain {
    /// Ordered blocks; insertion order == index order.
    pub blocks: Vec<Block>,
    clock: Box<dyn Clock>,
}

impl Chain {
    /// Create a chain holding its genesis block, timestamped by the wall
    /// clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create a chain that takes all timestamps from the given clock.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let genesis = Self::create_genesis(clock.as_ref());
        Self {
            blocks: vec![genesis],
            clock,
        }
    }

    /// The first block: index 0, placeholder payload, sentinel parent.
    fn create_genesis(clock: &dyn Clock) -> Block {
        Block::new(
            0,
            clock.now(),
            GENESIS_DATA.into(),
            GENESIS_PREVIOUS_HASH.into(),
        )
    }

    /// The current tail block.
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds its genesis block")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get a block by chain position.
    pub fn get(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    /// Append a block carrying `data`, linked to the current tip.
    ///
    /// Total: any payload is accepted, existing blocks are never touched.
    /// Returns the block just appended.
    pub fn append(&mut self, data: impl Into<String>) -> &Block {
        let tip = self.tip();
        let index = tip.index + 1;
        let previous_hash = tip.current_hash.clone();
        let block = Block::new(index, self.clock.now(), data.into(), previous_hash);
        self.blocks.push(block);
        self.tip()
    }

    /// Walk the chain and check every block against its predecessor.
    ///
    /// Genesis is trusted axiomatically. For each later position, two
    /// checks run in order: the linkage check (stored `previous_hash`
    /// equals the predecessor's recorded `current_hash`), then the
    /// integrity check (stored `current_hash` equals a fresh
    /// recomputation). The scan is read-only and stops at the first
    /// failure, so the outcome names the earliest inconsistency.
    pub fn verify(&self) -> VerifyOutcome {
        for i in 1..self.blocks.len() {
            let current = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if current.previous_hash != previous.current_hash {
                warn!(index = current.index, "previous hash mismatch");
                return VerifyOutcome::BrokenLink {
                    index: current.index,
                };
            }

            if current.calculate_hash() != current.current_hash {
                warn!(index = current.index, "current hash invalid");
                return VerifyOutcome::HashMismatch {
                    index: current.index,
                };
            }
        }
        VerifyOutcome::Valid
    }

    /// Serialize the block list to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.blocks)?)
    }

    /// Rebuild a chain from a JSON block list, verifying it on the way in.
    ///
    /// Rejects an empty list and any list that fails verification; the
    /// rebuilt chain uses the wall clock for subsequent appends.
    pub fn from_json(json: &str) -> Result<Self> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        if blocks.is_empty() {
            return Err(ShaleError::EmptyChain);
        }
        let chain = Self {
            blocks,
            clock: Box::new(SystemClock),
        };
        match chain.verify() {
            VerifyOutcome::Valid => Ok(chain),
            VerifyOutcome::BrokenLink { index } | VerifyOutcome::HashMismatch { index } => {
                Err(ShaleError::IntegrityViolation(index))
            }
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    fn test_chain() -> Chain {
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap());
        Chain::with_clock(Box::new(clock))
    }

    #[test]
    fn fresh_chain_holds_valid_genesis() {
        let chain = test_chain();
        assert_eq!(chain.len(), 1);
        assert!(chain.verify().is_valid());

        let genesis = chain.get(0).unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.data, GENESIS_DATA);
    }

    #[test]
    fn append_assigns_sequential_indexes() {
        let mut chain = test_chain();
        for i in 0..5 {
            let block = chain.append(format!("entry {}", i));
            assert_eq!(block.index, i + 1);
        }
        assert_eq!(chain.len(), 6);
        for (i, block) in chain.blocks.iter().enumerate() {
            assert_eq!(block.index, i as u64);
        }
    }

    #[test]
    fn appended_blocks_link_to_predecessor() {
        let mut chain = test_chain();
        chain.append("a");
        chain.append("b");
        for i in 1..chain.blocks.len() {
            assert_eq!(
                chain.blocks[i].previous_hash,
                chain.blocks[i - 1].current_hash
            );
        }
        assert!(chain.verify().is_valid());
    }

    #[test]
    fn tip_is_last_appended() {
        let mut chain = test_chain();
        chain.append("first");
        chain.append("second");
        assert_eq!(chain.tip().data, "second");
        assert_eq!(chain.tip().index, 2);
    }

    #[test]
    fn identical_inputs_produce_identical_hashes() {
        let mut a = test_chain();
        let mut b = test_chain();
        for payload in ["x", "y", "z"] {
            a.append(payload);
            b.append(payload);
        }
        let hashes_a: Vec<_> = a.blocks.iter().map(|blk| &blk.current_hash).collect();
        let hashes_b: Vec<_> = b.blocks.iter().map(|blk| &blk.current_hash).collect();
        assert_eq!(hashes_a, hashes_b);
    }

    #[test]
    fn data_tampering_fails_integrity_check() {
        let mut chain = test_chain();
        chain.append("honest payload");
        chain.append("another payload");

        chain.blocks[1].data = "MODIFIED DATA!".into();

        assert_eq!(chain.verify(), VerifyOutcome::HashMismatch { index: 1 });
        assert!(!chain.verify().is_valid());
    }

    #[test]
    fn edited_previous_hash_fails_linkage_check() {
        let mut chain = test_chain();
        chain.append("a");
        chain.append("b");

        // Breaks both checks at block 1; linkage is reported first.
        chain.blocks[1].previous_hash = "0000".into();

        assert_eq!(chain.verify(), VerifyOutcome::BrokenLink { index: 1 });
    }

    #[test]
    fn rewritten_current_hash_breaks_successor_link() {
        let mut chain = test_chain();
        chain.append("a");
        chain.append("b");

        // Block 1 is made self-consistent, but block 2 still records the
        // old hash, so the break surfaces at the link into block 2.
        chain.blocks[1].data = "rewritten".into();
        chain.blocks[1].current_hash = chain.blocks[1].calculate_hash();

        assert_eq!(chain.verify(), VerifyOutcome::BrokenLink { index: 2 });
    }

    #[test]
    fn earliest_inconsistency_wins() {
        let mut chain = test_chain();
        for payload in ["a", "b", "c", "d"] {
            chain.append(payload);
        }

        chain.blocks[1].data = "tampered early".into();
        chain.blocks[3].data = "tampered late".into();

        assert_eq!(chain.verify(), VerifyOutcome::HashMismatch { index: 1 });
    }

    #[test]
    fn end_to_end_tamper_detection() {
        let mut chain = test_chain();
        chain.append("Transaction Data 1");
        chain.append("Transaction Data 2");
        chain.append("Another important transaction");

        assert_eq!(chain.len(), 4);
        assert!(chain.verify().is_valid());

        chain.blocks[1].data = "MODIFIED DATA!".into();

        let outcome = chain.verify();
        assert!(!outcome.is_valid());
        assert_eq!(outcome, VerifyOutcome::HashMismatch { index: 1 });
        assert_eq!(outcome.to_string(), "current hash invalid at block 1");
    }

    #[test]
    fn json_round_trip_preserves_chain() {
        let mut chain = test_chain();
        chain.append("persist me");
        chain.append("me too");

        let json = chain.to_json().unwrap();
        let restored = Chain::from_json(&json).unwrap();

        assert_eq!(restored.len(), chain.len());
        assert_eq!(restored.tip().current_hash, chain.tip().current_hash);
        assert!(restored.verify().is_valid());
    }

    #[test]
    fn import_rejects_empty_list() {
        assert!(matches!(
            Chain::from_json("[]"),
            Err(ShaleError::EmptyChain)
        ));
    }

    #[test]
    fn import_rejects_tampered_chain() {
        let mut chain = test_chain();
        chain.append("a");
        chain.append("b");
        chain.blocks[1].data = "doctored".into();

        let json = chain.to_json().unwrap();
        assert!(matches!(
            Chain::from_json(&json),
            Err(ShaleError::IntegrityViolation(1))
        ));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let chain = test_chain();
        assert!(chain.get(0).is_some());
        assert!(chain.get(99).is_none());
    }
}
