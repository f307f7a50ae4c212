//! # Transaction Aggregate
//!
//! A transaction's full entry set, keyed by ID, plus the indices derived
//! from it. References between entries are resolved through `entries`.

use std::collections::HashMap;

use shared_types::{Hash, Sha3Hasher};

use super::entries::*;
use super::entry_id::tagged_id;
use super::errors::{EntryError, EntryResult};
use super::value_objects::*;

/// A transaction as an entry graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub header: TxHeader,
    /// The header's entry ID.
    pub id: Hash,
    pub entries: HashMap<Hash, Entry>,

    /// Spend and issuance IDs, in input order.
    ///
    /// Only inputs the mapper understood have entries, so a wire input of
    /// an unknown asset version shifts every later index down by one.
    pub input_ids: Vec<Hash>,
    /// Nonces anchoring this transaction's issuances, in input order.
    pub nonce_ids: Vec<Hash>,
    /// Outputs consumed by this transaction's spends, in input order.
    pub spent_output_ids: Vec<Hash>,
    /// Results that are outputs (not retirements), in header order.
    pub output_ids: Vec<Hash>,
}

macro_rules! typed_accessor {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty, $tag:expr) => {
        $(#[$meta])*
        pub fn $name(&self, id: &Hash) -> EntryResult<&$ty> {
            match self.entry(id)? {
                Entry::$variant(e) => Ok(e),
                other => Err(EntryError::EntryType {
                    id: *id,
                    expected: $tag,
                    actual: other.type_tag(),
                }),
            }
        }
    };
}

impl Tx {
    /// Assemble a transaction from its header and the rest of its entries.
    ///
    /// The header is (re)inserted under its computed ID, and the derived
    /// indices are rebuilt from the entry map.
    pub fn new(header: TxHeader, mut entries: HashMap<Hash, Entry>) -> EntryResult<Self> {
        let id = tagged_id(TYPE_TX_HEADER, &header)?;
        entries.insert(id, Entry::TxHeader(header.clone()));

        let mut inputs: Vec<(u64, Hash)> = entries
            .iter()
            .filter_map(|(id, entry)| match entry {
                Entry::Spend(_) | Entry::Issuance(_) => entry.ordinal().map(|o| (o, *id)),
                _ => None,
            })
            .collect();
        inputs.sort_unstable();
        let input_ids: Vec<Hash> = inputs.into_iter().map(|(_, id)| id).collect();

        let mut nonce_ids = Vec::new();
        let mut spent_output_ids = Vec::new();
        for input_id in &input_ids {
            match entries.get(input_id) {
                Some(Entry::Spend(spend)) => spent_output_ids.push(spend.spent_output_id),
                Some(Entry::Issuance(issuance)) => {
                    if let Some(Entry::Nonce(_)) = entries.get(&issuance.anchor_id) {
                        if !nonce_ids.contains(&issuance.anchor_id) {
                            nonce_ids.push(issuance.anchor_id);
                        }
                    }
                }
                _ => {}
            }
        }

        let output_ids = header
            .result_ids
            .iter()
            .filter(|id| matches!(entries.get(*id), Some(Entry::Output(_))))
            .copied()
            .collect();

        Ok(Self {
            header,
            id,
            entries,
            input_ids,
            nonce_ids,
            spent_output_ids,
            output_ids,
        })
    }

    pub fn version(&self) -> u64 {
        self.header.version
    }

    pub fn min_time_ms(&self) -> u64 {
        self.header.min_time_ms
    }

    pub fn max_time_ms(&self) -> u64 {
        self.header.max_time_ms
    }

    /// Look up any entry.
    pub fn entry(&self, id: &Hash) -> EntryResult<&Entry> {
        self.entries
            .get(id)
            .ok_or(EntryError::MissingEntry { id: *id })
    }

    typed_accessor!(output, Output, Output, TYPE_OUTPUT);
    typed_accessor!(retirement, Retirement, Retirement, TYPE_RETIREMENT);
    typed_accessor!(spend, Spend, Spend, TYPE_SPEND);
    typed_accessor!(issuance, Issuance, Issuance, TYPE_ISSUANCE);
    typed_accessor!(nonce, Nonce, Nonce, TYPE_NONCE);
    typed_accessor!(time_range, TimeRange, TimeRange, TYPE_TIME_RANGE);
    typed_accessor!(mux, Mux, Mux, TYPE_MUX);

    /// ID of input `n` (spend or issuance).
    ///
    /// `n` indexes [`Tx::input_ids`], not the wire input list.
    pub fn input_id(&self, n: usize) -> EntryResult<Hash> {
        self.input_ids
            .get(n)
            .copied()
            .ok_or(EntryError::InputIndex {
                index: n,
                count: self.input_ids.len(),
            })
    }

    /// Message signed by input `n`: `SHA3(input_id || tx_id)`.
    ///
    /// `n` is a position in [`Tx::input_ids`], which skips inputs of unknown
    /// asset versions.
    pub fn sig_hash(&self, n: usize) -> EntryResult<Hash> {
        let input_id = self.input_id(n)?;
        let mut hasher = Sha3Hasher::new();
        hasher.update(input_id.as_bytes()).update(self.id.as_bytes());
        Ok(hasher.finalize())
    }
}
