//! # Transaction Validation
//!
//! Walks a transaction's entry graph from the header and checks each entry
//! once. Value wiring is checked in both directions: a source must point
//! at an entry whose destination points back, at the same position, with
//! the same value.
//!
//! ```text
//! header ─→ results ─→ source ─→ mux ─→ sources ─→ spend / issuance
//!                                                     │
//!                                          anchor ←───┘
//! ```
//!
//! Destination checks do not recurse, so the walk terminates even though
//! the value graph has back-pointers.

use std::collections::{BTreeMap, HashMap, HashSet};

use ec_01_entries::{Entry, Mux, Program, Tx, ValueDestination, ValueSource};
use shared_types::{AssetId, Hash};
use tracing::debug;

use super::errors::{ValidationError, ValidationResult, ValidationResultExt};
use super::vm_context::VmContext;
use crate::ports::ProgramVerifier;

/// Validate one transaction for the chain identified by `initial_block_id`.
pub fn validate_tx(
    tx: &Tx,
    initial_block_id: &Hash,
    verifier: &dyn ProgramVerifier,
) -> ValidationResult<()> {
    let mut state = ValidationState::new(tx, *initial_block_id, verifier);
    let header = tx.entry(&tx.id)?;
    let result = state.check_valid(Cursor::at(tx.id), header);
    if let Err(err) = &result {
        debug!("[ec-04] rejected tx {}: {}", tx.id, err);
    }
    result
}

/// Position within the walk: the entry being checked and, when it was
/// reached through a value reference, the slot it was reached from.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    entry_id: Hash,
    source_pos: u64,
    dest_pos: u64,
}

impl Cursor {
    fn at(entry_id: Hash) -> Self {
        Self {
            entry_id,
            source_pos: 0,
            dest_pos: 0,
        }
    }

    fn with_source_pos(self, source_pos: u64) -> Self {
        Self { source_pos, ..self }
    }

    fn with_dest_pos(self, dest_pos: u64) -> Self {
        Self { dest_pos, ..self }
    }
}

struct ValidationState<'a> {
    blockchain_id: Hash,
    tx: &'a Tx,
    verifier: &'a dyn ProgramVerifier,
    /// Verdict per entry ID.
    cache: HashMap<Hash, ValidationResult<()>>,
    /// Entries currently on the walk's stack.
    visiting: HashSet<Hash>,
}

impl<'a> ValidationState<'a> {
    fn new(tx: &'a Tx, blockchain_id: Hash, verifier: &'a dyn ProgramVerifier) -> Self {
        Self {
            blockchain_id,
            tx,
            verifier,
            cache: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    fn check_valid(&mut self, at: Cursor, entry: &'a Entry) -> ValidationResult<()> {
        if let Some(verdict) = self.cache.get(&at.entry_id) {
            return verdict.clone();
        }
        if !self.visiting.insert(at.entry_id) {
            return Err(ValidationError::Cycle {
                entry_id: at.entry_id,
            });
        }
        let verdict = self.check_entry(at, entry);
        self.visiting.remove(&at.entry_id);
        self.cache.insert(at.entry_id, verdict.clone());
        verdict
    }

    fn check_entry(&mut self, at: Cursor, entry: &'a Entry) -> ValidationResult<()> {
        let tx = self.tx;
        match entry {
            Entry::TxHeader(header) => {
                if header.max_time_ms > 0 && header.min_time_ms > header.max_time_ms {
                    return Err(ValidationError::BadTimeRange {
                        min_time_ms: header.min_time_ms,
                        max_time_ms: header.max_time_ms,
                    });
                }
                for (i, id) in header.result_ids.iter().enumerate() {
                    let result = tx.entry(id)?;
                    self.check_valid(Cursor::at(*id), result)
                        .with_context(|| format!("checking result {i}"))?;
                }
                if header.version <= 1 && header.result_ids.is_empty() {
                    return Err(ValidationError::EmptyResults);
                }
            }

            Entry::Mux(mux) => {
                self.verify_program(at, entry, &mux.program, &mux.witness_arguments)
                    .context("checking mux program")?;
                for (i, source) in mux.sources.iter().enumerate() {
                    self.check_valid_src(at.with_source_pos(i as u64), source)
                        .with_context(|| format!("checking mux source {i}"))?;
                }
                for (i, dest) in mux.witness_destinations.iter().enumerate() {
                    self.check_valid_dest(at.with_dest_pos(i as u64), dest)
                        .with_context(|| format!("checking mux destination {i}"))?;
                }
                check_balance(mux)?;
            }

            Entry::Nonce(nonce) => {
                self.verify_program(at, entry, &nonce.program, &nonce.witness_arguments)
                    .context("checking nonce program")?;
                let time_range = tx.time_range(&nonce.time_range_id)?;
                if time_range.min_time_ms == 0 || time_range.max_time_ms == 0 {
                    return Err(ValidationError::ZeroTime);
                }
                let tr_entry = tx.entry(&nonce.time_range_id)?;
                self.check_valid(Cursor::at(nonce.time_range_id), tr_entry)
                    .context("checking nonce time range")?;
            }

            Entry::TimeRange(tr) => {
                let outside = tr.min_time_ms < tx.min_time_ms()
                    || (tx.max_time_ms() > 0 && tr.max_time_ms > tx.max_time_ms());
                if tr.min_time_ms > tr.max_time_ms || outside {
                    return Err(ValidationError::BadTimeRange {
                        min_time_ms: tr.min_time_ms,
                        max_time_ms: tr.max_time_ms,
                    });
                }
            }

            Entry::Output(output) => {
                self.check_valid_src(at.with_source_pos(0), &output.source)
                    .context("checking output source")?;
            }

            Entry::Retirement(retirement) => {
                self.check_valid_src(at.with_source_pos(0), &retirement.source)
                    .context("checking retirement source")?;
            }

            Entry::Issuance(iss) => {
                let definition = &iss.witness_asset_definition;
                let computed = definition.compute_asset_id()?;
                if computed != iss.value.asset_id {
                    return Err(ValidationError::MismatchedAssetId {
                        computed,
                        declared: iss.value.asset_id,
                    });
                }
                if definition.initial_block_id != self.blockchain_id {
                    return Err(ValidationError::WrongBlockchain {
                        expected: self.blockchain_id,
                        actual: definition.initial_block_id,
                    });
                }
                self.verify_program(
                    at,
                    entry,
                    &definition.issuance_program,
                    &iss.witness_arguments,
                )
                .context("checking issuance program")?;

                let anchor = tx.entry(&iss.anchor_id)?;
                self.check_valid(Cursor::at(iss.anchor_id), anchor)
                    .context("checking issuance anchor")?;
                let anchored = match anchor {
                    Entry::Nonce(n) => n.witness_anchored_id,
                    Entry::Spend(s) => s.witness_anchored_id,
                    Entry::Issuance(i) => i.witness_anchored_id,
                    other => {
                        return Err(ec_01_entries::EntryError::EntryType {
                            id: iss.anchor_id,
                            expected: "nonce, spend or issuance",
                            actual: other.type_tag(),
                        }
                        .into())
                    }
                };
                if anchored != Some(at.entry_id) {
                    return Err(ValidationError::MismatchedReference {
                        expected: at.entry_id,
                        actual: anchored.unwrap_or(Hash::ZERO),
                    });
                }

                let dest = required(at, iss.witness_destination.as_ref(), "destination")?;
                self.check_valid_dest(at.with_dest_pos(0), dest)
                    .context("checking issuance destination")?;
            }

            Entry::Spend(spend) => {
                let spent = tx.output(&spend.spent_output_id)?;
                self.verify_program(
                    at,
                    entry,
                    &spent.control_program,
                    &spend.witness_arguments,
                )
                .context("checking control program")?;

                let dest = required(at, spend.witness_destination.as_ref(), "destination")?;
                if spent.source.value != dest.value {
                    return Err(ValidationError::MismatchedValue {
                        expected: spent.source.value,
                        actual: dest.value,
                    });
                }
                self.check_valid_dest(at.with_dest_pos(0), dest)
                    .context("checking spend destination")?;
            }

            Entry::BlockHeader(_) => {
                return Err(ec_01_entries::EntryError::EntryType {
                    id: at.entry_id,
                    expected: "transaction entry",
                    actual: entry.type_tag(),
                }
                .into());
            }
        }

        if tx.version() <= 1 && !entry.ext_hash().is_zero() {
            return Err(ValidationError::NonemptyExtHash {
                entry_id: at.entry_id,
            });
        }
        Ok(())
    }

    /// The referenced entry must be valid, and its destination must point
    /// back here.
    fn check_valid_src(&mut self, at: Cursor, source: &ValueSource) -> ValidationResult<()> {
        let tx = self.tx;
        let entry = tx.entry(&source.ref_id)?;
        self.check_valid(Cursor::at(source.ref_id), entry)
            .context("checking value source")?;

        let ref_at = Cursor::at(source.ref_id);
        let dest = match entry {
            Entry::Issuance(iss) => {
                single_slot(source.position)?;
                required(ref_at, iss.witness_destination.as_ref(), "destination")?
            }
            Entry::Spend(spend) => {
                single_slot(source.position)?;
                required(ref_at, spend.witness_destination.as_ref(), "destination")?
            }
            Entry::Mux(mux) => slot(&mux.witness_destinations, source.position)?,
            other => {
                return Err(ec_01_entries::EntryError::EntryType {
                    id: source.ref_id,
                    expected: "issuance, spend or mux",
                    actual: other.type_tag(),
                }
                .into())
            }
        };

        if dest.ref_id != at.entry_id {
            return Err(ValidationError::MismatchedReference {
                expected: at.entry_id,
                actual: dest.ref_id,
            });
        }
        if dest.position != at.source_pos {
            return Err(ValidationError::MismatchedPosition {
                expected: at.source_pos,
                actual: dest.position,
            });
        }
        if dest.value != source.value {
            return Err(ValidationError::MismatchedValue {
                expected: source.value,
                actual: dest.value,
            });
        }
        Ok(())
    }

    /// The referenced entry's source must point back here. Does not
    /// validate the destination entry itself.
    fn check_valid_dest(&self, at: Cursor, dest: &ValueDestination) -> ValidationResult<()> {
        let source = match self.tx.entry(&dest.ref_id)? {
            Entry::Output(output) => {
                single_slot(dest.position)?;
                &output.source
            }
            Entry::Retirement(retirement) => {
                single_slot(dest.position)?;
                &retirement.source
            }
            Entry::Mux(mux) => slot(&mux.sources, dest.position)?,
            other => {
                return Err(ec_01_entries::EntryError::EntryType {
                    id: dest.ref_id,
                    expected: "output, retirement or mux",
                    actual: other.type_tag(),
                }
                .into())
            }
        };

        if source.ref_id != at.entry_id {
            return Err(ValidationError::MismatchedReference {
                expected: at.entry_id,
                actual: source.ref_id,
            });
        }
        if source.position != at.dest_pos {
            return Err(ValidationError::MismatchedPosition {
                expected: at.dest_pos,
                actual: source.position,
            });
        }
        if source.value != dest.value {
            return Err(ValidationError::MismatchedValue {
                expected: dest.value,
                actual: source.value,
            });
        }
        Ok(())
    }

    fn verify_program(
        &self,
        at: Cursor,
        entry: &'a Entry,
        program: &'a Program,
        arguments: &'a [Vec<u8>],
    ) -> ValidationResult<()> {
        let context = VmContext::for_entry(self.tx, at.entry_id, entry, program, arguments)?;
        self.verifier.verify(&context)?;
        Ok(())
    }
}

/// Per-asset conservation across a mux. Sums use checked arithmetic.
fn check_balance(mux: &Mux) -> ValidationResult<()> {
    let mut sources: BTreeMap<AssetId, u64> = BTreeMap::new();
    for source in &mux.sources {
        let asset_id = source.value.asset_id;
        let sum = sources.entry(asset_id).or_insert(0);
        *sum = sum
            .checked_add(source.value.amount)
            .ok_or(ValidationError::Overflow { asset_id })?;
    }

    let mut destinations: BTreeMap<AssetId, u64> = BTreeMap::new();
    for dest in &mux.witness_destinations {
        let asset_id = dest.value.asset_id;
        if !sources.contains_key(&asset_id) {
            return Err(ValidationError::NoSource { asset_id });
        }
        let sum = destinations.entry(asset_id).or_insert(0);
        *sum = sum
            .checked_add(dest.value.amount)
            .ok_or(ValidationError::Overflow { asset_id })?;
    }

    for (asset_id, &in_amount) in &sources {
        let out_amount = destinations.get(asset_id).copied().unwrap_or(0);
        if in_amount != out_amount {
            return Err(ValidationError::Unbalanced {
                asset_id: *asset_id,
                sources: in_amount,
                destinations: out_amount,
            });
        }
    }
    Ok(())
}

fn single_slot(position: u64) -> ValidationResult<()> {
    if position != 0 {
        return Err(ValidationError::Position { position, count: 1 });
    }
    Ok(())
}

fn slot<T>(items: &[T], position: u64) -> ValidationResult<&T> {
    usize::try_from(position)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or(ValidationError::Position {
            position,
            count: items.len(),
        })
}

fn required<T>(at: Cursor, field: Option<T>, name: &'static str) -> ValidationResult<T> {
    field.ok_or(ValidationError::MissingField {
        entry_id: at.entry_id,
        field: name,
    })
}

#[cfg(test)]
mod tests;
