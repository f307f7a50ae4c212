//! # Legacy → Entry Mapper
//!
//! Builds the entry graph for a legacy transaction:
//!
//! 1. Each spend input becomes a `Spend` of the prevout its commitment
//!    describes (the prevout is added as an `Output` so it has an ID).
//! 2. Each issuance input becomes an `Issuance` anchored on a fresh `Nonce`
//!    (with a `TimeRange` from the transaction bounds) when it has a nonce,
//!    or on the first spend otherwise.
//! 3. All inputs feed one `Mux`.
//! 4. Each output becomes an `Output`, or a `Retirement` when its control
//!    program is unspendable, sourced from the mux.
//! 5. The `TxHeader` lists the results; its ID is the transaction ID.
//!
//! Witness fields (destinations, anchored IDs) are filled in before the
//! entries are stored; they do not affect any ID.

use std::collections::HashMap;

use ec_01_entries::program::{is_unspendable, nonce_program, DEFAULT_VM_VERSION, OP_TRUE};
use ec_01_entries::value_objects::{TYPE_ISSUANCE, TYPE_MUX, TYPE_NONCE, TYPE_SPEND};
use ec_01_entries::{
    entry_id, hash_data, tagged_id, AssetAmount, AssetDefinition, Block as EntryBlock,
    BlockHeaderEntry, Entry, Issuance, Mux, Nonce, Output, Program, Retirement, Spend,
    TimeRange, Tx, TxHeader, ValueDestination, ValueSource,
};
use shared_types::Hash;
use tracing::debug;

use super::block::{Block, BlockHeader};
use super::errors::{LegacyError, LegacyResult};
use super::tx_data::TxData;
use super::tx_input::TypedInput;

/// Map a legacy transaction to its entry graph.
pub fn map_tx(tx: &TxData) -> LegacyResult<Tx> {
    let mut entries: HashMap<Hash, Entry> = HashMap::new();

    // Mux source per input slot; inputs of unknown asset versions have none.
    let mut slots: Vec<Option<ValueSource>> = vec![None; tx.inputs.len()];

    // ---- spends -------------------------------------------------------------

    let mut spends: Vec<(usize, Hash, Spend)> = Vec::new();
    for (i, input) in tx.inputs.iter().enumerate() {
        let Some(TypedInput::Spend(si)) = &input.typed_input else {
            continue;
        };
        let prevout_id = add_entry(&mut entries, Entry::Output(si.spend_commitment.prevout()))?;
        let spend = Spend {
            spent_output_id: prevout_id,
            data: hash_data(&input.reference_data),
            ext_hash: Hash::ZERO,
            ordinal: i as u64,
            witness_destination: None,
            witness_arguments: si.arguments.clone(),
            witness_anchored_id: None,
        };
        let id = tagged_id(TYPE_SPEND, &spend)?;
        slots[i] = Some(ValueSource {
            ref_id: id,
            value: si.spend_commitment.asset_amount,
            position: 0,
        });
        spends.push((i, id, spend));
    }

    // ---- issuances ----------------------------------------------------------

    enum Anchor {
        Nonce(usize),
        FirstSpend,
    }

    let mut nonces: Vec<(Hash, Nonce)> = Vec::new();
    let mut issuances: Vec<(usize, Hash, Issuance)> = Vec::new();
    for (i, input) in tx.inputs.iter().enumerate() {
        let Some(TypedInput::Issuance(ii)) = &input.typed_input else {
            continue;
        };
        let value = AssetAmount::new(ii.asset_id()?, ii.amount);

        let (anchor_id, anchor) = if !ii.nonce.is_empty() {
            let time_range = TimeRange {
                min_time_ms: tx.min_time_ms,
                max_time_ms: tx.max_time_ms,
                ext_hash: Hash::ZERO,
            };
            let time_range_id = add_entry(&mut entries, Entry::TimeRange(time_range))?;
            let nonce = Nonce {
                program: Program::new(
                    DEFAULT_VM_VERSION,
                    nonce_program(&ii.nonce, value.asset_id.as_bytes()),
                ),
                time_range_id,
                ..Default::default()
            };
            let nonce_id = tagged_id(TYPE_NONCE, &nonce)?;
            nonces.push((nonce_id, nonce));
            (nonce_id, Anchor::Nonce(nonces.len() - 1))
        } else if let Some((_, first_spend_id, _)) = spends.first() {
            (*first_spend_id, Anchor::FirstSpend)
        } else {
            return Err(LegacyError::MissingAnchor { input_index: i });
        };

        let issuance = Issuance {
            anchor_id,
            value,
            data: hash_data(&input.reference_data),
            ext_hash: Hash::ZERO,
            ordinal: i as u64,
            witness_destination: None,
            witness_asset_definition: AssetDefinition {
                initial_block_id: ii.initial_block,
                issuance_program: Program::new(ii.vm_version, ii.issuance_program.clone()),
                data: hash_data(&ii.asset_definition),
            },
            witness_arguments: ii.arguments.clone(),
            witness_anchored_id: None,
        };
        let id = tagged_id(TYPE_ISSUANCE, &issuance)?;
        match anchor {
            Anchor::Nonce(k) => nonces[k].1.witness_anchored_id = Some(id),
            Anchor::FirstSpend => {
                if let Some((_, _, first)) = spends.first_mut() {
                    first.witness_anchored_id = Some(id);
                }
            }
        }
        slots[i] = Some(ValueSource {
            ref_id: id,
            value,
            position: 0,
        });
        issuances.push((i, id, issuance));
    }

    // ---- mux ----------------------------------------------------------------

    let mut positions = vec![0u64; tx.inputs.len()];
    let mut sources = Vec::with_capacity(slots.len());
    for (i, slot) in slots.into_iter().enumerate() {
        if let Some(source) = slot {
            positions[i] = sources.len() as u64;
            sources.push(source);
        }
    }
    let mut mux = Mux {
        sources,
        program: Program::new(DEFAULT_VM_VERSION, vec![OP_TRUE]),
        ..Default::default()
    };
    let mux_id = tagged_id(TYPE_MUX, &mux)?;

    for (i, id, mut spend) in spends {
        let value = mux.sources[positions[i] as usize].value;
        spend.witness_destination = Some(ValueDestination {
            ref_id: mux_id,
            value,
            position: positions[i],
        });
        entries.insert(id, Entry::Spend(spend));
    }
    for (i, id, mut issuance) in issuances {
        issuance.witness_destination = Some(ValueDestination {
            ref_id: mux_id,
            value: issuance.value,
            position: positions[i],
        });
        entries.insert(id, Entry::Issuance(issuance));
    }
    for (id, nonce) in nonces {
        entries.insert(id, Entry::Nonce(nonce));
    }

    // ---- results ------------------------------------------------------------

    let mut result_ids = Vec::with_capacity(tx.outputs.len());
    for (i, output) in tx.outputs.iter().enumerate() {
        let source = ValueSource {
            ref_id: mux_id,
            value: output.asset_amount(),
            position: i as u64,
        };
        let data = hash_data(&output.reference_data);
        let result = if is_unspendable(output.control_program()) {
            Entry::Retirement(Retirement {
                source,
                data,
                ext_hash: Hash::ZERO,
                ordinal: i as u64,
            })
        } else {
            Entry::Output(Output {
                source,
                control_program: Program::new(
                    output.commitment.vm_version,
                    output.commitment.control_program.clone(),
                ),
                data,
                ext_hash: Hash::ZERO,
                ordinal: i as u64,
            })
        };
        let result_id = add_entry(&mut entries, result)?;
        mux.witness_destinations.push(ValueDestination {
            ref_id: result_id,
            value: source.value,
            position: 0,
        });
        result_ids.push(result_id);
    }
    entries.insert(mux_id, Entry::Mux(mux));

    // ---- header -------------------------------------------------------------

    let header = TxHeader {
        version: tx.version,
        result_ids,
        data: hash_data(&tx.reference_data),
        min_time_ms: tx.min_time_ms,
        max_time_ms: tx.max_time_ms,
        ext_hash: Hash::ZERO,
    };
    let mapped = Tx::new(header, entries)?;
    debug!(
        "[ec-02] mapped tx {} ({} inputs, {} outputs, {} entries)",
        mapped.id,
        tx.inputs.len(),
        tx.outputs.len(),
        mapped.entries.len()
    );
    Ok(mapped)
}

fn add_entry(entries: &mut HashMap<Hash, Entry>, entry: Entry) -> LegacyResult<Hash> {
    let id = entry_id(&entry)?;
    entries.insert(id, entry);
    Ok(id)
}

/// Map a legacy block header to its entry; returns `(block_id, entry)`.
pub fn map_block_header(header: &BlockHeader) -> LegacyResult<(Hash, BlockHeaderEntry)> {
    let entry = BlockHeaderEntry {
        version: header.version,
        height: header.height,
        previous_block_id: header.previous_block_id,
        timestamp_ms: header.timestamp_ms,
        transactions_root: header.commitment.transactions_root,
        assets_root: header.commitment.assets_root,
        next_consensus_program: header.commitment.consensus_program.clone(),
        ext_hash: Hash::ZERO,
        witness_arguments: header.witness.witness.clone(),
    };
    let id = ec_01_entries::block_header_id(&entry)?;
    Ok((id, entry))
}

/// Map a legacy block and all of its transactions.
pub fn map_block(block: &Block) -> LegacyResult<EntryBlock> {
    let (_, header) = map_block_header(&block.header)?;
    let transactions = block
        .transactions
        .iter()
        .map(map_tx)
        .collect::<LegacyResult<Vec<_>>>()?;
    let mapped = EntryBlock::new(header, transactions)?;
    debug!(
        "[ec-02] mapped block {} at height {} ({} txs)",
        mapped.id,
        mapped.height(),
        mapped.transactions.len()
    );
    Ok(mapped)
}

impl TxData {
    /// The transaction ID.
    pub fn hash(&self) -> LegacyResult<Hash> {
        Ok(map_tx(self)?.id)
    }
}

#[cfg(test)]
mod tests;
