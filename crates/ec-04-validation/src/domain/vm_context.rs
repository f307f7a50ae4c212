//! # VM Context
//!
//! What a program may learn about the entry it guards. Built by the
//! validator, handed to the `ProgramVerifier` port.
//!
//! Fields that make no sense for the entry being verified are `None`; a
//! program that asks for one fails with `VmError::Context`.

use ec_01_entries::{AssetAmount, Block, Entry, Mux, Program, Tx, ValueDestination};
use shared_types::{AssetId, Hash, Sha3Hasher};

use super::errors::{ValidationResult, VmError};

/// Where `check_output` looks for results.
#[derive(Debug, Clone, Copy)]
enum OutputScope<'a> {
    None,
    Mux(&'a Mux),
    /// A spend or issuance: its single destination.
    Destination(&'a ValueDestination),
}

/// Parameters of a `check_output` query.
#[derive(Debug, Clone, Copy)]
pub struct OutputQuery<'q> {
    pub index: u64,
    /// Expected reference-data hash; `None` matches any.
    pub data: Option<Hash>,
    pub amount: u64,
    pub asset_id: AssetId,
    pub vm_version: u64,
    pub code: &'q [u8],
    /// Let a retirement stand in for an output with any program.
    pub expansion: bool,
}

#[derive(Debug, Clone)]
pub struct VmContext<'a> {
    pub vm_version: u64,
    pub code: &'a [u8],
    pub arguments: &'a [Vec<u8>],
    pub entry_id: Hash,

    pub tx_version: Option<u64>,
    pub tx_sig_hash: Option<Hash>,
    pub num_results: Option<u64>,
    pub asset_id: Option<AssetId>,
    pub amount: Option<u64>,
    pub input_index: Option<u64>,
    pub min_time_ms: Option<u64>,
    pub max_time_ms: Option<u64>,
    pub entry_data: Option<Hash>,
    pub tx_data: Option<Hash>,
    pub destination_position: Option<u64>,
    pub anchor_id: Option<Hash>,
    pub spent_output_id: Option<Hash>,

    pub block_hash: Option<Hash>,
    pub block_time_ms: Option<u64>,
    pub next_consensus_program: Option<&'a [u8]>,

    tx: Option<&'a Tx>,
    scope: OutputScope<'a>,
}

impl<'a> VmContext<'a> {
    fn bare(program: &'a Program, arguments: &'a [Vec<u8>], entry_id: Hash) -> Self {
        Self {
            vm_version: program.vm_version,
            code: &program.code,
            arguments,
            entry_id,
            tx_version: None,
            tx_sig_hash: None,
            num_results: None,
            asset_id: None,
            amount: None,
            input_index: None,
            min_time_ms: None,
            max_time_ms: None,
            entry_data: None,
            tx_data: None,
            destination_position: None,
            anchor_id: None,
            spent_output_id: None,
            block_hash: None,
            block_time_ms: None,
            next_consensus_program: None,
            tx: None,
            scope: OutputScope::None,
        }
    }

    /// Context for a program guarding `entry` inside `tx`.
    pub fn for_entry(
        tx: &'a Tx,
        entry_id: Hash,
        entry: &'a Entry,
        program: &'a Program,
        arguments: &'a [Vec<u8>],
    ) -> ValidationResult<Self> {
        let mut ctx = Self::bare(program, arguments, entry_id);
        ctx.tx = Some(tx);
        ctx.tx_version = Some(tx.version());
        ctx.tx_sig_hash = Some(sig_hash(&entry_id, &tx.id));
        ctx.num_results = Some(tx.header.result_ids.len() as u64);
        ctx.min_time_ms = Some(tx.min_time_ms());
        ctx.max_time_ms = Some(tx.max_time_ms());
        ctx.tx_data = Some(tx.header.data);

        match entry {
            Entry::Nonce(nonce) => {
                if let Some(Entry::Issuance(iss)) =
                    nonce.witness_anchored_id.and_then(|id| tx.entries.get(&id))
                {
                    ctx.asset_id = Some(iss.value.asset_id);
                    ctx.amount = Some(iss.value.amount);
                }
            }
            Entry::Issuance(iss) => {
                ctx.asset_id = Some(iss.value.asset_id);
                ctx.amount = Some(iss.value.amount);
                ctx.input_index = Some(iss.ordinal);
                ctx.entry_data = Some(iss.data);
                ctx.anchor_id = Some(iss.anchor_id);
                if let Some(dest) = &iss.witness_destination {
                    ctx.destination_position = Some(dest.position);
                    ctx.scope = OutputScope::Destination(dest);
                }
            }
            Entry::Spend(spend) => {
                let spent = tx.output(&spend.spent_output_id)?;
                ctx.asset_id = Some(spent.source.value.asset_id);
                ctx.amount = Some(spent.source.value.amount);
                ctx.input_index = Some(spend.ordinal);
                ctx.entry_data = Some(spend.data);
                ctx.spent_output_id = Some(spend.spent_output_id);
                if let Some(dest) = &spend.witness_destination {
                    ctx.destination_position = Some(dest.position);
                    ctx.scope = OutputScope::Destination(dest);
                }
            }
            Entry::Mux(mux) => ctx.scope = OutputScope::Mux(mux),
            _ => {}
        }
        Ok(ctx)
    }

    /// Context for the previous block's consensus program, run against
    /// `block`'s witness.
    pub fn for_block(block: &'a Block, consensus_program: &'a Program) -> Self {
        let mut ctx = Self::bare(
            consensus_program,
            &block.header.witness_arguments,
            block.id,
        );
        ctx.block_hash = Some(block.id);
        ctx.block_time_ms = Some(block.timestamp_ms());
        ctx.next_consensus_program = Some(block.header.next_consensus_program.as_slice());
        ctx
    }

    /// Whether result `query.index` matches the query.
    ///
    /// For a mux the index selects among its destinations. For a spend or
    /// issuance whose destination is a mux the same applies to that mux;
    /// otherwise only index 0 exists.
    pub fn check_output(&self, query: &OutputQuery<'_>) -> Result<bool, VmError> {
        let tx = self.tx.ok_or(VmError::Context)?;
        match self.scope {
            OutputScope::None => Err(VmError::Context),
            OutputScope::Mux(mux) => check_mux(tx, mux, query),
            OutputScope::Destination(dest) => {
                let entry = tx
                    .entries
                    .get(&dest.ref_id)
                    .ok_or(VmError::MissingEntry(dest.ref_id))?;
                if let Entry::Mux(mux) = entry {
                    return check_mux(tx, mux, query);
                }
                if query.index != 0 {
                    return Err(VmError::BadValue(format!("index {} >= 1", query.index)));
                }
                check_entry(entry, query)
            }
        }
    }
}

fn check_mux(tx: &Tx, mux: &Mux, query: &OutputQuery<'_>) -> Result<bool, VmError> {
    let dest = usize::try_from(query.index)
        .ok()
        .and_then(|i| mux.witness_destinations.get(i))
        .ok_or_else(|| {
            VmError::BadValue(format!(
                "index {} >= {}",
                query.index,
                mux.witness_destinations.len()
            ))
        })?;
    let entry = tx
        .entries
        .get(&dest.ref_id)
        .ok_or(VmError::MissingEntry(dest.ref_id))?;
    check_entry(entry, query)
}

fn check_entry(entry: &Entry, query: &OutputQuery<'_>) -> Result<bool, VmError> {
    let matches = |vm_version: u64, code: &[u8], value: &AssetAmount, data: &Hash| {
        vm_version == query.vm_version
            && code == query.code
            && value.asset_id == query.asset_id
            && value.amount == query.amount
            && query.data.map_or(true, |d| d == *data)
    };
    match entry {
        Entry::Output(out) => Ok(matches(
            out.control_program.vm_version,
            &out.control_program.code,
            &out.source.value,
            &out.data,
        )),
        // A retirement has VM version 0 and empty code, unless expansion
        // lets it match any code.
        Entry::Retirement(ret) => {
            let code: &[u8] = if query.expansion { query.code } else { &[] };
            Ok(matches(0, code, &ret.source.value, &ret.data))
        }
        _ => Err(VmError::Context),
    }
}

/// `SHA3(entry_id || tx_id)`
pub fn sig_hash(entry_id: &Hash, tx_id: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher.update(entry_id.as_bytes()).update(tx_id.as_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_01_entries::program::{OP_FAIL, OP_TRUE};
    use ec_02_legacy::{map_tx, TxData, TxInput, TxOutput};

    const ASSET: AssetId = AssetId::new([5; 32]);

    fn tx() -> Tx {
        let data = TxData {
            version: 1,
            inputs: vec![TxInput::new_spend(
                vec![],
                Hash::new([1; 32]),
                ASSET,
                10,
                0,
                vec![OP_TRUE],
                Hash::ZERO,
                vec![],
            )],
            outputs: vec![
                TxOutput::new(ASSET, 6, vec![OP_TRUE], vec![]),
                TxOutput::new(ASSET, 4, vec![OP_FAIL], vec![]),
            ],
            ..Default::default()
        };
        map_tx(&data).unwrap()
    }

    fn query(index: u64, amount: u64, code: &[u8]) -> OutputQuery<'_> {
        OutputQuery {
            index,
            data: None,
            amount,
            asset_id: ASSET,
            vm_version: 1,
            code,
            expansion: false,
        }
    }

    #[test]
    fn test_spend_context_fields() {
        let tx = tx();
        let spend_id = tx.input_ids[0];
        let entry = tx.entry(&spend_id).unwrap();
        let Entry::Spend(spend) = entry else {
            panic!("spend");
        };
        let program = tx.output(&spend.spent_output_id).unwrap().control_program.clone();
        let ctx = VmContext::for_entry(&tx, spend_id, entry, &program, &[]).unwrap();

        assert_eq!(ctx.amount, Some(10));
        assert_eq!(ctx.asset_id, Some(ASSET));
        assert_eq!(ctx.input_index, Some(0));
        assert_eq!(ctx.spent_output_id, Some(spend.spent_output_id));
        assert_eq!(ctx.tx_sig_hash, Some(tx.sig_hash(0).unwrap()));
        assert_eq!(ctx.num_results, Some(2));
    }

    #[test]
    fn test_check_output_through_mux() {
        let tx = tx();
        let spend_id = tx.input_ids[0];
        let entry = tx.entry(&spend_id).unwrap();
        let program = Program::new(1, vec![OP_TRUE]);
        let ctx = VmContext::for_entry(&tx, spend_id, entry, &program, &[]).unwrap();

        assert_eq!(ctx.check_output(&query(0, 6, &[OP_TRUE])), Ok(true));
        assert_eq!(ctx.check_output(&query(0, 7, &[OP_TRUE])), Ok(false));
        assert!(matches!(
            ctx.check_output(&query(2, 6, &[OP_TRUE])),
            Err(VmError::BadValue(_))
        ));
    }

    #[test]
    fn test_retirement_expansion() {
        let tx = tx();
        let spend_id = tx.input_ids[0];
        let entry = tx.entry(&spend_id).unwrap();
        let program = Program::new(1, vec![OP_TRUE]);
        let ctx = VmContext::for_entry(&tx, spend_id, entry, &program, &[]).unwrap();

        let mut q = query(1, 4, &[]);
        q.vm_version = 0;
        assert_eq!(ctx.check_output(&q), Ok(true));

        let mut q = query(1, 4, &[0xab]);
        q.vm_version = 0;
        assert_eq!(ctx.check_output(&q), Ok(false));
        q.expansion = true;
        assert_eq!(ctx.check_output(&q), Ok(true));
    }

    #[test]
    fn test_block_context_has_no_outputs() {
        let header = ec_01_entries::BlockHeaderEntry {
            version: 1,
            height: 2,
            timestamp_ms: 50,
            witness_arguments: vec![vec![1]],
            ..Default::default()
        };
        let block = Block::new(header, vec![]).unwrap();
        let program = Program::new(1, vec![OP_TRUE]);
        let ctx = VmContext::for_block(&block, &program);
        assert_eq!(ctx.arguments, &[vec![1u8]][..]);
        assert_eq!(ctx.block_time_ms, Some(50));
        assert_eq!(ctx.check_output(&query(0, 1, &[])), Err(VmError::Context));
    }
}
