//! JSON views of decoded wire objects, each with its computed hash.

use ec_02_legacy::{map_tx, Block, BlockHeader, LegacyResult, TxData, TxInput, TxOutput};
use serde::Serialize;
use shared_types::Hash;

#[derive(Debug, Serialize)]
pub struct TxView<'a> {
    pub id: Hash,
    pub version: u64,
    pub min_time_ms: u64,
    pub max_time_ms: u64,
    pub reference_data: String,
    pub inputs: &'a [TxInput],
    pub outputs: &'a [TxOutput],
    /// Entry IDs of the results, in output order.
    pub result_ids: Vec<Hash>,
}

impl<'a> TxView<'a> {
    pub fn new(tx: &'a TxData) -> LegacyResult<Self> {
        let mapped = map_tx(tx)?;
        Ok(Self {
            id: mapped.id,
            version: tx.version,
            min_time_ms: tx.min_time_ms,
            max_time_ms: tx.max_time_ms,
            reference_data: hex::encode(&tx.reference_data),
            inputs: &tx.inputs,
            outputs: &tx.outputs,
            result_ids: mapped.header.result_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BlockHeaderView {
    pub hash: Hash,
    pub version: u64,
    pub height: u64,
    pub previous_block_id: Hash,
    pub timestamp_ms: u64,
    pub transactions_root: Hash,
    pub assets_root: Hash,
    pub consensus_program: String,
    pub witness: Vec<String>,
}

impl BlockHeaderView {
    pub fn new(header: &BlockHeader) -> LegacyResult<Self> {
        Ok(Self {
            hash: header.hash()?,
            version: header.version,
            height: header.height,
            previous_block_id: header.previous_block_id,
            timestamp_ms: header.timestamp_ms,
            transactions_root: header.commitment.transactions_root,
            assets_root: header.commitment.assets_root,
            consensus_program: hex::encode(&header.commitment.consensus_program),
            witness: header.witness.witness.iter().map(hex::encode).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BlockView<'a> {
    #[serde(flatten)]
    pub header: BlockHeaderView,
    pub transactions: Vec<TxView<'a>>,
}

impl<'a> BlockView<'a> {
    pub fn new(block: &'a Block) -> LegacyResult<Self> {
        Ok(Self {
            header: BlockHeaderView::new(&block.header)?,
            transactions: block
                .transactions
                .iter()
                .map(TxView::new)
                .collect::<LegacyResult<_>>()?,
        })
    }
}
