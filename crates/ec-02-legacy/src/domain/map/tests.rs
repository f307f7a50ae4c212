use super::*;
use crate::domain::block::{BlockCommitment, BlockWitness};
use crate::domain::tx_input::TxInput;
use crate::domain::tx_output::TxOutput;
use ec_01_entries::program::{OP_FAIL, OP_TRUE};
use shared_types::AssetId;

const EMPTY_TX_ID: &str = "7ae6eef6b02fe61d35cc185405aec5f690ccb0ac291ecd6214445a1dff8fc9fd";

fn spend_input(amount: u64) -> TxInput {
    TxInput::new_spend(
        vec![vec![0xaa]],
        Hash::new([1; 32]),
        AssetId::new([2; 32]),
        amount,
        0,
        vec![OP_TRUE],
        Hash::ZERO,
        vec![],
    )
}

fn issuance_input(nonce: Vec<u8>, amount: u64) -> TxInput {
    TxInput::new_issuance(
        nonce,
        amount,
        vec![],
        Hash::new([7; 32]),
        vec![OP_TRUE],
        vec![],
        b"{}".to_vec(),
    )
}

fn output(asset_id: AssetId, amount: u64) -> TxOutput {
    TxOutput::new(asset_id, amount, vec![OP_TRUE], vec![])
}

fn mux_of(tx: &Tx) -> (&Hash, &Mux) {
    tx.entries
        .iter()
        .find_map(|(id, e)| match e {
            Entry::Mux(m) => Some((id, m)),
            _ => None,
        })
        .expect("mux present")
}

// ========== Test Group 1: Fixed Vectors ==========

#[test]
fn test_empty_tx_id() {
    let tx = TxData {
        version: 1,
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    assert_eq!(mapped.id.to_hex(), EMPTY_TX_ID);
    assert_eq!(tx.hash().unwrap(), mapped.id);
    // header and mux only
    assert_eq!(mapped.entries.len(), 2);
}

#[test]
fn test_mapping_is_deterministic() {
    let tx = TxData {
        version: 1,
        inputs: vec![spend_input(10)],
        outputs: vec![output(AssetId::new([2; 32]), 10)],
        ..Default::default()
    };
    assert_eq!(map_tx(&tx).unwrap(), map_tx(&tx).unwrap());
}

// ========== Test Group 2: Spends ==========

#[test]
fn test_spend_wiring() {
    let tx = TxData {
        version: 1,
        inputs: vec![spend_input(10)],
        outputs: vec![output(AssetId::new([2; 32]), 10)],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    let (mux_id, mux) = mux_of(&mapped);

    let spend_id = mapped.input_ids[0];
    let spend = mapped.spend(&spend_id).unwrap();
    let dest = spend.witness_destination.expect("destination set");
    assert_eq!(dest.ref_id, *mux_id);
    assert_eq!(dest.position, 0);
    assert_eq!(mux.sources[0].ref_id, spend_id);

    let Some(TypedInput::Spend(si)) = &tx.inputs[0].typed_input else {
        panic!("spend input");
    };
    assert_eq!(mapped.spent_output_ids, vec![si.spent_output_id().unwrap()]);
    let prevout = mapped.output(&spend.spent_output_id).unwrap();
    assert_eq!(prevout.source.value.amount, 10);

    let out_id = mapped.header.result_ids[0];
    assert_eq!(mapped.output_ids, vec![out_id]);
    assert_eq!(mux.witness_destinations[0].ref_id, out_id);
    let out = mapped.output(&out_id).unwrap();
    assert_eq!(out.source.ref_id, *mux_id);
    assert_eq!(out.source.position, 0);
}

#[test]
fn test_witness_arguments_do_not_change_tx_id() {
    let mut tx = TxData {
        version: 1,
        inputs: vec![spend_input(10)],
        outputs: vec![output(AssetId::new([2; 32]), 10)],
        ..Default::default()
    };
    let before = tx.hash().unwrap();
    tx.inputs[0].set_arguments(vec![vec![1; 64]]);
    assert_eq!(tx.hash().unwrap(), before);
    tx.reference_data = b"memo".to_vec();
    assert_ne!(tx.hash().unwrap(), before);
}

// ========== Test Group 3: Issuances ==========

#[test]
fn test_issuance_with_nonce() {
    let tx = TxData {
        version: 1,
        inputs: vec![issuance_input(vec![1, 2, 3], 5)],
        min_time_ms: 10,
        max_time_ms: 20,
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    let iss_id = mapped.input_ids[0];
    let iss = mapped.issuance(&iss_id).unwrap();

    assert_eq!(mapped.nonce_ids, vec![iss.anchor_id]);
    let nonce = mapped.nonce(&iss.anchor_id).unwrap();
    assert_eq!(nonce.witness_anchored_id, Some(iss_id));
    assert_eq!(
        nonce.program.code,
        nonce_program(&[1, 2, 3], iss.value.asset_id.as_bytes())
    );

    let tr = mapped.time_range(&nonce.time_range_id).unwrap();
    assert_eq!((tr.min_time_ms, tr.max_time_ms), (10, 20));

    let Some(TypedInput::Issuance(ii)) = &tx.inputs[0].typed_input else {
        panic!("issuance input");
    };
    assert_eq!(iss.value.asset_id, ii.asset_id().unwrap());
    assert_eq!(
        iss.witness_asset_definition.data,
        hash_data(&ii.asset_definition)
    );
}

#[test]
fn test_issuance_without_nonce_anchors_on_first_spend() {
    let tx = TxData {
        version: 1,
        inputs: vec![spend_input(10), issuance_input(vec![], 5)],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    let spend_id = mapped.input_ids[0];
    let iss_id = mapped.input_ids[1];
    let iss = mapped.issuance(&iss_id).unwrap();
    assert_eq!(iss.anchor_id, spend_id);
    assert_eq!(
        mapped.spend(&spend_id).unwrap().witness_anchored_id,
        Some(iss_id)
    );
    assert!(mapped.nonce_ids.is_empty());
}

#[test]
fn test_issuance_without_nonce_or_spend_fails() {
    let tx = TxData {
        version: 1,
        inputs: vec![issuance_input(vec![], 5)],
        ..Default::default()
    };
    assert_eq!(
        map_tx(&tx),
        Err(LegacyError::MissingAnchor { input_index: 0 })
    );
}

#[test]
fn test_mux_sources_follow_input_order() {
    let tx = TxData {
        version: 1,
        inputs: vec![issuance_input(vec![1], 5), spend_input(10)],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    let (mux_id, mux) = mux_of(&mapped);
    assert_eq!(mux.sources.len(), 2);
    assert_eq!(mux.sources[0].ref_id, mapped.input_ids[0]);
    assert_eq!(mux.sources[1].ref_id, mapped.input_ids[1]);

    let spend = mapped.spend(&mapped.input_ids[1]).unwrap();
    assert_eq!(
        spend.witness_destination,
        Some(ValueDestination {
            ref_id: *mux_id,
            value: mux.sources[1].value,
            position: 1,
        })
    );
}

// ========== Test Group 4: Results ==========

#[test]
fn test_unspendable_output_becomes_retirement() {
    let asset = AssetId::new([2; 32]);
    let tx = TxData {
        version: 1,
        inputs: vec![spend_input(10)],
        outputs: vec![
            TxOutput::new(asset, 4, vec![OP_FAIL], vec![]),
            output(asset, 6),
        ],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    let retired = mapped.retirement(&mapped.header.result_ids[0]).unwrap();
    assert_eq!(retired.source.position, 0);
    assert_eq!(retired.ordinal, 0);
    assert_eq!(mapped.output_ids, vec![mapped.header.result_ids[1]]);
}

#[test]
fn test_unknown_asset_version_input_is_skipped() {
    let tx = TxData {
        version: 1,
        inputs: vec![
            TxInput {
                asset_version: 2,
                ..Default::default()
            },
            spend_input(10),
        ],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();
    assert_eq!(mapped.input_ids.len(), 1);
    let spend = mapped.spend(&mapped.input_ids[0]).unwrap();
    assert_eq!(spend.ordinal, 1);
    assert_eq!(spend.witness_destination.map(|d| d.position), Some(0));
}

#[test]
fn test_sig_hash_indexes_understood_inputs() {
    let tx = TxData {
        version: 1,
        inputs: vec![
            TxInput {
                asset_version: 2,
                ..Default::default()
            },
            spend_input(10),
        ],
        ..Default::default()
    };
    let mapped = map_tx(&tx).unwrap();

    let mut message = mapped.input_ids[0].as_bytes().to_vec();
    message.extend_from_slice(mapped.id.as_bytes());
    assert_eq!(mapped.sig_hash(0).unwrap(), shared_types::sha3_256(&message));
    assert_eq!(
        mapped.sig_hash(1),
        Err(ec_01_entries::EntryError::InputIndex { index: 1, count: 1 })
    );
}

// ========== Test Group 5: Blocks ==========

#[test]
fn test_map_block() {
    let header = BlockHeader {
        version: 1,
        height: 1,
        timestamp_ms: 1000,
        commitment: BlockCommitment {
            consensus_program: vec![OP_TRUE],
            ..Default::default()
        },
        witness: BlockWitness {
            witness: vec![vec![1]],
        },
        ..Default::default()
    };
    let block = Block {
        header: header.clone(),
        transactions: vec![TxData {
            version: 1,
            ..Default::default()
        }],
    };
    let mapped = map_block(&block).unwrap();
    assert_eq!(mapped.id, header.hash().unwrap());
    assert_eq!(mapped.header.next_consensus_program, vec![OP_TRUE]);
    assert_eq!(mapped.header.witness_arguments, vec![vec![1]]);
    assert_eq!(mapped.transactions[0].id.to_hex(), EMPTY_TX_ID);
}
