use super::*;
use ec_01_entries::program::{OP_FAIL, OP_TRUE};
use ec_01_entries::BlockHeaderEntry;
use ec_02_legacy::{map_tx, TxData, TxInput, TxOutput};
use shared_types::AssetId;

fn issue(nonce: &[u8], amount: u64, max_time_ms: u64) -> Tx {
    let input = TxInput::new_issuance(
        nonce.to_vec(),
        amount,
        vec![],
        Hash::new([7; 32]),
        vec![OP_TRUE],
        vec![],
        b"{}".to_vec(),
    );
    let data = TxData {
        version: 1,
        outputs: vec![TxOutput::new(AssetId::new([5; 32]), amount, vec![OP_TRUE], vec![])],
        inputs: vec![input],
        min_time_ms: 1,
        max_time_ms,
        ..Default::default()
    };
    map_tx(&data).unwrap()
}

fn spend_of(source: Hash, amount: u64, outputs: Vec<TxOutput>) -> Tx {
    let data = TxData {
        version: 1,
        inputs: vec![TxInput::new_spend(
            vec![],
            source,
            AssetId::new([5; 32]),
            amount,
            0,
            vec![OP_TRUE],
            Hash::ZERO,
            vec![],
        )],
        outputs,
        ..Default::default()
    };
    map_tx(&data).unwrap()
}

fn block_of(timestamp_ms: u64, transactions: Vec<Tx>) -> Block {
    let header = BlockHeaderEntry {
        version: 1,
        height: 2,
        timestamp_ms,
        ..Default::default()
    };
    Block::new(header, transactions).unwrap()
}

// ========== Test Group 1: Issuance and Nonces ==========

#[test]
fn test_issuance_adds_outputs_and_nonce() {
    let tx = issue(b"n1", 10, 100);
    let mut snapshot = Snapshot::new();
    snapshot.apply_tx(&tx).unwrap();

    assert!(snapshot.contains_output(&tx.output_ids[0]));
    assert_eq!(snapshot.nonces.get(&tx.nonce_ids[0]), Some(&100));

    let mut expected = Tree::new();
    expected
        .insert(tx.output_ids[0].as_bytes(), tx.output_ids[0])
        .unwrap();
    assert_eq!(snapshot.assets_root(), expected.root_hash());
}

#[test]
fn test_nonce_replay_rejected() {
    let tx = issue(b"n1", 10, 100);
    let mut snapshot = Snapshot::new();
    snapshot.apply_tx(&tx).unwrap();
    let before = snapshot.clone();

    assert_eq!(
        snapshot.apply_tx(&tx),
        Err(PatriciaError::NonceConflict {
            nonce_id: tx.nonce_ids[0]
        })
    );
    assert_eq!(snapshot, before);
}

#[test]
fn test_prune_nonces_after_expiry() {
    let mut snapshot = Snapshot::new();
    snapshot.apply_tx(&issue(b"a", 1, 100)).unwrap();
    snapshot.apply_tx(&issue(b"b", 1, 200)).unwrap();

    snapshot.prune_nonces(100);
    assert_eq!(snapshot.nonces.len(), 2);
    snapshot.prune_nonces(101);
    assert_eq!(snapshot.nonces.len(), 1);
    assert!(snapshot.nonces.values().all(|&expiry| expiry == 200));
}

// ========== Test Group 2: Spends ==========

#[test]
fn test_spend_requires_known_output() {
    let tx = spend_of(Hash::new([1; 32]), 10, vec![]);
    let mut snapshot = Snapshot::new();
    assert_eq!(
        snapshot.apply_tx(&tx),
        Err(PatriciaError::MissingSpentOutput {
            output_id: tx.spent_output_ids[0]
        })
    );
    assert!(snapshot.tree.is_empty());
}

#[test]
fn test_spend_moves_value() {
    let asset = AssetId::new([5; 32]);
    let tx = spend_of(
        Hash::new([1; 32]),
        10,
        vec![TxOutput::new(asset, 10, vec![OP_TRUE], vec![])],
    );
    let spent = tx.spent_output_ids[0];

    let mut snapshot = Snapshot::new();
    snapshot.tree.insert(spent.as_bytes(), spent).unwrap();
    snapshot.apply_tx(&tx).unwrap();

    assert!(!snapshot.contains_output(&spent));
    assert!(snapshot.contains_output(&tx.output_ids[0]));
    assert_eq!(snapshot.tree.len(), 1);
}

#[test]
fn test_retirements_are_not_stored() {
    let asset = AssetId::new([5; 32]);
    let tx = spend_of(
        Hash::new([1; 32]),
        10,
        vec![TxOutput::new(asset, 10, vec![OP_FAIL], vec![])],
    );
    let spent = tx.spent_output_ids[0];

    let mut snapshot = Snapshot::new();
    snapshot.tree.insert(spent.as_bytes(), spent).unwrap();
    snapshot.apply_tx(&tx).unwrap();
    assert!(snapshot.tree.is_empty());
    assert_eq!(snapshot.assets_root(), Hash::ZERO);
}

// ========== Test Group 3: Blocks ==========

#[test]
fn test_apply_block_prunes_then_applies() {
    let mut snapshot = Snapshot::new();
    let first = issue(b"n", 10, 100);
    snapshot.apply_tx(&first).unwrap();

    // Same nonce again, but the window has closed by the block's timestamp.
    let block = block_of(500, vec![issue(b"n", 10, 100)]);
    snapshot.apply_block(&block).unwrap();
    assert_eq!(snapshot.nonces.len(), 1);
}

#[test]
fn test_apply_block_is_all_or_nothing() {
    let mut snapshot = Snapshot::new();
    let good = issue(b"x", 3, 1000);
    let bad = spend_of(Hash::new([9; 32]), 1, vec![]);
    let before = snapshot.clone();

    let result = snapshot.apply_block(&block_of(10, vec![good, bad]));
    assert!(matches!(result, Err(PatriciaError::MissingSpentOutput { .. })));
    assert_eq!(snapshot, before);
}
