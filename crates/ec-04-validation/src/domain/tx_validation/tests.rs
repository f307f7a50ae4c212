use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::adapters::BasicVm;
use crate::domain::VmError;
use ec_01_entries::program::{OP_FAIL, OP_FALSE, OP_TRUE};
use ec_01_entries::value_objects::{TYPE_MUX, TYPE_OUTPUT};
use ec_01_entries::{AssetAmount, EntryError};
use ec_02_legacy::{map_tx, TxData, TxInput, TxOutput, TypedInput};

const CHAIN: Hash = Hash::new([7; 32]);
const ASSET: AssetId = AssetId::new([5; 32]);
const MAX_AMOUNT: u64 = (1 << 63) - 1;

fn spend(amount: u64, control_program: Vec<u8>) -> TxInput {
    TxInput::new_spend(
        vec![],
        Hash::new([1; 32]),
        ASSET,
        amount,
        0,
        control_program,
        Hash::ZERO,
        vec![],
    )
}

fn issuance(nonce: &[u8], amount: u64) -> TxInput {
    TxInput::new_issuance(
        nonce.to_vec(),
        amount,
        vec![],
        CHAIN,
        vec![OP_TRUE],
        vec![],
        b"{\"name\":\"test\"}".to_vec(),
    )
}

fn issued_asset(input: &TxInput) -> AssetId {
    match &input.typed_input {
        Some(TypedInput::Issuance(ii)) => ii.asset_id().unwrap(),
        _ => panic!("issuance input"),
    }
}

fn output(asset_id: AssetId, amount: u64) -> TxOutput {
    TxOutput::new(asset_id, amount, vec![OP_TRUE], vec![])
}

fn tx_of(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Tx {
    map_tx(&TxData {
        version: 1,
        inputs,
        outputs,
        min_time_ms: 1,
        max_time_ms: 1000,
        ..Default::default()
    })
    .unwrap()
}

/// Spend 10 into an output of 6 and a retirement of 4.
fn spend_tx() -> Tx {
    tx_of(
        vec![spend(10, vec![OP_TRUE])],
        vec![
            output(ASSET, 6),
            TxOutput::new(ASSET, 4, vec![OP_FAIL], vec![]),
        ],
    )
}

fn validate(tx: &Tx) -> ValidationResult<()> {
    validate_tx(tx, &CHAIN, &BasicVm)
}

fn root_of(tx: &Tx) -> ValidationError {
    validate(tx).unwrap_err().root().clone()
}

fn mux_id(tx: &Tx) -> Hash {
    tx.entries
        .iter()
        .find_map(|(id, e)| matches!(e, Entry::Mux(_)).then_some(*id))
        .unwrap()
}

fn tamper(tx: &mut Tx, id: &Hash, f: impl FnOnce(&mut Entry)) {
    f(tx.entries.get_mut(id).unwrap());
}

// ========== Test Group 1: Valid Transactions ==========

#[test]
fn test_spend_tx_is_valid() {
    assert_eq!(validate(&spend_tx()), Ok(()));
}

#[test]
fn test_nonce_issuance_is_valid() {
    let input = issuance(b"nonce-1", 50);
    let asset = issued_asset(&input);
    let tx = tx_of(vec![input], vec![output(asset, 50)]);
    assert_eq!(validate(&tx), Ok(()));
}

#[test]
fn test_spend_anchored_issuance_is_valid() {
    let input = issuance(b"", 3);
    let asset = issued_asset(&input);
    let tx = tx_of(
        vec![spend(10, vec![OP_TRUE]), input],
        vec![output(ASSET, 10), output(asset, 3)],
    );
    assert_eq!(validate(&tx), Ok(()));
}

#[test]
fn test_shared_mux_verified_once() {
    struct Counting(AtomicUsize);
    impl ProgramVerifier for Counting {
        fn verify(&self, context: &VmContext<'_>) -> Result<(), VmError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            BasicVm.verify(context)
        }
    }

    let tx = tx_of(
        vec![spend(10, vec![OP_TRUE])],
        vec![output(ASSET, 4), output(ASSET, 3), output(ASSET, 3)],
    );
    let counting = Counting(AtomicUsize::new(0));
    validate_tx(&tx, &CHAIN, &counting).unwrap();
    // one mux program, one control program
    assert_eq!(counting.0.load(Ordering::SeqCst), 2);
}

// ========== Test Group 2: Balance ==========

#[test]
fn test_unbalanced_by_one() {
    let tx = tx_of(vec![spend(10, vec![OP_TRUE])], vec![output(ASSET, 9)]);
    assert_eq!(
        root_of(&tx),
        ValidationError::Unbalanced {
            asset_id: ASSET,
            sources: 10,
            destinations: 9,
        }
    );
}

#[test]
fn test_destination_without_source() {
    let other = AssetId::new([6; 32]);
    let tx = tx_of(
        vec![spend(10, vec![OP_TRUE])],
        vec![output(ASSET, 10), output(other, 1)],
    );
    assert_eq!(root_of(&tx), ValidationError::NoSource { asset_id: other });
}

#[test]
fn test_source_sum_overflow() {
    let tx = tx_of(
        vec![
            spend(MAX_AMOUNT, vec![OP_TRUE]),
            spend(MAX_AMOUNT, vec![OP_TRUE, OP_TRUE]),
            spend(2, vec![OP_TRUE, OP_TRUE, OP_TRUE]),
        ],
        vec![output(ASSET, 1)],
    );
    assert_eq!(root_of(&tx), ValidationError::Overflow { asset_id: ASSET });
}

#[test]
fn test_balance_overflow_at_u64_max() {
    let source = |amount| ValueSource {
        ref_id: Hash::ZERO,
        value: AssetAmount::new(ASSET, amount),
        position: 0,
    };
    let mux = Mux {
        sources: vec![source(u64::MAX), source(1)],
        ..Default::default()
    };
    assert_eq!(
        check_balance(&mux),
        Err(ValidationError::Overflow { asset_id: ASSET })
    );

    let dest = |amount| ValueDestination {
        ref_id: Hash::ZERO,
        value: AssetAmount::new(ASSET, amount),
        position: 0,
    };
    let mux = Mux {
        sources: vec![source(u64::MAX)],
        witness_destinations: vec![dest(u64::MAX), dest(1)],
        ..Default::default()
    };
    assert_eq!(
        check_balance(&mux),
        Err(ValidationError::Overflow { asset_id: ASSET })
    );
}

// ========== Test Group 3: Time Ranges ==========

fn nonce_tx() -> (Tx, Hash) {
    let input = issuance(b"n", 5);
    let asset = issued_asset(&input);
    let tx = tx_of(vec![input], vec![output(asset, 5)]);
    let nonce = tx.nonce(&tx.nonce_ids[0]).unwrap();
    let tr_id = nonce.time_range_id;
    (tx, tr_id)
}

#[test]
fn test_time_range_min_after_max() {
    let (mut tx, tr_id) = nonce_tx();
    tamper(&mut tx, &tr_id, |e| {
        if let Entry::TimeRange(tr) = e {
            tr.min_time_ms = 500;
            tr.max_time_ms = 400;
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::BadTimeRange {
            min_time_ms: 500,
            max_time_ms: 400
        }
    );
}

#[test]
fn test_time_range_outside_tx_bounds() {
    let (mut tx, tr_id) = nonce_tx();
    tamper(&mut tx, &tr_id, |e| {
        if let Entry::TimeRange(tr) = e {
            tr.max_time_ms = 2000;
        }
    });
    assert!(matches!(root_of(&tx), ValidationError::BadTimeRange { .. }));

    let (mut tx, tr_id) = nonce_tx();
    tamper(&mut tx, &tr_id, |e| {
        if let Entry::TimeRange(tr) = e {
            tr.min_time_ms = 0;
            tr.max_time_ms = 0;
        }
    });
    assert_eq!(root_of(&tx), ValidationError::ZeroTime);
}

#[test]
fn test_nonce_without_tx_times_is_zero_time() {
    let input = issuance(b"n", 5);
    let asset = issued_asset(&input);
    let tx = map_tx(&TxData {
        version: 1,
        inputs: vec![input],
        outputs: vec![output(asset, 5)],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(root_of(&tx), ValidationError::ZeroTime);
}

#[test]
fn test_header_time_range() {
    let tx = map_tx(&TxData {
        version: 1,
        inputs: vec![spend(1, vec![OP_TRUE])],
        outputs: vec![output(ASSET, 1)],
        min_time_ms: 10,
        max_time_ms: 5,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        root_of(&tx),
        ValidationError::BadTimeRange {
            min_time_ms: 10,
            max_time_ms: 5
        }
    );
}

// ========== Test Group 4: Wiring ==========

#[test]
fn test_mismatched_destination_position() {
    let mut tx = spend_tx();
    let mux = mux_id(&tx);
    tamper(&mut tx, &mux, |e| {
        if let Entry::Mux(m) = e {
            m.witness_destinations.swap(0, 1);
        }
    });
    assert!(matches!(
        root_of(&tx),
        ValidationError::MismatchedPosition { .. }
    ));
}

#[test]
fn test_mismatched_reference() {
    let mut tx = spend_tx();
    let spend_id = tx.input_ids[0];
    let out_id = tx.output_ids[0];
    tamper(&mut tx, &spend_id, |e| {
        if let Entry::Spend(s) = e {
            if let Some(dest) = s.witness_destination.as_mut() {
                dest.ref_id = out_id;
            }
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::MismatchedReference {
            expected: spend_id,
            actual: mux_id(&tx),
        }
    );
}

#[test]
fn test_mismatched_value() {
    let mut tx = spend_tx();
    let mux = mux_id(&tx);
    tamper(&mut tx, &mux, |e| {
        if let Entry::Mux(m) = e {
            m.witness_destinations[0].value.amount = 7;
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::MismatchedValue {
            expected: AssetAmount::new(ASSET, 7),
            actual: AssetAmount::new(ASSET, 6),
        }
    );
}

#[test]
fn test_destination_position_out_of_range() {
    let mut tx = spend_tx();
    let spend_id = tx.input_ids[0];
    tamper(&mut tx, &spend_id, |e| {
        if let Entry::Spend(s) = e {
            if let Some(dest) = s.witness_destination.as_mut() {
                dest.position = 7;
            }
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::Position {
            position: 7,
            count: 1
        }
    );
}

#[test]
fn test_missing_destination() {
    let mut tx = spend_tx();
    let spend_id = tx.input_ids[0];
    tamper(&mut tx, &spend_id, |e| {
        if let Entry::Spend(s) = e {
            s.witness_destination = None;
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::MissingField {
            entry_id: spend_id,
            field: "destination"
        }
    );
}

#[test]
fn test_spent_output_of_wrong_type() {
    let mut tx = spend_tx();
    let spend_id = tx.input_ids[0];
    let mux = mux_id(&tx);
    tamper(&mut tx, &spend_id, |e| {
        if let Entry::Spend(s) = e {
            s.spent_output_id = mux;
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::Entry(EntryError::EntryType {
            id: mux,
            expected: TYPE_OUTPUT,
            actual: TYPE_MUX,
        })
    );
}

#[test]
fn test_self_anchored_issuance_is_a_cycle() {
    let input = issuance(b"n", 5);
    let asset = issued_asset(&input);
    let mut tx = tx_of(vec![input], vec![output(asset, 5)]);
    let iss_id = tx.input_ids[0];
    tamper(&mut tx, &iss_id, |e| {
        if let Entry::Issuance(i) = e {
            i.anchor_id = iss_id;
        }
    });
    assert_eq!(root_of(&tx), ValidationError::Cycle { entry_id: iss_id });
}

#[test]
fn test_second_issuance_on_same_spend_anchor_rejected() {
    let first = issuance(b"", 1);
    let second = TxInput::new_issuance(
        vec![],
        2,
        vec![],
        CHAIN,
        vec![OP_TRUE],
        vec![],
        b"other".to_vec(),
    );
    let (a, b) = (issued_asset(&first), issued_asset(&second));
    let tx = tx_of(
        vec![spend(10, vec![OP_TRUE]), first, second],
        vec![output(ASSET, 10), output(a, 1), output(b, 2)],
    );
    assert!(matches!(
        root_of(&tx),
        ValidationError::MismatchedReference { .. }
    ));
}

// ========== Test Group 5: Versioning ==========

#[test]
fn test_empty_results_at_v1() {
    let tx = tx_of(vec![spend(10, vec![OP_TRUE])], vec![]);
    assert_eq!(root_of(&tx), ValidationError::EmptyResults);
}

#[test]
fn test_ext_hash_only_checked_at_v1() {
    let mut tx = spend_tx();
    let out_id = tx.output_ids[0];
    tamper(&mut tx, &out_id, |e| {
        if let Entry::Output(o) = e {
            o.ext_hash = Hash::new([1; 32]);
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::NonemptyExtHash { entry_id: out_id }
    );

    tx.header.version = 2;
    assert_eq!(validate(&tx), Ok(()));
}

#[test]
fn test_v0_follows_v1_rules() {
    let mut empty = tx_of(vec![spend(10, vec![OP_TRUE])], vec![]);
    empty.header.version = 0;
    assert_eq!(root_of(&empty), ValidationError::EmptyResults);

    let mut tx = spend_tx();
    tx.header.version = 0;
    assert_eq!(validate(&tx), Ok(()));
    let out_id = tx.output_ids[0];
    tamper(&mut tx, &out_id, |e| {
        if let Entry::Output(o) = e {
            o.ext_hash = Hash::new([1; 32]);
        }
    });
    assert_eq!(
        root_of(&tx),
        ValidationError::NonemptyExtHash { entry_id: out_id }
    );
}

// ========== Test Group 6: Issuance Rules ==========

#[test]
fn test_mismatched_asset_id() {
    let input = issuance(b"n", 5);
    let asset = issued_asset(&input);
    let mut tx = tx_of(vec![input], vec![output(asset, 5)]);
    let iss_id = tx.input_ids[0];
    tamper(&mut tx, &iss_id, |e| {
        if let Entry::Issuance(i) = e {
            i.witness_asset_definition.data = Hash::new([9; 32]);
        }
    });
    assert!(matches!(
        root_of(&tx),
        ValidationError::MismatchedAssetId { declared, .. } if declared == asset
    ));
}

#[test]
fn test_wrong_blockchain() {
    let input = issuance(b"n", 5);
    let asset = issued_asset(&input);
    let tx = tx_of(vec![input], vec![output(asset, 5)]);
    let other_chain = Hash::new([8; 32]);
    let err = validate_tx(&tx, &other_chain, &BasicVm).unwrap_err();
    assert_eq!(
        err.root(),
        &ValidationError::WrongBlockchain {
            expected: other_chain,
            actual: CHAIN,
        }
    );
}

#[test]
fn test_false_control_program() {
    let tx = tx_of(vec![spend(10, vec![OP_FALSE])], vec![output(ASSET, 10)]);
    let err = validate(&tx).unwrap_err();
    assert_eq!(err.root(), &ValidationError::Vm(VmError::FalseResult));
    assert!(err.to_string().contains("checking control program"));
}
