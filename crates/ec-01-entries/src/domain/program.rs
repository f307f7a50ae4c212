//! # Programs
//!
//! The handful of opcodes the entry mapper emits, and a builder for
//! assembling bytecode from them. Executing programs is the VM's job; see the
//! validation crate's `ProgramVerifier` port.

pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_FAIL: u8 = 0x6a;
pub const OP_DROP: u8 = 0x75;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_ASSET: u8 = 0xc2;

/// VM version of every program the mapper synthesizes.
pub const DEFAULT_VM_VERSION: u64 = 1;

/// Encode a data push.
pub fn pushdata_bytes(data: &[u8]) -> Vec<u8> {
    let len = data.len();
    let mut out = Vec::with_capacity(len + 5);
    match len {
        0 => out.push(OP_0),
        1..=75 => out.push(OP_DATA_1 + (len as u8) - 1),
        76..=0xff => {
            out.push(OP_PUSHDATA1);
            out.push(len as u8);
        }
        0x100..=0xffff => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(len as u16).to_le_bytes());
        }
        _ => {
            out.push(OP_PUSHDATA4);
            out.extend_from_slice(&(len as u32).to_le_bytes());
        }
    }
    out.extend_from_slice(data);
    out
}

/// Whether a control program can never be satisfied.
///
/// Outputs locked by such programs are mapped to retirements.
pub fn is_unspendable(program: &[u8]) -> bool {
    program.first() == Some(&OP_FAIL)
}

/// Bytecode assembler.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    code: Vec<u8>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_op(mut self, op: u8) -> Self {
        self.code.push(op);
        self
    }

    pub fn add_data(mut self, data: &[u8]) -> Self {
        self.code.extend(pushdata_bytes(data));
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.code
    }
}

/// `PUSH(nonce) DROP ASSET PUSH(asset_id) EQUAL`
///
/// Satisfied only inside a transaction that issues `asset_id`.
pub fn nonce_program(nonce: &[u8], asset_id: &[u8]) -> Vec<u8> {
    ProgramBuilder::new()
        .add_data(nonce)
        .add_op(OP_DROP)
        .add_op(OP_ASSET)
        .add_data(asset_id)
        .add_op(OP_EQUAL)
        .build()
}
