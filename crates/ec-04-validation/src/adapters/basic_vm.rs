//! # Basic VM
//!
//! A `ProgramVerifier` for the small program subset this workspace
//! produces itself: trivially-true programs, nonce programs and data
//! pushes. Anything else is `VmError::UnsupportedOp`. Plug a full VM in
//! through the same port for production use.

use ec_01_entries::program::*;
use shared_types::Reader;

use crate::domain::{VmContext, VmError};
use crate::ports::ProgramVerifier;

/// Stack machine over the opcodes in `ec_01_entries::program`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicVm;

impl BasicVm {
    pub fn new() -> Self {
        Self
    }
}

impl ProgramVerifier for BasicVm {
    fn verify(&self, context: &VmContext<'_>) -> Result<(), VmError> {
        if context.vm_version != DEFAULT_VM_VERSION {
            return Err(VmError::UnsupportedVm(context.vm_version));
        }

        let mut stack: Vec<Vec<u8>> = context.arguments.to_vec();
        let mut code = Reader::new(context.code);
        let truncated = |e: shared_types::EncodingError| VmError::Failed(e.to_string());

        while !code.is_empty() {
            let op = code.read_byte().map_err(truncated)?;
            match op {
                OP_0 => stack.push(Vec::new()),
                OP_DATA_1..=OP_DATA_75 => {
                    let n = usize::from(op - OP_DATA_1) + 1;
                    stack.push(code.read_bytes(n).map_err(truncated)?.to_vec());
                }
                OP_PUSHDATA1 => {
                    let n = usize::from(code.read_byte().map_err(truncated)?);
                    stack.push(code.read_bytes(n).map_err(truncated)?.to_vec());
                }
                OP_PUSHDATA2 => {
                    let len = code.read_array::<2>().map_err(truncated)?;
                    let n = usize::from(u16::from_le_bytes(len));
                    stack.push(code.read_bytes(n).map_err(truncated)?.to_vec());
                }
                OP_PUSHDATA4 => {
                    let n = code.read_u32_le().map_err(truncated)? as usize;
                    stack.push(code.read_bytes(n).map_err(truncated)?.to_vec());
                }
                OP_1 => stack.push(vec![1]),
                OP_FAIL => return Err(VmError::Failed("OP_FAIL".to_string())),
                OP_DROP => {
                    pop(&mut stack)?;
                }
                OP_EQUAL => {
                    let a = pop(&mut stack)?;
                    let b = pop(&mut stack)?;
                    stack.push(if a == b { vec![1] } else { Vec::new() });
                }
                OP_ASSET => {
                    let asset_id = context.asset_id.ok_or(VmError::Context)?;
                    stack.push(asset_id.to_vec());
                }
                other => return Err(VmError::UnsupportedOp(other)),
            }
        }

        match stack.last() {
            Some(top) if top.iter().any(|b| *b != 0) => Ok(()),
            _ => Err(VmError::FalseResult),
        }
    }
}

fn pop(stack: &mut Vec<Vec<u8>>) -> Result<Vec<u8>, VmError> {
    stack
        .pop()
        .ok_or_else(|| VmError::Failed("stack underflow".to_string()))
}
