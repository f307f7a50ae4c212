//! # Transaction Outputs
//!
//! ```text
//! TxOutput = varint63 asset_version
//!            extensible(asset_id varint63(amount) varint63(vm_version)
//!                       varstr(control_program))       fields only at v1
//!            reference data
//!            extensible(<empty>)                        if SER_WITNESS
//! ```

use ec_01_entries::AssetAmount;
use serde::{Deserialize, Serialize};
use shared_types::encoding::{write_extensible_string, write_varint63, write_varstr31};
use shared_types::{AssetId, ByteSink, Reader};

use super::errors::{LegacyError, LegacyResult};
use super::tx_data::{read_ref_data, write_ref_data};
use super::value_objects::*;

/// What an output commits to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCommitment {
    pub asset_amount: AssetAmount,
    pub vm_version: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub control_program: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_version: u64,
    pub commitment: OutputCommitment,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub commitment_suffix: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub reference_data: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub witness_suffix: Vec<u8>,
}

impl TxOutput {
    /// A version-1 output.
    pub fn new(
        asset_id: AssetId,
        amount: u64,
        control_program: Vec<u8>,
        reference_data: Vec<u8>,
    ) -> Self {
        Self {
            asset_version: ASSET_VERSION_1,
            commitment: OutputCommitment {
                asset_amount: AssetAmount::new(asset_id, amount),
                vm_version: 1,
                control_program,
            },
            commitment_suffix: Vec::new(),
            reference_data,
            witness_suffix: Vec::new(),
        }
    }

    pub fn asset_amount(&self) -> AssetAmount {
        self.commitment.asset_amount
    }

    pub fn control_program(&self) -> &[u8] {
        &self.commitment.control_program
    }

    pub(crate) fn write_to<W: ByteSink + ?Sized>(
        &self,
        w: &mut W,
        serflags: u8,
    ) -> LegacyResult<()> {
        write_varint63(w, self.asset_version)?;
        write_extensible_string(w, &self.commitment_suffix, |w| {
            if self.asset_version == ASSET_VERSION_1 {
                let c = &self.commitment;
                c.asset_amount.asset_id.write_to(w);
                write_varint63(w, c.asset_amount.amount)?;
                write_varint63(w, c.vm_version)?;
                write_varstr31(w, &c.control_program)?;
            }
            Ok::<_, LegacyError>(())
        })?;
        write_ref_data(w, &self.reference_data, serflags)?;
        if serflags & SER_WITNESS != 0 {
            write_extensible_string(w, &self.witness_suffix, |_| Ok::<_, LegacyError>(()))?;
        }
        Ok(())
    }

    pub(crate) fn read_from(r: &mut Reader<'_>, limits: &DecodeLimits) -> LegacyResult<Self> {
        let asset_version = r.read_varint63()?.0;
        let mut commitment = OutputCommitment::default();
        let commitment_suffix = r.read_extensible_string(|r| {
            if asset_version != ASSET_VERSION_1 {
                return Ok(());
            }
            commitment.asset_amount.asset_id = AssetId::read_from(r)?;
            commitment.asset_amount.amount = r.read_varint63()?.0;
            commitment.vm_version = r.read_varint63()?.0;
            commitment.control_program = r.read_varstr31()?;
            limits.check_len("control program", &commitment.control_program)?;
            Ok::<_, LegacyError>(())
        })?;
        let reference_data = read_ref_data(r, limits, "output reference data")?;
        let witness_suffix = r.read_extensible_string(|_| Ok::<_, LegacyError>(()))?;
        Ok(Self {
            asset_version,
            commitment,
            commitment_suffix,
            reference_data,
            witness_suffix,
        })
    }
}
