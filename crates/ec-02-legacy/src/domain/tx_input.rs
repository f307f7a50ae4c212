//! # Transaction Inputs
//!
//! ```text
//! TxInput   = varint63 asset_version
//!             extensible(commitment)
//!             reference data
//!             extensible(witness)              if SER_WITNESS
//!
//! commitment (asset version 1)
//!   issuance: 0x00 varstr(nonce) asset_id varint63(amount)
//!   spend:    0x01 extensible(SpendCommitment) if SER_PREVOUT
//!             0x01 SHA3(extensible(SpendCommitment)) otherwise
//!
//! witness (asset version 1)
//!   issuance: initial_block varstr(asset_definition) varint63(vm_version)
//!             varstr(issuance_program) varstr_list(arguments)
//!   spend:    varstr_list(arguments)
//! ```
//!
//! Inputs with any other asset version carry only their suffix bytes.

use ec_01_entries::{compute_asset_id, tagged_id, value_objects::TYPE_OUTPUT, AssetAmount};
use ec_01_entries::{Output, Program, ValueSource};
use serde::{Deserialize, Serialize};
use shared_types::encoding::{
    write_extensible_string, write_varint63, write_varstr31, write_varstr_list,
};
use shared_types::{AssetId, ByteSink, Hash, Reader, Sha3Hasher};

use super::errors::{LegacyError, LegacyResult};
use super::tx_data::{read_ref_data, write_ref_data};
use super::value_objects::*;

// =============================================================================
// SPEND COMMITMENT
// =============================================================================

/// The claimed contents of the output being spent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendCommitment {
    pub source_id: Hash,
    pub asset_amount: AssetAmount,
    pub source_position: u64,
    pub vm_version: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub control_program: Vec<u8>,
    pub ref_data_hash: Hash,
}

impl SpendCommitment {
    fn write_extensible<W: ByteSink + ?Sized>(
        &self,
        w: &mut W,
        suffix: &[u8],
        asset_version: u64,
    ) -> LegacyResult<()> {
        write_extensible_string(w, suffix, |w| {
            if asset_version == ASSET_VERSION_1 {
                self.source_id.write_to(w);
                self.asset_amount.asset_id.write_to(w);
                write_varint63(w, self.asset_amount.amount)?;
                write_varint63(w, self.source_position)?;
                write_varint63(w, self.vm_version)?;
                write_varstr31(w, &self.control_program)?;
                self.ref_data_hash.write_to(w);
            }
            Ok::<_, LegacyError>(())
        })?;
        Ok(())
    }

    /// Decode; returns the commitment and its suffix.
    fn read_extensible(
        r: &mut Reader<'_>,
        asset_version: u64,
        limits: &DecodeLimits,
    ) -> LegacyResult<(Self, Vec<u8>)> {
        let mut sc = SpendCommitment::default();
        let suffix = r.read_extensible_string(|r| {
            if asset_version != ASSET_VERSION_1 {
                return Ok(());
            }
            sc.source_id = Hash::read_from(r)?;
            sc.asset_amount.asset_id = AssetId::read_from(r)?;
            sc.asset_amount.amount = r.read_varint63()?.0;
            sc.source_position = r.read_varint63()?.0;
            sc.vm_version = r.read_varint63()?.0;
            sc.control_program = r.read_varstr31()?;
            limits.check_len("control program", &sc.control_program)?;
            sc.ref_data_hash = Hash::read_from(r)?;
            Ok::<_, LegacyError>(())
        })?;
        Ok((sc, suffix))
    }

    /// Hash of the extensible encoding, used when prevouts are not inlined.
    pub fn hash(&self, suffix: &[u8], asset_version: u64) -> LegacyResult<Hash> {
        let mut hasher = Sha3Hasher::new();
        self.write_extensible(&mut hasher, suffix, asset_version)?;
        Ok(hasher.finalize())
    }

    /// The prevout this commitment describes, as an output entry.
    pub fn prevout(&self) -> Output {
        Output {
            source: ValueSource {
                ref_id: self.source_id,
                value: self.asset_amount,
                position: self.source_position,
            },
            control_program: Program::new(self.vm_version, self.control_program.clone()),
            data: self.ref_data_hash,
            ext_hash: Hash::ZERO,
            ordinal: 0,
        }
    }
}

// =============================================================================
// TYPED INPUTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendInput {
    pub spend_commitment: SpendCommitment,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub spend_commitment_suffix: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub arguments: Vec<Vec<u8>>,
}

impl SpendInput {
    /// Entry ID of the output being spent.
    pub fn spent_output_id(&self) -> LegacyResult<Hash> {
        Ok(tagged_id(TYPE_OUTPUT, &self.spend_commitment.prevout())?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceInput {
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub nonce: Vec<u8>,
    pub amount: u64,

    // witness
    pub initial_block: Hash,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub asset_definition: Vec<u8>,
    pub vm_version: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub issuance_program: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub arguments: Vec<Vec<u8>>,
}

impl IssuanceInput {
    /// Asset ID implied by the witness fields.
    pub fn asset_id(&self) -> LegacyResult<AssetId> {
        Ok(compute_asset_id(
            &self.issuance_program,
            self.initial_block,
            self.vm_version,
            &self.asset_definition,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedInput {
    Issuance(IssuanceInput),
    Spend(SpendInput),
}

// =============================================================================
// TX INPUT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub asset_version: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub reference_data: Vec<u8>,
    /// `None` for asset versions this implementation does not understand.
    pub typed_input: Option<TypedInput>,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub commitment_suffix: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub witness_suffix: Vec<u8>,
}

impl TxInput {
    /// A version-1 spend input.
    #[allow(clippy::too_many_arguments)]
    pub fn new_spend(
        arguments: Vec<Vec<u8>>,
        source_id: Hash,
        asset_id: AssetId,
        amount: u64,
        source_position: u64,
        control_program: Vec<u8>,
        ref_data_hash: Hash,
        reference_data: Vec<u8>,
    ) -> Self {
        Self {
            asset_version: ASSET_VERSION_1,
            reference_data,
            typed_input: Some(TypedInput::Spend(SpendInput {
                spend_commitment: SpendCommitment {
                    source_id,
                    asset_amount: AssetAmount::new(asset_id, amount),
                    source_position,
                    vm_version: 1,
                    control_program,
                    ref_data_hash,
                },
                spend_commitment_suffix: Vec::new(),
                arguments,
            })),
            commitment_suffix: Vec::new(),
            witness_suffix: Vec::new(),
        }
    }

    /// A version-1 issuance input.
    pub fn new_issuance(
        nonce: Vec<u8>,
        amount: u64,
        reference_data: Vec<u8>,
        initial_block: Hash,
        issuance_program: Vec<u8>,
        arguments: Vec<Vec<u8>>,
        asset_definition: Vec<u8>,
    ) -> Self {
        Self {
            asset_version: ASSET_VERSION_1,
            reference_data,
            typed_input: Some(TypedInput::Issuance(IssuanceInput {
                nonce,
                amount,
                initial_block,
                asset_definition,
                vm_version: 1,
                issuance_program,
                arguments,
            })),
            commitment_suffix: Vec::new(),
            witness_suffix: Vec::new(),
        }
    }

    pub fn is_issuance(&self) -> bool {
        matches!(self.typed_input, Some(TypedInput::Issuance(_)))
    }

    /// Asset and amount flowing in through this input.
    pub fn asset_amount(&self) -> LegacyResult<AssetAmount> {
        match &self.typed_input {
            Some(TypedInput::Issuance(ii)) => Ok(AssetAmount::new(ii.asset_id()?, ii.amount)),
            Some(TypedInput::Spend(si)) => Ok(si.spend_commitment.asset_amount),
            None => Ok(AssetAmount::default()),
        }
    }

    pub fn arguments(&self) -> &[Vec<u8>] {
        match &self.typed_input {
            Some(TypedInput::Issuance(ii)) => &ii.arguments,
            Some(TypedInput::Spend(si)) => &si.arguments,
            None => &[],
        }
    }

    pub fn set_arguments(&mut self, arguments: Vec<Vec<u8>>) {
        match &mut self.typed_input {
            Some(TypedInput::Issuance(ii)) => ii.arguments = arguments,
            Some(TypedInput::Spend(si)) => si.arguments = arguments,
            None => {}
        }
    }

    pub(crate) fn write_to<W: ByteSink + ?Sized>(
        &self,
        w: &mut W,
        serflags: u8,
    ) -> LegacyResult<()> {
        write_varint63(w, self.asset_version)?;
        write_extensible_string(w, &self.commitment_suffix, |w| {
            self.write_commitment(w, serflags)
        })?;
        write_ref_data(w, &self.reference_data, serflags)?;
        if serflags & SER_WITNESS != 0 {
            write_extensible_string(w, &self.witness_suffix, |w| self.write_witness(w))?;
        }
        Ok(())
    }

    fn write_commitment(&self, w: &mut Vec<u8>, serflags: u8) -> LegacyResult<()> {
        if self.asset_version != ASSET_VERSION_1 {
            return Ok(());
        }
        match &self.typed_input {
            Some(TypedInput::Issuance(ii)) => {
                w.push(ISSUANCE_INPUT_TYPE);
                write_varstr31(w, &ii.nonce)?;
                ii.asset_id()?.write_to(w);
                write_varint63(w, ii.amount)?;
            }
            Some(TypedInput::Spend(si)) => {
                w.push(SPEND_INPUT_TYPE);
                if serflags & SER_PREVOUT != 0 {
                    si.spend_commitment.write_extensible(
                        w,
                        &si.spend_commitment_suffix,
                        self.asset_version,
                    )?;
                } else {
                    si.spend_commitment
                        .hash(&si.spend_commitment_suffix, self.asset_version)?
                        .write_to(w);
                }
            }
            None => {}
        }
        Ok(())
    }

    fn write_witness(&self, w: &mut Vec<u8>) -> LegacyResult<()> {
        if self.asset_version != ASSET_VERSION_1 {
            return Ok(());
        }
        match &self.typed_input {
            Some(TypedInput::Issuance(ii)) => {
                ii.initial_block.write_to(w);
                write_varstr31(w, &ii.asset_definition)?;
                write_varint63(w, ii.vm_version)?;
                write_varstr31(w, &ii.issuance_program)?;
                write_varstr_list(w, &ii.arguments)?;
            }
            Some(TypedInput::Spend(si)) => {
                write_varstr_list(w, &si.arguments)?;
            }
            None => {}
        }
        Ok(())
    }

    pub(crate) fn read_from(r: &mut Reader<'_>, limits: &DecodeLimits) -> LegacyResult<Self> {
        let asset_version = r.read_varint63()?.0;

        // The commitment carries the type byte; the witness completes it.
        enum Partial {
            Issuance(IssuanceInput, AssetId),
            Spend(SpendInput),
        }
        let mut partial: Option<Partial> = None;

        let commitment_suffix = r.read_extensible_string(|r| {
            if asset_version != ASSET_VERSION_1 {
                return Ok(());
            }
            match r.read_byte()? {
                ISSUANCE_INPUT_TYPE => {
                    let nonce = r.read_varstr31()?;
                    limits.check_len("issuance nonce", &nonce)?;
                    let asset_id = AssetId::read_from(r)?;
                    let amount = r.read_varint63()?.0;
                    let ii = IssuanceInput {
                        nonce,
                        amount,
                        ..Default::default()
                    };
                    partial = Some(Partial::Issuance(ii, asset_id));
                }
                SPEND_INPUT_TYPE => {
                    let (spend_commitment, spend_commitment_suffix) =
                        SpendCommitment::read_extensible(r, asset_version, limits)?;
                    partial = Some(Partial::Spend(SpendInput {
                        spend_commitment,
                        spend_commitment_suffix,
                        arguments: Vec::new(),
                    }));
                }
                other => return Err(LegacyError::UnknownInputType(other)),
            }
            Ok(())
        })?;

        let reference_data = read_ref_data(r, limits, "input reference data")?;

        let witness_suffix = r.read_extensible_string(|r| {
            if asset_version != ASSET_VERSION_1 {
                return Ok(());
            }
            match &mut partial {
                Some(Partial::Issuance(ii, declared)) => {
                    ii.initial_block = Hash::read_from(r)?;
                    ii.asset_definition = r.read_varstr31()?;
                    limits.check_len("asset definition", &ii.asset_definition)?;
                    ii.vm_version = r.read_varint63()?.0;
                    ii.issuance_program = r.read_varstr31()?;
                    limits.check_len("issuance program", &ii.issuance_program)?;
                    let computed = ii.asset_id()?;
                    if computed != *declared {
                        return Err(LegacyError::BadAssetId {
                            computed,
                            declared: *declared,
                        });
                    }
                    ii.arguments = r.read_varstr_list()?;
                    limits.check_list("issuance arguments", &ii.arguments)?;
                }
                Some(Partial::Spend(si)) => {
                    si.arguments = r.read_varstr_list()?;
                    limits.check_list("spend arguments", &si.arguments)?;
                }
                None => {
                    limits.check_list("arguments", &r.read_varstr_list()?)?;
                }
            }
            Ok::<_, LegacyError>(())
        })?;

        let typed_input = partial.map(|p| match p {
            Partial::Issuance(ii, _) => TypedInput::Issuance(ii),
            Partial::Spend(si) => TypedInput::Spend(si),
        });

        Ok(Self {
            asset_version,
            reference_data,
            typed_input,
            commitment_suffix,
            witness_suffix,
        })
    }
}
