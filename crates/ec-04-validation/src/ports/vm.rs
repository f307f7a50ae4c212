use crate::domain::{VmContext, VmError};

/// Predicate evaluation service.
///
/// Validation calls this synchronously for every program it meets: mux,
/// nonce, issuance and control programs, and the previous block's
/// consensus program. `Ok(())` means the program evaluated to true;
/// anything else rejects the entry.
pub trait ProgramVerifier: Send + Sync {
    fn verify(&self, context: &VmContext<'_>) -> Result<(), VmError>;
}

impl<V: ProgramVerifier + ?Sized> ProgramVerifier for &V {
    fn verify(&self, context: &VmContext<'_>) -> Result<(), VmError> {
        (**self).verify(context)
    }
}
