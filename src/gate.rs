/// Password Gate
///
/// Gates an arbitrary content subtree behind a single shared secret, remembering
/// the unlock in the caller's session for the rest of the visit. Secrets are
/// compared verbatim (exact, case-sensitive) with no lockout, throttling, or
/// attempt counting — a deliberate product decision for pitch-deck-grade content.

/// ProtectedResource
///
/// One gated piece of content. Defined statically at build time; never created
/// or destroyed at runtime. `storage_key` is the unique handle the unlock flag
/// is recorded under, so multiple resources rendered together track independent
/// flags with no cross-resource leakage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedResource {
    pub storage_key: &'static str,
    pub secret: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// The static registry of password-gated content. Case studies under review and
/// the investor overview live here; client pitch decks are reached through the
/// client directory instead.
pub const PROTECTED_RESOURCES: &[ProtectedResource] = &[
    ProtectedResource {
        storage_key: "work-canvas",
        secret: "process2025",
        title: "Canvas Case Study",
        description: "Product process deep-dive, shared with shortlisted prospects.",
    },
    ProtectedResource {
        storage_key: "investor-overview",
        secret: "firstprinciples",
        title: "Investor Overview",
        description: "Studio financials and portfolio summary for prospective investors.",
    },
    ProtectedResource {
        storage_key: "case-study-zero",
        secret: "sequence",
        title: "Zero Case Study",
        description: "Full build narrative, pre-launch figures included.",
    },
];

/// Resolves a storage key against the registry.
pub fn find_resource(storage_key: &str) -> Option<&'static ProtectedResource> {
    PROTECTED_RESOURCES
        .iter()
        .find(|resource| resource.storage_key == storage_key)
}

/// GateError
///
/// The two ways a submission can fail. Both leave the gate locked and the form
/// usable for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// Empty submission, rejected before any comparison runs.
    MissingPassword,
    /// Candidate did not match the configured secret.
    IncorrectPassword,
}

impl GateError {
    /// The user-facing message rendered inline next to the form.
    pub fn message(&self) -> &'static str {
        match self {
            GateError::MissingPassword => "Please enter a password",
            GateError::IncorrectPassword => "Incorrect password. Please try again.",
        }
    }
}

/// verify
///
/// The submit-side check of the gate's state machine: `Locked → Unlocked` on an
/// exact match, `Locked → Locked` with an error otherwise. Recording the unlock
/// is the caller's job (it owns the session); this function has no side effects.
pub fn verify(resource: &ProtectedResource, candidate: &str) -> Result<(), GateError> {
    if candidate.is_empty() {
        return Err(GateError::MissingPassword);
    }
    if candidate != resource.secret {
        return Err(GateError::IncorrectPassword);
    }
    Ok(())
}
