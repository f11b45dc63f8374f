// 🔀 Canonical Merge Builder - Derive one merged transfer from its sources
//
// Pure function: no I/O, identical inputs always produce an identical
// payload. Dry-run/execute parity depends on this.

use serde::{Deserialize, Serialize};

use crate::store::TransferCandidate;

/// Fallback description when no source carries one
pub const DEFAULT_DESCRIPTION: &str = "Traspaso entre empresas";

/// Fallback transfer purpose when no source carries one
pub const DEFAULT_TRANSFER_PURPOSE: &str = "interempresa";

// ============================================================================
// MERGE PAYLOAD
// ============================================================================

/// The update applied to the keeper record. The store layer additionally
/// flags the keeper canonical (is_transfer, TRASPASO) and clears every
/// single-sided legacy identifier - the canonical shape is always
/// directional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePayload {
    pub amount: f64,

    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub from_company: Option<String>,
    pub to_company: Option<String>,
    pub from_individual: Option<String>,
    pub to_individual: Option<String>,

    pub category: Option<String>,
    pub description: String,
    pub cell_index: i64,

    pub transfer_purpose: String,
    pub transfer_reason: Option<String>,
}

// ============================================================================
// PRECEDENCE HELPERS
// ============================================================================

/// First non-null value in source order.
fn first_some(sources: &[Option<&str>]) -> Option<String> {
    sources.iter().copied().flatten().next().map(str::to_string)
}

fn field<'a>(
    source: Option<&'a TransferCandidate>,
    get: impl Fn(&'a TransferCandidate) -> Option<&'a str>,
) -> Option<&'a str> {
    source.and_then(get)
}

// ============================================================================
// BUILDER
// ============================================================================

/// Merge up to three sources into one canonical payload.
///
/// `modern` is present only for cleanup_partial groups; `incoming` /
/// `outgoing` are the classified legacy legs (either may be absent when a
/// lone leg's role could not be determined).
pub fn build_merge(
    incoming: Option<&TransferCandidate>,
    outgoing: Option<&TransferCandidate>,
    modern: Option<&TransferCandidate>,
) -> MergePayload {
    let sources = [incoming, outgoing, modern];

    // Max of absolute values guards against sign inconsistencies between legs
    let amount = sources
        .iter()
        .flatten()
        .map(|tx| tx.amount.abs())
        .fold(0.0_f64, f64::max);

    // "from" family: outgoing's single-sided id, then its own from-variant,
    // then the modern record; "to" mirrors with incoming
    let from_account = first_some(&[
        field(outgoing, |tx| tx.account.as_deref()),
        field(outgoing, |tx| tx.from_account.as_deref()),
        field(modern, |tx| tx.from_account.as_deref()),
    ]);
    let to_account = first_some(&[
        field(incoming, |tx| tx.account.as_deref()),
        field(incoming, |tx| tx.to_account.as_deref()),
        field(modern, |tx| tx.to_account.as_deref()),
    ]);
    let from_company = first_some(&[
        field(outgoing, |tx| tx.company.as_deref()),
        field(outgoing, |tx| tx.from_company.as_deref()),
        field(modern, |tx| tx.from_company.as_deref()),
    ]);
    let to_company = first_some(&[
        field(incoming, |tx| tx.company.as_deref()),
        field(incoming, |tx| tx.to_company.as_deref()),
        field(modern, |tx| tx.to_company.as_deref()),
    ]);
    let from_individual = first_some(&[
        field(outgoing, |tx| tx.individual.as_deref()),
        field(outgoing, |tx| tx.from_individual.as_deref()),
        field(modern, |tx| tx.from_individual.as_deref()),
    ]);
    let to_individual = first_some(&[
        field(incoming, |tx| tx.individual.as_deref()),
        field(incoming, |tx| tx.to_individual.as_deref()),
        field(modern, |tx| tx.to_individual.as_deref()),
    ]);

    let category = first_some(&[
        field(modern, |tx| tx.category.as_deref()),
        field(incoming, |tx| tx.category.as_deref()),
        field(outgoing, |tx| tx.category.as_deref()),
    ]);

    let description = first_some(&[
        field(modern, |tx| tx.description.as_deref()),
        field(incoming, |tx| tx.description.as_deref()),
        field(outgoing, |tx| tx.description.as_deref()),
    ])
    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    // Minimum non-negative cell index keeps the merged record at the
    // earliest display slot its sources occupied
    let cell_index = sources
        .iter()
        .flatten()
        .filter_map(|tx| tx.cell_index)
        .filter(|&ix| ix >= 0)
        .min()
        .unwrap_or(0);

    let transfer_purpose = first_some(&[
        field(modern, |tx| tx.transfer_purpose.as_deref()),
        field(incoming, |tx| tx.transfer_purpose.as_deref()),
        field(outgoing, |tx| tx.transfer_purpose.as_deref()),
    ])
    .unwrap_or_else(|| DEFAULT_TRANSFER_PURPOSE.to_string());

    let transfer_reason = first_some(&[
        field(modern, |tx| tx.transfer_reason.as_deref()),
        field(incoming, |tx| tx.transfer_reason.as_deref()),
        field(outgoing, |tx| tx.transfer_reason.as_deref()),
    ]);

    MergePayload {
        amount,
        from_account,
        to_account,
        from_company,
        to_company,
        from_individual,
        to_individual,
        category,
        description,
        cell_index,
        transfer_purpose,
        transfer_reason,
    }
}

// ============================================================================
// TESTS
// ============================================================================
