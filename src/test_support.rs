//! Shared test fixtures. Compiled only for tests.

use rusqlite::Connection;

use crate::store::{self, TransferCandidate, TYPE_TRASPASO};

/// In-memory store with the schema applied.
pub fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    store::setup_database(&conn).unwrap();
    conn
}

/// Bare candidate with every optional field empty.
pub fn blank_candidate(id: &str, owner_id: &str, group_id: &str) -> TransferCandidate {
    TransferCandidate {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        group_id: group_id.to_string(),
        is_transfer: false,
        record_type: None,
        amount: 0.0,
        from_account: None,
        to_account: None,
        from_company: None,
        to_company: None,
        from_individual: None,
        to_individual: None,
        account: None,
        company: None,
        individual: None,
        contractor: None,
        counterparty: None,
        category: None,
        description: None,
        cell_index: None,
        transfer_purpose: None,
        transfer_reason: None,
        created_at: None,
    }
}

/// One legacy leg of a paired transfer.
pub fn legacy_leg(
    id: &str,
    owner_id: &str,
    group_id: &str,
    amount: f64,
    record_type: Option<&str>,
) -> TransferCandidate {
    let mut tx = blank_candidate(id, owner_id, group_id);
    tx.amount = amount;
    tx.record_type = record_type.map(str::to_string);
    tx
}

/// Already-canonical (modern) transfer record.
pub fn modern_transfer(id: &str, owner_id: &str, group_id: &str, amount: f64) -> TransferCandidate {
    let mut tx = blank_candidate(id, owner_id, group_id);
    tx.is_transfer = true;
    tx.record_type = Some(TYPE_TRASPASO.to_string());
    tx.amount = amount;
    tx
}
