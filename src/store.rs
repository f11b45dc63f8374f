use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::merge::MergePayload;

// ============================================================================
// RECORD TYPES
// ============================================================================

/// Legacy income leg marker
pub const TYPE_INGRESO: &str = "INGRESO";

/// Legacy expense leg marker
pub const TYPE_GASTO: &str = "GASTO";

/// Canonical (modern) transfer marker
pub const TYPE_TRASPASO: &str = "TRASPASO";

// ============================================================================
// TRANSFER CANDIDATE
// ============================================================================

/// One transfer-like event record, projected to only the fields the
/// migration engine needs. Extra store columns are deliberately dropped
/// rather than round-tripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCandidate {
    /// Stable record identifier
    pub id: String,

    /// Owning user
    pub owner_id: String,

    /// Links the legs of one real-world transfer (and/or its modern record)
    pub group_id: String,

    /// Modern marker: true when this record is already a canonical transfer
    pub is_transfer: bool,

    /// Legacy leg marker: INGRESO / GASTO (TRASPASO once migrated)
    pub record_type: Option<String>,

    /// Signed or unsigned monetary amount
    pub amount: f64,

    // ========================================================================
    // DIRECTIONAL IDENTIFIERS (modern shape)
    // ========================================================================
    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub from_company: Option<String>,
    pub to_company: Option<String>,
    pub from_individual: Option<String>,
    pub to_individual: Option<String>,

    // ========================================================================
    // SINGLE-SIDED IDENTIFIERS (legacy shape; cleared on merge)
    // ========================================================================
    pub account: Option<String>,
    pub company: Option<String>,
    pub individual: Option<String>,
    pub contractor: Option<String>,
    pub counterparty: Option<String>,

    pub category: Option<String>,
    pub description: Option<String>,

    /// Display-ordering hint; valid when >= 0
    pub cell_index: Option<i64>,

    pub transfer_purpose: Option<String>,
    pub transfer_reason: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

impl TransferCandidate {
    /// Legacy = anything not yet flagged as a canonical transfer
    pub fn is_legacy(&self) -> bool {
        !self.is_transfer
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS transfers (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL DEFAULT '',
            group_id TEXT,
            is_transfer INTEGER NOT NULL DEFAULT 0,
            record_type TEXT,
            amount REAL NOT NULL DEFAULT 0,
            from_account TEXT,
            to_account TEXT,
            from_company TEXT,
            to_company TEXT,
            from_individual TEXT,
            to_individual TEXT,
            account TEXT,
            company TEXT,
            individual TEXT,
            contractor TEXT,
            counterparty TEXT,
            category TEXT,
            description TEXT,
            cell_index INTEGER,
            transfer_purpose TEXT,
            transfer_reason TEXT,
            created_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transfers_group ON transfers(owner_id, group_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// LOADER
// ============================================================================

const CANDIDATE_COLUMNS: &str = "id, owner_id, group_id, is_transfer, record_type, amount,
        from_account, to_account, from_company, to_company, from_individual, to_individual,
        account, company, individual, contractor, counterparty,
        category, description, cell_index, transfer_purpose, transfer_reason, created_at";

/// Load all transfer candidates carrying a non-empty group identifier,
/// optionally narrowed to a single group. Read-only; store errors surface
/// to the caller (retries are the caller's concern).
pub fn load_transfer_candidates(
    conn: &Connection,
    group_filter: Option<&str>,
) -> Result<Vec<TransferCandidate>> {
    let base = format!(
        "SELECT {CANDIDATE_COLUMNS}
         FROM transfers
         WHERE group_id IS NOT NULL AND group_id != ''"
    );

    let candidates = match group_filter {
        Some(group_id) => {
            let sql = format!("{base} AND group_id = ?1 ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![group_id], candidate_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        }
        None => {
            let sql = format!("{base} ORDER BY rowid");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], candidate_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        }
    }
    .context("Failed to load transfer candidates")?;

    Ok(candidates)
}

fn candidate_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TransferCandidate> {
    let is_transfer: i64 = row.get(3)?;
    let created_at_str: Option<String> = row.get(22)?;

    let created_at = created_at_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(TransferCandidate {
        id: row.get(0)?,
        owner_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        group_id: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        is_transfer: is_transfer != 0,
        record_type: row.get(4)?,
        amount: row.get(5)?,
        from_account: row.get(6)?,
        to_account: row.get(7)?,
        from_company: row.get(8)?,
        to_company: row.get(9)?,
        from_individual: row.get(10)?,
        to_individual: row.get(11)?,
        account: row.get(12)?,
        company: row.get(13)?,
        individual: row.get(14)?,
        contractor: row.get(15)?,
        counterparty: row.get(16)?,
        category: row.get(17)?,
        description: row.get(18)?,
        cell_index: row.get(19)?,
        transfer_purpose: row.get(20)?,
        transfer_reason: row.get(21)?,
        created_at,
    })
}

// ============================================================================
// MUTATIONS (executor)
// ============================================================================

/// Apply a merge payload to the keeper record.
/// Returns the number of matched rows (0 = keeper gone, caller decides).
/// Re-applying the same payload is idempotent.
pub fn update_transfer(conn: &Connection, keeper_id: &str, payload: &MergePayload) -> Result<usize> {
    let updated = conn.execute(
        "UPDATE transfers SET
            is_transfer = 1,
            record_type = ?1,
            amount = ?2,
            from_account = ?3,
            to_account = ?4,
            from_company = ?5,
            to_company = ?6,
            from_individual = ?7,
            to_individual = ?8,
            account = NULL,
            company = NULL,
            individual = NULL,
            contractor = NULL,
            counterparty = NULL,
            category = ?9,
            description = ?10,
            cell_index = ?11,
            transfer_purpose = ?12,
            transfer_reason = ?13
         WHERE id = ?14",
        params![
            TYPE_TRASPASO,
            payload.amount,
            payload.from_account,
            payload.to_account,
            payload.from_company,
            payload.to_company,
            payload.from_individual,
            payload.to_individual,
            payload.category,
            payload.description,
            payload.cell_index,
            payload.transfer_purpose,
            payload.transfer_reason,
            keeper_id,
        ],
    )?;

    Ok(updated)
}

/// Delete a superseded record. Returns the number of rows removed.
pub fn delete_transfer(conn: &Connection, id: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM transfers WHERE id = ?1", params![id])?;
    Ok(deleted)
}

/// Insert a candidate (test fixtures and seeding; the engine itself never
/// creates records). A missing id gets a fresh UUID.
pub fn insert_transfer(conn: &Connection, tx: &TransferCandidate) -> Result<String> {
    let id = if tx.id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        tx.id.clone()
    };
    let created_at_str = tx.created_at.map(|dt| dt.to_rfc3339());

    conn.execute(
        &format!("INSERT INTO transfers ({CANDIDATE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)"),
        params![
            id,
            tx.owner_id,
            tx.group_id,
            tx.is_transfer as i64,
            tx.record_type,
            tx.amount,
            tx.from_account,
            tx.to_account,
            tx.from_company,
            tx.to_company,
            tx.from_individual,
            tx.to_individual,
            tx.account,
            tx.company,
            tx.individual,
            tx.contractor,
            tx.counterparty,
            tx.category,
            tx.description,
            tx.cell_index,
            tx.transfer_purpose,
            tx.transfer_reason,
            created_at_str,
        ],
    )?;

    Ok(id)
}

/// Fetch one record by id (verification helper).
pub fn get_transfer(conn: &Connection, id: &str) -> Result<Option<TransferCandidate>> {
    let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM transfers WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let candidate = stmt
        .query_row(params![id], candidate_from_row)
        .optional()?;

    Ok(candidate)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{legacy_leg, test_conn};

    #[test]
    fn test_loader_skips_ungrouped_records() {
        let conn = test_conn();

        let mut grouped = legacy_leg("a1", "user1", "g1", -100.0, Some(TYPE_GASTO));
        grouped.description = Some("grouped".to_string());
        insert_transfer(&conn, &grouped).unwrap();

        let mut ungrouped = legacy_leg("a2", "user1", "", -50.0, Some(TYPE_GASTO));
        ungrouped.group_id = String::new();
        insert_transfer(&conn, &ungrouped).unwrap();

        let loaded = load_transfer_candidates(&conn, None).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a1");
        assert_eq!(loaded[0].description.as_deref(), Some("grouped"));
    }

    #[test]
    fn test_loader_group_filter() {
        let conn = test_conn();

        insert_transfer(&conn, &legacy_leg("a1", "u", "g1", 10.0, None)).unwrap();
        insert_transfer(&conn, &legacy_leg("a2", "u", "g2", 20.0, None)).unwrap();
        insert_transfer(&conn, &legacy_leg("a3", "u", "g1", -10.0, None)).unwrap();

        let loaded = load_transfer_candidates(&conn, Some("g1")).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|tx| tx.group_id == "g1"));
    }

    #[test]
    fn test_loader_preserves_insert_order() {
        let conn = test_conn();

        insert_transfer(&conn, &legacy_leg("z9", "u", "g1", 10.0, None)).unwrap();
        insert_transfer(&conn, &legacy_leg("a1", "u", "g1", -10.0, None)).unwrap();

        let loaded = load_transfer_candidates(&conn, None).unwrap();

        // rowid order, not id order
        assert_eq!(loaded[0].id, "z9");
        assert_eq!(loaded[1].id, "a1");
    }

    #[test]
    fn test_update_marks_keeper_canonical() {
        let conn = test_conn();

        let mut leg = legacy_leg("a1", "u", "g1", 5000.0, Some(TYPE_INGRESO));
        leg.account = Some("acct-legacy".to_string());
        insert_transfer(&conn, &leg).unwrap();

        let payload = MergePayload {
            amount: 5000.0,
            from_account: Some("acct-out".to_string()),
            to_account: Some("acct-in".to_string()),
            from_company: None,
            to_company: None,
            from_individual: None,
            to_individual: None,
            category: Some("rent".to_string()),
            description: "Test".to_string(),
            cell_index: 0,
            transfer_purpose: "interempresa".to_string(),
            transfer_reason: None,
        };

        let matched = update_transfer(&conn, "a1", &payload).unwrap();
        assert_eq!(matched, 1);

        let keeper = get_transfer(&conn, "a1").unwrap().unwrap();
        assert!(keeper.is_transfer);
        assert_eq!(keeper.record_type.as_deref(), Some(TYPE_TRASPASO));
        assert_eq!(keeper.from_account.as_deref(), Some("acct-out"));
        // single-sided fields cleared
        assert_eq!(keeper.account, None);
    }

    #[test]
    fn test_update_missing_keeper_matches_zero() {
        let conn = test_conn();

        let payload = MergePayload {
            amount: 1.0,
            from_account: None,
            to_account: None,
            from_company: None,
            to_company: None,
            from_individual: None,
            to_individual: None,
            category: None,
            description: "x".to_string(),
            cell_index: 0,
            transfer_purpose: "interempresa".to_string(),
            transfer_reason: None,
        };

        let matched = update_transfer(&conn, "nope", &payload).unwrap();
        assert_eq!(matched, 0);
    }

    #[test]
    fn test_insert_generates_id_when_missing() {
        let conn = test_conn();

        let tx = legacy_leg("", "u", "g1", 10.0, None);
        let id = insert_transfer(&conn, &tx).unwrap();

        assert!(!id.is_empty());
        assert!(get_transfer(&conn, &id).unwrap().is_some());
    }

    #[test]
    fn test_delete_transfer() {
        let conn = test_conn();

        insert_transfer(&conn, &legacy_leg("a1", "u", "g1", 10.0, None)).unwrap();

        assert_eq!(delete_transfer(&conn, "a1").unwrap(), 1);
        assert_eq!(delete_transfer(&conn, "a1").unwrap(), 0);
        assert!(get_transfer(&conn, "a1").unwrap().is_none());
    }
}
