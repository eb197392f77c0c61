use rusqlite::{params, OptionalExtension, Row};

use super::db::{Database, DatabaseError};
use super::models::{AttachmentList, ExamPosting, NewExamPosting};

const SELECT_COLUMNS: &str = "SELECT id, ente, descrizione, scadenza, link, nota, file_path FROM concorsi";

impl Database {
    // ========================================================================
    // Posting operations
    // ========================================================================

    /// Insert a posting and return its generated id
    pub fn create(&self, posting: &NewExamPosting) -> Result<i64, DatabaseError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO concorsi (ente, descrizione, scadenza, link, nota, file_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                posting.institution,
                posting.description,
                posting.deadline,
                posting.link,
                posting.note,
                posting.attachments.to_joined(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All postings, earliest deadline first.
    ///
    /// The ordering is a text comparison on `scadenza`; it matches calendar order only
    /// for zero-padded `YYYY-MM-DD` values.
    pub fn list_all(&self) -> Result<Vec<ExamPosting>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY scadenza ASC, id ASC"))?;
        let postings = stmt
            .query_map([], posting_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(postings)
    }

    pub fn get(&self, id: i64) -> Result<Option<ExamPosting>, DatabaseError> {
        let conn = self.lock()?;
        let posting = conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], posting_from_row)
            .optional()?;
        Ok(posting)
    }

    /// Delete a posting. Returns false when no row had that id.
    pub fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM concorsi WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> Result<u64, DatabaseError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM concorsi", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

// Columns are nullable in the schema; NULL reads back as an empty string.
fn posting_from_row(row: &Row<'_>) -> rusqlite::Result<ExamPosting> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    Ok(ExamPosting {
        id: row.get(0)?,
        institution: text(1)?,
        description: text(2)?,
        deadline: text(3)?,
        link: text(4)?,
        note: text(5)?,
        attachments: AttachmentList::parse(&text(6)?),
    })
}
