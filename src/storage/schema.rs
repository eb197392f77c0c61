use rusqlite::Connection;

/// `scadenza` is `YYYY-MM-DD` text; `file_path` is a comma-joined list of managed copies.
const CREATE_CONCORSI: &str = "
    CREATE TABLE IF NOT EXISTS concorsi (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        ente        TEXT,
        descrizione TEXT,
        scadenza    TEXT,
        link        TEXT,
        nota        TEXT,
        file_path   TEXT
    );
";

pub(super) fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_CONCORSI)
}
