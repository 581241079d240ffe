//! Database initialization for the application.

use rusqlite::Connection;

use crate::transaction::create_transaction_table;

/// An ID for a row in the application database.
pub type DatabaseId = i64;

/// Create the tables for the application's domain models.
///
/// Safe to call on an already initialized database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_transaction_table(connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_can_be_called_twice() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }
}
