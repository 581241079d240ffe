//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, assistant::CompletionService, db::initialize};

/// The state of the server.
///
/// Both fields are constructed once at startup and handed to
/// [crate::build_router]; request handlers receive the slices they need via
/// `FromRef` sub-states. There is no other process-wide state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection shared by all request handlers.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The completion service used to answer assistant questions.
    pub completion_service: Arc<dyn CompletionService>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and a
    /// completion service.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        completion_service: Arc<dyn CompletionService>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            completion_service,
        })
    }
}
