//! Error shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Persistence failures surfaced by repository adapters.
    pub enum RepositoryError {
        /// The store could not be reached or a connection could not be
        /// checked out of the pool.
        Connection { message: String } => "repository connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "duplicate record: {message}",
    }
}
