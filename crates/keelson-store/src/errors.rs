//! Error handling for keelson-store
//!
//! Wraps the keelson-core taxonomy with store-specific helpers

use keelson_core::KeelsonError;

/// Result type alias using KeelsonError
pub type Result<T> = std::result::Result<T, KeelsonError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> KeelsonError {
    KeelsonError::Persistence {
        message: err.to_string(),
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> KeelsonError {
    KeelsonError::Persistence {
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> KeelsonError {
    KeelsonError::Persistence {
        message: format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Create a corrupt-row error for a value that cannot be mapped back to
/// the domain (bad status code, invalid timestamp)
pub fn corrupt_row(table: &str, id: &str, reason: &str) -> KeelsonError {
    KeelsonError::Persistence {
        message: format!("Corrupt {} row {}: {}", table, id, reason),
    }
}
