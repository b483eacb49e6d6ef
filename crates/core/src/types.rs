/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stock and event quantities. Stored as INTEGER with CHECK constraints.
pub type Quantity = i32;
