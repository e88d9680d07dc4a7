/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Todo timestamps are stored without an offset and are always UTC.
pub type NaiveTimestamp = chrono::NaiveDateTime;
