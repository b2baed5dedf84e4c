use chrono::Utc;

use crate::model::NodeKind;

/// Generates globally unique node identifiers.
///
/// Ids look like `folder_1724831000123_7`: a kind prefix, the creation time
/// in epoch milliseconds, and a monotonically increasing sequence number.
/// Uniqueness is guaranteed by the sequence number alone; the timestamp only
/// makes ids distinguishable in time when reading logs or exports.
#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, kind: NodeKind) -> String {
        self.seq += 1;
        format!(
            "{}_{}_{}",
            kind.prefix(),
            Utc::now().timestamp_millis(),
            self.seq
        )
    }
}
