use serde::Serialize;

/// What an extract pass produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub files: u64,
    pub dirs: u64,
    /// Entries the validate pass counted.
    pub expected: u64,
    /// Entries actually materialised.
    pub entries: u64,
}

impl ExtractStats {
    pub fn matches_plan(&self) -> bool {
        self.expected == self.entries
    }
}
