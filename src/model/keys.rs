//! Mapping from logical election identifiers to substrate keys.
//!
//! An election is stored under its own identifier; its votes live under the
//! identifier with [`VOTES_SUFFIX`] appended. An election whose identifier
//! already ends in the suffix therefore shares its key with the votes record
//! of the shorter identifier. This is accepted: existing ledgers use exactly
//! this layout.

/// Suffix appended to an election key to locate its votes record.
pub const VOTES_SUFFIX: &str = "_votes";

/// The substrate key holding the votes record of the given election.
pub fn votes_key(election_key: &str) -> String {
    format!("{election_key}{VOTES_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix() {
        assert_eq!(votes_key("mayor-2024"), "mayor-2024_votes");
        assert_eq!(votes_key(""), "_votes");
    }

    #[test]
    fn suffixed_election_collides() {
        // Documented limitation: the election `a_votes` and the votes of `a` share a key.
        assert_eq!(votes_key("a"), "a_votes");
        assert_ne!(votes_key("a_votes"), "a_votes");
    }
}
