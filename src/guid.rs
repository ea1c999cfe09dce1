//! Identifier generation for migrated records.
//!
//! Downstream tooling stores ids as 32-char lowercase hex without hyphens, so
//! that is the only form this module produces.

pub fn new_guid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_is_compact_hex() {
        let g = new_guid();
        assert_eq!(g.len(), 32);
        assert!(g.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn guids_are_distinct() {
        let a = new_guid();
        let b = new_guid();
        assert_ne!(a, b);
    }
}
