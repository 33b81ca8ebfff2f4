//! # Mutual-Exclusion Groups
//!
//! A [`MutualExclusionGroup`] names a set of sibling fields of one object,
//! exactly one of which must be present whenever that object is present.
//! The group is evaluated once, at its parent object, rather than through
//! per-member checks that would each report the same problem.

use mfst_core::validators::{exactly_one_of, Outcome};

/// Named exactly-one-of constraint over sibling fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutualExclusionGroup {
    name: String,
    members: Vec<String>,
}

impl MutualExclusionGroup {
    /// Create a group over `members`, given by caller-facing field name.
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Members for which `is_present` holds, in declaration order.
    pub fn present_members<F>(&self, is_present: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.members
            .iter()
            .map(String::as_str)
            .filter(|m| is_present(m))
            .collect()
    }

    /// Check an observed set of present members against the group.
    pub fn check(&self, present: &[&str]) -> Outcome {
        let members: Vec<&str> = self.members.iter().map(String::as_str).collect();
        exactly_one_of(&members, present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MutualExclusionGroup {
        MutualExclusionGroup::new("provider", &["aws", "vault", "fake"])
    }

    #[test]
    fn present_members_keep_declaration_order() {
        let group = provider();
        let present = group.present_members(|m| m == "fake" || m == "aws");
        assert_eq!(present, ["aws", "fake"]);
    }

    #[test]
    fn exactly_one_passes() {
        let group = provider();
        for only in ["aws", "vault", "fake"] {
            let present = group.present_members(|m| m == only);
            assert!(group.check(&present).is_ok(), "{only} alone should pass");
        }
    }

    #[test]
    fn zero_or_many_fail() {
        let group = provider();
        assert!(group.check(&[]).is_err());
        assert!(group.check(&["aws", "vault"]).is_err());
        let all = group.present_members(|_| true);
        let err = group.check(&all).unwrap_err();
        assert!(err.contains("found 3"));
    }
}
