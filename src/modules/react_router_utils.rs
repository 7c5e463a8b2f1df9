use crate::rules::{MigrationRule, RuleEntry, create_entries};

/// The package was renamed; every import moves unchanged.
pub fn react_router_utils() -> Vec<MigrationRule> {
    create_entries(
        "@qui/react-router-utils",
        vec![RuleEntry::new("@qualcomm-ui/react-router-utils")],
    )
}
