use crate::rules::{MigrationRule, RuleEntry, create_entries};

/// Utilities that moved out of `@qui/base` into `@qui/utils` subpaths.
pub fn base() -> Vec<MigrationRule> {
    create_entries(
        "@qui/base",
        vec![
            RuleEntry::new("@qui/utils/array").imports(["ensureArray"]),
            RuleEntry::new("@qui/utils/clsx").imports(["clsx", "classValue"]),
            RuleEntry::new("@qui/utils/escape-string-regexp").imports(["escapeStringRegexp"]),
            RuleEntry::new("@qui/utils/dedent").imports(["dedent"]),
            RuleEntry::new("@qui/utils/guard").imports(["defined", "isDefined"]),
            RuleEntry::new("@qui/utils/match-sorter").imports(["matchSorter"]),
            RuleEntry::new("@qui/utils/transitions")
                .rename("QAnimationEasing", "AnimationEasing")
                .rename_variable("QAnimationEasing", "AnimationEasing"),
        ],
    )
}
