use crate::rules::{MigrationRule, RuleEntry, create_entries};

/// `@qui/mdx-docs` split into `@qualcomm-ui/react-mdx` subpaths.
pub fn mdx_docs() -> Vec<MigrationRule> {
    create_entries(
        "@qui/mdx-docs",
        vec![
            RuleEntry::new("@qualcomm-ui/react-mdx/docs-layout")
                .imports(["DocsLayout", "DocsLayoutProps", "MdxProvider"]),
            RuleEntry::new("@qualcomm-ui/react-mdx/context").imports([
                "useSiteContext",
                "SiteContextProvider",
                "useMdxDocsContext",
                "MdxDocsProvider",
            ]),
            RuleEntry::new("@qualcomm-ui/react-mdx/not-found").imports(["NotFound"]),
            RuleEntry::new("@qualcomm-ui/react-mdx/code-highlight").imports(["CodeHighlight"]),
            RuleEntry::new("@qualcomm-ui/react-mdx/tip")
                .imports(["Tip"])
                .remove(["TipIcon", "TipStatus"]),
            RuleEntry::new("@qualcomm-ui/react-core/highlight")
                .rename("HighlightMatches", "HighlightText")
                .rename("HighlightProp", "UseHighlightProps")
                .rename("HighlightTerms", "useHighlight")
                .rename_variable("HighlightMatches", "HighlightText")
                .rename_variable("HighlightProp", "UseHighlightProps")
                .rename_variable("HighlightTerms", "useHighlight"),
            RuleEntry::new("@qualcomm-ui/react-mdx/file-tree")
                .rename("Tree", "FileTree")
                .remove(["TreeConfig", "useTreeContext", "TreeFile"])
                .rename_variable("Tree", "FileTree"),
        ],
    )
}
