use crate::rules::{MigrationRule, RuleEntry, create_entries};

/// `Q*` table components collapse into the `Table` namespace; headless helpers
/// move to the core package.
pub fn react_table() -> Vec<MigrationRule> {
    const COMPONENTS: [(&str, &str); 7] = [
        ("QTable", "Table.Table"),
        ("QThead", "Table.Header"),
        ("QTbody", "Table.Body"),
        ("QTfoot", "Table.Footer"),
        ("QTr", "Table.Row"),
        ("QTh", "Table.HeaderCell"),
        ("QTd", "Table.Cell"),
    ];

    let mut components = RuleEntry::new("@qualcomm-ui/react/table")
        .imports(["flexRender", "useReactTable"]);
    for (name, member) in COMPONENTS {
        components = components.rename(name, "Table").rename_variable(name, member);
    }
    components = components.wrap_jsx("Table.Table", &["Table.Root", "Table.ScrollContainer"]);

    create_entries(
        "@qui/react-table",
        vec![
            RuleEntry::new("@qualcomm-ui/core/table").imports([
                "createColumnHelper",
                "getCoreRowModel",
                "getSortedRowModel",
                "getFilteredRowModel",
                "getPaginationRowModel",
                "Column",
                "ColumnDef",
                "ColumnOrderState",
                "Header",
            ]),
            components,
        ],
    )
}
