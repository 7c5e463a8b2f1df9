//! Renames identifiers bound by a migrated import.

use super::TransformContext;
use crate::error::Result;
use crate::syntax::{Edit, SourceFile, has_ancestor};

/// `{QTr}` in an object literal: both a key and a use of the binding.
const SHORTHAND: &str = "shorthand_property_identifier";
/// Identifier kinds that refer to a binding. Property names are not bindings.
const BINDING_KINDS: &[&str] = &["identifier", "type_identifier", SHORTHAND];

pub fn run(file: &mut SourceFile, ctx: &TransformContext<'_>) -> Result<bool> {
    let mut changed = false;

    for transformer in &ctx.rule.variable_transformers {
        let Some(local) = ctx.local_name(&transformer.name) else {
            continue;
        };
        let edits: Vec<Edit> = file
            .nodes_of_kind(BINDING_KINDS)
            .into_iter()
            .filter(|node| file.node_text(*node) == local)
            .filter(|node| !has_ancestor(*node, "import_statement"))
            .map(|node| match node.kind() {
                SHORTHAND => Edit::replace(node, format!("{local}: {}", transformer.rename_to)),
                _ => Edit::replace(node, transformer.rename_to.as_str()),
            })
            .collect();
        changed |= file.apply_edits(edits)?;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use crate::rules::{RuleEntry, create_entries};
    use crate::transform::transform_text;
    use std::path::Path;

    fn rename(source: &str) -> Option<String> {
        let rules = create_entries(
            "@qui/react-table",
            vec![RuleEntry::new("@qui/react-table").imports(["QTr"]).rename_variable("QTr", "Table.Row")],
        );
        transform_text(Path::new("rows.tsx"), source.to_string(), &rules).unwrap()
    }

    #[test]
    fn renames_jsx_tags_and_references() {
        let out = rename(
            "import {QTr} from \"@qui/react-table\"\n\nconst Row = QTr\nconst el = <QTr key=\"a\"></QTr>\n",
        )
        .unwrap();
        assert_eq!(
            out,
            "import {QTr} from \"@qui/react-table\"\n\nconst Row = Table.Row\nconst el = <Table.Row key=\"a\"></Table.Row>\n"
        );
    }

    #[test]
    fn follows_local_alias() {
        let out = rename(
            "import {QTr as Row} from \"@qui/react-table\"\n\nconst el = <Row />\n",
        )
        .unwrap();
        assert!(out.ends_with("const el = <Table.Row />\n"), "{out}");
    }

    #[test]
    fn ignores_substrings_and_properties() {
        let out = rename(
            "import {QTr} from \"@qui/react-table\"\n\nconst QTrList = [obj.QTr, {QTr: 1}]\nconst el = <QTr />\n",
        )
        .unwrap();
        assert!(out.contains("const QTrList = [obj.QTr, {QTr: 1}]"), "{out}");
        assert!(out.contains("<Table.Row />"), "{out}");
    }

    #[test]
    fn expands_shorthand_properties() {
        let rules = create_entries(
            "@qui/react-table",
            vec![RuleEntry::new("@qualcomm-ui/react/table")
                .rename("QTr", "Table")
                .rename_variable("QTr", "Table.Row")],
        );
        let out = transform_text(
            Path::new("rows.tsx"),
            "import {QTr} from \"@qui/react-table\"\nconst components = {QTr}\nconst {QTr: Row} = components\nconst el = <QTr />\n".to_string(),
            &rules,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            out,
            "import {Table} from \"@qualcomm-ui/react/table\"\nconst components = {QTr: Table.Row}\nconst {QTr: Row} = components\nconst el = <Table.Row />\n"
        );
    }

    #[test]
    fn skips_names_the_file_does_not_import() {
        assert_eq!(rename("const QTr = 1\nexport default QTr\n"), None);
    }
}
