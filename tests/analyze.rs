//! Seeding a migration from a legacy package's exports.

use qui_codemod::exports::ExportAnalyzer;
use qui_codemod::rules::parse_config;
use qui_codemod::transform::transform_text;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn legacy_package() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let write = |rel: &str, content: &str| {
        let path = tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    };
    write(
        "button/index.ts",
        "export function useButton() {}\nexport const QButton = () => null\n",
    );
    write("table/table.tsx", "export {QTable, QTr as QRow}\n");
    write(
        "table/types.ts",
        "// export interface Hidden {}\nexport interface QTableProps {\n  size: \"sm\" | \"lg\"\n}\n",
    );
    write("node_modules/dep/index.ts", "export const Ignored = 1\n");
    write("table/README.md", "export const NotSource = 1\n");
    tmp
}

#[test]
fn report_lists_directories_by_export_count() {
    let tmp = legacy_package();
    let analyzer = ExportAnalyzer::analyze_directory(tmp.path()).unwrap();

    assert_eq!(analyzer.files_processed(), 3);
    insta::assert_snapshot!(analyzer.report(), @r"
    Export Analysis Report
    ==================================================

    table
      QTable
      QTr
      QTableProps

    button
      useButton
      QButton
    ");
}

#[test]
fn generated_config_drives_a_migration() {
    let tmp = legacy_package();
    let analyzer = ExportAnalyzer::analyze_directory(tmp.path()).unwrap();
    let json = serde_json::to_string_pretty(&analyzer.create_migration_config("@qui/react")).unwrap();

    insta::assert_snapshot!(json, @r#"
    [
      "@qui/react",
      [
        {
          "imports": [
            "QTable",
            "QTr",
            "QTableProps"
          ],
          "targetPackage": "@qui/react/table"
        },
        {
          "imports": [
            "useButton",
            "QButton"
          ],
          "targetPackage": "@qui/react/button"
        }
      ]
    ]
    "#);

    let rules = parse_config(&json).unwrap();
    assert_eq!(rules.len(), 2);

    let out = transform_text(
        Path::new("app.tsx"),
        "import {QButton, type QTableProps, QTable} from \"@qui/react\"\n".to_string(),
        &rules,
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        out,
        "import {type QTableProps, QTable} from \"@qui/react/table\"\nimport {QButton} from \"@qui/react/button\"\n"
    );
}

#[test]
fn config_without_rules_is_rejected() {
    assert!(parse_config(r#"["@qui/react", []]"#).is_err());
    assert!(parse_config(r#"["@qui/react", [{"imports": ["A"]}]]"#).is_err());
}
