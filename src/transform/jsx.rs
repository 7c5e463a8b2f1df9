//! Wraps JSX elements in new parent elements.

use super::TransformContext;
use crate::error::Result;
use crate::syntax::{Edit, SourceFile, line_indent};
use tree_sitter::Node;

const ELEMENT_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element"];

pub fn run(file: &mut SourceFile, ctx: &TransformContext<'_>) -> Result<bool> {
    let mut changed = false;

    for wrapper in &ctx.rule.jsx_wrappers {
        if wrapper.wrap_with.is_empty() {
            continue;
        }
        // Every pass wraps one element, so the initial count bounds the loop.
        let budget = file
            .nodes_of_kind(ELEMENT_KINDS)
            .into_iter()
            .filter(|el| tag_name(file, *el) == Some(wrapper.name.as_str()))
            .count();

        for _ in 0..budget {
            let Some(edit) = next_wrap(file, &wrapper.name, &wrapper.wrap_with) else {
                break;
            };
            changed |= file.apply_edits(vec![edit])?;
        }
    }

    Ok(changed)
}

/// The tag name of a paired or self-closing element, e.g. `Table.Root`.
pub fn tag_name<'f>(file: &'f SourceFile, element: Node<'_>) -> Option<&'f str> {
    let named = match element.kind() {
        "jsx_element" => element.child_by_field_name("open_tag")?,
        "jsx_self_closing_element" => element,
        _ => return None,
    };
    named
        .child_by_field_name("name")
        .map(|name| file.node_text(name))
}

fn is_wrapped(file: &SourceFile, element: Node<'_>, wrap_with: &[String]) -> bool {
    element
        .parent()
        .filter(|p| p.kind() == "jsx_element")
        .and_then(|p| tag_name(file, p))
        .is_some_and(|tag| wrap_with.iter().any(|w| w == tag))
}

fn next_wrap(file: &SourceFile, name: &str, wrap_with: &[String]) -> Option<Edit> {
    let element = file
        .nodes_of_kind(ELEMENT_KINDS)
        .into_iter()
        .find(|el| tag_name(file, *el) == Some(name) && !is_wrapped(file, *el, wrap_with))?;
    let indent = line_indent(file.text(), element.start_byte());
    Some(Edit::replace(
        element,
        wrap_text(file.node_text(element), wrap_with, indent),
    ))
}

/// Wraps `element` in `wrap_with` (outermost first), re-indenting the result
/// so it sits at `base_indent`.
pub fn wrap_text(element: &str, wrap_with: &[String], base_indent: &str) -> String {
    let lines: Vec<&str> = element.split('\n').collect();
    let common = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut body: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| match i {
            0 => l.to_string(),
            _ if l.trim().is_empty() => String::new(),
            _ => l[common..].to_string(),
        })
        .collect();

    for tag in wrap_with.iter().rev() {
        let mut wrapped = Vec::with_capacity(body.len() + 2);
        wrapped.push(format!("<{tag}>"));
        wrapped.extend(body.into_iter().map(|l| {
            if l.is_empty() { l } else { format!("  {l}") }
        }));
        wrapped.push(format!("</{tag}>"));
        body = wrapped;
    }

    body.iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 || l.is_empty() {
                l.clone()
            } else {
                format!("{base_indent}{l}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleEntry, create_entries};
    use crate::transform::transform_text;
    use std::path::Path;

    fn wrap(source: &str) -> Option<String> {
        let rules = create_entries(
            "@qui/react-table",
            vec![RuleEntry::new("@qualcomm-ui/react/table")
                .wrap_jsx("Table.Table", &["Table.Root", "Table.ScrollContainer"])],
        );
        transform_text(Path::new("table.tsx"), source.to_string(), &rules).unwrap()
    }

    #[test]
    fn wraps_and_reindents() {
        let source = "\
function T() {
  return (
    <Table.Table size=\"sm\">
      <Table.Body />
    </Table.Table>
  )
}
";
        let out = wrap(source).unwrap();
        insta::assert_snapshot!(out.trim_end(), @r#"
        function T() {
          return (
            <Table.Root>
              <Table.ScrollContainer>
                <Table.Table size="sm">
                  <Table.Body />
                </Table.Table>
              </Table.ScrollContainer>
            </Table.Root>
          )
        }
        "#);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let source = "const t = <Table.Table />\n";
        let once = wrap(source).unwrap();
        assert_eq!(
            once,
            "const t = <Table.Root>\n  <Table.ScrollContainer>\n    <Table.Table />\n  </Table.ScrollContainer>\n</Table.Root>\n"
        );
        assert_eq!(wrap(&once), None);
    }

    #[test]
    fn wraps_every_occurrence() {
        let source = "const a = <div><Table.Table /><Table.Table /></div>\n";
        let out = wrap(source).unwrap();
        assert_eq!(out.matches("<Table.Root>").count(), 2);
        assert_eq!(wrap(&out), None);
    }

    #[test]
    fn blank_lines_stay_blank() {
        let wrapped = wrap_text("<A>\n\n  </A>", &["W".to_string()], "  ");
        assert_eq!(wrapped, "<W>\n    <A>\n\n    </A>\n  </W>");
    }
}
