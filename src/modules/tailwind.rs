//! Class-name migration for the retired tailwind plugin tokens.

use crate::classes::ClassTransformRule;
use std::sync::LazyLock;

/// Metadata sizes collapse onto the body scale.
pub fn metadata_size(size: &str) -> &str {
    match size {
        "lg" => "sm",
        "md" => "xs",
        "sm" => "xs",
        "xl" => "md",
        other => other,
    }
}

fn size<'a>(groups: &[&'a str]) -> &'a str {
    groups.first().copied().unwrap_or_default()
}

fn typography(pattern: &str, compute: fn(&str, &[&str]) -> String) -> ClassTransformRule {
    ClassTransformRule::computed(pattern, compute).expect("built-in typography pattern")
}

pub static TAILWIND_CLASS_RULES: LazyLock<Vec<ClassTransformRule>> = LazyLock::new(|| {
    let mut rules = vec![
        typography(r"^q-font-body-(xxs|xs|sm|md|lg|xl|xxl)$", |_, g| {
            format!("font-body-{}", size(g))
        }),
        typography(r"^q-font-body-(xxs|xs|sm|md|lg|xl|xxl)-strong$", |_, g| {
            format!("font-body-{}-bold", size(g))
        }),
        typography(r"^q-font-heading-(xxs|xs|sm|md|lg|xl|xxl|xxxl)$", |_, g| {
            format!("font-heading-{}", size(g))
        }),
        typography(r"^q-font-heading-(xxs|xs|sm|md|lg|xl|xxl|xxxl)-subtle$", |_, g| {
            format!("font-heading-{}", size(g))
        }),
        typography(r"^q-font-code-(xs|sm|md|lg|xl)$", |_, g| {
            format!("font-code-{}", size(g))
        }),
        typography(r"^q-font-code-(xs|sm|md|lg|xl)-strong$", |_, g| {
            format!("font-code-{}-bold", size(g))
        }),
        typography(r"^q-font-metadata-(sm|md|lg|xl)$", |_, g| {
            format!("font-body-{}", metadata_size(size(g)))
        }),
        typography(r"^q-font-metadata-(sm|md|lg|xl)-strong$", |_, g| {
            format!("font-body-{}-bold", metadata_size(size(g)))
        }),
        typography(r"^q-font-metadata-(sm|md|lg|xl)-mono$", |_, g| {
            format!("font-code-{}", metadata_size(size(g)))
        }),
    ];
    rules.extend(
        [
            ("bg-1", "bg-neutral-00"),
            ("bg-2", "bg-neutral-01"),
            ("bg-3", "bg-neutral-02"),
            ("bg-4", "bg-neutral-03"),
            ("bg-contrast-1", "bg-neutral-10"),
            ("bg-contrast-2", "bg-neutral-09"),
            ("bg-contrast-3", "bg-neutral-08"),
            ("bg-contrast-4", "bg-neutral-07"),

            ("text-primary", "text-neutral-primary"),
            ("text-secondary", "text-neutral-secondary"),
            ("text-error", "text-support-danger"),
            ("text-link", "text-link-default-idle"),
            ("text-contrast-primary", "text-neutral-inverse"),
            ("text-contrast-secondary", "text-neutral-secondary"),
            ("text-contrast-disabled", "text-disabled"),
            ("text-semantic-informative", "text-support-info"),
            ("text-semantic-negative", "text-support-danger"),
            ("text-semantic-positive", "text-support-success"),
            ("text-semantic-primary", "text-brand-primary"),
            ("text-semantic-secondary", "text-neutral-secondary"),
            ("text-semantic-warning", "text-support-warning"),
            ("text-foreground-primary", "text-icon-neutral-primary"),
            ("text-foreground-secondary", "text-icon-neutral-secondary"),
            ("text-foreground-disabled", "text-disabled-icon"),
            ("text-foreground-contrast-primary", "text-icon-neutral-inverse"),
            ("text-foreground-contrast-secondary", "text-icon-neutral-secondary"),
            ("text-foreground-contrast-disabled", "text-disabled-icon"),

            ("border-default", "border-neutral-01"),
            ("border-subtle", "border-neutral-00"),
            ("border-strong", "border-neutral-02"),
            ("border-focus", "border-focus-border"),
            ("border-contrast-default", "border-neutral-10"),
            ("border-contrast-subtle", "border-neutral-09"),
            ("border-contrast-strong", "border-neutral-10"),

            ("q-border-default", "border-neutral-01"),
            ("q-border-subtle", "border-neutral-00"),
            ("q-border-strong", "border-neutral-02"),

            ("q-background-1", "bg-neutral-01"),
            ("q-background-2", "bg-neutral-02"),
            ("q-background-3", "bg-neutral-03"),
            ("q-background-4", "bg-neutral-04"),

            ("q-text-link", "text-link-default-idle"),
            ("q-text-error", "text-support-danger"),

            ("q-elevation-1", "shadow-lowest"),
            ("q-elevation-2", "shadow-low"),
            ("q-elevation-3", "shadow-medium"),
            ("q-elevation-4", "shadow-high"),
            ("q-elevation-5", "shadow-highest"),

            ("rounded-2xl", "rounded-xxl"),

            ("font-stretch-normal", ""),
            ("font-stretch-wide", ""),
        ]
        .into_iter()
        .map(|(from, to)| ClassTransformRule::exact(from, to)),
    );
    rules
});

/// `var(--q-*)` custom properties, rewritten wherever they appear in stylesheets.
pub static TAILWIND_VARIABLE_RULES: LazyLock<Vec<ClassTransformRule>> = LazyLock::new(|| {
    [
        ("q-background-1", "color-background-neutral-01"),
        ("q-background-2", "color-background-neutral-02"),
        ("q-background-3", "color-background-neutral-03"),
        ("q-background-4", "color-background-neutral-04"),
        ("q-text-1-primary", "color-text-neutral-primary"),
        ("q-text-1-secondary", "color-text-neutral-secondary"),
        ("q-text-1-disabled", "color-utility-disabled-text"),
        ("q-text-error", "color-text-support-danger"),
        ("q-text-link", "color-interactive-text-link-default-idle"),
        ("q-border-1-default", "color-border-neutral-01"),
        ("q-border-1-subtle", "color-border-neutral-00"),
        ("q-border-1-strong", "color-border-neutral-02"),
        ("q-border-focus", "color-utility-focus-border"),
        ("q-elevation-1", "shadow-lowest"),
        ("q-elevation-2", "shadow-low"),
        ("q-elevation-3", "shadow-medium"),
        ("q-elevation-4", "shadow-high"),
        ("q-elevation-5", "shadow-highest"),
        ("q-font-family", "type-font-family-secondary"),
        ("q-font-family-brand", "type-font-family-primary"),
        ("q-font-mono", "type-font-family-tertiary"),
    ]
    .into_iter()
    .map(|(from, to)| {
        ClassTransformRule::regex(
            &format!(r"var\(--{}\)", regex::escape(from)),
            &format!("var(--{to})"),
        )
        .expect("built-in custom property pattern")
    })
    .collect()
});

/// Class rules followed by custom-property rules.
pub fn tailwind_rules() -> Vec<ClassTransformRule> {
    TAILWIND_CLASS_RULES
        .iter()
        .chain(TAILWIND_VARIABLE_RULES.iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::{ClassFileKind, transform_token};
    use std::path::Path;

    fn token(class: &str) -> Option<String> {
        transform_token(class, &tailwind_rules())
    }

    #[test]
    fn typography_scales() {
        assert_eq!(token("q-font-body-md-strong").as_deref(), Some("font-body-md-bold"));
        assert_eq!(token("q-font-heading-sm-subtle").as_deref(), Some("font-heading-sm"));
        assert_eq!(token("q-font-code-sm-strong").as_deref(), Some("font-code-sm-bold"));
        assert_eq!(token("q-font-body-xxxl"), None);
    }

    #[test]
    fn metadata_collapses_onto_body_scale() {
        assert_eq!(token("q-font-metadata-sm").as_deref(), Some("font-body-xs"));
        assert_eq!(token("q-font-metadata-md").as_deref(), Some("font-body-xs"));
        assert_eq!(token("q-font-metadata-lg").as_deref(), Some("font-body-sm"));
        assert_eq!(token("q-font-metadata-xl-strong").as_deref(), Some("font-body-md-bold"));
        assert_eq!(token("q-font-metadata-lg-mono").as_deref(), Some("font-code-sm"));
    }

    #[test]
    fn color_tokens() {
        assert_eq!(token("bg-2").as_deref(), Some("bg-neutral-01"));
        assert_eq!(token("text-semantic-warning").as_deref(), Some("text-support-warning"));
        assert_eq!(token("font-stretch-normal").as_deref(), Some(""));
        assert_eq!(token("bg-neutral-01"), None);
    }

    #[test]
    fn stylesheet_custom_properties() {
        let out = ClassFileKind::Css.rewrite(
            Path::new("theme.css"),
            ".card { box-shadow: var(--q-elevation-2); font-family: var(--q-font-family-brand); }\n",
            &tailwind_rules(),
        );
        assert_eq!(
            out.content,
            ".card { box-shadow: var(--shadow-low); font-family: var(--type-font-family-primary); }\n"
        );
        assert_eq!(out.changes.len(), 2);
    }
}
