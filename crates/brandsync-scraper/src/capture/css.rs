//! Stylesheet filtering for captured sections.
//!
//! This is a brace-matching scanner, not a full CSS parser: it is enough to
//! walk top-level rules and the conditional group rules (`@media`,
//! `@supports`, ...) that wrap them.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment regex"));
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(-?[_a-zA-Z][_a-zA-Z0-9-]*)").expect("valid class regex"));

/// Selectors mentioning any of these are kept regardless of class usage.
const GENERIC_TOKENS: &[&str] = &["img", "grid", "brand"];

/// At-rules whose body is a list of rules to filter recursively.
const GROUP_AT_RULES: &[&str] = &["@media", "@supports", "@container", "@layer"];

struct Block<'a> {
    prelude: &'a str,
    body: &'a str,
}

/// Keeps the rules whose selector references a class in `used_classes` or a
/// generic brand-grid token. Group at-rules are kept only if something inside
/// them survives; `@font-face` is kept as-is; everything else is dropped.
#[must_use]
pub fn filter_style_rules(css: &str, used_classes: &BTreeSet<String>) -> String {
    let css = COMMENT_RE.replace_all(css, "");
    filter_blocks(&css, used_classes)
}

fn filter_blocks(css: &str, used_classes: &BTreeSet<String>) -> String {
    let mut kept: Vec<String> = Vec::new();

    for block in split_blocks(css) {
        if block.prelude.is_empty() {
            continue;
        }

        if block.prelude.starts_with('@') {
            let at_rule = block.prelude.to_ascii_lowercase();
            if GROUP_AT_RULES.iter().any(|g| at_rule.starts_with(g)) {
                let inner = filter_blocks(block.body, used_classes);
                if !inner.is_empty() {
                    kept.push(format!("{} {{\n{inner}\n}}", block.prelude));
                }
            } else if at_rule.starts_with("@font-face") {
                kept.push(format!("{} {{ {} }}", block.prelude, block.body));
            }
            continue;
        }

        if selector_is_relevant(block.prelude, used_classes) {
            kept.push(format!("{} {{ {} }}", block.prelude, block.body));
        }
    }

    kept.join("\n")
}

fn selector_is_relevant(selector: &str, used_classes: &BTreeSet<String>) -> bool {
    let lower = selector.to_ascii_lowercase();
    if GENERIC_TOKENS.iter().any(|t| lower.contains(t)) {
        return true;
    }
    CLASS_RE
        .captures_iter(selector)
        .filter_map(|c| c.get(1))
        .any(|m| used_classes.contains(m.as_str()))
}

/// Splits `css` into top-level `prelude { body }` blocks. Statement at-rules
/// such as `@import ...;` are skipped.
fn split_blocks(css: &str) -> Vec<Block<'_>> {
    let bytes = css.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b';' | b'}' => start = i + 1,
            b'{' => {
                let mut depth = 1usize;
                let mut j = i + 1;
                while j < bytes.len() && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                let body_end = if depth == 0 { j - 1 } else { j };
                blocks.push(Block {
                    prelude: css[start..i].trim(),
                    body: css[i + 1..body_end].trim(),
                });
                start = j;
                i = j;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    blocks
}
