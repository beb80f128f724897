// Variable token scanning and interpolation for template bodies
// A token is `{{name}}` where name is one or more of [A-Za-z0-9_]

use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("valid token pattern"))
}

/// Returns the distinct variable names in `content`, in order of first appearance
///
/// # Example
/// ```
/// use promptdeck_api::domain::template::variables::extract_variables;
///
/// assert_eq!(extract_variables("{{b}} {{a}} {{b}}"), vec!["b", "a"]);
/// ```
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    token_pattern()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Substitutes every recognised token with its value from `variables`
///
/// Tokens whose value is absent or empty stay literal. Substituted values are
/// not scanned again, so a value containing `{{other}}` is emitted as-is.
///
/// # Example
/// ```
/// use promptdeck_api::domain::template::variables::render;
/// use std::collections::BTreeMap;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("name".to_string(), "World".to_string());
/// vars.insert("greeting".to_string(), String::new());
///
/// assert_eq!(render("{{greeting}}, {{name}}!", &vars), "{{greeting}}, World!");
/// ```
pub fn render(content: &str, variables: &BTreeMap<String, String>) -> String {
    token_pattern()
        .replace_all(content, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Approximate language-model token count: one token per four characters, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
