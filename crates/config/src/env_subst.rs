//! `${VAR}` expansion for config files.

/// Config text after expansion, plus the variables that had no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub text: String,
    /// Referenced but unset variables, first-seen order, no duplicates.
    pub unresolved: Vec<String>,
}

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables keep their `${VAR}` text, which [`crate::meaningful`]
/// later reads as missing, so the channel using it stays disabled.
#[must_use]
pub fn expand_env(input: &str) -> Expanded {
    expand_env_with(input, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` references through `lookup`.
///
/// Only `[A-Za-z0-9_]+` names are expanded. Anything else after `${`,
/// including an unterminated reference, is copied through untouched.
pub fn expand_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Expanded {
    let mut text = String::with_capacity(input.len());
    let mut unresolved: Vec<String> = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        text.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let name = after.find('}').map(|end| &after[..end]).filter(|n| is_var_name(n));
        let Some(name) = name else {
            text.push_str("${");
            rest = after;
            continue;
        };

        match lookup(name) {
            Some(value) => text.push_str(&value),
            None => {
                text.push_str(&rest[start..start + name.len() + 3]);
                if !unresolved.iter().any(|v| v == name) {
                    unresolved.push(name.to_owned());
                }
            },
        }
        rest = &after[name.len() + 1..];
    }
    text.push_str(rest);

    Expanded { text, unresolved }
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
