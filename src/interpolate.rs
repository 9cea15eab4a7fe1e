//! Environment-variable interpolation for config scalars.
//!
//! Every string scalar in the configuration may contain `${NAME}`
//! placeholders. They resolve against the process environment, falling back
//! to the literal name when the variable is unset:
//!
//! ```
//! use termweave::interpolate::expand_with;
//!
//! let lookup = |name: &str| (name == "HOME").then(|| "/Users/dev".to_string());
//! assert_eq!(expand_with("cd ${HOME}/src", lookup), "cd /Users/dev/src");
//! assert_eq!(expand_with("cd ${MISSING}", |_| None), "cd MISSING");
//! ```

use serde_yaml_ng::Value;

/// Expand `${NAME}` placeholders using the process environment.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand `${NAME}` placeholders using a caller-supplied lookup.
///
/// Names are restricted to word characters (`[A-Za-z0-9_]`); anything else
/// leaves the text untouched. An unset variable expands to its bare name.
pub fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            out.push_str(&rest[..start]);
            match lookup(name) {
                Some(value) => out.push_str(&value),
                None => out.push_str(name),
            }
        } else {
            // Not a variable reference; keep the `${...}` verbatim.
            out.push_str(&rest[..start + 2 + end + 1]);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Recursively expand placeholders in every string scalar of a YAML value.
pub fn expand_value(value: Value) -> Value {
    expand_value_with(value, &|name| std::env::var(name).ok())
}

pub(crate) fn expand_value_with(
    value: Value,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Value {
    match value {
        Value::String(s) => Value::String(expand_with(&s, lookup)),
        Value::Sequence(seq) => Value::Sequence(
            seq.into_iter()
                .map(|v| expand_value_with(v, lookup))
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, expand_value_with(v, lookup)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_variable() {
        let result = expand_with("${USER}@host", |n| {
            (n == "USER").then(|| "admin".to_string())
        });
        assert_eq!(result, "admin@host");
    }

    #[test]
    fn unset_variable_falls_back_to_name() {
        assert_eq!(expand_with("dir is ${PROJECT_DIR}", |_| None), "dir is PROJECT_DIR");
    }

    #[test]
    fn multiple_placeholders() {
        let result = expand_with("${A}/${B}", |n| Some(n.to_lowercase()));
        assert_eq!(result, "a/b");
    }

    #[test]
    fn malformed_placeholders_left_alone() {
        assert_eq!(expand_with("${not closed", |_| None), "${not closed");
        assert_eq!(expand_with("${bad name}", |_| None), "${bad name}");
        assert_eq!(expand_with("no placeholders", |_| None), "no placeholders");
    }

    #[test]
    fn expands_nested_values() {
        let value: Value = serde_yaml_ng::from_str("{root: '${HOME}/src', panes: ['${X}']}")
            .unwrap();
        let expanded = expand_value_with(value, &|n| Some(format!("<{n}>")));
        let yaml = serde_yaml_ng::to_string(&expanded).unwrap();
        assert!(yaml.contains("<HOME>/src"));
        assert!(yaml.contains("<X>"));
    }
}
