use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.NAME }}` and `{{ env.NAME | default("value") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute environment placeholders in raw config text
///
/// Comment lines are left alone so a disabled setting never requires
/// its variable to exist.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    Ok(lines.join("\n"))
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(name) = key.strip_prefix("env.").filter(|name| !name.is_empty() && !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[upstream]\nbase_url = \"http://localhost\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variable() {
        temp_env::with_var("CONDUIT_TEST_KEY", Some("sk-test"), || {
            let result = expand_env("api_key = \"{{ env.CONDUIT_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-test\"");
        });
    }

    #[test]
    fn substitutes_several_on_one_line() {
        temp_env::with_vars([("CONDUIT_A", Some("a")), ("CONDUIT_B", Some("b"))], || {
            let result = expand_env("x = \"{{env.CONDUIT_A}}-{{ env.CONDUIT_B }}\"").unwrap();
            assert_eq!(result, "x = \"a-b\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("CONDUIT_MISSING", || {
            let err = expand_env("api_key = \"{{ env.CONDUIT_MISSING }}\"").unwrap_err();
            assert!(err.contains("CONDUIT_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("CONDUIT_OPTIONAL", || {
            let result = expand_env("org = \"{{ env.CONDUIT_OPTIONAL | default(\"acme\") }}\"").unwrap();
            assert_eq!(result, "org = \"acme\"");
        });
        temp_env::with_var("CONDUIT_OPTIONAL", Some("set"), || {
            let result = expand_env("org = \"{{ env.CONDUIT_OPTIONAL | default(\"acme\") }}\"").unwrap();
            assert_eq!(result, "org = \"set\"");
        });
    }

    #[test]
    fn rejects_unscoped_keys() {
        let err = expand_env("x = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("CONDUIT_MISSING", || {
            let input = "  # api_key = \"{{ env.CONDUIT_MISSING }}\"\nmodel = \"gpt-5\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
