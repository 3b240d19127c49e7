//! `%name%` parameter expansion in configuration values.

use crate::errors::{Error, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([\w.\-]*)%").expect("parameter pattern is valid"));

pub type Parameters = BTreeMap<String, String>;

/// Replace every `%name%` in `value` with the named parameter. `%%` is a
/// literal percent sign; parameters may reference other parameters.
pub fn expand(value: &str, parameters: &Parameters) -> Result<String> {
    expand_with_stack(value, parameters, &mut Vec::new())
}

fn expand_with_stack(value: &str, parameters: &Parameters, stack: &mut Vec<String>) -> Result<String> {
    let mut expanded = String::with_capacity(value.len());
    let mut last = 0;

    for captures in PARAMETER.captures_iter(value) {
        let whole = captures.get(0).map(|m| m.range()).unwrap_or_default();
        expanded.push_str(&value[last..whole.start]);
        expanded.push_str(&substitute(&captures, parameters, stack)?);
        last = whole.end;
    }
    expanded.push_str(&value[last..]);

    Ok(expanded)
}

fn substitute(captures: &Captures, parameters: &Parameters, stack: &mut Vec<String>) -> Result<String> {
    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    if name.is_empty() {
        return Ok("%".to_string());
    }
    if stack.iter().any(|entry| entry == name) {
        return Err(Error::configuration(format!(
            "Circular reference detected for parameter %{name}%"
        )));
    }

    let raw = parameters
        .get(name)
        .ok_or_else(|| Error::configuration(format!("Missing parameter '{name}'")))?;

    stack.push(name.to_string());
    let resolved = expand_with_stack(raw, parameters, stack);
    stack.pop();
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::from([
            ("appDir".to_string(), "/srv/app".to_string()),
            ("tempDir".to_string(), "%appDir%/../temp".to_string()),
            ("loop".to_string(), "%loop%".to_string()),
        ])
    }

    #[test]
    fn test_expand_simple_parameter() {
        assert_eq!(
            expand("%appDir%/../temp/proxies", &params()).unwrap(),
            "/srv/app/../temp/proxies"
        );
    }

    #[test]
    fn test_expand_nested_parameter() {
        assert_eq!(expand("%tempDir%/x", &params()).unwrap(), "/srv/app/../temp/x");
    }

    #[test]
    fn test_expand_literal_percent() {
        assert_eq!(expand("100%% sure", &params()).unwrap(), "100% sure");
        assert_eq!(expand("no parameters", &params()).unwrap(), "no parameters");
    }

    #[test]
    fn test_missing_parameter_is_configuration_error() {
        let err = expand("%vendorDir%/lib", &params()).unwrap_err();
        assert!(matches!(err, Error::Configuration(msg) if msg.contains("vendorDir")));
    }

    #[test]
    fn test_circular_parameter_is_rejected() {
        assert!(expand("%loop%", &params()).is_err());
    }
}
