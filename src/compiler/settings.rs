//! Plugin settings to environment conversion
//!
//! Plugins read their parameters from `PLUGIN_<NAME>` variables. Scalars are
//! passed as text, lists of scalars comma separated, and anything else as
//! JSON. A `{ from_secret: name }` value is replaced by the secret's value.

use crate::pipeline::SettingsError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

const ENV_PREFIX: &str = "PLUGIN_";
const FROM_SECRET: &str = "from_secret";

/// Writes `settings` into `env` as `PLUGIN_*` variables.
///
/// `secrets` holds the values of the secrets the step may read, keyed by
/// lowercased name.
///
/// # Errors
///
/// Fails if a `from_secret` reference names a secret not in `secrets`, or if
/// a value cannot be encoded.
pub fn params_to_env(
    settings: &BTreeMap<String, Value>,
    env: &mut HashMap<String, String>,
    secrets: &HashMap<String, String>,
) -> Result<(), SettingsError> {
    for (key, value) in settings {
        let value = resolve_secrets(value, secrets)?;
        let encoded = encode(&value).map_err(|err| SettingsError::Encode {
            key: key.clone(),
            reason: err.to_string(),
        })?;
        env.insert(env_key(key), encoded);
    }
    Ok(())
}

/// Returns the environment variable name of a setting
#[must_use]
pub fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_uppercase().replace(['.', '-'], "_"))
}

fn secret_reference(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get(FROM_SECRET)?.as_str(),
        _ => None,
    }
}

fn resolve_secrets(value: &Value, secrets: &HashMap<String, String>) -> Result<Value, SettingsError> {
    if let Some(name) = secret_reference(value) {
        return secrets
            .get(&name.to_lowercase())
            .map(|secret| Value::String(secret.clone()))
            .ok_or_else(|| SettingsError::SecretNotFound {
                name: name.to_string(),
            });
    }

    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_secrets(item, secrets))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), resolve_secrets(v, secrets)?)))
            .collect::<Result<serde_json::Map<_, _>, SettingsError>>()
            .map(Value::Object),
        _ => Ok(value.clone()),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn encode(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Array(items) => match items.iter().map(scalar).collect::<Option<Vec<_>>>() {
            Some(parts) => Ok(parts.join(",")),
            None => serde_json::to_string(value),
        },
        Value::Object(_) => serde_json::to_string(value),
        other => Ok(scalar(other).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn settings(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn convert(
        value: Value,
        secrets: &[(&str, &str)],
    ) -> Result<HashMap<String, String>, SettingsError> {
        let secrets = secrets
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut env = HashMap::new();
        params_to_env(&settings(value), &mut env, &secrets)?;
        Ok(env)
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("repo"), "PLUGIN_REPO");
        assert_eq!(env_key("cache-from.registry"), "PLUGIN_CACHE_FROM_REGISTRY");
    }

    #[test]
    fn test_scalars() {
        let env = convert(
            json!({"repo": "org/app", "dry_run": true, "retries": 3, "ratio": 0.5, "empty": null}),
            &[],
        )
        .unwrap();
        assert_eq!(env["PLUGIN_REPO"], "org/app");
        assert_eq!(env["PLUGIN_DRY_RUN"], "true");
        assert_eq!(env["PLUGIN_RETRIES"], "3");
        assert_eq!(env["PLUGIN_RATIO"], "0.5");
        assert_eq!(env["PLUGIN_EMPTY"], "");
    }

    #[test]
    fn test_scalar_list_is_comma_joined() {
        let env = convert(json!({"tags": ["latest", "1.0", 2]}), &[]).unwrap();
        assert_eq!(env["PLUGIN_TAGS"], "latest,1.0,2");
    }

    #[test]
    fn test_complex_values_are_json() {
        let env = convert(
            json!({
                "build_args": {"GOOS": "linux"},
                "targets": [{"name": "a"}, {"name": "b"}]
            }),
            &[],
        )
        .unwrap();
        assert_eq!(env["PLUGIN_BUILD_ARGS"], r#"{"GOOS":"linux"}"#);
        assert_eq!(env["PLUGIN_TARGETS"], r#"[{"name":"a"},{"name":"b"}]"#);
    }

    #[test]
    fn test_from_secret() {
        let env = convert(
            json!({"password": {"from_secret": "Docker_Password"}}),
            &[("docker_password", "pw")],
        )
        .unwrap();
        assert_eq!(env["PLUGIN_PASSWORD"], "pw");
    }

    #[test]
    fn test_from_secret_nested() {
        let env = convert(
            json!({
                "keys": [{"from_secret": "a"}, {"from_secret": "b"}],
                "auth": {"token": {"from_secret": "a"}}
            }),
            &[("a", "1"), ("b", "2")],
        )
        .unwrap();
        assert_eq!(env["PLUGIN_KEYS"], "1,2");
        assert_eq!(env["PLUGIN_AUTH"], r#"{"token":"1"}"#);
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = convert(json!({"password": {"from_secret": "nope"}}), &[("other", "x")])
            .unwrap_err();
        assert_eq!(
            err,
            SettingsError::SecretNotFound {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_existing_env_is_overwritten() {
        let mut env = HashMap::from([("PLUGIN_REPO".to_string(), "old".to_string())]);
        params_to_env(&settings(json!({"repo": "new"})), &mut env, &HashMap::new()).unwrap();
        assert_eq!(env["PLUGIN_REPO"], "new");
    }
}
