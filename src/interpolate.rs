//! Perform `${scheme:key}` placeholder replacement given an `input` string.
//!
//! The crate leans on this module twice: configuration files may embed
//! `${env:key}` tokens in any string value, and record templates (see the
//! [`Format`][enum@crate::config::model::Format] constants) are plain strings
//! holding `${rec:field}` tokens that a formatter resolves per log record.
//!
//! - The `scheme` names the lookup method, think of it as picking a map:
//!   `env` is the process environment, `rec` is the current log record.
//!   Schemes are arbitrary, they only mean something to a resolver function.
//! - The `key` is looked up within the chosen scheme, so `${env:HOME}`
//!   resolves to the `HOME` environment variable.
//!
//! There is no placeholder escaping: `scheme` may not contain `:` or `}` and
//! `key` may not contain `}`.
//!
//! # Resolver function
//! Every resolve call takes a resolver closure `FnMut(&str, &str) ->
//! Result<Option<String>, E>` receiving `scheme` and `key`:
//! - return `Ok(None)` for schemes (or keys) the resolver does not
//!   recognize; the placeholder is left in the output untouched.
//! - return `Ok(Some(value))` to replace the placeholder.
//! - return `Err(e)` to abort the whole resolve with that error.
//!
//! Results are cached per `scheme:key` pair within one call, so a resolver
//! is invoked at most once for each distinct placeholder.

pub use self::error::VarError;

use std::collections::HashMap;

/// Perform `${scheme:key}` placeholder replacement given an `input` string.
/// See [`module`][mod@self] level docs.
///
/// # Returns
/// - `Ok`(`interpolated_input`)
/// - `Err`(`resolver_error`) in case `resolver` returns an `Err`.
pub fn resolve<E, F>(input: &str, mut resolver: F) -> Result<String, E>
where
    F: FnMut(&str, &str) -> Result<Option<String>, E>,
    E: std::error::Error,
{
    Ok(resolve_cached(input, &mut HashMap::new(), &mut resolver)?.0)
}

/// Iteratively calls [`resolve`][fn@resolve] with a shared cache up to `depth` times
/// by feeding its own output back in as `input`.
///
/// Use this when resolved values may themselves contain placeholders, for
/// example an environment variable whose value names another one.
/// Iteration stops early once a pass resolves nothing.
pub fn resolve_recursive<E, F>(input: &str, depth: u8, mut resolver: F) -> Result<String, E>
where
    F: FnMut(&str, &str) -> Result<Option<String>, E>,
    E: std::error::Error,
{
    let mut cache: HashMap<(String, String), Option<String>> = HashMap::new();
    let mut result = input.to_owned();
    for _ in 0..depth {
        let (next, replaced_any) = resolve_cached(&result, &mut cache, &mut resolver)?;
        result = next;
        if !replaced_any {
            break;
        }
    }
    Ok(result)
}

/// Perform `${scheme:key}` placeholder replacement where the resolver cannot fail.
///
/// Convenience wrapper over [`resolve`][fn@resolve] with an
/// [`Infallible`][enum@std::convert::Infallible] error type.
pub fn resolve_infallible<F>(input: &str, mut resolver: F) -> String
where
    F: FnMut(&str, &str) -> Option<String>,
{
    match resolve::<std::convert::Infallible, _>(input, |scheme, key| Ok(resolver(scheme, key))) {
        Ok(resolved) => resolved,
        Err(infallible) => match infallible {},
    }
}

/// Replaces `${scheme:key}` placeholders whose scheme equals `match_scheme`
/// with the value of the environment variable named `key`.
///
/// A placeholder with a matching scheme whose variable is missing or not
/// unicode is an error rather than being silently skipped; placeholders with
/// other schemes are left untouched.
pub fn resolve_from_env(input: &str, match_scheme: &str) -> Result<String, VarError> {
    resolve::<VarError, _>(input, |scheme, key| {
        if scheme == match_scheme {
            Ok(Some(std::env::var(key).map_err(|err| VarError::from_std(key, err))?))
        } else {
            Ok(None)
        }
    })
}

/// Recursive version of [`resolve_from_env`][fn@resolve_from_env]; resolves up to `depth` passes
/// so environment variable values may themselves contain `${match_scheme:key}` tokens.
pub fn resolve_from_env_recursive(
    input: &str,
    depth: u8,
    match_scheme: &str,
) -> Result<String, VarError> {
    resolve_recursive::<VarError, _>(input, depth, |scheme, key| {
        if scheme == match_scheme {
            Ok(Some(std::env::var(key).map_err(|err| VarError::from_std(key, err))?))
        } else {
            Ok(None)
        }
    })
}

/// Single scan over `input`, replacing complete `${scheme:key}` tokens.
///
/// Returns the interpolated string and whether the resolver replaced
/// anything (used by the recursive variants to stop early). Incomplete
/// tokens at the end of input are copied through verbatim.
fn resolve_cached<E, F>(
    input: &str,
    cache: &mut HashMap<(String, String), Option<String>>,
    resolver: &mut F,
) -> Result<(String, bool), E>
where
    F: FnMut(&str, &str) -> Result<Option<String>, E>,
    E: std::error::Error,
{
    let mut result = String::with_capacity(input.len());
    let mut replaced_any = false;
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let token = &rest[start + 2..];
        let (end, colon) = match (token.find('}'), token.find(':')) {
            (Some(end), Some(colon)) if colon < end => (end, colon),
            // no closing brace, or no scheme separator inside the braces
            _ => {
                result.push_str("${");
                rest = token;
                continue;
            }
        };

        let scheme = &token[..colon];
        let key = &token[colon + 1..end];

        let value = match cache.get(&(scheme.to_owned(), key.to_owned())) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = resolver(scheme, key)?;
                cache.insert((scheme.to_owned(), key.to_owned()), resolved.clone());
                resolved
            }
        };

        match value {
            Some(value) => {
                replaced_any = true;
                result.push_str(&value);
            }
            None => {
                result.push_str("${");
                result.push_str(scheme);
                result.push(':');
                result.push_str(key);
                result.push('}');
            }
        }
        rest = &token[end + 1..];
    }

    result.push_str(rest);
    Ok((result, replaced_any))
}

/// Interpolation for [`toml`][mod@::toml] [`Value`][enum@::toml::Value]s.
pub mod toml {
    use super::error::VarError;
    use toml::Value as TomlValue;

    /// Recursively replaces `${env:key}` placeholders with environment
    /// variable values in every string found inside `value`.
    /// See [`resolve_from_env_recursive`][fn@super::resolve_from_env_recursive].
    pub fn resolve_from_env_recursive(value: &mut TomlValue, depth: u8) -> Result<(), VarError> {
        match value {
            TomlValue::String(str_val) => {
                *str_val = super::resolve_from_env_recursive(str_val, depth, "env")?;
                Ok(())
            }
            TomlValue::Table(map) => {
                for (_key, val) in map.iter_mut() {
                    resolve_from_env_recursive(val, depth)?;
                }
                Ok(())
            }
            TomlValue::Array(array) => {
                for val in array.iter_mut() {
                    resolve_from_env_recursive(val, depth)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Interpolation errors
mod error {
    use std::env::VarError as StdVarError;
    use std::error::Error as StdError;
    use std::ffi::OsString;
    use std::fmt::Display;
    use std::fmt::Formatter;
    use std::fmt::Result as FmtResult;

    /// The same error type as [`std::env::VarError`][enum@StdVarError] with
    /// the originally requested `key` attached.
    #[derive(Debug)]
    pub enum VarError {
        NotPresent { key: String },
        NotUnicode { key: String, value: OsString },
    }

    impl StdError for VarError {}

    impl Display for VarError {
        fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
            match &self {
                VarError::NotPresent { key } => write!(f, "environment variable `{key}` not found"),
                VarError::NotUnicode { key, ref value } => {
                    write!(
                        f,
                        "environment variable `{key}` was not valid unicode: {:?}",
                        value
                    )
                }
            }
        }
    }

    impl VarError {
        pub fn from_std(key: &str, err: StdVarError) -> Self {
            match err {
                StdVarError::NotPresent => Self::NotPresent {
                    key: key.to_owned(),
                },
                StdVarError::NotUnicode(os_str) => Self::NotUnicode {
                    key: key.to_owned(),
                    value: os_str,
                },
            }
        }
    }
}
