use termlog_config::interpolate::{
    resolve, resolve_from_env, resolve_infallible, resolve_recursive, VarError,
};

use std::collections::HashMap;

#[cfg(test)]
mod http {
    #[derive(Debug, thiserror::Error)]
    pub enum HttpError {
        #[error("SomeError")]
        SomeError,
    }
    pub fn get(s: String) -> Result<String, HttpError> {
        if s == "unknown" {
            return Err(HttpError::SomeError);
        }
        Ok("John Doe".to_owned())
    }
}

#[test]
fn test_http_resolver() -> Result<(), self::http::HttpError> {
    // the resolver recognizes the http scheme and leaves ${s:k} untouched
    let input = "Hello ${http:username}, have a nice day. The following is a placeholder that should not be replaced : ${s:k}. We reiterate that your name is : ${http:username}";
    let input = resolve::<self::http::HttpError, _>(input, |scheme, key| {
        if scheme == "http" {
            let value = self::http::get(format!("http://localhost:8080/variables/{}", key))?;
            return Ok(Some(value));
        }
        Ok(None)
    })?;

    assert_eq!(input, "Hello John Doe, have a nice day. The following is a placeholder that should not be replaced : ${s:k}. We reiterate that your name is : John Doe");
    Ok(())
}

#[test]
fn test_resolver_called_once_per_key() {
    let mut calls = 0;
    let input = "${map:a} ${map:b} ${map:a} ${map:a}";
    let resolved = resolve_infallible(input, |scheme, key| {
        calls += 1;
        if scheme == "map" {
            return Some(key.to_uppercase());
        }
        None
    });

    assert_eq!(resolved, "A B A A");
    // the cache makes sure a and b are each resolved exactly once
    assert_eq!(calls, 2);
}

#[test]
fn test_incomplete_tokens_pass_through() {
    let resolved = resolve_infallible("no colon ${nocolon} and no brace ${x:y", |_scheme, _key| {
        Some("replaced".to_owned())
    });
    assert_eq!(resolved, "no colon ${nocolon} and no brace ${x:y");
}

#[test]
fn test_resolve_inf() {
    let mut map = HashMap::new();
    map.insert("username".to_owned(), "John".to_owned());

    let input = "Hello ${hashmap:username}";
    let greeting = resolve_infallible(input, |scheme, key| {
        if scheme == "hashmap" {
            return map.get(key).cloned();
        }
        None
    });
    assert_eq!(greeting, "Hello John");
}

#[test]
fn test_resolve_env() -> Result<(), VarError> {
    std::env::set_var("termlog_test_user", "John");

    let greeting = resolve_from_env("Hello ${env:termlog_test_user}", "env")?;
    assert_eq!(greeting, "Hello John");

    // schemes other than the requested one are left untouched
    let untouched = resolve_from_env("${other:termlog_test_user}", "env")?;
    assert_eq!(untouched, "${other:termlog_test_user}");

    Ok(())
}

#[test]
fn test_resolve_env_missing_is_an_error() {
    let result = resolve_from_env("${env:termlog_test_no_such_variable}", "env");
    assert!(
        matches!(result, Err(VarError::NotPresent { key }) if key == "termlog_test_no_such_variable")
    );
}

#[test]
fn test_resolve_recursive() {
    let mut map = HashMap::new();
    map.insert(
        "username".to_owned(),
        "Username contains a placeholder {${hashmap:actual_name}}".to_owned(),
    );
    map.insert("actual_name".to_owned(), "John".to_owned());
    map.insert("code".to_owned(), "Red".to_owned());

    map.insert("1".to_owned(), "${hashmap:2}".to_owned());
    map.insert("2".to_owned(), "${hashmap:3}".to_owned());
    map.insert("3".to_owned(), "${hashmap:4}".to_owned());
    map.insert("4".to_owned(), "${hashmap:5}".to_owned());
    map.insert("5".to_owned(), "${hashmap:6}".to_owned());
    map.insert("6".to_owned(), "${hashmap:7}".to_owned());
    map.insert("7".to_owned(), "Seven".to_owned());

    let input = "Hello \"${hashmap:username}\", code is ${hashmap:code}, depth is := ${hashmap:1}.";
    let greeting = resolve_recursive::<std::convert::Infallible, _>(input, 7, |scheme, key| {
        if scheme == "hashmap" {
            return Ok(map.get(key).cloned());
        }
        Ok(None)
    })
    // it's safe to unwrap infallible
    .unwrap();

    assert_eq!(
        greeting,
        "Hello \"Username contains a placeholder {John}\", code is Red, depth is := Seven."
    );
}

#[test]
fn test_resolve_recursive_depth_limit() {
    let mut map = HashMap::new();
    map.insert("1".to_owned(), "${hashmap:2}".to_owned());
    map.insert("2".to_owned(), "${hashmap:3}".to_owned());
    map.insert("3".to_owned(), "done".to_owned());

    // two passes are not enough to reach the end of the chain
    let shallow = resolve_recursive::<std::convert::Infallible, _>("${hashmap:1}", 2, |s, k| {
        Ok(if s == "hashmap" { map.get(k).cloned() } else { None })
    })
    .unwrap();
    assert_eq!(shallow, "${hashmap:3}");

    let deep = resolve_recursive::<std::convert::Infallible, _>("${hashmap:1}", 5, |s, k| {
        Ok(if s == "hashmap" { map.get(k).cloned() } else { None })
    })
    .unwrap();
    assert_eq!(deep, "done");
}

#[test]
fn test_resolve_toml_value() -> Result<(), VarError> {
    std::env::set_var("termlog_test_log_dir", "/var/log/app");

    let mut value: toml::Value = toml::from_str(
        r#"
        [handler.audit]
        type = "file"
        path = "${env:termlog_test_log_dir}/audit.log"
        "#,
    )
    .expect("valid toml");

    termlog_config::interpolate::toml::resolve_from_env_recursive(&mut value, 5)?;

    let path = value["handler"]["audit"]["path"].as_str().unwrap();
    assert_eq!(path, "/var/log/app/audit.log");
    Ok(())
}
