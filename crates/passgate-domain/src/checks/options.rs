//! Permissive readers for check options: a missing or mistyped value yields the default.

use serde_json::{Map, Value};

/// Raw option map of a configured check.
pub type Options = Map<String, Value>;

pub const ABORT_ON_FAIL: &str = "abortOnFail";
pub const MFA_ON_FAIL: &str = "mfaOnFail";

pub fn bool_option(options: &Options, key: &str, default: bool) -> bool {
    options.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn str_option<'a>(options: &'a Options, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Value::as_str)
}

pub fn int_option(options: &Options, key: &str) -> Option<i64> {
    options.get(key).and_then(Value::as_i64)
}

/// An array of integers; any non-integer element discards the whole list.
pub fn int_list_option(options: &Options, key: &str) -> Option<Vec<i64>> {
    options
        .get(key)
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(Value::as_i64).collect())
}
