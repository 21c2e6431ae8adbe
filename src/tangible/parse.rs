//! Reply parsers for the typed expectations. All are pure; a `None` or `Err`
//! becomes a `Failure` response upstream.

use std::fmt::Display;

use serde::de::DeserializeOwned;

/// True if the reply admits not knowing the answer.
#[must_use]
pub fn i_dont_know(reply: &str) -> bool {
    reply
        .trim()
        .to_lowercase()
        .replace('\u{2019}', "'")
        .contains("i don't know")
}

#[must_use]
pub fn parse_boolean(reply: &str) -> Option<bool> {
    boolean_token(&normalize_token(reply))
}

/// Boolean spelling shared by replies and table cells. Expects lowercase.
pub(crate) fn boolean_token(token: &str) -> Option<bool> {
    match token {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a finite floating-point literal after trimming whitespace.
#[must_use]
pub fn parse_number(reply: &str) -> Option<f64> {
    reply
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Match the reply against the display form of `options`, case-insensitively.
///
/// An exact match wins; otherwise quotes and trailing dots are ignored on both
/// sides.
pub fn parse_enum_case<'a, T: Display>(reply: &str, options: &'a [T]) -> Option<&'a T> {
    let exact = reply.trim().to_lowercase();
    options
        .iter()
        .find(|option| option.to_string().to_lowercase() == exact)
        .or_else(|| {
            let token = normalize_token(reply);
            options
                .iter()
                .find(|option| normalize_token(&option.to_string()) == token)
        })
}

/// Parse a comma-separated subset of `options`, returned in option order.
///
/// A lone "None" is the empty set unless "None" is itself an option.
pub fn parse_enum_cases<'a, T: Display>(reply: &str, options: &'a [T]) -> Option<Vec<&'a T>> {
    let tokens: Vec<&str> = reply
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return None;
    }
    if tokens.len() == 1 && normalize_token(tokens[0]) == "none" && parse_enum_case(tokens[0], options).is_none() {
        return Some(Vec::new());
    }
    let chosen = tokens
        .iter()
        .map(|t| parse_enum_case(t, options))
        .collect::<Option<Vec<_>>>()?;
    Some(
        options
            .iter()
            .filter(|o| chosen.iter().any(|c| std::ptr::eq(*c, *o)))
            .collect(),
    )
}

/// Non-empty trimmed lines of the reply.
#[must_use]
pub fn parse_items(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode a JSON reply, unwrapping a Markdown code fence if present.
///
/// # Errors
///
/// Returns the decode error if the (unwrapped) reply is not a valid `T`.
pub fn parse_json<T: DeserializeOwned>(reply: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(reply))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn normalize_token(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_end_matches('.')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
