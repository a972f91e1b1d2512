//! Built-in case conversion helpers.
//!
//! Every helper goes through [`split_words`], so `"my-app"`, `"my_app"`,
//! `"myApp"` and `"MyApp"` all convert the same way.

/// Names the renderer resolves without a catalog entry.
pub const BUILTIN_HELPERS: &[&str] = &[
    "camelCase",
    "constantCase",
    "dotCase",
    "kebabCase",
    "lowerCase",
    "pascalCase",
    "snakeCase",
    "trainCase",
    "upperCase",
];

/// Apply the built-in helper `name`, or `None` if there is no such helper.
pub fn apply_builtin(name: &str, input: &str) -> Option<String> {
    let out = match name {
        "camelCase" => camel(input),
        "constantCase" => split_words(input).join("_").to_uppercase(),
        "dotCase" => split_words(input).join("."),
        "kebabCase" => split_words(input).join("-"),
        "lowerCase" => input.to_lowercase(),
        "pascalCase" => split_words(input).iter().map(|w| capitalize(w)).collect(),
        "snakeCase" => split_words(input).join("_"),
        "trainCase" => split_words(input)
            .iter()
            .map(|w| capitalize(w))
            .collect::<Vec<_>>()
            .join("-"),
        "upperCase" => input.to_uppercase(),
        _ => return None,
    };
    Some(out)
}

fn camel(input: &str) -> String {
    let mut words = split_words(input).into_iter();
    let mut out = words.next().unwrap_or_default();
    out.extend(words.map(|w| capitalize(&w)));
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercased words of `input`.
///
/// Boundaries: `_`, `-`, `.`, `/` and whitespace; a lower→upper transition
/// (`myApp`); the last capital of an acronym run (`HTTPServer` → `http`,
/// `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if matches!(c, '_' | '-' | '.' | '/') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            continue;
        }

        current.push(c);

        let Some(&next) = chars.peek() else { break };
        let camel_break = (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase();
        let acronym_break = c.is_uppercase()
            && next.is_uppercase()
            && chars.clone().nth(1).is_some_and(char::is_lowercase);
        if camel_break || acronym_break {
            words.push(std::mem::take(&mut current).to_lowercase());
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_mixed_conventions() {
        assert_eq!(split_words("my-app"), ["my", "app"]);
        assert_eq!(split_words("my_awesome app"), ["my", "awesome", "app"]);
        assert_eq!(split_words("myAwesomeApp"), ["my", "awesome", "app"]);
        assert_eq!(split_words("XMLHttpRequest"), ["xml", "http", "request"]);
        assert_eq!(split_words("HTTPServer"), ["http", "server"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn builtin_conversions() {
        let cases = [
            ("camelCase", "user profile", "userProfile"),
            ("constantCase", "userProfile", "USER_PROFILE"),
            ("dotCase", "UserProfile", "user.profile"),
            ("kebabCase", "UserProfile", "user-profile"),
            ("pascalCase", "user-profile", "UserProfile"),
            ("snakeCase", "HTTPRequest", "http_request"),
            ("trainCase", "user profile", "User-Profile"),
            ("upperCase", "abc", "ABC"),
            ("lowerCase", "AbC", "abc"),
        ];
        for (helper, input, expected) in cases {
            assert_eq!(apply_builtin(helper, input).as_deref(), Some(expected), "{helper}");
        }
    }

    #[test]
    fn every_listed_helper_exists() {
        for name in BUILTIN_HELPERS {
            assert!(apply_builtin(name, "x").is_some(), "{name}");
        }
        assert!(apply_builtin("shout", "x").is_none());
    }
}
