/// Extracts a cookie's value from a raw `Cookie` header.
///
/// When the name repeats, the last occurrence wins.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        })
        .last()
}

/// A session counts as present only when the token carries something other than whitespace.
pub fn session_present(token: Option<&str>) -> bool {
    token.is_some_and(|token| !token.trim().is_empty())
}
