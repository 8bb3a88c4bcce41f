/// Reduce a URL-like string to a bare, lowercased host.
///
/// Every occurrence of `http://`, `https://` and `www.` is removed (not only a
/// leading one), then everything from the first `/` on is dropped. Absent or
/// empty input yields an empty string. Never fails.
///
/// `www.` removal repeats until none is left so that the function is
/// idempotent even for inputs like `wwwwww..`, where a single pass would
/// splice a new `www.` together.
pub fn normalize_domain<'a>(url: impl Into<Option<&'a str>>) -> String {
    let url: Option<&str> = url.into();
    let url = match url {
        Some(u) if !u.is_empty() => u,
        _ => return String::new(),
    };

    let mut host = url
        .to_lowercase()
        .replace("http://", "")
        .replace("https://", "");
    while host.contains("www.") {
        host = host.replace("www.", "");
    }

    match host.split_once('/') {
        Some((head, _)) => head.to_string(),
        None => host,
    }
}
