/// Returns the first keyword contained in `haystack`, which must already be lower-cased.
pub fn find_keyword<'a>(haystack: &str, keywords: &'a [String]) -> Option<&'a str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|keyword| haystack.contains(keyword))
}

/// Removes every occurrence of `marker` and of its lower-cased form, then trims.
pub fn remove_marker(text: &str, marker: &str) -> String {
    text.replace(marker, "")
        .replace(&marker.to_lowercase(), "")
        .trim()
        .to_string()
}

/// Keeps the first occurrence of each keyword, preserving order.
pub fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if !unique.contains(&keyword) {
            unique.push(keyword);
        }
    }
    unique
}
