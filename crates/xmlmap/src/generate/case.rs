//! Identifier case conversion
//!
//! Both directions share one word splitter: words break on non-alphanumeric
//! separators, on lower-to-upper camel boundaries, and at the end of an
//! acronym run (`USALtd` splits as `USA` + `Ltd`). Digit runs separate
//! words and are dropped, so `SomeValue45` normalizes to `some_value`.

/// Convert to snake_case; idempotent on its own output
pub fn to_snake_case(input: &str) -> String {
    split_words(input).join("_")
}

/// Convert to PascalCase
pub fn to_pascal_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| capitalize(word))
        .collect()
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() || c.is_ascii_digit() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).and_then(|p| chars.get(p));
        let next = chars.get(i + 1);
        let boundary = c.is_ascii_uppercase()
            && prev.is_some_and(|p| {
                p.is_ascii_lowercase()
                    || (p.is_ascii_uppercase() && next.is_some_and(char::is_ascii_lowercase))
            });
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
