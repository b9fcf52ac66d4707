use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NEWLINE_INDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]\s*").expect("valid newline indent regex"));

/// Trim, drop line breaks and collapse whitespace runs left by pretty-printing.
pub fn clean_text(input: &str) -> String {
    WHITESPACE_RE.replace_all(input.trim(), " ").into_owned()
}

/// Remove line breaks together with the indentation that follows them.
pub fn strip_line_breaks(input: &str) -> String {
    NEWLINE_INDENT_RE.replace_all(input, "").into_owned()
}

/// Remove every ASCII punctuation character.
pub fn strip_punctuation(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Remove `chars` from the string.
pub fn remove_chars(input: &str, chars: &[char]) -> String {
    input.chars().filter(|c| !chars.contains(c)).collect()
}

/// Turn a catalogued "Last, First" name into "First Last".
pub fn reverse_name(name: &str) -> String {
    let mut parts: Vec<&str> = name
        .trim()
        .trim_matches(',')
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    parts.reverse();
    parts.join(" ")
}

/// Uppercase the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Remove whole-word occurrences of `words`, then collapse whitespace.
pub fn remove_words<S: AsRef<str>>(input: &str, words: &[S]) -> String {
    let kept: Vec<&str> = input
        .split_whitespace()
        .filter(|token| !words.iter().any(|word| word.as_ref() == *token))
        .collect();
    kept.join(" ")
}

pub fn contains_word(input: &str, word: &str) -> bool {
    input.split_whitespace().any(|token| token == word)
}
