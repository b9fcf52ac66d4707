use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::{Entity, EntityLabel, NlpModel};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("valid token regex"));

const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "St", "Jr", "Sr", "Co", "Inc", "Ltd", "Bros", "ca", "c", "vol",
    "no", "op", "Prof", "Rev", "Mt",
];

const ORG_KEYWORDS: &[&str] = &[
    "Association", "Band", "Bros", "Brothers", "Choir", "Church", "Club", "Co", "College",
    "Company", "Corporation", "Department", "Ensemble", "Foundation", "Inc", "Institute",
    "Library", "Ltd", "Museum", "Orchestra", "Press", "Publishers", "Publishing", "Quartet",
    "Records", "School", "Society", "Sons", "Theater", "Theatre", "University",
];

const CONNECTORS: &[&str] = &[
    "of", "de", "del", "della", "la", "le", "van", "von", "der", "du", "&",
];

const LEADING_STOPWORDS: &[&str] = &[
    "A", "An", "The", "This", "These", "That", "In", "On", "At", "For", "From", "With", "By",
    "Of", "Papers", "Letters", "Records", "Materials",
];

/// Deterministic, dependency-free default for [`NlpModel`].
///
/// Sentences end at `.`, `!` or `?` followed by whitespace and an uppercase
/// letter or digit, except after common abbreviations and initials. Entities
/// are runs of capitalized words; runs containing an organization keyword
/// are organizations, runs of two to four words are people.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNlp;

impl RuleBasedNlp {
    pub fn new() -> Self {
        Self
    }
}

impl NlpModel for RuleBasedNlp {
    fn sentences(&self, text: &str) -> Vec<String> {
        let tokens: Vec<_> = TOKEN_RE.find_iter(text).collect();
        let mut sentences = Vec::new();
        let mut start: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            let begin = *start.get_or_insert(token.start());
            let next_starts_sentence = tokens.get(i + 1).is_none_or(|next| {
                next.as_str()
                    .trim_start_matches(['"', '\'', '('])
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
            });
            if ends_sentence(token.as_str()) && next_starts_sentence {
                sentences.push(text[begin..token.end()].to_string());
                start = None;
            }
        }
        if let (Some(begin), Some(last)) = (start, tokens.last()) {
            sentences.push(text[begin..last.end()].to_string());
        }
        sentences
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut run: Vec<Word<'_>> = Vec::new();

        for token in TOKEN_RE.find_iter(text) {
            let word = Word::from_token(text, token.start(), token.as_str());
            let joins_run = word.is_capitalized() || (!run.is_empty() && word.is_connector());
            if joins_run && !word.opens_group {
                run.push(word);
            } else {
                flush_run(text, &mut run, &mut entities);
                if word.is_capitalized() {
                    run.push(word);
                }
            }
            if word.closes_run {
                flush_run(text, &mut run, &mut entities);
            }
        }
        flush_run(text, &mut run, &mut entities);
        entities
    }
}

#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    core: &'a str,
    start: usize,
    end: usize,
    opens_group: bool,
    closes_run: bool,
}

impl<'a> Word<'a> {
    fn from_token(text: &'a str, offset: usize, token: &'a str) -> Self {
        let leading = token.len() - token.trim_start_matches(['"', '\'', '(', '[']).len();
        let stripped = token.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '&');
        let start = offset + leading;
        let end = (offset + stripped.len()).max(start);
        let core = &text[start..end];
        let is_initial = core.chars().count() == 1 && core.chars().all(char::is_uppercase);
        Self {
            core,
            start,
            end,
            opens_group: leading > 0,
            closes_run: stripped.len() < token.len()
                && !is_initial
                && !ABBREVIATIONS.contains(&core),
        }
    }

    fn is_capitalized(&self) -> bool {
        let mut chars = self.core.chars();
        chars.next().is_some_and(char::is_uppercase)
            && !self.core.chars().any(|c| c.is_ascii_digit())
    }

    fn is_connector(&self) -> bool {
        CONNECTORS.contains(&self.core)
    }
}

fn flush_run(text: &str, run: &mut Vec<Word<'_>>, out: &mut Vec<Entity>) {
    while run.first().is_some_and(|w| LEADING_STOPWORDS.contains(&w.core) || w.is_connector()) {
        run.remove(0);
    }
    while run.last().is_some_and(Word::is_connector) {
        run.pop();
    }
    if let (Some(first), Some(last)) = (run.first(), run.last()) {
        let is_org = run.iter().any(|w| ORG_KEYWORDS.contains(&w.core));
        let label = if is_org {
            Some(EntityLabel::Organization)
        } else if (2..=4).contains(&run.len()) {
            Some(EntityLabel::Person)
        } else {
            None
        };
        if let Some(label) = label {
            out.push(Entity::new(&text[first.start..last.end], label));
        }
    }
    run.clear();
}

fn ends_sentence(token: &str) -> bool {
    let trimmed = token.trim_end_matches(['"', '\'', ')', ']']);
    let Some(body) = trimmed.strip_suffix(['.', '!', '?']) else {
        return false;
    };
    if trimmed.ends_with(['!', '?']) {
        return true;
    }
    let is_initial = body.chars().count() == 1 && body.chars().all(char::is_uppercase);
    !(is_initial || ABBREVIATIONS.contains(&body))
}
