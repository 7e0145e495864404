use regex::Regex;

use super::HighlightSet;
use crate::core::LectioError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Vocab { text: String, key: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotated {
    pub segments: Vec<Segment>,
}

impl Annotated {
    fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Plain(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Plain(text.to_string()));
        }
    }

    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Plain(text) => text.as_str(),
                Segment::Vocab { text, .. } => text.as_str(),
            })
            .collect()
    }

    pub fn vocab_keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Vocab { key, .. } => Some(key.as_str()),
            Segment::Plain(_) => None,
        })
    }

    /// HTML-style markup with each vocabulary occurrence wrapped in a clickable span.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => markup.push_str(&escape(text)),
                Segment::Vocab { text, key } => {
                    markup.push_str(&format!(
                        r#"<span class="vocab-word" data-word="{}">{}</span>"#,
                        escape(key),
                        escape(text)
                    ));
                }
            }
        }
        markup
    }
}

/// Compiled matcher for one highlight set.
#[derive(Debug, Clone)]
pub struct Highlighter {
    regex: Option<Regex>,
    // `keys[i]` belongs to capture group `i + 1`.
    keys: Vec<String>,
}

impl Highlighter {
    pub fn new(set: &HighlightSet) -> Result<Self, LectioError> {
        if set.is_empty() {
            return Ok(Self { regex: None, keys: Vec::new() });
        }

        // Longest first: the alternation picks the first branch that matches at a position.
        let mut keys: Vec<String> = set.iter().map(str::to_string).collect();
        keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let alternatives: Vec<String> = keys.iter().map(|key| format!("({})", bounded(key))).collect();
        let regex = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?;

        Ok(Self { regex: Some(regex), keys })
    }

    pub fn annotate(&self, text: &str) -> Annotated {
        let mut annotated = Annotated::default();

        let Some(regex) = &self.regex else {
            annotated.push_plain(text);
            return annotated;
        };

        let mut last = 0;
        for captures in regex.captures_iter(text) {
            let Some((index, found)) =
                captures.iter().enumerate().skip(1).find_map(|(i, group)| group.map(|m| (i, m)))
            else {
                continue;
            };

            annotated.push_plain(&text[last..found.start()]);
            annotated.segments.push(Segment::Vocab {
                text: found.as_str().to_string(),
                key: self.keys[index - 1].clone(),
            });
            last = found.end();
        }
        annotated.push_plain(&text[last..]);

        annotated
    }
}

pub fn annotate(text: &str, set: &HighlightSet) -> Result<Annotated, LectioError> {
    Ok(Highlighter::new(set)?.annotate(text))
}

// Word boundaries only make sense next to word characters ("Mr." must still match before a space).
fn bounded(word: &str) -> String {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let starts = word.chars().next().map(is_word_char).unwrap_or(false);
    let ends = word.chars().last().map(is_word_char).unwrap_or(false);

    format!(
        "{}{}{}",
        if starts { r"\b" } else { "" },
        regex::escape(word),
        if ends { r"\b" } else { "" }
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HighlightSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn vocab(text: &str, key: &str) -> Segment {
        Segment::Vocab { text: text.to_string(), key: key.to_string() }
    }

    fn plain(text: &str) -> Segment {
        Segment::Plain(text.to_string())
    }

    #[test]
    fn test_whole_words_only() {
        let annotated = annotate("category and cat", &set(&["cat"])).unwrap();
        assert_eq!(annotated.segments, vec![plain("category and "), vocab("cat", "cat")]);

        let annotated = annotate("I already read it", &set(&["read"])).unwrap();
        assert_eq!(annotated.vocab_keys().count(), 1);
        assert_eq!(annotated.plain_text(), "I already read it");
    }

    #[test]
    fn test_case_insensitive_keeps_original_text() {
        let annotated = annotate("Cat, CAT and cat.", &set(&["cat"])).unwrap();

        assert_eq!(annotated.vocab_keys().collect::<Vec<_>>(), vec!["cat", "cat", "cat"]);
        assert_eq!(annotated.segments[0], vocab("Cat", "cat"));
        assert_eq!(annotated.segments[2], vocab("CAT", "cat"));
    }

    #[test]
    fn test_longer_entries_win_over_contained_ones() {
        let annotated = annotate("The ice cream and the ice.", &set(&["ice", "ice cream"])).unwrap();

        assert_eq!(
            annotated.segments,
            vec![
                plain("The "),
                vocab("ice cream", "ice cream"),
                plain(" and the "),
                vocab("ice", "ice"),
                plain("."),
            ]
        );
        assert!(!annotated.to_markup().contains("<span class=\"vocab-word\" data-word=\"ice\">ice</span> cream"));
    }

    #[test]
    fn test_punctuated_entries_and_metacharacters() {
        let annotated = annotate("Mr. Smith paid $5 (cash).", &set(&["mr.", "(cash)"])).unwrap();
        assert_eq!(annotated.vocab_keys().collect::<Vec<_>>(), vec!["mr.", "(cash)"]);
    }

    #[test]
    fn test_empty_set_leaves_text_alone() {
        let annotated = annotate("Nothing <here>", &HighlightSet::default()).unwrap();
        assert_eq!(annotated.segments, vec![plain("Nothing <here>")]);
        assert_eq!(annotated.to_markup(), "Nothing &lt;here&gt;");
    }
}
