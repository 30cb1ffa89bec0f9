// Sentences end at a single terminator character, words at whitespace.

/// A whitespace-delimited token with its byte offsets inside the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split text on `terminator`, trimming each piece and dropping empty ones.
pub fn split_sentences(text: &str, terminator: char) -> Vec<&str> {
    text.split(terminator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn split_words(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}

/// Like [`split_words`] but records where each token sits in `sentence`.
pub fn tokens(sentence: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (pos, ch) in sentence.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push(Token {
                    text: &sentence[s..pos],
                    start: s,
                    end: pos,
                });
                start = None;
            }
            (false, None) => start = Some(pos),
            _ => {}
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &sentence[s..],
            start: s,
            end: sentence.len(),
        });
    }

    tokens
}

/// Strip any of `chars` from both ends of `word`.
pub fn trim_punctuation<'a>(word: &'a str, chars: &[char]) -> &'a str {
    word.trim_matches(|c| chars.contains(&c))
}
