use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Rounds selected by an empty selector, 1-indexed inclusive.
pub const DEFAULT_ROUNDS: std::ops::RangeInclusive<u32> = 1..=31;

/// Round numbers above this are ignored, which bounds range expansion.
pub const MAX_SELECTABLE_ROUND: u32 = 1000;

static TOKEN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\d+|-").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(u32),
    Dash,
    Skip,
}

/// Parses round selector text into 0-indexed round numbers.
///
/// Numbers and dashes are picked out of the text, everything else is ignored.
/// A dash between two numbers selects the inclusive range; a dash without a
/// number on both sides does nothing.
///
/// ```
/// let rounds = analysis::selector::parse_rounds("1-5, 6 23");
/// assert_eq!(rounds.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 22]);
/// ```
pub fn parse_rounds(text: &str) -> BTreeSet<u32> {
    if text.trim().is_empty() {
        return DEFAULT_ROUNDS.map(|r| r - 1).collect();
    }

    let tokens: Vec<Token> = TOKEN
        .find_iter(text)
        .map(|m| match m.as_str() {
            "-" => Token::Dash,
            digits => match digits.parse::<u32>() {
                Ok(n) if n <= MAX_SELECTABLE_ROUND => Token::Number(n),
                _ => Token::Skip,
            },
        })
        .collect();

    let mut rounds = BTreeSet::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(n) => {
                rounds.insert(*n);
            }
            Token::Dash => {
                let before = i.checked_sub(1).and_then(|p| tokens.get(p));
                let after = tokens.get(i + 1);
                if let (Some(Token::Number(lo)), Some(Token::Number(hi))) = (before, after) {
                    rounds.extend(*lo..=*hi);
                }
            }
            Token::Skip => {}
        }
    }

    // Round 0 does not exist in the 1-indexed selector.
    rounds.into_iter().filter_map(|r| r.checked_sub(1)).collect()
}
