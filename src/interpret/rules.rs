//! Extraction rules
//!
//! Every prompt field has an ordered rule table. A rule is a short token
//! pattern; the first rule in a table that matches anywhere in the prompt
//! decides the field, and within one rule the leftmost match wins (or the
//! `nth` match, for positional rules).
//!
//! Every capture remembers which token it came from. Callers pass the tokens
//! already claimed by other fields, so one number never fills two fields.

use crate::entities::part::{Material, PartType};
use crate::interpret::lexer::Token;

/// One element of a token pattern
#[derive(Debug, Clone, Copy)]
pub enum Pat {
    /// Any number; the first one in a pattern is the captured value
    Num,
    /// Exact word
    Word(&'static str),
    /// Word starting with the given text
    Prefix(&'static str),
    /// Word containing the given text
    Contains(&'static str),
    /// Any of the listed words
    AnyWord(&'static [&'static str]),
    /// Any of the listed punctuation characters
    AnyPunct(&'static [char]),
    /// Element that may be absent
    Opt(&'static Pat),
    /// Zero-width check that the next token does not match
    Not(&'static Pat),
}

impl Pat {
    /// `None` if the token does not match, otherwise the captured number (if any)
    fn accept(&self, token: &Token) -> Option<Option<u32>> {
        match (self, token) {
            (Pat::Num, Token::Number(n)) => Some(Some(*n)),
            (Pat::Word(w), Token::Word(t)) if t == w => Some(None),
            (Pat::Prefix(p), Token::Word(t)) if t.starts_with(p) => Some(None),
            (Pat::Contains(p), Token::Word(t)) if t.contains(p) => Some(None),
            (Pat::AnyWord(words), Token::Word(t)) if words.iter().any(|w| t == w) => Some(None),
            (Pat::AnyPunct(chars), Token::Punct(c)) if chars.contains(c) => Some(None),
            (Pat::Opt(inner), _) | (Pat::Not(inner), _) => inner.accept(token),
            _ => None,
        }
    }
}

/// A number captured by a rule, with the index of its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub rule: &'static str,
    pub token: usize,
    pub value: u32,
}

/// Match `pattern` against `tokens` starting at index `at`
///
/// Returns `None` on mismatch, `Some(capture)` on success, where the capture
/// is the index and value of the first number in the pattern.
fn match_at(pattern: &[Pat], tokens: &[Token], at: usize) -> Option<Option<(usize, u32)>> {
    let Some((first, rest)) = pattern.split_first() else {
        return Some(None);
    };
    let token = tokens.get(at);

    match first {
        Pat::Opt(inner) => {
            if let Some(capture) = token.and_then(|t| inner.accept(t)) {
                if let Some(tail) = match_at(rest, tokens, at + 1) {
                    return Some(capture.map(|value| (at, value)).or(tail));
                }
            }
            match_at(rest, tokens, at)
        }
        Pat::Not(inner) => {
            if token.and_then(|t| inner.accept(t)).is_some() {
                return None;
            }
            match_at(rest, tokens, at)
        }
        _ => {
            let capture = first.accept(token?)?;
            let tail = match_at(rest, tokens, at + 1)?;
            Some(capture.map(|value| (at, value)).or(tail))
        }
    }
}

/// Numeric extraction rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: &'static [Pat],
    /// Which match to take, counting from the left
    pub nth: usize,
    /// Multiplier applied to the captured value (e.g. kN to N)
    pub scale: u32,
}

impl Rule {
    pub const fn new(name: &'static str, pattern: &'static [Pat]) -> Self {
        Self {
            name,
            pattern,
            nth: 0,
            scale: 1,
        }
    }

    pub const fn nth(mut self, nth: usize) -> Self {
        self.nth = nth;
        self
    }

    pub const fn scaled(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// The rule's `nth` match among those not capturing a `claimed` token
    pub fn find(&self, tokens: &[Token], claimed: &[usize]) -> Option<Capture> {
        (0..tokens.len())
            .filter_map(|start| match_at(self.pattern, tokens, start).flatten())
            .filter(|(token, _)| !claimed.contains(token))
            .nth(self.nth)
            .map(|(token, value)| Capture {
                rule: self.name,
                token,
                value: value.saturating_mul(self.scale),
            })
    }
}

/// Keyword rule mapping a pattern to a fixed value
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub name: &'static str,
    pub pattern: &'static [Pat],
    pub value: T,
}

impl<T: Copy> KeywordRule<T> {
    pub fn matches(&self, tokens: &[Token]) -> bool {
        (0..tokens.len()).any(|start| match_at(self.pattern, tokens, start).is_some())
    }
}

/// Capture of the first rule in `rules` that matches
pub fn first_value(rules: &[Rule], tokens: &[Token], claimed: &[usize]) -> Option<Capture> {
    rules.iter().find_map(|rule| rule.find(tokens, claimed))
}

/// Value of the first keyword rule in `rules` that matches
pub fn first_keyword<T: Copy>(rules: &[KeywordRule<T>], tokens: &[Token]) -> Option<(&'static str, T)> {
    rules
        .iter()
        .find(|rule| rule.matches(tokens))
        .map(|rule| (rule.name, rule.value))
}

use Pat::*;

const MM: Pat = Word("mm");
const OF: Pat = Opt(&AnyWord(&["of", "is"]));
const ASSIGN: Pat = Opt(&AnyPunct(&[':', '=']));
const HOLES: Pat = AnyWord(&["hole", "holes"]);
const DIA: Pat = AnyWord(&["diameter", "dia"]);
const NEWTONS: Pat = AnyWord(&["n", "newton", "newtons"]);

pub static ARCHETYPE_RULES: &[KeywordRule<PartType>] = &[
    KeywordRule {
        name: "arm",
        pattern: &[Word("arm")],
        value: PartType::Trapezoid,
    },
    KeywordRule {
        name: "l_bracket",
        pattern: &[Word("l"), Opt(&AnyPunct(&['-'])), Word("bracket")],
        value: PartType::LBracket,
    },
    KeywordRule {
        name: "lbracket",
        pattern: &[Word("lbracket")],
        value: PartType::LBracket,
    },
    KeywordRule {
        name: "plate",
        pattern: &[Word("plate")],
        value: PartType::Circle,
    },
    KeywordRule {
        name: "rectangle",
        pattern: &[Prefix("rectangl")],
        value: PartType::Rectangle,
    },
    KeywordRule {
        name: "bar",
        pattern: &[Word("bar")],
        value: PartType::Rectangle,
    },
    KeywordRule {
        name: "trapezoid",
        pattern: &[AnyWord(&["trapezoid", "bracket"])],
        value: PartType::Trapezoid,
    },
];

pub static MATERIAL_RULES: &[KeywordRule<Material>] = &[
    KeywordRule {
        name: "steel",
        pattern: &[Contains("steel")],
        value: Material::Steel,
    },
    KeywordRule {
        name: "aluminum",
        pattern: &[AnyWord(&["aluminum", "aluminium"])],
        value: Material::Aluminum,
    },
];

pub static LENGTH_RULES: &[Rule] = &[
    Rule::new("mm_long", &[Num, MM, AnyWord(&["long", "length"])]),
    Rule::new("length_mm", &[Word("length"), OF, ASSIGN, Num, MM]),
    Rule::new("first_mm", &[Num, MM]),
    Rule::new("bare_long", &[Num, AnyWord(&["long", "length"])]),
    Rule::new("length_bare", &[Word("length"), OF, ASSIGN, Num]),
];

pub static WIDTH_RULES: &[Rule] = &[
    Rule::new("width_mm", &[Word("width"), OF, ASSIGN, Num, MM]),
    Rule::new("mm_wide", &[Num, MM, AnyWord(&["wide", "width"])]),
    // Resolved last, so it skips numbers every other field has taken
    Rule::new("other_mm", &[Num, MM]),
];

pub static TIP_WIDTH_RULES: &[Rule] = &[
    Rule::new("tip_mm", &[Word("tip"), Opt(&Word("width")), OF, ASSIGN, Num, MM]),
    Rule::new("mm_tip", &[Num, MM, Word("tip")]),
    Rule::new("tapering_to", &[Prefix("taper"), Word("to"), Num, MM]),
];

/// Part diameter; an "Nmm diameter hole" is a hole size, not a part size
pub static DIAMETER_RULES: &[Rule] = &[
    Rule::new("mm_diameter", &[Num, MM, DIA, Not(&HOLES)]),
    Rule::new("diameter_mm", &[DIA, OF, ASSIGN, Num, MM]),
];

pub static FLANGE_RULES: &[Rule] = &[
    Rule::new("flange_mm", &[Word("flange"), Opt(&AnyWord(&["height", "tall"])), OF, ASSIGN, Num, MM]),
    Rule::new("mm_flange", &[Num, MM, Opt(&AnyWord(&["tall", "high"])), Word("flange")]),
];

pub static THICKNESS_RULES: &[Rule] = &[
    Rule::new("thickness_mm", &[Word("thickness"), OF, ASSIGN, Num, MM]),
    Rule::new("mm_thick", &[Num, MM, AnyWord(&["thick", "thickness"])]),
];

pub static HOLE_COUNT_RULES: &[Rule] = &[
    Rule::new("n_bolt", &[Num, Opt(&AnyPunct(&['-'])), Prefix("bolt")]),
    Rule::new("n_holes", &[Num, HOLES]),
];

pub static HOLE_DIAMETER_RULES: &[Rule] = &[
    Rule::new("mm_hole", &[Num, MM, HOLES]),
    Rule::new("mm_dia_hole", &[Num, MM, DIA, HOLES]),
    Rule::new("holes_mm", &[HOLES, OF, Opt(&DIA), Num, MM]),
];

pub static FORCE_RULES: &[Rule] = &[
    Rule::new("supports_n", &[Prefix("support"), Opt(&Word("up")), Opt(&Word("to")), Num, NEWTONS]),
    Rule::new("supports_kn", &[Prefix("support"), Opt(&Word("up")), Opt(&Word("to")), Num, Word("kn")])
        .scaled(1000),
    Rule::new("up_to_n", &[Word("up"), Word("to"), Num, NEWTONS]),
    Rule::new("kn", &[Num, Word("kn")]).scaled(1000),
    Rule::new("n", &[Num, NEWTONS]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::lexer::tokenize;

    fn value(rules: &[Rule], prompt: &str) -> Option<(&'static str, u32)> {
        first_value(rules, &tokenize(prompt), &[]).map(|c| (c.rule, c.value))
    }

    #[test]
    fn test_unit_value_preferred_over_bare_number() {
        assert_eq!(value(LENGTH_RULES, "a bar 30 long, 200mm"), Some(("first_mm", 200)));
        assert_eq!(value(LENGTH_RULES, "a bar 30 long"), Some(("bare_long", 30)));
        assert_eq!(value(LENGTH_RULES, "a bar"), None);
    }

    #[test]
    fn test_explicit_length_beats_position() {
        assert_eq!(
            value(LENGTH_RULES, "50mm wide and 150mm long"),
            Some(("mm_long", 150))
        );
    }

    #[test]
    fn test_explicit_width_overrides_position() {
        assert_eq!(
            value(WIDTH_RULES, "150mm long, 10mm thick, width: 45mm"),
            Some(("width_mm", 45))
        );
        assert_eq!(value(WIDTH_RULES, "150mm long, 50mm wide"), Some(("mm_wide", 50)));
    }

    #[test]
    fn test_positional_width_skips_claimed_tokens() {
        let tokens = tokenize("150mm by 70mm");
        let length = first_value(LENGTH_RULES, &tokens, &[]).unwrap();
        assert_eq!((length.rule, length.token, length.value), ("first_mm", 0, 150));

        let width = first_value(WIDTH_RULES, &tokens, &[length.token]).unwrap();
        assert_eq!((width.rule, width.value), ("other_mm", 70));

        // The explicit length comes second; the positional width takes the first number
        let tokens = tokenize("trapezoid 80mm by 150mm long");
        let length = first_value(LENGTH_RULES, &tokens, &[]).unwrap();
        assert_eq!((length.rule, length.value), ("mm_long", 150));
        let width = first_value(WIDTH_RULES, &tokens, &[length.token]).unwrap();
        assert_eq!(width.value, 80);

        let tokens = tokenize("150mm");
        assert_eq!(first_value(WIDTH_RULES, &tokens, &[0]), None);
    }

    #[test]
    fn test_hole_count_patterns() {
        assert_eq!(value(HOLE_COUNT_RULES, "3-bolt mount"), Some(("n_bolt", 3)));
        assert_eq!(value(HOLE_COUNT_RULES, "2 bolt holes"), Some(("n_bolt", 2)));
        assert_eq!(value(HOLE_COUNT_RULES, "with 4 holes"), Some(("n_holes", 4)));
        assert_eq!(value(HOLE_COUNT_RULES, "6mm holes"), None);
    }

    #[test]
    fn test_hole_diameter_patterns() {
        assert_eq!(value(HOLE_DIAMETER_RULES, "8mm holes"), Some(("mm_hole", 8)));
        assert_eq!(
            value(HOLE_DIAMETER_RULES, "4 holes 6mm, thickness 6mm"),
            Some(("holes_mm", 6))
        );
        assert_eq!(
            value(HOLE_DIAMETER_RULES, "5mm diameter holes"),
            Some(("mm_dia_hole", 5))
        );
        assert_eq!(value(HOLE_DIAMETER_RULES, "80mm diameter"), None);
    }

    #[test]
    fn test_part_diameter_skips_hole_sizes() {
        assert_eq!(value(DIAMETER_RULES, "plate 80mm diameter"), Some(("mm_diameter", 80)));
        assert_eq!(value(DIAMETER_RULES, "plate with 5mm diameter holes"), None);
        assert_eq!(value(DIAMETER_RULES, "diameter of 90mm"), Some(("diameter_mm", 90)));
    }

    #[test]
    fn test_force_patterns() {
        assert_eq!(value(FORCE_RULES, "supports 2000N"), Some(("supports_n", 2000)));
        assert_eq!(value(FORCE_RULES, "supports up to 500 n"), Some(("supports_n", 500)));
        assert_eq!(value(FORCE_RULES, "supports 3kN"), Some(("supports_kn", 3000)));
        assert_eq!(value(FORCE_RULES, "load of 750 newtons"), Some(("n", 750)));
        assert_eq!(value(FORCE_RULES, "150mm long"), None);
    }

    #[test]
    fn test_archetype_priority() {
        let archetype = |p: &str| first_keyword(ARCHETYPE_RULES, &tokenize(p)).map(|(_, t)| t);
        // "arm" outranks "bracket"
        assert_eq!(archetype("arm bracket"), Some(PartType::Trapezoid));
        assert_eq!(archetype("L-bracket"), Some(PartType::LBracket));
        assert_eq!(archetype("l bracket"), Some(PartType::LBracket));
        // "plate" outranks "bar"
        assert_eq!(archetype("bar plate"), Some(PartType::Circle));
        assert_eq!(archetype("rectangular bar"), Some(PartType::Rectangle));
        assert_eq!(archetype("bracket"), Some(PartType::Trapezoid));
        assert_eq!(archetype("warm harmless barn"), None);
    }

    #[test]
    fn test_material_priority() {
        let material = |p: &str| first_keyword(MATERIAL_RULES, &tokenize(p)).map(|(_, m)| m);
        assert_eq!(material("aluminium with steel inserts"), Some(Material::Steel));
        assert_eq!(material("mildsteel flat bar"), Some(Material::Steel));
        assert_eq!(material("stainless-steel"), Some(Material::Steel));
        assert_eq!(material("Aluminium"), Some(Material::Aluminum));
        assert_eq!(material("brass"), None);
    }

    #[test]
    fn test_nth_match() {
        let rule = Rule::new("third", &[Num, MM]).nth(2);
        let found = rule.find(&tokenize("1mm 2mm 3mm"), &[]).unwrap();
        assert_eq!((found.token, found.value), (4, 3));
        assert_eq!(rule.find(&tokenize("1mm 2mm"), &[]), None);
        // Claimed tokens do not count towards `nth`
        assert_eq!(rule.find(&tokenize("1mm 2mm 3mm 4mm"), &[2]).map(|c| c.value), Some(4));
    }

    #[test]
    fn test_optional_element_backtracks() {
        let rule = Rule::new("opt", &[Word("tip"), Opt(&Word("width")), Num, MM]);
        let value = |p: &str| rule.find(&tokenize(p), &[]).map(|c| (c.token, c.value));
        assert_eq!(value("tip width 12mm"), Some((2, 12)));
        assert_eq!(value("tip 12mm"), Some((1, 12)));
    }
}
