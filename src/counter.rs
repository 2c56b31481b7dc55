//! Character composition statistics for a candidate password.

use std::collections::HashSet;

/// Composition statistics derived once per candidate password.
///
/// Unique, repeat and consecutive counters compare characters after simple
/// lower-casing; the class counters look at the characters as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharCounter {
    length: usize,
    numeric: usize,
    alpha: usize,
    non_alpha: usize,
    upper: usize,
    lower: usize,
    special: usize,
    caseless_alpha: usize,
    first_numeric: bool,
    last_numeric: bool,
    first_special: bool,
    last_special: bool,
    unique: usize,
    sequential_repeat: usize,
    repeated: usize,
    consecutive_run: usize,
}

impl CharCounter {
    pub fn new(password: &str) -> Self {
        let mut counter = Self::default();
        let mut seen = HashSet::new();

        let mut previous: Option<char> = None;
        let mut repeat_run = 0usize;
        let mut consecutive_run = 0usize;
        let mut direction = 0i64;

        for c in password.chars() {
            counter.length += 1;

            if is_digit(c) {
                counter.numeric += 1;
            }
            if is_letter(c) {
                counter.alpha += 1;
                if c.is_uppercase() {
                    counter.upper += 1;
                } else if c.is_lowercase() {
                    counter.lower += 1;
                } else {
                    counter.caseless_alpha += 1;
                }
            } else {
                counter.non_alpha += 1;
            }
            if is_special(c) {
                counter.special += 1;
            }

            let folded = fold(c);
            seen.insert(folded);

            match previous {
                Some(prev) if prev == folded => repeat_run += 1,
                _ => {
                    counter.close_repeat_run(repeat_run);
                    repeat_run = 1;
                }
            }

            let step = previous.map(|prev| folded as i64 - prev as i64);
            match step {
                Some(delta) if (delta == 1 || delta == -1) && delta == direction => {
                    consecutive_run += 1;
                }
                Some(delta) if delta == 1 || delta == -1 => {
                    direction = delta;
                    consecutive_run = 2;
                }
                _ => {
                    direction = 0;
                    consecutive_run = 1;
                }
            }
            counter.consecutive_run = counter.consecutive_run.max(consecutive_run);

            previous = Some(folded);
        }
        counter.close_repeat_run(repeat_run);

        let mut chars = password.chars();
        if let Some(first) = chars.next() {
            let last = chars.last().unwrap_or(first);
            counter.first_numeric = is_digit(first);
            counter.last_numeric = is_digit(last);
            counter.first_special = is_special(first);
            counter.last_special = is_special(last);
        }

        counter.unique = seen.len();
        counter
    }

    fn close_repeat_run(&mut self, run: usize) {
        self.sequential_repeat = self.sequential_repeat.max(run);
        if run >= 2 {
            self.repeated += run;
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn numeric_count(&self) -> usize {
        self.numeric
    }

    pub fn alpha_count(&self) -> usize {
        self.alpha
    }

    pub fn non_alpha_count(&self) -> usize {
        self.non_alpha
    }

    pub fn upper_count(&self) -> usize {
        self.upper
    }

    pub fn lower_count(&self) -> usize {
        self.lower
    }

    /// Characters that are neither letters nor digits.
    pub fn special_count(&self) -> usize {
        self.special
    }

    /// Letters that have no upper/lower case form.
    pub fn caseless_alpha_count(&self) -> usize {
        self.caseless_alpha
    }

    pub fn is_first_numeric(&self) -> bool {
        self.first_numeric
    }

    pub fn is_last_numeric(&self) -> bool {
        self.last_numeric
    }

    pub fn is_first_special(&self) -> bool {
        self.first_special
    }

    pub fn is_last_special(&self) -> bool {
        self.last_special
    }

    pub fn unique_count(&self) -> usize {
        self.unique
    }

    /// Longest run of the same character.
    pub fn sequential_repeat(&self) -> usize {
        self.sequential_repeat
    }

    /// Number of characters belonging to any run of two or more identical
    /// characters. A run of length k contributes k.
    pub fn repeated_count(&self) -> usize {
        self.repeated
    }

    /// Longest run whose code points step by exactly +1 or exactly -1.
    pub fn consecutive_run(&self) -> usize {
        self.consecutive_run
    }
}

/// Decimal digits only; superscripts, fractions and roman numerals are not.
pub(crate) fn is_digit(c: char) -> bool {
    c.to_digit(10).is_some()
}

/// Letters, excluding letter-like numerals such as `'Ⅷ'`.
pub(crate) fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

pub(crate) fn is_special(c: char) -> bool {
    !is_letter(c) && !is_digit(c)
}

fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}
