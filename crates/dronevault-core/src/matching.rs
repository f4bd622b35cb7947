//! "Exactly one of" selection
//!
//! Vault, item and field lookups all follow the same rule: one candidate is a
//! hit, zero is a miss and several is an error the caller must resolve. The
//! lookups differ only in how they phrase the failure.

/// Outcome of narrowing a candidate set down to a single element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match<T> {
    /// No candidates
    None,
    /// Exactly one candidate
    One(T),
    /// More than one candidate; carries the count
    Many(usize),
}

impl<T> Match<T> {
    /// Map the single match, keeping `None`/`Many` as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Match<U> {
        match self {
            Match::None => Match::None,
            Match::One(value) => Match::One(f(value)),
            Match::Many(count) => Match::Many(count),
        }
    }

    /// Convert into a `Result`, building the error for the miss or ambiguity
    pub fn into_result<E>(
        self,
        not_found: impl FnOnce() -> E,
        ambiguous: impl FnOnce(usize) -> E,
    ) -> Result<T, E> {
        match self {
            Match::One(value) => Ok(value),
            Match::None => Err(not_found()),
            Match::Many(count) => Err(ambiguous(count)),
        }
    }
}

/// Narrow `candidates` to exactly one element
pub fn exactly_one<I: IntoIterator>(candidates: I) -> Match<I::Item> {
    let mut iter = candidates.into_iter();
    let first = match iter.next() {
        Some(first) => first,
        None => return Match::None,
    };
    let rest = iter.count();
    if rest == 0 {
        Match::One(first)
    } else {
        Match::Many(rest + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one() {
        assert_eq!(exactly_one(Vec::<u8>::new()), Match::None);
        assert_eq!(exactly_one(vec![1]), Match::One(1));
        assert_eq!(exactly_one(vec![1, 2, 3]), Match::Many(3));
    }

    #[test]
    fn test_exactly_one_over_filtered_iterator() {
        let words = ["alpha", "beta", "gamma"];
        let hit = exactly_one(words.iter().filter(|w| w.starts_with('b')));
        assert_eq!(hit, Match::One(&"beta"));
    }

    #[test]
    fn test_into_result() {
        let ok: Result<u8, String> =
            Match::One(4).into_result(|| "none".to_string(), |n| format!("{} matches", n));
        assert_eq!(ok, Ok(4));

        let many: Result<u8, String> =
            Match::Many(2).into_result(|| "none".to_string(), |n| format!("{} matches", n));
        assert_eq!(many, Err("2 matches".to_string()));

        let none: Result<u8, String> =
            Match::None.into_result(|| "none".to_string(), |n| format!("{} matches", n));
        assert_eq!(none, Err("none".to_string()));
    }

    #[test]
    fn test_map() {
        assert_eq!(Match::One(2).map(|v| v * 10), Match::One(20));
        assert_eq!(Match::<u8>::Many(2).map(|v| v * 10), Match::Many(2));
    }
}
