use super::model::Value;

/// Page size used when callers pass `0`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Search terms
// ---------------------------------------------------------------------------

/// One or more needles for a contains/exact filter.
///
/// Every term is applied in turn and a record must match all of them to
/// survive the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms(Vec<String>);

impl SearchTerms {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SearchTerms {
    fn from(term: &str) -> Self {
        SearchTerms(vec![term.to_string()])
    }
}

impl From<String> for SearchTerms {
    fn from(term: String) -> Self {
        SearchTerms(vec![term])
    }
}

impl From<&String> for SearchTerms {
    fn from(term: &String) -> Self {
        SearchTerms(vec![term.clone()])
    }
}

impl From<i64> for SearchTerms {
    fn from(term: i64) -> Self {
        SearchTerms(vec![term.to_string()])
    }
}

impl From<i32> for SearchTerms {
    fn from(term: i32) -> Self {
        SearchTerms(vec![term.to_string()])
    }
}

impl From<f64> for SearchTerms {
    fn from(term: f64) -> Self {
        SearchTerms(vec![term.to_string()])
    }
}

impl From<Vec<String>> for SearchTerms {
    fn from(terms: Vec<String>) -> Self {
        SearchTerms(terms)
    }
}

impl From<Vec<&str>> for SearchTerms {
    fn from(terms: Vec<&str>) -> Self {
        terms.as_slice().into()
    }
}

impl From<&[&str]> for SearchTerms {
    fn from(terms: &[&str]) -> Self {
        SearchTerms(terms.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SearchTerms {
    fn from(terms: [&str; N]) -> Self {
        terms.as_slice().into()
    }
}

// ---------------------------------------------------------------------------
// String matching
// ---------------------------------------------------------------------------

/// Case-insensitive match of `needle` against `haystack`.
///
/// Exact mode, or a needle that reads as a number, requires equality so that
/// searching for `1` does not also hit `10` or `21`. Otherwise the needle only
/// has to occur somewhere in the haystack.
pub fn match_string(haystack: &str, needle: &str, exact: bool) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();

    if exact || is_numeric_term(&needle) {
        haystack == needle
    } else {
        haystack.contains(&needle)
    }
}

/// Whether a search term reads as a number under JavaScript `Number()` rules.
///
/// Blank terms count as numeric (they coerce to `0`).
pub fn is_numeric_term(term: &str) -> bool {
    let t = term.trim();
    if t.is_empty() {
        return true;
    }
    // only reachable for direct callers: `match_string` lowercases first, and
    // "infinity" is not a number
    if matches!(t, "Infinity" | "+Infinity" | "-Infinity") {
        return true;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            if !digits.is_empty() {
                return digits.chars().all(|c| c.is_digit(radix));
            }
        }
    }
    // `str::parse::<f64>` also accepts "inf" and "NaN", which are not numbers here
    t.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && t.parse::<f64>().is_ok()
}

/// Does `value` satisfy a single search term?
///
/// Returns `Err` with a reason when the value cannot be searched at all.
pub fn value_matches(value: &Value, term: &str, exact: bool) -> Result<bool, String> {
    match value {
        Value::List(items) if exact => Ok(items
            .iter()
            .any(|item| item.to_lowercase() == term.to_lowercase())),
        Value::List(items) => Ok(items.iter().any(|item| match_string(item, term, false))),
        Value::Null => Err("value is null".to_string()),
        scalar => Ok(match_string(&scalar.to_string(), term, exact)),
    }
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

/// How the ends of a range filter are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bounds {
    /// Keep `min <= v <= max`.
    Inclusive,
    /// Keep `min < v < max`.
    #[default]
    Exclusive,
}

impl Bounds {
    /// Maps the legacy `inclusive` flag onto a bound mode.
    pub fn from_flag(inclusive: bool) -> Self {
        if inclusive {
            Bounds::Inclusive
        } else {
            Bounds::Exclusive
        }
    }

    pub fn contains(self, value: f64, min: i64, max: i64) -> bool {
        let (min, max) = (min as f64, max as f64);
        match self {
            Bounds::Inclusive => value >= min && value <= max,
            Bounds::Exclusive => value > min && value < max,
        }
    }
}

/// Truncate a bound toward zero, the way `parseInt` reads `"5.9"` as `5`.
pub fn coerce_bound(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Number of pages needed so every record lands on one.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Page count rounded half-up from `len / page_size`; trailing records past
/// the last full page are dropped when the fraction is below one half.
pub fn page_count_rounded(len: usize, page_size: usize) -> usize {
    (2 * len + page_size) / (2 * page_size)
}
