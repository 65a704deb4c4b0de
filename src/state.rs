use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::data::fetch::{Fetch, HttpFetcher};
use crate::data::filter::{
    coerce_bound, page_count, page_count_rounded, value_matches, Bounds, SearchTerms,
    DEFAULT_PAGE_SIZE,
};
use crate::data::loader;
use crate::data::model::{Record, Value};
use crate::error::{FilterError, LoadError, Result};

// ---------------------------------------------------------------------------
// Load input
// ---------------------------------------------------------------------------

/// Where a dataset comes from.
#[derive(Debug, Clone)]
pub enum DataInput {
    /// Records already in memory.
    Records(Vec<Record>),
    /// Locator of a JSON document holding an array of objects.
    Url(String),
    /// Local `.json` / `.csv` / `.parquet` file.
    File(PathBuf),
}

impl From<Vec<Record>> for DataInput {
    fn from(records: Vec<Record>) -> Self {
        DataInput::Records(records)
    }
}

impl From<&[Record]> for DataInput {
    fn from(records: &[Record]) -> Self {
        DataInput::Records(records.to_vec())
    }
}

impl From<&str> for DataInput {
    fn from(url: &str) -> Self {
        DataInput::Url(url.to_string())
    }
}

impl From<String> for DataInput {
    fn from(url: String) -> Self {
        DataInput::Url(url)
    }
}

impl From<PathBuf> for DataInput {
    fn from(path: PathBuf) -> Self {
        DataInput::File(path)
    }
}

impl From<&Path> for DataInput {
    fn from(path: &Path) -> Self {
        DataInput::File(path.to_path_buf())
    }
}

// ---------------------------------------------------------------------------
// DatasetFilter
// ---------------------------------------------------------------------------

/// An immutable source dataset plus the working result set narrowed by
/// successive filters.
///
/// Filters are cumulative: each one runs over the current results. Call
/// [`reset`](Self::reset) to start a fresh session from the source.
/// Every operation either commits a complete new result set or fails and
/// leaves the previous one in place.
pub struct DatasetFilter<F = HttpFetcher> {
    fetcher: F,
    /// Dataset as loaded (None until `load` succeeds).
    source: Option<Vec<Record>>,
    /// Current filtered/sorted view.
    results: Vec<Record>,
}

impl<F> fmt::Debug for DatasetFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetFilter")
            .field("source_len", &self.source.as_ref().map(Vec::len))
            .field("results_len", &self.results.len())
            .finish_non_exhaustive()
    }
}

impl Default for DatasetFilter {
    fn default() -> Self {
        Self::with_fetcher(HttpFetcher::default())
    }
}

impl DatasetFilter {
    /// An unloaded filter that fetches URLs over HTTP.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `new()` followed by [`load`](Self::load).
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut filter = Self::new();
        filter.set_dataset(records);
        filter
    }
}

impl<F: Fetch> DatasetFilter<F> {
    /// An unloaded filter that resolves URLs through `fetcher`.
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            source: None,
            results: Vec::new(),
        }
    }

    /// Replace source and results with the given dataset.
    ///
    /// On failure the previously loaded dataset (if any) is kept.
    pub fn load(&mut self, input: impl Into<DataInput>) -> std::result::Result<&mut Self, LoadError> {
        let records = match input.into() {
            DataInput::Records(records) => records,
            DataInput::Url(url) => {
                let text = self.fetcher.fetch(&url).inspect_err(|e| {
                    log::warn!("loading {url} failed: {e}");
                })?;
                loader::parse_json(&text)?
            }
            DataInput::File(path) => loader::load_file(&path).inspect_err(|e| {
                log::warn!("loading {} failed: {e}", path.display());
            })?,
        };
        self.set_dataset(records);
        Ok(self)
    }

    /// [`load`](Self::load), then hand the populated filter to `on_ready`.
    pub fn load_then<C>(&mut self, input: impl Into<DataInput>, on_ready: C) -> std::result::Result<(), LoadError>
    where
        C: FnOnce(&Self),
    {
        self.load(input)?;
        on_ready(&*self);
        Ok(())
    }

    /// Ingest a dataset: source and results become independent copies.
    fn set_dataset(&mut self, records: Vec<Record>) {
        log::debug!("loaded dataset with {} records", records.len());
        self.results = records.clone();
        self.source = Some(records);
    }

    /// Restore results to a fresh copy of the source.
    pub fn reset(&mut self) -> Result<()> {
        self.results = self.source()?.to_vec();
        Ok(())
    }

    // -- Accessors --

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Result<&[Record]> {
        self.source.as_deref().ok_or(FilterError::Uninitialized)
    }

    /// Current result set; empty before the first load.
    pub fn results(&self) -> &[Record] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Record> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // -- Filters --

    /// Keep records whose `attribute` matches every term in `terms`.
    ///
    /// Lists match when any element matches; scalars are compared through
    /// their text form. Matching is case-insensitive substring search unless
    /// `exact` is set or the term is numeric.
    pub fn contains_filter(
        &mut self,
        attribute: &str,
        terms: impl Into<SearchTerms>,
        exact: bool,
    ) -> Result<()> {
        self.ensure_loaded()?;
        let terms = terms.into();
        if terms.is_empty() {
            return Ok(());
        }

        let mut keep = Vec::with_capacity(self.results.len());
        for record in &self.results {
            let value = lookup(record, attribute)?;
            let mut matched = true;
            for term in terms.iter() {
                if !value_matches(value, term, exact)
                    .map_err(|reason| FilterError::invalid_attribute(attribute, reason))?
                {
                    matched = false;
                }
            }
            keep.push(matched);
        }

        self.retain_by(&keep);
        log::debug!(
            "contains_filter({attribute}, {:?}, exact={exact}) kept {} records",
            terms,
            self.results.len()
        );
        Ok(())
    }

    /// Case-insensitive equality filter; same as `contains_filter(.., true)`.
    pub fn exact_filter(&mut self, attribute: &str, terms: impl Into<SearchTerms>) -> Result<()> {
        self.contains_filter(attribute, terms, true)
    }

    /// Keep records whose numeric `attribute` lies between `min` and `max`.
    ///
    /// Bounds are truncated to integers first.
    pub fn range_filter(&mut self, attribute: &str, min: f64, max: f64, bounds: Bounds) -> Result<()> {
        self.ensure_loaded()?;
        let lo = coerce_bound(min).ok_or(FilterError::InvalidBound { value: min })?;
        let hi = coerce_bound(max).ok_or(FilterError::InvalidBound { value: max })?;

        let keep = self
            .results
            .iter()
            .map(|record| -> Result<bool> {
                let value = lookup(record, attribute)?;
                let number = value.as_f64().ok_or_else(|| {
                    FilterError::invalid_attribute(attribute, format!("{} is not numeric", value.kind()))
                })?;
                Ok(bounds.contains(number, lo, hi))
            })
            .collect::<Result<Vec<bool>>>()?;

        self.retain_by(&keep);
        log::debug!(
            "range_filter({attribute}, {lo}, {hi}, {bounds:?}) kept {} records",
            self.results.len()
        );
        Ok(())
    }

    /// [`range_filter`](Self::range_filter) driven by a boolean:
    /// `true` keeps `[min, max]`, `false` keeps `(min, max)`.
    pub fn range_filter_flag(&mut self, attribute: &str, min: f64, max: f64, inclusive: bool) -> Result<()> {
        self.range_filter(attribute, min, max, Bounds::from_flag(inclusive))
    }

    // -- Ordering --

    /// Stable ascending sort by `attribute`; `reverse` flips the sorted
    /// sequence afterwards, ties included.
    pub fn sort(&mut self, attribute: &str, reverse: bool) -> Result<()> {
        self.ensure_loaded()?;

        let mut kind: Option<&'static str> = None;
        for record in &self.results {
            let value = lookup(record, attribute)?;
            let k = sort_kind(value).ok_or_else(|| {
                FilterError::invalid_attribute(attribute, format!("cannot sort by {}", value.kind()))
            })?;
            match kind {
                Some(prev) if prev != k => {
                    return Err(FilterError::invalid_attribute(
                        attribute,
                        format!("mixed {prev} and {k} values"),
                    ));
                }
                _ => kind = Some(k),
            }
        }

        self.results.sort_by(|a, b| match (a.get(attribute), b.get(attribute)) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => Ordering::Equal,
        });
        if reverse {
            self.results.reverse();
        }
        Ok(())
    }

    pub fn sort_descending(&mut self, attribute: &str) -> Result<()> {
        self.sort(attribute, true)
    }

    // -- Paging --

    /// Split the current results into pages of at most `page_size` records.
    /// A `page_size` of `0` uses [`DEFAULT_PAGE_SIZE`].
    pub fn paginate(&self, page_size: usize) -> Result<Vec<&[Record]>> {
        self.ensure_loaded()?;
        let size = effective_page_size(page_size);
        let pages: Vec<&[Record]> = self.results.chunks(size).collect();
        debug_assert_eq!(pages.len(), page_count(self.results.len(), size));
        Ok(pages)
    }

    /// Legacy paging: the page count is `len / page_size` rounded half-up,
    /// so a short trailing page is dropped when it is less than half full.
    pub fn paginate_rounded(&self, page_size: usize) -> Result<Vec<&[Record]>> {
        self.ensure_loaded()?;
        let size = effective_page_size(page_size);
        let count = page_count_rounded(self.results.len(), size);
        Ok(self
            .results
            .chunks(size)
            .take(count)
            .enumerate()
            .map(|(i, page)| {
                log::trace!("chunking {}, {}", i * size, i * size + page.len());
                page
            })
            .collect())
    }

    // -- Helpers --

    fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(FilterError::Uninitialized)
        }
    }

    /// Commit a keep-mask computed over the current results.
    fn retain_by(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.results.retain(|_| flags.next().copied().unwrap_or(false));
    }
}

fn lookup<'a>(record: &'a Record, attribute: &str) -> Result<&'a Value> {
    record
        .get(attribute)
        .ok_or_else(|| FilterError::invalid_attribute(attribute, "missing from record"))
}

/// Comparable family of a value, or `None` for values that cannot be sorted.
fn sort_kind(value: &Value) -> Option<&'static str> {
    match value {
        Value::Integer(_) | Value::Float(_) | Value::String(_) | Value::Bool(_) => Some(value.kind()),
        Value::List(_) | Value::Null => None,
    }
}

fn effective_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}
