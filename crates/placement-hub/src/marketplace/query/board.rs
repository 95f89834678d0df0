use serde::Serialize;

use super::super::domain::{Application, Internship, Order};
use super::filter::{ApplicationFilter, Criteria, InternshipFilter, OrderFilter};
use super::sort::{ApplicationSortKey, InternshipSortKey, OrderSortKey, SortKey, SortSpec};

/// Maximum number of rows a list view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayLimit(usize);

impl DisplayLimit {
    pub const PRESETS: [usize; 4] = [15, 30, 50, 100];

    pub fn new(rows: usize) -> Option<Self> {
        (rows > 0).then_some(Self(rows))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Parse a request value, keeping `fallback` for blank, zero or malformed input.
    pub fn parse_or(raw: Option<&str>, fallback: Self) -> Self {
        raw.and_then(|raw| raw.trim().parse::<usize>().ok())
            .and_then(Self::new)
            .unwrap_or(fallback)
    }
}

impl Default for DisplayLimit {
    fn default() -> Self {
        Self(Self::PRESETS[0])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardQuery<F, K> {
    pub filter: F,
    pub sort: SortSpec<K>,
    pub limit: DisplayLimit,
}

/// One rendered page of a board.
#[derive(Debug)]
pub struct BoardView<'a, R> {
    pub records: Vec<&'a R>,
    /// Rows that passed the filter, before truncation.
    pub matched: usize,
    /// Size of the whole collection.
    pub total: usize,
}

impl<F, K> BoardQuery<F, K> {
    /// Filter, sort, then truncate.
    pub fn run<'a, R>(&self, records: &'a [R]) -> BoardView<'a, R>
    where
        F: Criteria<R>,
        K: SortKey<R>,
    {
        let indices = self.matching_indices(records);
        let matched = indices.len();
        BoardView {
            records: indices
                .into_iter()
                .take(self.limit.get())
                .map(|index| &records[index])
                .collect(),
            matched,
            total: records.len(),
        }
    }

    fn matching_indices<R>(&self, records: &[R]) -> Vec<usize>
    where
        F: Criteria<R>,
        K: SortKey<R>,
    {
        let mut matched: Vec<(usize, &R)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches(record))
            .collect();
        let SortSpec { key, direction } = self.sort;
        matched.sort_by(|(_, left), (_, right)| direction.apply(key.compare(left, right)));
        matched.into_iter().map(|(index, _)| index).collect()
    }
}

#[derive(Debug)]
struct Memo<F, K> {
    revision: u64,
    query: BoardQuery<F, K>,
    indices: Vec<usize>,
}

/// Page-level view-state: owns one collection and memoizes the last query.
///
/// Every mutation bumps the revision, so a cached page never outlives the
/// collection it was computed from.
#[derive(Debug)]
pub struct Board<R, F, K> {
    records: Vec<R>,
    revision: u64,
    memo: Option<Memo<F, K>>,
}

pub type InternshipBoard = Board<Internship, InternshipFilter, InternshipSortKey>;
pub type ApplicationBoard = Board<Application, ApplicationFilter, ApplicationSortKey>;
pub type OrderBoard = Board<Order, OrderFilter, OrderSortKey>;

impl<R, F, K> Board<R, F, K>
where
    F: Criteria<R> + Clone + PartialEq,
    K: SortKey<R> + PartialEq,
{
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            revision: 0,
            memo: None,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, records: Vec<R>) {
        self.update(|current| *current = records);
    }

    /// Mutate the collection in place and invalidate the cached page.
    pub fn update<T>(&mut self, mutate: impl FnOnce(&mut Vec<R>) -> T) -> T {
        let outcome = mutate(&mut self.records);
        self.revision += 1;
        self.memo = None;
        outcome
    }

    pub fn view(&mut self, query: &BoardQuery<F, K>) -> BoardView<'_, R> {
        let memo = match self.memo.take() {
            Some(memo) if memo.revision == self.revision && memo.query == *query => memo,
            _ => Memo {
                revision: self.revision,
                query: query.clone(),
                indices: query.matching_indices(&self.records),
            },
        };

        let records = memo
            .indices
            .iter()
            .take(query.limit.get())
            .map(|&index| &self.records[index])
            .collect();
        let matched = memo.indices.len();
        self.memo = Some(memo);

        BoardView {
            records,
            matched,
            total: self.records.len(),
        }
    }

    pub fn is_cached(&self, query: &BoardQuery<F, K>) -> bool {
        self.memo
            .as_ref()
            .is_some_and(|memo| memo.revision == self.revision && memo.query == *query)
    }
}
