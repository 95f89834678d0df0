//! In-memory query pipeline: filter, then sort, then truncate.

mod board;
mod filter;
mod sort;

pub use board::{
    ApplicationBoard, Board, BoardQuery, BoardView, DisplayLimit, InternshipBoard, OrderBoard,
};
pub use filter::{
    filter_records, ApplicationFilter, Criteria, DateWindow, InternshipFilter, OrderFilter,
    SearchQuery, Selection, StipendFilter,
};
pub use sort::{
    sort_records, ApplicationSortKey, InternshipSortKey, OrderSortKey, SortDirection, SortField,
    SortKey, SortSpec,
};
