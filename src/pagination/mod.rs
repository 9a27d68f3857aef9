//! Pagination state: current page, total pages and the guards around them.

mod machine;

pub use machine::{
    PageBound, PaginationContext, PaginationEvent, PaginationMachine, PaginationOutput,
    PaginationState,
};
