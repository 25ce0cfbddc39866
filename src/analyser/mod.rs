//! Trip analysis: loading, filtering, statistics and raw-data paging.

pub mod logic;
