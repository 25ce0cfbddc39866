pub mod filter;
pub mod flows;
pub mod io;
pub mod loader;
pub mod pagination;
pub mod profiling;
pub mod types;

pub use filter::filter;
pub use flows::{load_city, run_statistics};
pub use io::{raw_table_from_df, read_raw_table};
pub use loader::{load, parse_timestamp};
pub use pagination::{PAGE_SIZE, PagerState, RawDataPager};
pub use profiling::{summarize_duration, summarize_stations, summarize_time, summarize_users};
pub use types::{
    BirthYearStats, Dataset, DurationStats, FieldSet, FilterSpec, Popular, PopularTrip, RawTable,
    Section, SectionOutcome, StationStats, TimeStats, TripRecord, TripReport, UserStats,
    ValueCount,
};
