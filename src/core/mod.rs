pub mod cleaner;
pub mod csv_export;
pub mod etl;
pub mod extractor;
pub mod fetcher;
pub mod pages;
pub mod parser;

pub use crate::domain::model::{
    ExportSummary, ExtractResult, ListingFragment, PriceRow, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Fetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
