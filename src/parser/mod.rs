// Parser module: field extraction over fetched product pages.

pub mod listing_parser;

pub use listing_parser::ListingParser;
