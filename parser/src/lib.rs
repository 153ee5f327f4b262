pub mod query_parser;
pub mod request_parser;
