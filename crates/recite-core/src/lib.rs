pub mod fetcher;
pub mod request_log;
pub mod review;
pub mod words;
