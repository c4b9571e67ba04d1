// src/fetch/mod.rs
use std::future::Future;

pub mod client;

pub use client::HttpFetcher;

/// Anything that can hand over the raw bytes behind a URL.
/// `None` means "no content": the caller records a skip and moves on.
pub trait PageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send;
}
