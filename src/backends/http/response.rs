// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::borrow::Cow;
use std::time::Duration;

/// The outcome of one HTTP request. Non-2xx statuses are responses too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content: Vec<u8>,
    /// Header names and values in the order the server sent them.
    pub headers: Vec<(String, String)>,
    /// Time from dispatch until the body was fully read.
    pub response_time: Duration,
}

impl Response {
    /// The first value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn response_time_secs(&self) -> f64 {
        self.response_time.as_secs_f64()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
