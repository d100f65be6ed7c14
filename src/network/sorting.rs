//! Display orderings for endpoint lists.

use std::cmp::Ordering;

use super::endpoint::Endpoint;

/// By display name, ties broken by hardware address.
pub fn by_name(a: &Endpoint, b: &Endpoint) -> Ordering {
    a.display_name()
        .cmp(b.display_name())
        .then_with(|| a.hw_address.cmp(&b.hw_address))
}

/// Most recently seen first, ties broken by hardware address.
pub fn by_seen(a: &Endpoint, b: &Endpoint) -> Ordering {
    b.last_seen
        .cmp(&a.last_seen)
        .then_with(|| a.hw_address.cmp(&b.hw_address))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Seen,
}

impl SortBy {
    /// `"seen"` selects recency order; anything else sorts by name.
    pub fn parse(by: &str) -> Self {
        if by.eq_ignore_ascii_case("seen") {
            SortBy::Seen
        } else {
            SortBy::Name
        }
    }

    pub fn sort(self, endpoints: &mut [Endpoint]) {
        match self {
            SortBy::Name => endpoints.sort_by(by_name),
            SortBy::Seen => endpoints.sort_by(by_seen),
        }
    }
}
