//! Offset/limit page extraction over an enumerated entry list.
//!
//! A request may carry an offset, a limit, both or neither. Whatever it
//! carries is reported back in [`HonoredArgs`] so a caller can tell a
//! bounded page from a full listing. The total count travels beside the
//! entries and is never one of them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::{PageError, PageOutcome};
use crate::fs::entry::Entry;

/// A paging argument a query can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryArg {
    Offset,
    Limit,
}

impl QueryArg {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Limit => "limit",
        }
    }
}

impl fmt::Display for QueryArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments the extractor actually applied, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HonoredArgs(SmallVec<[QueryArg; 2]>);

impl HonoredArgs {
    fn insert(&mut self, arg: QueryArg) {
        if !self.0.contains(&arg) {
            self.0.push(arg);
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, arg: QueryArg) -> bool {
        self.0.contains(&arg)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = QueryArg> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(QueryArg::name).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Absent means 0
    pub offset: Option<i64>,

    /// Absent means unbounded
    pub limit: Option<i64>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    /// A request with neither argument: the whole listing.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            offset: None,
            limit: None,
        }
    }

    /// Rejects negative arguments, otherwise returns `(offset, limit)` with
    /// defaults applied.
    pub fn validate(&self) -> PageOutcome<(usize, Option<usize>)> {
        let offset = match self.offset {
            Some(v) if v < 0 => return Err(PageError::invalid_argument("offset", v)),
            Some(v) => to_usize(v),
            None => 0,
        };

        let limit = match self.limit {
            Some(v) if v < 0 => return Err(PageError::invalid_argument("limit", v)),
            Some(v) => Some(to_usize(v)),
            None => None,
        };

        Ok((offset, limit))
    }

    fn honored(&self) -> HonoredArgs {
        let mut honored = HonoredArgs::default();
        if self.offset.is_some() {
            honored.insert(QueryArg::Offset);
        }
        if self.limit.is_some() {
            honored.insert(QueryArg::Limit);
        }
        honored
    }
}

// Saturates on 32-bit targets; anything that large is past the end anyway.
fn to_usize(v: i64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub entries: Vec<Entry>,

    /// Size of the full listing when the page was cut
    pub total_count: usize,

    pub honored_args: HonoredArgs,
}

impl PageResult {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cuts `entries[offset .. offset + limit]` out of the listing.
///
/// An offset at or past the end yields an empty page, not an error.
pub fn extract(entries: &[Entry], request: &PageRequest) -> PageOutcome<PageResult> {
    let (offset, limit) = request.validate()?;
    let total_count = entries.len();

    let page = if offset >= total_count {
        Vec::new()
    } else {
        let end = limit.map_or(total_count, |l| offset.saturating_add(l).min(total_count));
        entries[offset..end].to_vec()
    };

    Ok(PageResult {
        entries: page,
        total_count,
        honored_args: request.honored(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::format_compact;
    use std::path::PathBuf;

    fn entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry {
                display_name: format_compact!("file_{i:03}.txt"),
                absolute_path: PathBuf::from(format!("/store/file_{i:03}.txt")),
                size: i as u64,
                is_dir: false,
            })
            .collect()
    }

    #[test]
    fn page_length_matches_clamped_limit() {
        let list = entries(13);

        for offset in 0..16i64 {
            for limit in 0..16i64 {
                let page = extract(&list, &PageRequest::new(offset, limit)).unwrap();
                let remaining = 13i64.saturating_sub(offset).max(0);

                assert_eq!(page.len() as i64, limit.clamp(0, remaining));
                assert_eq!(page.total_count, 13);
            }
        }
    }

    #[test]
    fn page_is_contiguous_slice() {
        let list = entries(25);

        let page = extract(&list, &PageRequest::new(10, 10)).unwrap();

        assert_eq!(page.entries, list[10..20].to_vec());
    }

    #[test]
    fn scenario_twenty_five_entries_in_pages_of_ten() {
        let list = entries(25);

        let lens: Vec<usize> = [0, 10, 20, 25]
            .into_iter()
            .map(|offset| extract(&list, &PageRequest::new(offset, 10)).unwrap())
            .inspect(|page| assert_eq!(page.total_count, 25))
            .map(|page| page.len())
            .collect();

        assert_eq!(lens, vec![10, 10, 5, 0]);
    }

    #[test]
    fn empty_listing_is_not_an_error() {
        let page = extract(&[], &PageRequest::new(0, 10)).unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn negative_offset_is_invalid() {
        let err = extract(&entries(5), &PageRequest::new(-1, 10)).unwrap_err();

        assert!(matches!(
            err,
            PageError::InvalidArgument {
                field: "offset",
                value: -1
            }
        ));
    }

    #[test]
    fn negative_limit_is_invalid() {
        let err = extract(&entries(5), &PageRequest::new(0, -3)).unwrap_err();

        assert!(matches!(
            err,
            PageError::InvalidArgument { field: "limit", .. }
        ));
    }

    #[test]
    fn absent_arguments_are_not_honored() {
        let list = entries(12);

        let page = extract(&list, &PageRequest::unbounded()).unwrap();

        assert_eq!(page.len(), 12);
        assert!(page.honored_args.is_empty());
    }

    #[test]
    fn only_supplied_arguments_are_honored() {
        let list = entries(12);
        let request = PageRequest {
            offset: Some(4),
            limit: None,
        };

        let page = extract(&list, &request).unwrap();

        assert_eq!(page.len(), 8);
        assert!(page.honored_args.contains(QueryArg::Offset));
        assert!(!page.honored_args.contains(QueryArg::Limit));
        assert_eq!(page.honored_args.names(), vec!["offset"]);
    }

    #[test]
    fn huge_limit_does_not_overflow() {
        let list = entries(3);

        let page = extract(&list, &PageRequest::new(1, i64::MAX)).unwrap();

        assert_eq!(page.len(), 2);
    }

    #[test]
    fn extraction_is_idempotent() {
        let list = entries(17);
        let request = PageRequest::new(5, 6);

        let first = extract(&list, &request).unwrap();
        let second = extract(&list, &request).unwrap();

        assert_eq!(first, second);
    }
}
