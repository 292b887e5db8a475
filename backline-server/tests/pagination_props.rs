//! Property tests for the pagination envelope

use backline_server::models::{PageResponse, Paginated, Pagination};
use proptest::prelude::*;

proptest! {
    #[test]
    fn inputs_are_clamped(page in any::<u32>(), limit in any::<u32>()) {
        let p = Pagination::new(page, limit);
        prop_assert!(p.page >= 1);
        prop_assert!((1..=100).contains(&p.limit));
        prop_assert_eq!(p.offset(), (p.page as u64 - 1) * p.limit as u64);
    }

    #[test]
    fn envelope_flags_match_counts(
        total in 0i64..1_000_000,
        page in 1u32..20_000,
        limit in 1u32..=100,
    ) {
        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total_count: total,
            page: Pagination::new(page, limit),
        };
        let response = PageResponse::from(paginated);

        prop_assert!(response.total_pages >= 1);
        prop_assert!(response.total_pages as i64 * limit as i64 >= total);
        prop_assert_eq!(response.has_prev, page > 1);
        prop_assert_eq!(response.has_next, (page as i64) * (limit as i64) < total);
    }
}
