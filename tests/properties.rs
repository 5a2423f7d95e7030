//! Property tests for the query laws.

use orderview::{paginate, run_query, Criteria, CriteriaStore, DateMode, OrderStatus, Record};
use proptest::prelude::*;

const TYPES: [&str; 5] = ["Book", "Medicine", "Electric", "Mobile", "Watch"];

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_date() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => (1u32..=12, 1u32..=28).prop_map(|(m, d)| format!("2024-{:02}-{:02}", m, d)),
        1 => Just("not-a-date".to_string()),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((prop::sample::select(TYPES.to_vec()), arb_status(), arb_date()), 0..60)
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (t, s, d))| Record::new(i as u64, t, s, d))
                .collect()
        })
}

fn arb_date_mode() -> impl Strategy<Value = DateMode> {
    prop::sample::select(vec![
        DateMode::None,
        DateMode::Newest,
        DateMode::Oldest,
        DateMode::Range,
    ])
}

fn arb_criteria() -> impl Strategy<Value = Criteria> {
    (
        prop::option::of(prop::sample::select(TYPES.to_vec())),
        prop::option::of(arb_status()),
        arb_date_mode(),
        prop::option::of(0i64..400),
        prop::option::of(0i64..400),
    )
        .prop_map(|(t, s, mode, from, to)| {
            let base = chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2024, 1, 1, 0, 0, 0)
                .unwrap();
            Criteria::default()
                .with_type(t.unwrap_or(""))
                .with_status(s)
                .with_date_mode(mode)
                .with_range(
                    from.map(|days| base + chrono::Duration::days(days)),
                    to.map(|days| base + chrono::Duration::days(days)),
                )
        })
}

fn id_of(record: &Record) -> String {
    record.id.to_string()
}

proptest! {
    #[test]
    fn identity_filter_law(records in arb_records()) {
        prop_assert_eq!(run_query(&records, &Criteria::default()), records);
    }

    #[test]
    fn type_filter_is_exact_and_complete(
        records in arb_records(),
        record_type in prop::sample::select(TYPES.to_vec()),
    ) {
        let filtered = run_query(&records, &Criteria::default().with_type(record_type));
        prop_assert!(filtered.iter().all(|r| r.record_type == record_type));
        let expected = records.iter().filter(|r| r.record_type == record_type).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn recomputation_is_idempotent(records in arb_records(), criteria in arb_criteria()) {
        prop_assert_eq!(run_query(&records, &criteria), run_query(&records, &criteria));
    }

    #[test]
    fn date_sorts_are_stable(records in arb_records(), newest in any::<bool>()) {
        let mode = if newest { DateMode::Newest } else { DateMode::Oldest };
        let sorted = run_query(&records, &Criteria::default().with_date_mode(mode));
        prop_assert_eq!(sorted.len(), records.len());

        // Ids are source positions, so equal dates must keep ascending ids.
        for pair in sorted.windows(2) {
            if pair[0].date.instant() == pair[1].date.instant() {
                let (a, b) = (id_of(&pair[0]), id_of(&pair[1]));
                prop_assert!(a.parse::<u64>().unwrap() < b.parse::<u64>().unwrap());
            }
        }
    }

    #[test]
    fn pages_partition_the_filtered_view(
        records in arb_records(),
        criteria in arb_criteria(),
        page_size in 1usize..12,
    ) {
        let filtered = run_query(&records, &criteria);
        let page_count = filtered.len().div_ceil(page_size);

        let mut rebuilt = Vec::new();
        for page in 1..=page_count {
            let window = paginate(&filtered, page, page_size);
            prop_assert!(!window.records.is_empty());
            prop_assert!(window.window.end_index <= filtered.len());
            rebuilt.extend(window.records);
        }
        prop_assert_eq!(&rebuilt, &filtered);
        prop_assert!(paginate(&filtered, page_count + 1, page_size).records.is_empty());
    }

    #[test]
    fn navigation_never_touches_filters(steps in prop::collection::vec(any::<bool>(), 0..30)) {
        let mut store = CriteriaStore::new();
        store.set_type("Book");
        store.set_status(Some(OrderStatus::OnHold));
        store.set_date_mode(DateMode::Newest);
        let before = store.criteria().clone();

        let mut expected_page = 1usize;
        for forward in steps {
            if forward {
                store.next_page();
                expected_page += 1;
            } else {
                store.prev_page();
                expected_page = expected_page.saturating_sub(1).max(1);
            }
            prop_assert_eq!(store.current_page(), expected_page);
            prop_assert_eq!(store.criteria(), &before);
        }
    }
}
