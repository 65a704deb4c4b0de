use proptest::prelude::*;
use syft_filter::{Bounds, DatasetFilter, Record, Value};

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        -50i64..50,
        "[a-cA-C ]{0,6}",
        prop::collection::vec("[a-c]{1,3}", 0..4),
    )
        .prop_map(|(score, name, tags)| {
            Record::new()
                .with("score", score)
                .with("name", name)
                .with("tags", Value::List(tags))
        })
}

fn dataset() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..40)
}

fn score_of(record: &Record) -> i64 {
    match record.get("score") {
        Some(Value::Integer(i)) => *i,
        other => panic!("unexpected score {other:?}"),
    }
}

proptest! {
    #[test]
    fn reset_restores_source(records in dataset(), needle in "[a-c]{1,2}", lo in -50i64..0, hi in 0i64..50) {
        let mut filter = DatasetFilter::from_records(records.clone());
        filter.contains_filter("name", needle.as_str(), false).unwrap();
        filter.range_filter("score", lo as f64, hi as f64, Bounds::Inclusive).unwrap();
        filter.sort_descending("score").unwrap();

        filter.reset().unwrap();
        prop_assert_eq!(filter.results(), records.as_slice());
        prop_assert_eq!(filter.source().unwrap(), records.as_slice());
    }

    #[test]
    fn contains_is_idempotent(records in dataset(), needle in "[a-c]{1,2}", exact in any::<bool>()) {
        let mut once = DatasetFilter::from_records(records.clone());
        once.contains_filter("tags", needle.as_str(), exact).unwrap();

        let mut twice = DatasetFilter::from_records(records);
        twice.contains_filter("tags", needle.as_str(), exact).unwrap();
        twice.contains_filter("tags", needle.as_str(), exact).unwrap();

        prop_assert_eq!(once.results(), twice.results());
    }

    #[test]
    fn filtered_results_are_a_subsequence(records in dataset(), needle in "[a-c]{1,2}") {
        let mut filter = DatasetFilter::from_records(records.clone());
        filter.contains_filter("name", needle.as_str(), false).unwrap();

        let mut remaining = records.iter();
        for kept in filter.results() {
            prop_assert!(remaining.any(|r| r == kept));
        }
        prop_assert!(filter.len() <= records.len());
    }

    #[test]
    fn range_keeps_exactly_the_interval(records in dataset(), inclusive in any::<bool>()) {
        let mut filter = DatasetFilter::from_records(records.clone());
        filter.range_filter_flag("score", 5.0, 10.0, inclusive).unwrap();

        let expected: Vec<i64> = records
            .iter()
            .map(score_of)
            .filter(|s| if inclusive { (5..=10).contains(s) } else { *s > 5 && *s < 10 })
            .collect();
        let actual: Vec<i64> = filter.results().iter().map(score_of).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn sort_orders_and_reverse_mirrors(records in dataset()) {
        let mut asc = DatasetFilter::from_records(records.clone());
        asc.sort("score", false).unwrap();
        let asc_scores: Vec<i64> = asc.results().iter().map(score_of).collect();
        prop_assert!(asc_scores.windows(2).all(|w| w[0] <= w[1]));

        let mut desc = DatasetFilter::from_records(records);
        desc.sort("score", true).unwrap();
        let mut reversed = asc.results().to_vec();
        reversed.reverse();
        prop_assert_eq!(desc.results(), reversed.as_slice());
    }

    #[test]
    fn pages_cover_every_record(records in dataset(), size in 1usize..12) {
        let filter = DatasetFilter::from_records(records.clone());
        let pages = filter.paginate(size).unwrap();
        prop_assert!(pages.iter().all(|p| !p.is_empty() && p.len() <= size));
        let flattened: Vec<Record> = pages.concat();
        prop_assert_eq!(flattened, records);
    }
}
