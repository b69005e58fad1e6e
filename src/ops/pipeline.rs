//! The task view pipeline: sort → filter → search.
//!
//! Every function here is pure; the display layer re-runs
//! [`process_tasks`] whenever the task list or the view parameters change.

use crate::model::task::Task;
use crate::model::view::{SortKey, ViewParams};

/// The derived, ordered list of tasks to display
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedView<'a> {
    pub tasks: Vec<&'a Task>,
    /// Filter/search matched nothing, so `tasks` is the merely-sorted list
    pub fell_back: bool,
}

impl ProcessedView<'_> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Order tasks by the given key. Ties in the date-time sorts keep storage
/// order.
pub fn sort_tasks(tasks: &[Task], sort: SortKey) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    match sort {
        SortKey::Newest => sorted.reverse(),
        SortKey::Oldest => {}
        SortKey::Early => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortKey::Latest => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
    sorted
}

/// Whether a task satisfies every narrowed filter dimension
pub fn matches_filters(task: &Task, params: &ViewParams) -> bool {
    let category_match = params
        .category
        .as_deref()
        .is_none_or(|category| task.category == category);
    let priority_match = params.priority.is_none_or(|p| task.priority == p);
    let status_match = params.status.matches(task.completed);

    category_match && priority_match && status_match
}

pub fn filter_tasks<'a>(tasks: &[&'a Task], params: &ViewParams) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|task| matches_filters(task, params))
        .collect()
}

/// Case-insensitive substring match against the title only
pub fn matches_search(task: &Task, term: &str) -> bool {
    task.title
        .trim()
        .to_lowercase()
        .contains(&term.trim().to_lowercase())
}

pub fn search_tasks<'a>(tasks: &[&'a Task], term: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|task| matches_search(task, term))
        .collect()
}

/// Run the full pipeline.
///
/// If filtering and/or searching leave nothing, the sorted list is returned
/// unfiltered and `fell_back` is set.
pub fn process_tasks<'a>(tasks: &'a [Task], params: &ViewParams) -> ProcessedView<'a> {
    let sorted = sort_tasks(tasks, params.sort);

    let has_filter = params.has_filter();
    let search = params.search_term();
    if !has_filter && search.is_none() {
        return ProcessedView {
            tasks: sorted,
            fell_back: false,
        };
    }

    let mut processed = sorted.clone();
    if has_filter {
        processed = filter_tasks(&processed, params);
    }
    if let Some(term) = search {
        processed = search_tasks(&processed, term);
    }

    if processed.is_empty() && !sorted.is_empty() {
        tracing::debug!(?params, "view matched nothing, showing sorted list");
        return ProcessedView {
            tasks: sorted,
            fell_back: true,
        };
    }

    ProcessedView {
        tasks: processed,
        fell_back: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, TaskId};
    use crate::model::timestamp::parse_timestamp;
    use crate::model::view::StatusFilter;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn task(id: &str, title: &str, time: &str, priority: Priority, category: &str) -> Task {
        let mut t = Task::new(title, category, parse_timestamp(time).unwrap());
        t.id = TaskId::from(id);
        t.priority = priority;
        t
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.to_string()).collect()
    }

    /// Storage order deliberately differs from date order
    fn sample() -> Vec<Task> {
        let mut done = task(
            "3",
            "Pay rent",
            "2025-08-01T09:00:00.000+08:00",
            Priority::High,
            "Home",
        );
        done.completed = true;
        done.description = Some("before the milk run".into());
        vec![
            task("1", "Buy Milk", "2025-08-09T17:30:00.000+08:00", Priority::Low, "Shopping"),
            task("2", "Write report", "2025-08-03T08:00:00.000+08:00", Priority::Medium, "Work"),
            done,
            task("4", "Call mom", "2025-08-05T20:00:00.000+08:00", Priority::High, "Home"),
        ]
    }

    #[test]
    fn sort_insertion_orders() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Newest)), vec!["4", "3", "2", "1"]);
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Oldest)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn sort_by_timestamp() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Early)), vec!["3", "2", "4", "1"]);
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Latest)), vec!["1", "4", "2", "3"]);
    }

    #[test]
    fn sort_compares_instants_across_offsets() {
        let tasks = vec![
            // 10:00 UTC
            task("a", "A", "2025-08-09T18:00:00.000+08:00", Priority::Low, "W"),
            // 09:00 UTC
            task("b", "B", "2025-08-09T09:00:00.000+00:00", Priority::Low, "W"),
        ];
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Early)), vec!["b", "a"]);
    }

    #[test]
    fn equal_timestamps_keep_storage_order() {
        let at = "2025-08-09T10:00:00.000+00:00";
        let tasks = vec![
            task("a", "A", at, Priority::Low, "W"),
            task("b", "B", at, Priority::Low, "W"),
            task("c", "C", at, Priority::Low, "W"),
        ];
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Early)), vec!["a", "b", "c"]);
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Latest)), vec!["a", "b", "c"]);
    }

    #[test]
    fn no_params_returns_sorted() {
        let tasks = sample();
        let view = process_tasks(&tasks, &ViewParams::default());
        assert_eq!(ids(&view.tasks), vec!["4", "3", "2", "1"]);
        assert!(!view.fell_back);
    }

    #[test]
    fn filters_compose() {
        let tasks = sample();
        let params = ViewParams {
            category: Some("Home".into()),
            priority: Some(Priority::High),
            status: StatusFilter::Active,
            ..Default::default()
        };
        let view = process_tasks(&tasks, &params);
        assert_eq!(ids(&view.tasks), vec!["4"]);

        let params = ViewParams {
            status: StatusFilter::Done,
            ..Default::default()
        };
        assert_eq!(ids(&process_tasks(&tasks, &params).tasks), vec!["3"]);
    }

    #[test]
    fn search_is_case_insensitive_title_only() {
        let tasks = sample();
        let params = ViewParams {
            search: "  MILK ".into(),
            ..Default::default()
        };
        // Task 3 mentions milk only in its description
        assert_eq!(ids(&process_tasks(&tasks, &params).tasks), vec!["1"]);
    }

    #[test]
    fn search_tasks_keeps_exactly_the_matching_titles() {
        let tasks = sample();
        let all: Vec<&Task> = tasks.iter().collect();
        let found = search_tasks(&all, " Milk");
        let expected: Vec<&Task> = all
            .iter()
            .copied()
            .filter(|t| matches_search(t, " Milk"))
            .collect();
        assert_eq!(ids(&found), ids(&expected));
        assert_eq!(ids(&found), vec!["1"]);
    }

    #[test]
    fn whitespace_search_is_ignored() {
        let tasks = sample();
        let params = ViewParams {
            search: "   ".into(),
            sort: SortKey::Oldest,
            ..Default::default()
        };
        let view = process_tasks(&tasks, &params);
        assert_eq!(ids(&view.tasks), vec!["1", "2", "3", "4"]);
        assert!(!view.fell_back);
    }

    #[test]
    fn search_applies_after_filter() {
        let tasks = sample();
        let params = ViewParams {
            category: Some("Home".into()),
            search: "call".into(),
            ..Default::default()
        };
        assert_eq!(ids(&process_tasks(&tasks, &params).tasks), vec!["4"]);
    }

    #[test]
    fn empty_result_falls_back_to_sorted() {
        let tasks = sample();
        let params = ViewParams {
            sort: SortKey::Early,
            category: Some("Work".into()),
            search: "rent".into(),
            ..Default::default()
        };
        let view = process_tasks(&tasks, &params);
        assert!(view.fell_back);
        assert_eq!(ids(&view.tasks), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn empty_store_stays_empty() {
        let params = ViewParams {
            search: "x".into(),
            ..Default::default()
        };
        let view = process_tasks(&[], &params);
        assert!(view.is_empty());
        assert!(!view.fell_back);
    }

    #[test]
    fn two_task_scenario() {
        let tasks = vec![
            task("1", "A", "2025-08-01T10:00:00.000+00:00", Priority::Low, "Work"),
            task("2", "B", "2025-08-02T10:00:00.000+00:00", Priority::High, "Home"),
        ];
        let mut params = ViewParams {
            sort: SortKey::Newest,
            ..Default::default()
        };
        assert_eq!(ids(&process_tasks(&tasks, &params).tasks), vec!["2", "1"]);

        params.priority = Some(Priority::High);
        assert_eq!(ids(&process_tasks(&tasks, &params).tasks), vec!["2"]);

        params.search = "z".into();
        let view = process_tasks(&tasks, &params);
        assert!(view.fell_back);
        assert_eq!(ids(&view.tasks), vec!["2", "1"]);
    }

    // --- Properties ---

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High)
        ]
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(
            (
                0i64..10_000,
                -12i32..=12,
                "[a-cA-C]{1,4}",
                arb_priority(),
                prop_oneof![Just("Work"), Just("Home")],
                any::<bool>(),
            ),
            0..12,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (minutes, offset_h, title, priority, category, completed))| {
                    let offset = chrono::FixedOffset::east_opt(offset_h * 3600).unwrap();
                    let base = parse_timestamp("2025-01-01T00:00:00.000+00:00").unwrap();
                    let ts = (base + chrono::Duration::minutes(minutes)).with_timezone(&offset);
                    let mut t = Task::new(title, category, ts);
                    t.id = TaskId::from(i.to_string());
                    t.priority = priority;
                    t.completed = completed;
                    t
                })
                .collect()
        })
    }

    fn arb_params() -> impl Strategy<Value = ViewParams> {
        (
            prop_oneof![
                Just(SortKey::Newest),
                Just(SortKey::Oldest),
                Just(SortKey::Early),
                Just(SortKey::Latest)
            ],
            prop::option::of(prop_oneof![Just("Work".to_string()), Just("Home".to_string())]),
            prop::option::of(arb_priority()),
            prop_oneof![
                Just(StatusFilter::All),
                Just(StatusFilter::Active),
                Just(StatusFilter::Done)
            ],
            prop_oneof![Just(String::new()), "[a-c ]{0,3}"],
        )
            .prop_map(|(sort, category, priority, status, search)| ViewParams {
                sort,
                category,
                priority,
                status,
                search,
            })
    }

    proptest! {
        #[test]
        fn early_is_non_decreasing(tasks in arb_tasks()) {
            let sorted = sort_tasks(&tasks, SortKey::Early);
            prop_assert!(sorted.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }

        #[test]
        fn latest_is_non_increasing(tasks in arb_tasks()) {
            let sorted = sort_tasks(&tasks, SortKey::Latest);
            prop_assert!(sorted.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        }

        #[test]
        fn sort_is_a_permutation(tasks in arb_tasks(), params in arb_params()) {
            let mut sorted = ids(&sort_tasks(&tasks, params.sort));
            let mut original: Vec<String> = tasks.iter().map(|t| t.id.to_string()).collect();
            sorted.sort();
            original.sort();
            prop_assert_eq!(sorted, original);
        }

        #[test]
        fn output_satisfies_every_active_filter(tasks in arb_tasks(), params in arb_params()) {
            let view = process_tasks(&tasks, &params);
            if !view.fell_back {
                for t in &view.tasks {
                    prop_assert!(matches_filters(t, &params));
                    if let Some(term) = params.search_term() {
                        prop_assert!(matches_search(t, term));
                    }
                }
                // And nothing that qualifies is dropped
                let expected = tasks
                    .iter()
                    .filter(|t| matches_filters(t, &params))
                    .filter(|t| params.search_term().is_none_or(|term| matches_search(t, term)))
                    .count();
                prop_assert_eq!(view.len(), expected);
            }
        }

        #[test]
        fn fallback_law(tasks in arb_tasks(), params in arb_params()) {
            let view = process_tasks(&tasks, &params);
            let sorted = sort_tasks(&tasks, params.sort);
            let narrowed = search_tasks(
                &filter_tasks(&sorted, &params),
                params.search_term().unwrap_or(""),
            );
            if !sorted.is_empty() && narrowed.is_empty() {
                prop_assert!(view.fell_back);
                prop_assert_eq!(ids(&view.tasks), ids(&sorted));
            }
        }
    }
}
