//! 統計と保存の性質テスト

use proptest::prelude::*;
use ride_along_common::{
    Checklist, EvaluationMeta, MemoryStore, MetaField, Outline, Section, SnapshotStore,
    OVERALL_NOTE_KEY,
};
use std::sync::Arc;

fn outline_with(sizes: &[usize]) -> Arc<Outline> {
    let sections = sizes
        .iter()
        .enumerate()
        .map(|(i, size)| {
            let items: Vec<String> = (0..*size).map(|j| format!("item {}", j)).collect();
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            Section::new(format!("s{}", i), format!("Section {}", i), &refs)
        })
        .collect();
    Arc::new(Outline::new(sections).expect("アウトライン構築失敗"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn statistics_match_flag_count(
        sizes in proptest::collection::vec(0_usize..6, 0..5),
        picks in proptest::collection::vec(any::<bool>(), 0..30),
    ) {
        let outline = outline_with(&sizes);
        let mut checklist = Checklist::new(Arc::clone(&outline), EvaluationMeta::new("2026-01-18"));

        let mut expected = 0;
        let mut flags = picks.iter();
        for section in outline.sections() {
            for item in &section.items {
                if *flags.next().unwrap_or(&false) {
                    checklist.toggle_item(&section.key, item);
                    expected += 1;
                }
            }
        }

        let stats = checklist.statistics();
        prop_assert_eq!(stats.total_tasks, outline.total_tasks());
        prop_assert_eq!(stats.completed_tasks, expected);
        if stats.total_tasks == 0 {
            prop_assert_eq!(stats.completion_rate, 0);
        } else {
            let exact = 100.0 * expected as f64 / stats.total_tasks as f64;
            prop_assert_eq!(stats.completion_rate, exact.round() as u32);
        }

        let report = checklist.report();
        prop_assert_eq!(report.lines().filter(|l| l.starts_with("[X]")).count(), expected);
    }

    #[test]
    fn save_load_round_trip(
        picks in proptest::collection::vec(any::<bool>(), 5),
        evaluator in "[A-Za-z .'-]{0,20}",
        note in "\\PC{0,40}",
        overall in "\\PC{0,40}",
    ) {
        let outline = outline_with(&[3, 2]);
        let mut checklist = Checklist::new(Arc::clone(&outline), EvaluationMeta::new("2026-01-18"));
        checklist.set_meta(MetaField::EvaluatorName, evaluator);
        checklist.set_note("s0", note);
        checklist.set_note(OVERALL_NOTE_KEY, overall);
        let items: Vec<(String, String)> = outline
            .sections()
            .iter()
            .flat_map(|s| s.items.iter().map(move |i| (s.key.clone(), i.clone())))
            .collect();
        for ((key, item), pick) in items.iter().zip(&picks) {
            if *pick {
                checklist.toggle_item(key, item);
            }
        }

        let mut store = SnapshotStore::new(MemoryStore::new());
        prop_assert!(store.save(&checklist));

        let mut restored = Checklist::new(Arc::clone(&outline), EvaluationMeta::new("1999-01-01"));
        prop_assert!(store.restore_into(&mut restored));
        prop_assert_eq!(restored.meta(), checklist.meta());
        prop_assert_eq!(restored.notes(), checklist.notes());
        prop_assert_eq!(restored.completion(), checklist.completion());
        prop_assert_eq!(restored.report(), checklist.report());
    }
}
