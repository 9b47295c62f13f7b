//! 保存・復元の統合テスト
//!
//! ファイル版ストアを通してスナップショットの往復と寛容な復元を検証

use ride_along::session::{today, Session};
use ride_along::store::FileStore;
use ride_along_common::{
    Checklist, EvaluationMeta, KeyValueStore, MetaField, Outline, SnapshotStore, OVERALL_NOTE_KEY,
    STORAGE_KEY,
};
use std::sync::Arc;
use tempfile::tempdir;

fn home_visit() -> Arc<Outline> {
    Arc::new(Outline::home_visit())
}

/// 保存データがない状態で起動すると初期状態
#[test]
fn test_open_without_snapshot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = Session::open(home_visit(), today(), FileStore::new(dir.path()));

    assert!(session.store().load().is_none());
    let checklist = session.checklist();
    assert_eq!(checklist.completion().count_checked(), 0);
    assert_eq!(checklist.statistics().total_tasks, 75);
    assert_eq!(checklist.statistics().completion_rate, 0);
    assert_eq!(checklist.notes().overall(), "");
    assert_eq!(checklist.meta().date, today());
    assert_eq!(checklist.meta().evaluator_name, "");
}

/// 保存して再起動すると同じ状態に戻る
#[test]
fn test_save_and_reopen_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut session = Session::open(home_visit(), "2026-01-18".into(), FileStore::new(dir.path()));
    {
        let checklist = session.checklist_mut();
        checklist.set_meta(MetaField::EvaluatorName, "Dr. Rivera");
        checklist.set_meta(MetaField::ClinicianName, "Sam Lee");
        checklist.toggle_item("documentationReview", "Chart Review");
        checklist.toggle_item("postVisitTasks", "Care Plan Form completed");
        checklist.set_note("technicalSkills", "EMR usage was smooth");
        checklist.set_note(OVERALL_NOTE_KEY, "Ready for independent visits");
    }
    assert!(session.save());
    assert!(dir.path().join(format!("{}.json", STORAGE_KEY)).exists());

    let reopened = Session::open(home_visit(), "2030-12-31".into(), FileStore::new(dir.path()));
    assert_eq!(reopened.checklist().meta(), session.checklist().meta());
    assert_eq!(reopened.checklist().notes(), session.checklist().notes());
    assert_eq!(reopened.checklist().completion(), session.checklist().completion());
    assert_eq!(reopened.checklist().statistics().completed_tasks, 2);
}

/// 破損したファイルは「保存データなし」として扱う
#[test]
fn test_corrupted_file_is_ignored() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join(format!("{}.json", STORAGE_KEY)), "{ invalid json }").unwrap();

    let session = Session::open(home_visit(), "2026-01-18".into(), FileStore::new(dir.path()));
    assert_eq!(session.checklist().completion().count_checked(), 0);
    assert_eq!(session.checklist().meta().date, "2026-01-18");
}

/// 一部のフィールドしかない古い形式のデータ
#[test]
fn test_partial_snapshot_merges_field_by_field() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());
    store
        .set(
            STORAGE_KEY,
            r#"{
                "evalData": {"clinicianName": "Old Data", "notes": {"screenings": "kept"}},
                "checkboxes": {"screenings": {"Fall Risk Assessment": true, "Retired item": true}}
            }"#,
        )
        .unwrap();

    let session = Session::open(home_visit(), "2026-01-18".into(), store);
    let checklist = session.checklist();

    assert_eq!(checklist.meta().clinician_name, "Old Data");
    assert_eq!(checklist.meta().evaluator_name, "");
    assert_eq!(checklist.meta().date, "2026-01-18");
    assert_eq!(checklist.note("screenings"), "kept");
    assert_eq!(checklist.notes().overall(), "");
    assert!(checklist.is_checked("screenings", "Fall Risk Assessment"));
    assert!(!checklist.is_checked("screenings", "Bladder screening"));
    // アウトライン外の項目は数えない
    assert_eq!(checklist.statistics().completed_tasks, 1);
    assert!(!checklist.report().contains("Retired item"));
}

/// トップレベルが欠けたデータは復元しない
#[test]
fn test_missing_top_level_is_no_snapshot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());
    store
        .set(STORAGE_KEY, r#"{"evalData": {"clinicianName": "Nope"}}"#)
        .unwrap();

    let session = Session::open(home_visit(), "2026-01-18".into(), store);
    assert_eq!(session.checklist().meta().clinician_name, "");
}

/// clear で保存データが消える
#[test]
fn test_clear_removes_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = Session::open(home_visit(), "2026-01-18".into(), FileStore::new(dir.path()));
    session.checklist_mut().toggle_item("screenings", "ADLs/IADLs");
    session.save();

    assert!(session.clear_saved("2026-01-19".into()));
    assert!(!dir.path().join(format!("{}.json", STORAGE_KEY)).exists());

    let reopened = Session::open(home_visit(), "2026-01-19".into(), FileStore::new(dir.path()));
    assert_eq!(reopened.checklist().completion().count_checked(), 0);
}

/// 書き込めない場所でも save は panic せず false を返す
#[test]
fn test_save_failure_does_not_propagate() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut store = SnapshotStore::new(FileStore::new(&blocker));
    let checklist = Checklist::new(home_visit(), EvaluationMeta::new("2026-01-18"));
    assert!(!store.save(&checklist));
    assert!(store.load().is_none());
}

/// リセットはメタ情報を残す
#[test]
fn test_reset_then_save() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = Session::open(home_visit(), "2026-01-18".into(), FileStore::new(dir.path()));
    session.checklist_mut().set_meta(MetaField::ClinicianName, "Sam Lee");
    session.checklist_mut().toggle_item("screenings", "ADLs/IADLs");
    session.checklist_mut().set_note("screenings", "note");
    session.checklist_mut().reset();
    session.save();

    let reopened = Session::open(home_visit(), "2026-01-18".into(), FileStore::new(dir.path()));
    assert_eq!(reopened.checklist().meta().clinician_name, "Sam Lee");
    assert_eq!(reopened.checklist().completion().count_checked(), 0);
    assert_eq!(reopened.checklist().note("screenings"), "");
}
