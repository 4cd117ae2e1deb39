//! Session Integration Tests
//!
//! End-to-end upload, analyze and clear cycles through the public API.

use std::time::Duration;

use doccheck::config::{AnalysisSettings, IntakeSettings, Settings};
use doccheck::core::{AnalysisError, EnginePhase, EntryPath, Session};
use doccheck::MemoryFile;
use tokio_test::{assert_err, assert_ok};

fn settings() -> Settings {
    Settings {
        analysis: AnalysisSettings::immediate(),
        seed: Some(17),
        ..Default::default()
    }
}

fn text_files(names: &[&str]) -> Vec<MemoryFile> {
    names
        .iter()
        .map(|n| MemoryFile::text(*n, &format!("contents of {}", n)))
        .collect()
}

#[tokio::test]
async fn test_two_documents_full_cycle() {
    let mut session = Session::new(&settings()).unwrap();

    let outcome = session
        .upload(text_files(&["A.txt", "B.txt"]), EntryPath::DragDrop)
        .await;
    assert_eq!(outcome.added_count(), 2);
    assert_eq!(session.documents().len(), 2);

    let report = assert_ok!(session.analyze().await);
    assert_eq!(report.document_names, vec!["A.txt", "B.txt"]);
    let contradictions = report.contradictions.len() as u64;

    let usage = session.usage();
    assert_eq!(usage.documents_analyzed, 2);
    assert_eq!(usage.reports_generated, 1);
    assert_eq!(usage.contradictions_found, contradictions);
    assert_eq!(usage.total_billing, 25);
}

#[tokio::test]
async fn test_analysis_refused_below_two_documents() {
    let mut session = Session::new(&settings()).unwrap();

    let err = assert_err!(session.analyze().await);
    assert_eq!(
        err,
        AnalysisError::NotEnoughDocuments {
            found: 0,
            required: 2
        }
    );

    session
        .upload(text_files(&["only.txt"]), EntryPath::Picker)
        .await;
    let err = assert_err!(session.analyze().await);
    assert_eq!(
        err,
        AnalysisError::NotEnoughDocuments {
            found: 1,
            required: 2
        }
    );

    assert_eq!(session.phase(), EnginePhase::Idle);
    assert_eq!(session.usage().total_billing, 0);
}

#[tokio::test]
async fn test_six_files_with_cap_of_five() {
    let mut session = Session::new(&settings()).unwrap();

    let outcome = session
        .upload(
            text_files(&["1.txt", "2.txt", "3.txt", "4.txt", "5.txt", "6.txt"]),
            EntryPath::DragDrop,
        )
        .await;

    assert_eq!(outcome.added_count(), 5);
    assert_eq!(outcome.dropped, vec!["6.txt"]);
    assert!(outcome.failed.is_empty());
    assert_eq!(session.documents().len(), 5);
    assert!(session.is_full());
}

#[tokio::test]
async fn test_batch_limited_to_remaining_capacity() {
    let mut session = Session::new(&Settings {
        intake: IntakeSettings {
            max_files: 4,
            ..Default::default()
        },
        ..settings()
    })
    .unwrap();

    session
        .upload(text_files(&["a.txt", "b.txt", "c.txt"]), EntryPath::Picker)
        .await;
    let outcome = session
        .upload(text_files(&["d.txt", "e.txt", "f.txt"]), EntryPath::Picker)
        .await;

    assert_eq!(outcome.added_count(), 1);
    assert_eq!(outcome.dropped.len(), 2);
    assert_eq!(session.documents().len(), 4);
}

#[tokio::test]
async fn test_clear_returns_to_idle() {
    let mut session = Session::new(&settings()).unwrap();
    session
        .upload(text_files(&["a.txt", "b.txt", "c.txt"]), EntryPath::DragDrop)
        .await;

    let report_id = assert_ok!(session.analyze().await).id;
    assert_eq!(session.phase(), EnginePhase::Ready { report_id });
    assert!(session.report().is_some());

    session.clear_analysis();

    assert!(session.documents().is_empty());
    assert!(session.report().is_none());
    assert_eq!(session.phase(), EnginePhase::Idle);
    // Counters survive a clear
    assert_eq!(session.usage().reports_generated, 1);
}

#[tokio::test]
async fn test_billing_accumulates_across_cycles() {
    let mut session = Session::new(&settings()).unwrap();
    let mut expected_billing = 0;

    for (round, names) in [
        vec!["a.txt", "b.txt"],
        vec!["a.txt", "b.txt", "c.txt", "d.txt"],
        vec!["x.txt", "y.txt", "z.txt"],
    ]
    .into_iter()
    .enumerate()
    {
        session.upload(text_files(&names), EntryPath::Picker).await;
        let d = session.documents().len() as u64;

        let before = *session.usage();
        let report = assert_ok!(session.analyze().await);
        let found = report.contradictions.len() as u64;
        let after = *session.usage();

        assert_eq!(after.documents_analyzed - before.documents_analyzed, d);
        assert_eq!(after.reports_generated - before.reports_generated, 1);
        assert_eq!(after.contradictions_found - before.contradictions_found, found);
        assert_eq!(after.total_billing - before.total_billing, 5 * d + 15);

        expected_billing += 5 * d + 15;
        assert_eq!(after.total_billing, expected_billing, "round {}", round);
        assert_eq!(
            after.total_billing,
            after.documents_analyzed * 5 + after.reports_generated * 15
        );

        session.clear_analysis();
    }
}

#[tokio::test]
async fn test_analyze_twice_requires_clear() {
    let mut session = Session::new(&settings()).unwrap();
    session
        .upload(text_files(&["a.txt", "b.txt"]), EntryPath::DragDrop)
        .await;

    assert_ok!(session.analyze().await);
    let err = assert_err!(session.analyze().await);
    assert_eq!(err, AnalysisError::ReportOutstanding);
    assert_eq!(session.usage().reports_generated, 1);
}

#[tokio::test]
async fn test_remove_document() {
    let mut session = Session::new(&settings()).unwrap();
    let outcome = session
        .upload(text_files(&["a.txt", "b.txt"]), EntryPath::DragDrop)
        .await;

    assert!(session.remove_document(outcome.added[0]));
    assert!(!session.remove_document(outcome.added[0]));
    assert_eq!(session.documents().len(), 1);
    assert!(!session.can_analyze());
}

#[tokio::test(start_paused = true)]
async fn test_simulated_delay_and_progress_phase() {
    let mut session = Session::new(&Settings {
        seed: Some(5),
        ..Default::default()
    })
    .unwrap();
    session
        .upload(text_files(&["a.txt", "b.txt"]), EntryPath::DragDrop)
        .await;

    let mut phases = session.subscribe();
    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        while phases.changed().await.is_ok() {
            let phase = phases.borrow_and_update().clone();
            let done = matches!(phase, EnginePhase::Ready { .. });
            seen.push(phase);
            if done {
                break;
            }
        }
        seen
    });

    let started = tokio::time::Instant::now();
    assert_ok!(session.analyze().await);
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed <= Duration::from_secs(5));

    let seen = watcher.await.unwrap();
    assert_eq!(seen.first(), Some(&EnginePhase::Analyzing { documents: 2 }));
    assert!(matches!(seen.last(), Some(EnginePhase::Ready { .. })));
}

#[test]
fn test_out_of_range_settings_refused_up_front() {
    let inverted = Settings {
        analysis: AnalysisSettings {
            min_delay_ms: 5000,
            max_delay_ms: 3000,
        },
        ..Default::default()
    };
    assert!(Session::new(&inverted).is_err());

    let no_files = Settings {
        intake: IntakeSettings {
            max_files: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(Session::new(&no_files).is_err());
}
