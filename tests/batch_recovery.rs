mod support;

use std::{sync::Arc, time::Duration};

use fractic_statement_import::entities::{BatchFileStatus, ExtractionOutcome, ImportResult};
use support::{coordinator, extracted, pdfs, FakeExtractor, Scripted};

#[tokio::test(start_paused = true)]
async fn retry_clears_previous_error_and_reprocesses() {
    let extractor = Arc::new(
        FakeExtractor::new(Duration::from_millis(50))
            .script("a.pdf", Scripted::Fault)
            .script(
                "a.pdf",
                Scripted::Outcome(extracted(&["02/01/2022", "02/02/2022", "02/03/2022"], None)),
            ),
    );
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf"])).await;
    batch.process_all().await;

    let id = batch.files().await[0].id.clone();
    assert_eq!(
        batch.file(&id).await.map(|f| f.status),
        Some(BatchFileStatus::Error)
    );

    let observe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        batch.file(&id).await
    };
    let (retried, mid_retry) = tokio::join!(batch.retry_file(&id), observe);
    retried.expect("retry accepted");

    let mid_retry = mid_retry.expect("file present");
    assert_eq!(mid_retry.status, BatchFileStatus::Processing);
    assert_eq!(mid_retry.error, None);

    let file = batch.file(&id).await.expect("file present");
    assert_eq!(file.status, BatchFileStatus::Done);
    assert_eq!(file.error, None);
    assert_eq!(file.transaction_count(), 3);
    assert_eq!(extractor.calls(), vec!["a.pdf", "a.pdf"]);
}

#[tokio::test(start_paused = true)]
async fn retry_that_fails_again_records_the_new_error() {
    let extractor = Arc::new(
        FakeExtractor::new(Duration::from_millis(10))
            .script(
                "a.pdf",
                Scripted::Outcome(ExtractionOutcome::Rejected {
                    error: Some("first".into()),
                }),
            )
            .script(
                "a.pdf",
                Scripted::Outcome(ExtractionOutcome::Rejected { error: None }),
            ),
    );
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf"])).await;
    batch.process_all().await;
    let id = batch.files().await[0].id.clone();

    batch.retry_file(&id).await.expect("retry accepted");

    let file = batch.file(&id).await.expect("file present");
    assert_eq!(file.status, BatchFileStatus::Error);
    assert_eq!(file.error.as_deref(), Some("Failed to extract transactions"));
}

#[tokio::test(start_paused = true)]
async fn retry_of_a_file_being_processed_is_refused() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(100)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf"])).await;
    let id = batch.files().await[0].id.clone();

    let retry = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        batch.retry_file(&id).await
    };
    let (processed, retried) = tokio::join!(batch.process_file(&id), retry);

    assert!(processed);
    assert!(retried.is_err());
    assert_eq!(extractor.calls().len(), 1);
    assert_eq!(
        batch.file(&id).await.map(|f| f.status),
        Some(BatchFileStatus::Done)
    );
}

#[tokio::test]
async fn retry_of_unknown_file_is_an_error() {
    let extractor = Arc::new(FakeExtractor::new(Duration::ZERO));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf"])).await;
    let id = batch.files().await[0].id.clone();
    batch.remove_file(&id).await;

    assert!(batch.retry_file(&id).await.is_err());
    assert!(extractor.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clear_during_run_stops_processing() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(100)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf", "b.pdf", "c.pdf"])).await;

    let clear = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        batch.clear().await;
        assert!(!batch.is_processing().await);
        assert_eq!(batch.active_index().await, None);
    };
    let (summary, ()) = tokio::join!(batch.process_all(), clear);

    // The in-flight call completes, but its outcome is dropped and no further
    // file is sent.
    assert_eq!(extractor.calls(), vec!["a.pdf"]);
    assert_eq!(summary.total, 0);
    assert!(batch.files().await.is_empty());
    assert!(!batch.is_processing().await);
}

#[tokio::test(start_paused = true)]
async fn clear_during_pause_stops_processing() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(100)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf", "b.pdf"])).await;

    let clear = async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        batch.clear().await;
    };
    tokio::join!(batch.process_all(), clear);

    assert_eq!(extractor.calls(), vec!["a.pdf"]);
    assert!(batch.files().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn new_run_after_clear_is_independent() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(100)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf", "b.pdf"])).await;

    let restart = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        batch.clear().await;
        batch.add_files(pdfs(&["c.pdf"])).await;
        batch.process_all().await
    };
    let (_, second) = tokio::join!(batch.process_all(), restart);

    assert_eq!(second.completed, 1);
    assert_eq!(extractor.calls(), vec!["a.pdf", "c.pdf"]);
    assert!(!batch.is_processing().await);
}

#[tokio::test(start_paused = true)]
async fn removed_file_is_skipped_by_running_batch() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(100)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf", "b.pdf", "c.pdf"])).await;
    let b = batch.files().await[1].id.clone();

    let remove = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(batch.remove_file(&b).await);
    };
    let (summary, ()) = tokio::join!(batch.process_all(), remove);

    assert_eq!(extractor.calls(), vec!["a.pdf", "c.pdf"]);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 2);
}

#[tokio::test(start_paused = true)]
async fn imported_files_are_committed_and_kept_out_of_runs() {
    let extractor = Arc::new(FakeExtractor::new(Duration::from_millis(10)));
    let batch = coordinator(&extractor);
    batch.add_files(pdfs(&["a.pdf"])).await;
    let id = batch.files().await[0].id.clone();

    let not_done = batch
        .mark_imported(&id, ImportResult { imported: 2, skipped: 0 })
        .await;
    assert!(not_done.is_err());

    batch.process_all().await;
    batch
        .mark_imported(&id, ImportResult { imported: 2, skipped: 0 })
        .await
        .expect("done -> imported");

    batch.process_all().await;
    let file = batch.file(&id).await.expect("file present");
    assert_eq!(file.status, BatchFileStatus::Imported);
    assert_eq!(file.import_result, Some(ImportResult { imported: 2, skipped: 0 }));
    assert_eq!(extractor.calls().len(), 1);
}
