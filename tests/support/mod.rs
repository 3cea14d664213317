#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use fractic_statement_import::{
    entities::{
        AccountRules, ExtractedTransaction, ExtractionOutcome, ExtractionResult, FilePayload,
    },
    errors::InvalidExtractionResponse,
    repositories::ExtractionRepository,
    BatchCoordinator,
};

pub const DELAY: Duration = Duration::from_millis(1000);

pub enum Scripted {
    Outcome(ExtractionOutcome),
    /// No response arrived; answered the way the HTTP repository does.
    Unreachable(&'static str),
    /// The repository itself failed.
    Fault,
}

/// Extraction double: answers after a fixed latency, from a per-filename
/// script (falling back to a two-row success), and records every call.
pub struct FakeExtractor {
    latency: Duration,
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn script(self, filename: &str, outcome: Scripted) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(filename.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub fn extracted(dates: &[&str], statement_period: Option<&str>) -> ExtractionOutcome {
    ExtractionOutcome::Extracted(ExtractionResult {
        transactions: dates
            .iter()
            .map(|d| ExtractedTransaction {
                date: d.to_string(),
                description: "Monthly assessment".into(),
                amount: 425.0,
                kind: Some("credit".into()),
                balance: None,
            })
            .collect(),
        statement_period: statement_period.map(String::from),
    })
}

#[async_trait]
impl ExtractionRepository for FakeExtractor {
    async fn extract(&self, file: &FilePayload) -> Result<ExtractionOutcome, ServerError> {
        self.calls.lock().unwrap().push(file.name.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&file.name)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Scripted::Outcome(outcome)) => Ok(outcome),
            Some(Scripted::Unreachable(message)) => Ok(ExtractionOutcome::Failed {
                data_message: None,
                message: Some(message.to_string()),
            }),
            Some(Scripted::Fault) => Err(InvalidExtractionResponse::new("truncated body")),
            None => Ok(extracted(&["01/05/2022", "01/19/2022"], None)),
        }
    }
}

pub fn coordinator(extractor: &Arc<FakeExtractor>) -> BatchCoordinator<Arc<FakeExtractor>> {
    BatchCoordinator::with_settings(extractor.clone(), AccountRules::default(), DELAY)
}

pub fn pdfs(names: &[&str]) -> Vec<FilePayload> {
    names
        .iter()
        .map(|n| FilePayload::new(*n, Some("application/pdf".into()), b"%PDF-1.7".to_vec()))
        .collect()
}
