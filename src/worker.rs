use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use tracing::warn;

use crate::backend::{Backend, CampaignRequest};
use crate::campaign;
use crate::config::JoinPolicy;
use crate::error::{Error, Result};
use crate::trend::{BatchOutcome, CancelToken, TrendBatch};
use crate::venue::{Venue, VenueResponse};

/// Completions sent from background threads back to the UI loop. Every event
/// carries the id of the request that produced it so the UI can drop answers
/// to requests it has since abandoned.
#[derive(Debug)]
pub enum AppEvent {
    VenueLoaded {
        request: u64,
        id: String,
        response: VenueResponse,
    },
    LookupFailed {
        request: u64,
        error: Error,
    },
    TrendApplied {
        request: u64,
        outcome: BatchOutcome,
    },
    TrendFailed {
        request: u64,
        error: Error,
    },
    CampaignSubmitted {
        request: u64,
        trend: String,
        budget: u64,
    },
    CampaignFailed {
        request: u64,
        error: Error,
    },
}

/// Spawns network work off the UI thread. Results come back over `tx`.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, tx: Sender<AppEvent>) -> Self {
        Self { backend, tx }
    }

    /// Fails only if the OS refuses a new thread; no event will follow then.
    fn spawn<F>(&self, name: &str, job: F) -> Result<()>
    where
        F: FnOnce(&dyn Backend) -> AppEvent + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let event = job(backend.as_ref());
                // The UI may already be gone on shutdown.
                let _ = tx.send(event);
            })
            .map_err(|e| {
                warn!(job = name, error = %e, "could not spawn worker thread");
                Error::Io(e)
            })?;
        Ok(())
    }

    pub fn lookup(&self, request: u64, id: String) -> Result<()> {
        self.spawn("lookup", move |backend| match backend.fetch_venue(&id) {
            Ok(response) => AppEvent::VenueLoaded {
                request,
                id,
                response,
            },
            Err(error) => AppEvent::LookupFailed { request, error },
        })
    }

    pub fn apply_trend(
        &self,
        request: u64,
        venue: Arc<Venue>,
        indices: Vec<usize>,
        trend: String,
        policy: JoinPolicy,
        cancel: CancelToken,
    ) -> Result<()> {
        self.spawn("trend", move |backend| {
            let job = TrendBatch {
                venue: &venue,
                indices,
                trend,
                policy,
            };
            match job.run(backend, &cancel) {
                Ok(outcome) => AppEvent::TrendApplied { request, outcome },
                Err(error) => AppEvent::TrendFailed { request, error },
            }
        })
    }

    pub fn campaign(&self, request: u64, req: CampaignRequest) -> Result<()> {
        self.spawn("campaign", move |backend| {
            match campaign::submit(backend, &req) {
                Ok(()) => AppEvent::CampaignSubmitted {
                    request,
                    trend: req.trend,
                    budget: req.budget,
                },
                Err(error) => AppEvent::CampaignFailed { request, error },
            }
        })
    }
}
