//! Trend batches: one edit request per selected photo, run concurrently and
//! folded into a single [`ResultGroup`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

use crate::backend::{Backend, EditRequest};
use crate::config::JoinPolicy;
use crate::error::{Error, Result};
use crate::imaging;
use crate::venue::Venue;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One finished batch. Fields are private so a group cannot change after it
/// is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    trend: String,
    images: Vec<String>,
}

impl ResultGroup {
    pub fn new(trend: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            trend: trend.into(),
            images,
        }
    }

    pub fn trend(&self) -> &str {
        &self.trend
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }
}

/// Append-only list of finished groups.
#[derive(Debug, Default)]
pub struct ResultList {
    groups: Vec<ResultGroup>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: ResultGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Run `work` once per item, every item on its own thread, all launched before
/// any is joined. Outcomes come back in item order, not completion order.
/// Items whose thread has not started work when `cancel` fires yield
/// [`Error::Cancelled`].
pub fn fan_out<T, R, F>(items: Vec<T>, cancel: &CancelToken, work: F) -> Vec<Result<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let work = &work;
    thread::scope(|scope| {
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                scope.spawn(move || {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    work(item)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Err(Error::Worker)))
            .collect()
    })
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub group: Option<ResultGroup>,
    /// Source photo index and the reason it failed. Only populated under
    /// [`JoinPolicy::BestEffort`].
    pub failures: Vec<(usize, Error)>,
}

pub struct TrendBatch<'a> {
    pub venue: &'a Venue,
    /// Ascending photo indices.
    pub indices: Vec<usize>,
    pub trend: String,
    pub policy: JoinPolicy,
}

impl TrendBatch<'_> {
    pub fn validate(&self) -> Result<()> {
        if self.trend.trim().is_empty() {
            return Err(Error::validation("pick a trend first"));
        }
        if self.indices.is_empty() {
            return Err(Error::validation("select at least one photo"));
        }
        let count = self.venue.image_urls.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i >= count) {
            return Err(Error::validation(format!(
                "photo {bad} is out of range ({count} photos)"
            )));
        }
        Ok(())
    }

    pub fn run(self, backend: &dyn Backend, cancel: &CancelToken) -> Result<BatchOutcome> {
        self.validate()?;
        info!(
            venue = %self.venue.id,
            trend = %self.trend,
            photos = self.indices.len(),
            "applying trend"
        );

        let tags = &self.venue.tags;
        let trend = &self.trend;
        let jobs: Vec<(usize, &str)> = self
            .indices
            .iter()
            .map(|&i| (i, self.venue.image_urls[i].as_str()))
            .collect();

        let outcomes = fan_out(jobs, cancel, |(_, url)| {
            let bytes = backend.fetch_photo(url)?;
            let image = imaging::to_png_base64(&bytes)?;
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let edited = backend.edit_image(&EditRequest {
                image,
                trend: trend.clone(),
                tags: tags.clone(),
            })?;
            Ok(edited.image)
        });

        if cancel.is_cancelled() {
            info!(trend = %self.trend, "trend batch cancelled");
            return Err(Error::Cancelled);
        }

        join(self.trend, &self.indices, outcomes, self.policy)
    }
}

fn join(
    trend: String,
    indices: &[usize],
    outcomes: Vec<Result<String>>,
    policy: JoinPolicy,
) -> Result<BatchOutcome> {
    let mut images = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for (&idx, outcome) in indices.iter().zip(outcomes) {
        match outcome {
            Ok(image) => images.push(image),
            Err(e) => {
                warn!(photo = idx, error = %e, "edit request failed");
                if policy == JoinPolicy::AllOrNothing {
                    return Err(e);
                }
                failures.push((idx, e));
            }
        }
    }

    let group = if images.is_empty() {
        None
    } else {
        Some(ResultGroup::new(trend, images))
    };
    Ok(BatchOutcome { group, failures })
}
