use crossterm::event::KeyCode;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::campaign;
use crate::config::AppConfig;
use crate::error::Error;
use crate::export;
use crate::selection::SelectionSet;
use crate::trend::{BatchOutcome, CancelToken, ResultList};
use crate::venue::{self, Venue, VenueContext};
use crate::worker::{AppEvent, Dispatcher};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Lookup,
    Venue,
    Campaign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Photos,
    Trends,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Busy {
    Lookup,
    Trend,
    Campaign,
}

impl Busy {
    pub fn label(&self) -> &'static str {
        match self {
            Busy::Lookup => "Looking up venue",
            Busy::Trend => "Applying trend",
            Busy::Campaign => "Generating campaign",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VenueAction {
    ApplyTrend,
    Campaign,
    Export,
    Upscale,
}

impl VenueAction {
    pub const ALL: &'static [VenueAction] = &[
        VenueAction::ApplyTrend,
        VenueAction::Campaign,
        VenueAction::Export,
        VenueAction::Upscale,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            VenueAction::ApplyTrend => "Enter",
            VenueAction::Campaign => "c",
            VenueAction::Export => "e",
            VenueAction::Upscale => "u",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VenueAction::ApplyTrend => "apply trend",
            VenueAction::Campaign => "campaign",
            VenueAction::Export => "export",
            VenueAction::Upscale => "upscale (coming soon)",
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, VenueAction::Upscale)
    }
}

/// The one background request the UI is waiting on.
struct InFlight {
    id: u64,
    kind: Busy,
    cancel: CancelToken,
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: AppConfig,

    // Lookup
    pub url_input: String,

    // Venue detail
    pub venue: VenueContext,
    pub focus: Focus,
    pub photo_cursor: usize,
    pub trend_cursor: usize,
    pub selection: SelectionSet,
    pub results: ResultList,

    // Campaign
    pub budget_input: String,

    // Status
    pub status: Option<String>,
    pub failure: Option<String>,

    dispatcher: Dispatcher,
    events: Receiver<AppEvent>,
    in_flight: Option<InFlight>,
    next_request: u64,
}

impl App {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        let (tx, events) = mpsc::channel();
        let budget_input = config.default_budget.to_string();
        Self {
            screen: Screen::Lookup,
            should_quit: false,
            config,
            url_input: String::new(),
            venue: VenueContext::new(),
            focus: Focus::Photos,
            photo_cursor: 0,
            trend_cursor: 0,
            selection: SelectionSet::new(),
            results: ResultList::new(),
            budget_input,
            status: None,
            failure: None,
            dispatcher: Dispatcher::new(backend, tx),
            events,
            in_flight: None,
            next_request: 0,
        }
    }

    pub fn busy(&self) -> Option<Busy> {
        self.in_flight.as_ref().map(|f| f.kind)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns false, with a status message, if another request is running.
    fn ready_for(&mut self, kind: Busy) -> bool {
        match self.busy() {
            None => true,
            Some(running) => {
                info!(?kind, ?running, "request refused while busy");
                self.status = Some(format!("Wait for \"{}\" to finish", running.label()));
                false
            }
        }
    }

    fn begin(&mut self, kind: Busy) -> (u64, CancelToken) {
        self.next_request += 1;
        let cancel = CancelToken::new();
        self.in_flight = Some(InFlight {
            id: self.next_request,
            kind,
            cancel: cancel.clone(),
        });
        (self.next_request, cancel)
    }

    /// True if `request` is the one still awaited; answers to abandoned
    /// requests are dropped.
    fn finish(&mut self, request: u64) -> bool {
        if self.in_flight.as_ref().map(|f| f.id) != Some(request) {
            info!(request, "dropping stale completion");
            return false;
        }
        self.in_flight = None;
        true
    }

    /// The worker thread never started, so no completion will arrive.
    fn dispatch_failed(&mut self, request: u64, err: &Error) {
        if self.finish(request) {
            self.fail(err);
        }
    }

    pub fn current_trend(&self) -> Option<&str> {
        self.venue
            .get()
            .and_then(|v| v.trends.get(self.trend_cursor))
            .map(String::as_str)
    }

    fn fail(&mut self, err: &Error) {
        warn!(error = %err, "operation failed");
        self.status = None;
        self.failure = Some(err.to_string());
    }

    fn clear_messages(&mut self) {
        self.status = None;
        self.failure = None;
    }

    // ── Background completions ──────────────────────────────────────────────

    pub fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                // The app holds a sender inside its dispatcher, so this cannot
                // happen while `self` is alive.
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::VenueLoaded {
                request,
                id,
                response,
            } => {
                if !self.finish(request) {
                    return;
                }
                let loaded = Venue::from_response(&id, response, &self.config.backup_trends);
                info!(venue = %loaded.id, photos = loaded.image_urls.len(), "venue loaded");
                self.venue.replace(loaded);
                self.enter_venue();
            }
            AppEvent::TrendApplied { request, outcome } => {
                if self.finish(request) {
                    self.record_outcome(outcome);
                }
            }
            AppEvent::CampaignSubmitted {
                request,
                trend,
                budget,
            } => {
                if !self.finish(request) {
                    return;
                }
                self.failure = None;
                self.status = Some(format!("Campaign for \"{trend}\" submitted (budget ¥{budget})"));
                if self.screen == Screen::Campaign {
                    self.screen = Screen::Venue;
                }
            }
            AppEvent::LookupFailed { request, error }
            | AppEvent::TrendFailed { request, error }
            | AppEvent::CampaignFailed { request, error } => {
                if self.finish(request) {
                    self.fail(&error);
                }
            }
        }
    }

    fn record_outcome(&mut self, outcome: BatchOutcome) {
        let failed = outcome.failures.len();
        if let Some(group) = outcome.group {
            self.status = Some(format!(
                "\"{}\" applied to {} photo(s)",
                group.trend(),
                group.images().len()
            ));
            self.results.push(group);
        }
        if failed > 0 {
            let first = outcome
                .failures
                .first()
                .map(|(idx, e)| format!("photo {}: {e}", idx + 1))
                .unwrap_or_default();
            self.failure = Some(format!("{failed} photo(s) failed ({first})"));
        }
    }

    // ── Keys ────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Lookup => self.handle_lookup(key),
            Screen::Venue => self.handle_venue(key),
            Screen::Campaign => self.handle_campaign(key),
        }
    }

    fn handle_lookup(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                self.url_input.push(c);
            }
            KeyCode::Backspace => {
                self.url_input.pop();
            }
            KeyCode::Enter => self.start_lookup(),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn start_lookup(&mut self) {
        self.clear_messages();
        if !self.ready_for(Busy::Lookup) {
            return;
        }
        let input = self.url_input.trim();
        match venue::parse_venue_id(input, &self.config.venue_url_prefix) {
            Ok(id) => {
                info!(venue = %id, "looking up venue");
                let (request, _) = self.begin(Busy::Lookup);
                if let Err(e) = self.dispatcher.lookup(request, id) {
                    self.dispatch_failed(request, &e);
                }
            }
            Err(e) => self.fail(&e),
        }
    }

    fn enter_venue(&mut self) {
        self.selection.clear();
        self.results.clear();
        self.photo_cursor = 0;
        self.trend_cursor = 0;
        self.focus = Focus::Photos;
        self.screen = Screen::Venue;
    }

    fn leave_venue(&mut self) {
        if let Some(running) = self.in_flight.take() {
            info!(request = running.id, kind = ?running.kind, "abandoning request");
            running.cancel.cancel();
        }
        self.selection.clear();
        self.results.clear();
        self.venue.clear();
        self.clear_messages();
        self.screen = Screen::Lookup;
    }

    fn handle_venue(&mut self, key: KeyCode) {
        let photo_count = self.venue.get().map_or(0, |v| v.image_urls.len());
        let trend_count = self.venue.get().map_or(0, |v| v.trends.len());
        match key {
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Photos => self.photo_cursor = self.photo_cursor.saturating_sub(1),
                Focus::Trends => self.trend_cursor = self.trend_cursor.saturating_sub(1),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Photos => {
                    if photo_count > 0 && self.photo_cursor < photo_count - 1 {
                        self.photo_cursor += 1;
                    }
                }
                Focus::Trends => {
                    if trend_count > 0 && self.trend_cursor < trend_count - 1 {
                        self.trend_cursor += 1;
                    }
                }
            },
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Photos => Focus::Trends,
                    Focus::Trends => Focus::Photos,
                };
            }
            KeyCode::Char(' ') => {
                if self.focus == Focus::Photos && photo_count > 0 {
                    self.selection.toggle(self.photo_cursor);
                }
            }
            KeyCode::Enter | KeyCode::Char('t') => self.start_trend(),
            KeyCode::Char('c') => {
                if self.current_trend().is_some() {
                    self.clear_messages();
                    self.budget_input = self.config.default_budget.to_string();
                    self.screen = Screen::Campaign;
                }
            }
            KeyCode::Char('e') => self.export_results(),
            KeyCode::Char('u') => self.upscale(),
            KeyCode::Esc => self.leave_venue(),
            _ => {}
        }
    }

    fn start_trend(&mut self) {
        self.clear_messages();
        if !self.ready_for(Busy::Trend) {
            return;
        }
        let Some(venue) = self.venue.snapshot() else {
            return;
        };
        let trend = self.current_trend().unwrap_or_default().to_string();

        let (request, cancel) = self.begin(Busy::Trend);
        let dispatched = self.dispatcher.apply_trend(
            request,
            venue,
            self.selection.to_vec(),
            trend,
            self.config.join_policy,
            cancel,
        );
        if let Err(e) = dispatched {
            self.dispatch_failed(request, &e);
        }
    }

    fn export_results(&mut self) {
        self.clear_messages();
        let Some(venue) = self.venue.get() else {
            return;
        };
        if self.results.is_empty() {
            self.status = Some("Nothing to export yet".to_string());
            return;
        }
        match export::export_groups(&self.config.output_dir, &venue.id, self.results.groups()) {
            Ok(paths) => {
                let dir = paths
                    .first()
                    .and_then(|p| p.parent())
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.status = Some(format!("Exported {} image(s) to {dir}", paths.len()));
            }
            Err(e) => self.fail(&e),
        }
    }

    fn upscale(&mut self) {
        info!(selection = ?self.selection.to_vec(), "upscale requested");
        self.status = Some("Upscale is not available yet".to_string());
    }

    fn handle_campaign(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.budget_input.push(c);
            }
            KeyCode::Backspace => {
                self.budget_input.pop();
            }
            KeyCode::Enter => self.start_campaign(),
            KeyCode::Esc => {
                self.clear_messages();
                self.screen = Screen::Venue;
            }
            _ => {}
        }
    }

    fn start_campaign(&mut self) {
        self.clear_messages();
        if !self.ready_for(Busy::Campaign) {
            return;
        }
        let Some(venue) = self.venue.get() else {
            return;
        };
        let trend = self.current_trend().unwrap_or_default();
        let req = campaign::parse_budget(&self.budget_input)
            .and_then(|budget| campaign::build_request(venue, trend, budget));
        match req {
            Ok(req) => {
                let (request, _) = self.begin(Busy::Campaign);
                if let Err(e) = self.dispatcher.campaign(request, req) {
                    self.dispatch_failed(request, &e);
                }
            }
            Err(e) => self.fail(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoinPolicy;
    use crate::trend::tests::{photo_url, FakeBackend};
    use crate::venue::VenueResponse;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    fn response(photos: u8) -> VenueResponse {
        VenueResponse {
            urls: (0..photos).map(photo_url).collect(),
            title: "Shibuya Loft".into(),
            tags: Some(vec!["loft".into()]),
            appropriate_trends: vec!["pizza party".into(), "halloween".into(), "jazz".into()],
            backup_trends: vec![],
        }
    }

    fn app_with(backend: FakeBackend) -> (App, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let app = App::new(AppConfig::default(), backend.clone());
        (app, backend)
    }

    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.is_loading() {
            assert!(Instant::now() < deadline, "background work never finished");
            std::thread::sleep(Duration::from_millis(5));
            app.drain_events();
        }
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn loaded(backend: FakeBackend) -> (App, Arc<FakeBackend>) {
        let (mut app, backend) = app_with(FakeBackend {
            venue: Some(response(4)),
            ..backend
        });
        type_str(&mut app, "https://www.instabase.jp/space/abc123");
        app.handle_key(KeyCode::Enter);
        assert!(app.is_loading());
        settle(&mut app);
        (app, backend)
    }

    #[test]
    fn lookup_populates_context_and_navigates() {
        let (app, _) = loaded(FakeBackend::default());
        assert_eq!(app.screen, Screen::Venue);
        let venue = app.venue.get().unwrap();
        assert_eq!(venue.id, "abc123");
        assert_eq!(venue.title, "Shibuya Loft");
        assert_eq!(venue.trends.len(), 3);
        assert!(app.failure.is_none());
    }

    #[test]
    fn failed_lookup_shows_failure_and_stays() {
        let (mut app, _) = app_with(FakeBackend::default());
        type_str(&mut app, "missing");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);
        assert_eq!(app.screen, Screen::Lookup);
        assert!(app.venue.get().is_none());
        assert!(app.failure.as_deref().unwrap().contains("404"));
    }

    #[test]
    fn empty_url_is_rejected_without_request() {
        let (mut app, _) = app_with(FakeBackend::default());
        app.handle_key(KeyCode::Enter);
        assert!(!app.is_loading());
        assert!(app.failure.is_some());
    }

    #[test]
    fn apply_trend_appends_a_group() {
        let (mut app, _) = loaded(FakeBackend::default());
        // select photos 3 and 1, in that order
        for _ in 0..3 {
            app.handle_key(KeyCode::Down);
        }
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.selection.to_vec(), vec![1, 3]);

        app.handle_key(KeyCode::Enter);
        assert!(app.is_loading());
        settle(&mut app);

        assert_eq!(app.results.len(), 1);
        let group = &app.results.groups()[0];
        assert_eq!(group.trend(), "pizza party");
        assert_eq!(
            group.images(),
            &[
                "edited-1-pizza party".to_string(),
                "edited-3-pizza party".to_string()
            ]
        );
    }

    #[test]
    fn failed_batch_appends_nothing() {
        let (mut app, _) = loaded(FakeBackend {
            fail_photos: HashSet::from([0]),
            ..FakeBackend::default()
        });
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert!(app.results.is_empty());
        assert!(app.failure.is_some());
    }

    #[test]
    fn best_effort_policy_reports_partial_failure() {
        let backend = Arc::new(FakeBackend {
            venue: Some(response(3)),
            fail_photos: HashSet::from([0]),
            ..FakeBackend::default()
        });
        let cfg = AppConfig {
            join_policy: JoinPolicy::BestEffort,
            ..AppConfig::default()
        };
        let mut app = App::new(cfg, backend);
        type_str(&mut app, "abc123");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert_eq!(app.results.len(), 1);
        assert_eq!(app.results.groups()[0].images().len(), 1);
        assert!(app.failure.as_deref().unwrap().contains("photo 1"));
    }

    #[test]
    fn chosen_trend_follows_trend_cursor() {
        let (mut app, _) = loaded(FakeBackend::default());
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.current_trend(), Some("halloween"));
        // space on the trends pane does not select photos
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.selection.len(), 1);

        app.handle_key(KeyCode::Char('t'));
        settle(&mut app);
        assert_eq!(app.results.groups()[0].trend(), "halloween");
    }

    #[test]
    fn leaving_cancels_and_drops_late_results() {
        let (mut app, backend) = loaded(FakeBackend {
            edit_delay: Duration::from_millis(200),
            ..FakeBackend::default()
        });
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Enter);
        assert!(app.is_loading());

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Lookup);
        assert!(!app.is_loading());
        assert!(app.venue.get().is_none());

        std::thread::sleep(Duration::from_millis(400));
        app.drain_events();
        assert!(app.results.is_empty());
        assert!(app.failure.is_none());
        assert!(backend.edits.load(std::sync::atomic::Ordering::SeqCst) <= 1);
    }

    #[test]
    fn campaign_submits_with_budget_and_trend() {
        let (mut app, backend) = loaded(FakeBackend::default());
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.screen, Screen::Campaign);
        assert_eq!(app.budget_input, "500");

        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Backspace);
        type_str(&mut app, "x1200");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        assert_eq!(app.screen, Screen::Venue);
        let sent = backend.campaigns.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].budget, 1200);
        assert_eq!(sent[0].trend, "pizza party");
        assert_eq!(sent[0].venueid, "abc123");
    }

    #[test]
    fn late_campaign_answer_is_dropped_after_leaving() {
        let (mut app, backend) = loaded(FakeBackend {
            campaign_delay: Duration::from_millis(100),
            lookup_delay: Duration::from_millis(300),
            ..FakeBackend::default()
        });
        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.busy(), Some(Busy::Campaign));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Venue);
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Lookup);
        assert!(!app.is_loading());

        type_str(&mut app, "missing");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.busy(), Some(Busy::Lookup));

        // Wait for the abandoned campaign to land first.
        let deadline = Instant::now() + Duration::from_secs(10);
        while backend.campaigns.lock().unwrap().is_empty() {
            assert!(Instant::now() < deadline, "campaign never reached the backend");
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(20));
        app.drain_events();
        assert_eq!(app.screen, Screen::Lookup);
        assert_eq!(app.busy(), Some(Busy::Lookup));
        assert!(app.status.is_none());

        settle(&mut app);
        assert_eq!(app.screen, Screen::Lookup);
        assert!(app.venue.get().is_none());
        assert!(app.failure.as_deref().unwrap().contains("404"));
    }

    #[test]
    fn campaign_done_after_esc_stays_on_venue() {
        let (mut app, _) = loaded(FakeBackend {
            campaign_delay: Duration::from_millis(100),
            ..FakeBackend::default()
        });
        app.handle_key(KeyCode::Char('c'));
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Esc);
        settle(&mut app);
        assert_eq!(app.screen, Screen::Venue);
        assert!(app.status.as_deref().unwrap().contains("submitted"));
    }

    #[test]
    fn enter_while_busy_says_to_wait() {
        let (mut app, backend) = loaded(FakeBackend {
            edit_delay: Duration::from_millis(200),
            ..FakeBackend::default()
        });
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.busy(), Some(Busy::Trend));

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.screen, Screen::Campaign);
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.status.as_deref(),
            Some("Wait for \"Applying trend\" to finish")
        );
        assert_eq!(app.busy(), Some(Busy::Trend));

        settle(&mut app);
        assert_eq!(app.results.len(), 1);
        assert!(backend.campaigns.lock().unwrap().is_empty());
    }

    #[test]
    fn dispatch_failure_clears_busy() {
        let (mut app, _) = app_with(FakeBackend::default());
        let (request, _) = app.begin(Busy::Lookup);
        assert!(app.is_loading());

        app.dispatch_failed(request + 1, &Error::Worker);
        assert!(app.is_loading());

        app.dispatch_failed(request, &Error::Io(std::io::Error::other("no threads")));
        assert!(!app.is_loading());
        assert!(app.failure.as_deref().unwrap().contains("no threads"));
    }

    #[test]
    fn zero_budget_never_reaches_backend() {
        let (mut app, backend) = loaded(FakeBackend::default());
        app.handle_key(KeyCode::Char('c'));
        for _ in 0..3 {
            app.handle_key(KeyCode::Backspace);
        }
        app.handle_key(KeyCode::Char('0'));
        app.handle_key(KeyCode::Enter);
        assert!(!app.is_loading());
        assert!(app.failure.is_some());
        assert!(backend.campaigns.lock().unwrap().is_empty());
    }

    #[test]
    fn upscale_only_reports() {
        let (mut app, backend) = loaded(FakeBackend::default());
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('u'));
        assert!(!app.is_loading());
        assert!(app.status.is_some());
        assert_eq!(backend.edits.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn export_needs_results_and_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend {
            venue: Some(response(2)),
            ..FakeBackend::default()
        });
        let cfg = AppConfig {
            output_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let mut app = App::new(cfg, backend);
        type_str(&mut app, "abc123");
        app.handle_key(KeyCode::Enter);
        settle(&mut app);

        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.status.as_deref(), Some("Nothing to export yet"));

        // The fake editor returns text, not images, so export must refuse it.
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Enter);
        settle(&mut app);
        app.handle_key(KeyCode::Char('e'));
        assert!(app.failure.is_some());
    }
}
