//! The search panel: when it is shown, what was searched for and where the map should go.

mod observer;
mod shortcuts;
mod state;

pub use observer::*;
pub use shortcuts::*;
pub use state::*;

use crate::*;

/// What a pointer click landed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The floating button which opens the search panel.
    SearchTrigger,
    SearchInput,
    SearchButton,
    /// Anywhere else in the window.
    Outside,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitSource {
    Enter,
    Button,
}

pub struct SearchController<C> {
    state: SearchState,
    client: C,
    shortcuts: ShortcutSubscription,
    next_token: u64,
    focus_requested: bool,
}

impl<C: GeocodeClient> SearchController<C> {
    pub fn new(client: C, shortcuts: &ShortcutBus) -> Self {
        Self {
            state: SearchState::new(),
            client,
            shortcuts: shortcuts.subscribe(),
            next_token: 0,
            focus_requested: false,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn query_mut(&mut self) -> &mut String {
        &mut self.state.query_text
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query_text = text.into();
    }

    /// Returns whether the search input should grab the keyboard focus, once.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::replace(&mut self.focus_requested, false)
    }

    pub fn click(&mut self, target: ClickTarget) {
        if self.state.notice.is_some() {
            return;
        }

        match target {
            ClickTarget::SearchTrigger => self.show(),
            ClickTarget::SearchInput | ClickTarget::SearchButton => {}
            ClickTarget::Outside => self.hide(),
        }
    }

    /// Starts looking up the current query.
    ///
    /// Any lookup still running is superseded: its answer will be ignored.
    pub fn submit(&mut self, source: SubmitSource) -> Option<RequestToken> {
        if self.state.notice.is_some() {
            return None;
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;

        if let Some(previous) = self.state.pending.replace(token) {
            log::debug!("Request {} is superseded by {}.", previous, token);
        }
        log::info!(
            "Searching for {:?} ({:?}, request {}).",
            self.state.query_text,
            source,
            token
        );
        self.client.request(token, self.state.query_text.clone());

        Some(token)
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    /// Works all shortcuts and finished lookups which arrived since the last update.
    pub fn update(&mut self, observer: &mut dyn PositionObserver) {
        while let Some(shortcut) = self.shortcuts.poll() {
            if self.state.notice.is_some() {
                continue;
            }
            match shortcut {
                Shortcut::OpenSearch => self.show(),
                Shortcut::CloseSearch => self.hide(),
            }
        }

        while let Some(completion) = self.client.poll() {
            self.complete(completion, observer);
        }
    }

    fn complete(&mut self, completion: GeocodeCompletion, observer: &mut dyn PositionObserver) {
        if self.state.pending != Some(completion.token) {
            log::debug!("Dropping the answer to stale request {}.", completion.token);
            return;
        }
        self.state.pending = None;

        match completion.result.ok().and_then(|places| places.into_iter().next()) {
            Some(place) => {
                log::info!("Found {} at {}.", place.label, place.center);
                self.state.resolved_position = Some(place.center);
                self.hide();
                observer.position_changed(&place.center);
            }
            None => {
                self.state.notice = Some(Notice::NoPlaceFound);
            }
        }
    }

    fn show(&mut self) {
        self.state.panel_visibility = PanelVisibility::Shown;
        self.focus_requested = true;
    }

    fn hide(&mut self) {
        self.state.panel_visibility = PanelVisibility::Hidden;
        self.focus_requested = false;
    }
}
