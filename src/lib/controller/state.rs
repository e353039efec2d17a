use crate::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelVisibility {
    Shown,
    Hidden,
}

/// A message the user has to acknowledge before doing anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoPlaceFound,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoPlaceFound => "No place found",
        }
    }
}

/// Everything the search UI shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query_text: String,
    pub panel_visibility: PanelVisibility,
    pub resolved_position: Option<Position>,
    pub pending: Option<RequestToken>,
    pub notice: Option<Notice>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query_text: String::new(),
            panel_visibility: PanelVisibility::Hidden,
            resolved_position: None,
            pending: None,
            notice: None,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.panel_visibility == PanelVisibility::Shown
    }

    /// Whether the search input and button can be used right now.
    ///
    /// A displayed notice hides the panel without closing it.
    pub fn accepts_input(&self) -> bool {
        self.is_shown() && self.notice.is_none()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
