//! Reducer-style state container for the dashboard
//!
//! The transition function is pure so it can be unit-tested independently
//! of any rendering layer. `business_data` is only ever replaced wholesale
//! or field-patched on an existing record; views never observe a partially
//! populated record.

use crate::models::BusinessInsight;

/// Form input owned by the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    pub name: String,
    pub location: String,
}

/// Full client-side state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub business_data: Option<BusinessInsight>,
    pub loading: bool,
    pub headline_loading: bool,
    pub error: Option<String>,
    pub form_data: FormData,
}

/// User and network intents driving state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLoading(bool),
    SetHeadlineLoading(bool),
    SetError(Option<String>),
    SetBusinessData(BusinessInsight),
    SetFormData(FormData),
    UpdateHeadline(String),
    UpdateRating(f64),
    UpdateReviews(u32),
    Reset,
}

/// Pure state-transition function
pub fn reduce(state: ClientState, action: Action) -> ClientState {
    match action {
        Action::SetLoading(loading) => ClientState { loading, ..state },
        Action::SetHeadlineLoading(headline_loading) => ClientState {
            headline_loading,
            ..state
        },
        Action::SetError(error) => ClientState {
            error,
            loading: false,
            ..state
        },
        Action::SetBusinessData(data) => ClientState {
            business_data: Some(data),
            loading: false,
            error: None,
            ..state
        },
        Action::SetFormData(form_data) => ClientState { form_data, ..state },
        Action::UpdateHeadline(headline) => {
            let mut state = state;
            state.business_data = state
                .business_data
                .map(|data| BusinessInsight { headline, ..data });
            state.headline_loading = false;
            state.error = None;
            state
        }
        Action::UpdateRating(rating) => {
            // Direct user edits are clamped to the displayable range
            let rating = (rating.clamp(1.0, 5.0) * 10.0).round() / 10.0;
            let mut state = state;
            state.business_data = state
                .business_data
                .map(|data| BusinessInsight { rating, ..data });
            state
        }
        Action::UpdateReviews(reviews) => {
            let mut state = state;
            state.business_data = state
                .business_data
                .map(|data| BusinessInsight { reviews, ..data });
            state
        }
        Action::Reset => ClientState::default(),
    }
}
