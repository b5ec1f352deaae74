use std::sync::Arc;

use crate::{
    auth::TokenKeys,
    payment::Payments,
    publisher::EventPublisher,
    store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// `None` when gateway keys are not configured.
    pub payments: Option<Payments>,
    pub tokens: TokenKeys,
    pub events: EventPublisher,
    pub currency: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, payments: Option<Payments>, tokens: TokenKeys, events: EventPublisher, currency: impl Into<String>) -> Self {
        Self { store, payments, tokens, events, currency: currency.into() }
    }
}
