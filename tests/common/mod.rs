//! Common test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use pig_farm::api::{self, AppState};
use pig_farm::domain::{format_date, today};
use pig_farm::notify::Notifier;
use pig_farm::store::MemoryStore;
use pig_farm::HerdSettings;

/// Notifier that keeps every message it is asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, message: &str, _timeout: Duration) {
        self.shown.lock().unwrap().push(message.to_string());
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Setup the full router over a fresh in-memory store
pub fn setup_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let settings = HerdSettings {
        growth_seed: Some(42),
        ..HerdSettings::default()
    };

    let state = AppState::new(Arc::clone(&store), notifier.clone(), settings);

    TestApp {
        router: api::build_router(state),
        store,
        notifier,
    }
}

pub fn days_ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

pub fn date_string(date: NaiveDate) -> String {
    format_date(date)
}

pub fn json_request<T: Serialize>(method: &str, uri: &str, body: &T) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
