//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to an in-memory store
//! - A scripted language model with working, overloaded and failing modes
//! - Authentication helpers
//!
//! Tests marked `#[ignore = "requires database"]` run against PostgreSQL
//! (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;
pub mod mock;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;

use lingo_trainer_backend::ai::{LanguageModel, OfflineModel};
use lingo_trainer_backend::db::{Database, MemoryStore, PracticeStore};
use lingo_trainer_backend::models::{User, Word};
use lingo_trainer_backend::{app, AppState};

pub use mock::MockModel;

/// Test context containing the store and router.
pub struct TestContext {
    pub store: Arc<dyn PracticeStore>,
    pub memory: Option<Arc<MemoryStore>>,
    app: Router,
}

impl TestContext {
    /// In-memory store with a working scripted model.
    pub fn new() -> Self {
        Self::with_model(Arc::new(MockModel::working()))
    }

    /// In-memory store with the given model.
    pub fn with_model(model: Arc<dyn LanguageModel>) -> Self {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn PracticeStore> = memory.clone();
        let app = app(AppState {
            store: store.clone(),
            model,
        });
        Self {
            store,
            memory: Some(memory),
            app,
        }
    }

    /// In-memory store with the offline model.
    pub fn offline() -> Self {
        Self::with_model(Arc::new(OfflineModel))
    }

    /// PostgreSQL store with the given model.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn postgres(model: Arc<dyn LanguageModel>) -> (Self, Arc<Database>) {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations().await.expect("Failed to run migrations");

        let db = Arc::new(db);
        let store: Arc<dyn PracticeStore> = db.clone();
        let app = app(AppState {
            store: store.clone(),
            model,
        });

        (
            Self {
                store,
                memory: None,
                app,
            },
            db,
        )
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Create a learner with default languages.
    pub async fn create_test_user(&self) -> User {
        self.store
            .create_user(Some("Test Learner"), "English", "Spanish")
            .await
            .expect("Failed to create test user")
    }

    /// Add Spanish words for `user`.
    pub async fn add_words(&self, user: &User, texts: &[&str]) -> Vec<Word> {
        let mut words = Vec::with_capacity(texts.len());
        for text in texts {
            let word = self
                .store
                .create_word(user.id, text, "Spanish")
                .await
                .expect("Failed to create word");
            words.push(word);
        }
        words
    }
}

/// Authorization header value for `token`.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}
