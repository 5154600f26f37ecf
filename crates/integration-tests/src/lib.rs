//! Shared fixtures for the cross-crate scenario tests.

use std::sync::{Arc, Mutex};

use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use domains::{Community, Post, PostDraft, UserId};

pub fn owner() -> UserId {
    UserId::from("7")
}

/// A post draft with a random, valid description.
pub fn post_draft() -> PostDraft {
    let description: String = Sentence(3..8).fake();
    PostDraft::new(description, "http://images.example/cat.png")
}

pub fn listed_post(id: &str, description: &str) -> Post {
    Post {
        post_id: id.into(),
        description: description.into(),
        image_link: "http://images.example/cat.png".into(),
        author_user_id: Some(owner()),
        username: Some("ana".into()),
        created_at: None,
    }
}

pub fn community(id: &str, name: &str, key: &str) -> Community {
    Community {
        community_id: id.into(),
        name: name.into(),
        description: None,
        key: key.into(),
        owner_id: None,
        privacy: None,
    }
}

/// Mints unique tokens and remembers every one handed out.
#[derive(Clone, Default)]
pub struct TokenMint {
    issued: Arc<Mutex<Vec<String>>>,
}

impl TokenMint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, prefix: &str) -> String {
        let token = format!("{prefix}-{}", Uuid::new_v4().simple());
        self.issued.lock().unwrap_or_else(|e| e.into_inner()).push(token.clone());
        token
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// A thread-safe append-only log for recording what the backend received.
#[derive(Clone)]
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).push(entry);
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
