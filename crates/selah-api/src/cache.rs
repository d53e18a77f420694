// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Endpoint path plus query arguments sorted by name, so argument order does
/// not split the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    path: String,
    params: Vec<(String, String)>,
}

impl RequestKey {
    pub fn new(path: &str, params: &[(&str, String)]) -> Self {
        let mut params: Vec<(String, String)> = params
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect();
        params.sort();
        Self {
            path: path.trim_matches('/').to_owned(),
            params,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Successful `data` payloads for the lifetime of a client. Unbounded;
/// failures are never stored.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<RequestKey, Value>>,
}

impl ResponseCache {
    pub fn get(&self, key: &RequestKey) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: RequestKey, value: Value) {
        self.lock().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-written entry.
    fn lock(&self) -> MutexGuard<'_, HashMap<RequestKey, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
