//! In-memory profile storage for tests and embedded hosts.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ProfileStorage;
use crate::profile::Profile;

/// Keeps each profile as the JSON document a persistent backend would write.
///
/// Clones share the same map, so a test can hand one clone to a store and
/// inspect or reopen through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under `key`.
    #[must_use]
    pub fn document(&self, key: &str) -> Option<String> {
        self.documents.borrow().get(key).cloned()
    }

    /// Replace the raw document under `key`, bypassing serialization.
    pub fn put_document(&self, key: &str, json: impl Into<String>) {
        self.documents
            .borrow_mut()
            .insert(key.to_string(), json.into());
    }
}

impl ProfileStorage for MemoryStorage {
    type Error = serde_json::Error;

    fn load_profile(&self, key: &str) -> Result<Option<Profile>, Self::Error> {
        self.documents
            .borrow()
            .get(key)
            .map(|json| Profile::from_json(json))
            .transpose()
    }

    fn save_profile(&self, key: &str, profile: &Profile) -> Result<(), Self::Error> {
        let json = serde_json::to_string(profile)?;
        self.put_document(key, json);
        Ok(())
    }
}
