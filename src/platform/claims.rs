//! One mounted background per canvas
//!
//! A `CanvasClaim` marks a canvas id as owned by a live loop. A second
//! claim on the same id is refused until the first one is dropped.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static CLAIMED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

#[derive(Debug)]
pub struct CanvasClaim {
    id: String,
}

impl CanvasClaim {
    /// Claim `id`, or None if a live loop already owns it
    pub fn acquire(id: &str) -> Option<Self> {
        let fresh = CLAIMED.with(|claimed| claimed.borrow_mut().insert(id.to_string()));
        if fresh {
            Some(Self { id: id.to_string() })
        } else {
            log::warn!("Canvas #{} already has a running background", id);
            None
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for CanvasClaim {
    fn drop(&mut self) {
        CLAIMED.with(|claimed| claimed.borrow_mut().remove(&self.id));
    }
}
