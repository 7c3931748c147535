//! Live page controllers keyed by page id.
//!
//! Every page load gets its own [`PageController`]; the page addresses it
//! through the id issued at render time. The registry is bounded: once
//! full, opening a page evicts the oldest one, whose API calls then 404.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use uuid::Uuid;

use crate::{PageController, SharedController};

/// Default number of live pages kept before the oldest is evicted.
pub const DEFAULT_PAGE_CAPACITY: usize = 1024;

/// Identifies one page load.
pub type PageId = Uuid;

#[derive(Default)]
struct Pages {
    by_id: HashMap<PageId, SharedController>,
    /// Ids in the order they were opened, oldest first.
    order: VecDeque<PageId>,
}

/// Bounded map of page id to controller.
pub struct PageRegistry {
    capacity: usize,
    pages: Mutex<Pages>,
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_CAPACITY)
    }
}

impl PageRegistry {
    /// Creates a registry holding at most `capacity` pages (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pages: Mutex::new(Pages::default()),
        }
    }

    /// Registers `controller` under a fresh id.
    pub fn open(&self, controller: PageController) -> (PageId, SharedController) {
        let id = Uuid::new_v4();
        let shared = Arc::new(RwLock::new(controller));

        let mut pages = self.lock();
        while pages.order.len() >= self.capacity {
            let Some(oldest) = pages.order.pop_front() else {
                break;
            };
            pages.by_id.remove(&oldest);
            log::debug!("Evicted page {oldest}");
        }
        pages.by_id.insert(id, Arc::clone(&shared));
        pages.order.push_back(id);

        (id, shared)
    }

    /// The controller for `id`, if it is still live.
    #[must_use]
    pub fn get(&self, id: &PageId) -> Option<SharedController> {
        self.lock().by_id.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Pages> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
