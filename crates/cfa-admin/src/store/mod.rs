//! Relational state behind a single serialization point.
//!
//! Services talk to a [`Repository`]. Writers run inside [`Repository::transaction`], which
//! hands the closure a staged [`UnitOfWork`] and only publishes it when the closure returns
//! `Ok`. An error or a panic drops the staged state, so a half-applied sequence (a
//! deactivated version without its successor, a calendar with its days deleted but not
//! re-inserted) is never visible.
//!
//! [`Store`] is the in-memory implementation. Its tables are partitioned per tenant and
//! copied on write, so staging a unit of work costs the partitions it touches.

mod table;

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;

pub use table::{Record, Table};

use crate::contracts::domain::{ContractVersion, Dossier};
use crate::error::DomainError;
use crate::finance::domain::{Attendance, Invoice};
use crate::planning::domain::{TrainingDay, TrainingSession};
use crate::registry::domain::{Candidate, Company, Tenant};

/// Every table of the back office.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub tenants: Table<Tenant>,
    pub candidates: Table<Candidate>,
    pub companies: Table<Company>,
    pub sessions: Table<TrainingSession>,
    pub days: Table<TrainingDay>,
    pub dossiers: Table<Dossier>,
    pub versions: Table<ContractVersion>,
    pub attendance: Table<Attendance>,
    pub invoices: Table<Invoice>,
}

/// Working copy handed to a transaction body.
#[derive(Debug)]
pub struct UnitOfWork {
    tables: Tables,
}

impl Deref for UnitOfWork {
    type Target = Tables;

    fn deref(&self) -> &Self::Target {
        &self.tables
    }
}

impl DerefMut for UnitOfWork {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tables
    }
}

/// Storage seam shared by every service.
pub trait Repository: Send + Sync {
    /// Run `work` atomically. Nothing it changes is visible until it returns `Ok`.
    fn transaction<T, E>(
        &self,
        work: impl FnOnce(&mut UnitOfWork) -> Result<T, E>,
    ) -> Result<T, E>;

    /// Consistent read of the committed state.
    fn read<T>(&self, view: impl FnOnce(&Tables) -> T) -> T;
}

/// Cloneable handle to the shared in-memory state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    committed: Arc<Mutex<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // The committed tables are only ever replaced wholesale after a successful body, so a
    // poisoned lock still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Repository for Store {
    fn transaction<T, E>(
        &self,
        work: impl FnOnce(&mut UnitOfWork) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut committed = self.lock();
        // Shallow: partitions are shared until the body writes to them.
        let mut uow = UnitOfWork {
            tables: committed.clone(),
        };

        let value = work(&mut uow)?;
        *committed = uow.tables;
        Ok(value)
    }

    fn read<T>(&self, view: impl FnOnce(&Tables) -> T) -> T {
        let committed = self.lock();
        view(&committed)
    }
}

/// Convenience for transaction bodies that only produce domain errors.
pub type TxResult<T> = Result<T, DomainError>;

/// Offset pagination used by list operations. Only built through [`Page::new`] or
/// [`PageQuery`], so the page number is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 50;
    pub const MAX_SIZE: u32 = 100;

    /// Page numbers start at 1; sizes outside `1..=MAX_SIZE` are pulled back into range.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        let size = match size {
            Some(0) | None => Self::DEFAULT_SIZE,
            Some(size) => size.min(Self::MAX_SIZE),
        };
        Self {
            page: page.unwrap_or(1).max(1),
            size,
        }
    }

    pub fn number(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.size as usize
    }

    pub fn collect<I: Iterator>(&self, rows: I) -> Vec<I::Item> {
        rows.skip(self.offset()).take(self.size as usize).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Raw `?page=&size=` query parameters, clamped on conversion.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Self::new(query.page, query.size)
    }
}
