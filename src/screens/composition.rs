//! The screen lock state machine.
//!
//! Replaces the trio of aliased "active / locked / inactive" screen pointers
//! with one owned struct: either no lock exists, or exactly one master/slave
//! pair does and the active screen is one of the two.

use super::ScreenKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    #[error("a screen lock is already active")]
    AlreadyLocked,
    #[error("no screen lock is active")]
    NotLocked,
    #[error("{0:?} can't take part in a locked split")]
    NotMergeable(ScreenKind),
    #[error("master and slave must be different screens")]
    SamePair,
    #[error("{0:?} is not part of the locked pair")]
    NotInLockedPair(ScreenKind),
    #[error("the {0} half is already active")]
    AlreadyActive(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LockedPair {
    master: ScreenKind,
    slave: ScreenKind,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenComposition {
    active: ScreenKind,
    previous: ScreenKind,
    lock: Option<LockedPair>,
}

impl ScreenComposition {
    pub fn new(initial: ScreenKind) -> Self {
        Self {
            active: initial,
            previous: initial,
            lock: None,
        }
    }

    pub fn active(&self) -> ScreenKind {
        self.active
    }

    /// The screen that was active before the current one.
    pub fn previous(&self) -> ScreenKind {
        self.previous
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn locked_pair(&self) -> Option<(ScreenKind, ScreenKind)> {
        self.lock.map(|p| (p.master, p.slave))
    }

    /// While a lock exists the active screen must stay inside the pair.
    pub fn can_switch_to(&self, kind: ScreenKind) -> bool {
        match self.lock {
            None => true,
            Some(pair) => kind == pair.master || kind == pair.slave,
        }
    }

    pub fn switch_to(&mut self, kind: ScreenKind) -> Result<(), CompositionError> {
        if !self.can_switch_to(kind) {
            return Err(CompositionError::NotInLockedPair(kind));
        }
        if kind != self.active {
            self.previous = self.active;
            self.active = kind;
        }
        Ok(())
    }

    /// Enter the locked state. Only valid while unlocked, and both halves
    /// must be distinct, mergeable screens. The master becomes active.
    pub fn lock(
        &mut self,
        master: ScreenKind,
        slave: ScreenKind,
    ) -> Result<(), CompositionError> {
        if self.lock.is_some() {
            return Err(CompositionError::AlreadyLocked);
        }
        if master == slave {
            return Err(CompositionError::SamePair);
        }
        if !master.mergeable() {
            return Err(CompositionError::NotMergeable(master));
        }
        if !slave.mergeable() {
            return Err(CompositionError::NotMergeable(slave));
        }
        self.lock = Some(LockedPair { master, slave });
        if self.active != master {
            self.previous = self.active;
            self.active = master;
        }
        Ok(())
    }

    /// Drop the lock; the active screen stays whatever it was.
    pub fn unlock(&mut self) -> Result<(), CompositionError> {
        if self.lock.take().is_none() {
            return Err(CompositionError::NotLocked);
        }
        Ok(())
    }

    /// Move focus from the slave half back to the master half.
    pub fn activate_master(&mut self) -> Result<(), CompositionError> {
        let pair = self.lock.ok_or(CompositionError::NotLocked)?;
        if self.active == pair.master {
            return Err(CompositionError::AlreadyActive("master"));
        }
        self.previous = self.active;
        self.active = pair.master;
        Ok(())
    }

    /// Move focus from the master half to the slave half.
    pub fn activate_slave(&mut self) -> Result<(), CompositionError> {
        let pair = self.lock.ok_or(CompositionError::NotLocked)?;
        if self.active == pair.slave {
            return Err(CompositionError::AlreadyActive("slave"));
        }
        self.previous = self.active;
        self.active = pair.slave;
        Ok(())
    }
}
