// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Correlation of responses with outstanding requests.
//!
//! Every request the client sends is tagged with a small identifier: the ASF
//! message tag for pings, and the IPMB sequence number for everything else.
//! Both are only six bits wide once packed, so identifiers are drawn from a
//! ring of [`ID_SPACE`] values, and an identifier stays reserved until its
//! request is [completed].
//!
//! The registry owns no timers and no threads. Deadlines are plain
//! [`Instant`]s; whoever drives the transport calls [`Registry::fire_timeouts()`]
//! whenever it wakes up, and picks its next wakeup with
//! [`Registry::next_deadline()`]. When a response or a timeout arrives, it is
//! parked in the request's slot as an [`Event`] until the waiting caller
//! [takes] it.
//!
//! [completed]: struct.Registry.html#method.complete
//! [takes]: struct.Registry.html#method.take_event

use core::fmt;
use std::time::Duration;
use std::time::Instant;

use arrayvec::ArrayVec;

use crate::Result;

/// The number of distinct identifiers.
pub const ID_SPACE: usize = 64;

/// An identifier for an outstanding request, in `0..ID_SPACE`.
pub type Id = u8;

/// An error returned by a [`Registry`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// Every identifier is in use.
    Exhausted,
    /// The identifier does not name an outstanding request. This includes
    /// completing a request twice.
    NotInflight(Id),
    /// A result has already been recorded for this request.
    AlreadyResolved(Id),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "all {} request ids in use", ID_SPACE),
            Self::NotInflight(id) => write!(f, "request {} is not in flight", id),
            Self::AlreadyResolved(id) => {
                write!(f, "request {} already has a result", id)
            }
        }
    }
}

/// Something that happened to an outstanding request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<R> {
    /// A correlated response arrived.
    Resolved(R),
    /// The request's deadline passed, at the given time.
    TimedOut(Instant),
}

/// A description of an outstanding request, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    /// The request's identifier.
    pub id: Id,
    /// When the request was registered.
    pub created: Instant,
    /// How long ago the request was registered.
    pub age: Duration,
    /// The `Debug` text of the caller's data.
    pub data: String,
    /// Every time the request's timeout has fired, oldest first.
    pub timeouts: Vec<Instant>,
}

struct Slot<D, R> {
    id: Id,
    data: D,
    created: Instant,
    deadline: Option<Instant>,
    timeouts: Vec<Instant>,
    event: Option<Event<R>>,
}

/// A table of outstanding requests.
///
/// `D` is caller data attached to each request, such as which command it
/// carries; `R` is the type of a correlated response.
pub struct Registry<D, R> {
    slots: ArrayVec<Slot<D, R>, ID_SPACE>,
    last_id: Id,
}

impl<D, R> Default for Registry<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Registry<D, R> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: ArrayVec::new(),
            last_id: (ID_SPACE - 1) as Id,
        }
    }

    /// Returns the number of outstanding requests.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether there are no outstanding requests.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: Id) -> Option<&Slot<D, R>> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn slot_mut(&mut self, id: Id) -> Option<&mut Slot<D, R>> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    /// Registers a new request, returning its identifier.
    ///
    /// Identifiers are handed out round-robin, starting just after the last
    /// one issued and skipping any still in use, so that a late response to
    /// a recently-completed request is unlikely to match a new one.
    pub fn register(&mut self, data: D, now: Instant) -> Result<Id, Error> {
        let start = self.last_id as usize + 1;
        let id = (start..start + ID_SPACE)
            .map(|i| (i % ID_SPACE) as Id)
            .find(|&id| self.slot(id).is_none())
            .ok_or_else(|| fail!(Error::Exhausted))?;

        // The search above only fails when every slot is full, so this push
        // always has room.
        self.slots.push(Slot {
            id,
            data,
            created: now,
            deadline: None,
            timeouts: Vec::new(),
            event: None,
        });
        self.last_id = id;
        trace!("registered request {}", id);
        Ok(id)
    }

    /// Looks up the caller data of an outstanding request.
    pub fn lookup(&self, id: Id) -> Option<&D> {
        self.slot(id).map(|s| &s.data)
    }

    /// Completes a request, releasing its identifier and cancelling any
    /// pending timeout. Returns the caller data.
    ///
    /// Completing a request that is not outstanding fails loudly.
    pub fn complete(&mut self, id: Id) -> Result<D, Error> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| fail!(Error::NotInflight(id)))?;
        let slot = self.slots.swap_remove(idx);
        trace!("completed request {}", id);
        Ok(slot.data)
    }

    /// Arms a one-shot timeout for a request, replacing any previous one.
    pub fn start_timeout(
        &mut self,
        id: Id,
        timeout: Duration,
        now: Instant,
    ) -> Result<(), Error> {
        let slot = self
            .slot_mut(id)
            .ok_or_else(|| fail!(Error::NotInflight(id)))?;
        slot.deadline = Some(now + timeout);
        Ok(())
    }

    /// Fires every timeout whose deadline is at or before `now`, returning
    /// how many fired.
    ///
    /// Each firing is recorded in the request's history. A fired request is
    /// not completed: it keeps its identifier until the caller, having seen
    /// the [`Event::TimedOut`], completes it or re-arms it.
    pub fn fire_timeouts(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        for slot in &mut self.slots {
            match slot.deadline {
                Some(deadline) if deadline <= now => {}
                _ => continue,
            }
            slot.deadline = None;
            slot.timeouts.push(now);
            fired += 1;
            warn!(
                "request {} timed out ({} time(s))",
                slot.id,
                slot.timeouts.len()
            );
            if slot.event.is_none() {
                slot.event = Some(Event::TimedOut(now));
            }
        }
        fired
    }

    /// Records a correlated response for a request.
    ///
    /// The pending timeout is disarmed. Fails if the request is not
    /// outstanding, or already has a result; callers should drop such
    /// duplicate responses.
    pub fn resolve(&mut self, id: Id, response: R) -> Result<(), Error> {
        let slot = self
            .slot_mut(id)
            .ok_or_else(|| fail!(Error::NotInflight(id)))?;
        check!(slot.event.is_none(), Error::AlreadyResolved(id));
        slot.deadline = None;
        slot.event = Some(Event::Resolved(response));
        Ok(())
    }

    /// Returns whether a request has a parked event that has not been taken.
    ///
    /// A response for such a request is a duplicate, or arrived too late.
    pub fn has_event(&self, id: Id) -> bool {
        self.slot(id).map_or(false, |s| s.event.is_some())
    }

    /// Takes the parked event for a request, if any.
    pub fn take_event(&mut self, id: Id) -> Option<Event<R>> {
        self.slot_mut(id).and_then(|s| s.event.take())
    }

    /// Returns the earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.iter().filter_map(|s| s.deadline).min()
    }

    /// Lists the identifiers of all outstanding requests, in ascending order.
    pub fn ids(&self) -> Vec<Id> {
        let mut ids = self.slots.iter().map(|s| s.id).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}

impl<D: fmt::Debug, R> Registry<D, R> {
    /// Describes an outstanding request.
    pub fn describe(&self, id: Id, now: Instant) -> Option<Description> {
        self.slot(id).map(|s| Description {
            id: s.id,
            created: s.created,
            age: now.saturating_duration_since(s.created),
            data: format!("{:?}", s.data),
            timeouts: s.timeouts.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    type Reg = Registry<&'static str, u32>;

    #[test]
    fn ids_are_round_robin() {
        let now = Instant::now();
        let mut reg = Reg::new();
        assert_eq!(reg.register("a", now).unwrap(), 0);
        assert_eq!(reg.register("b", now).unwrap(), 1);
        reg.complete(0).unwrap();
        assert_eq!(reg.register("c", now).unwrap(), 2);
        assert_eq!(reg.ids(), vec![1, 2]);
        assert_eq!(reg.lookup(2), Some(&"c"));
    }

    #[test]
    fn exhaustion() {
        let now = Instant::now();
        let mut reg = Reg::new();
        for i in 0..ID_SPACE {
            assert_eq!(reg.register("x", now).unwrap() as usize, i);
        }
        assert_eq!(
            reg.register("y", now).unwrap_err().into_inner(),
            Error::Exhausted
        );

        reg.complete(17).unwrap();
        assert_eq!(reg.register("z", now).unwrap(), 17);
        assert_eq!(
            reg.register("y", now).unwrap_err().into_inner(),
            Error::Exhausted
        );
    }

    #[test]
    fn wraps_to_last_issued() {
        let now = Instant::now();
        let mut reg = Reg::new();
        for _ in 0..ID_SPACE {
            reg.register("x", now).unwrap();
        }
        for id in 0..ID_SPACE as Id {
            reg.complete(id).unwrap();
        }
        // The last issued id was 63; the scan starts at 0 again.
        assert_eq!(reg.register("x", now).unwrap(), 0);
    }

    #[test]
    fn complete_twice() {
        let now = Instant::now();
        let mut reg = Reg::new();
        let id = reg.register("a", now).unwrap();
        assert_eq!(reg.complete(id).unwrap(), "a");
        assert_eq!(reg.lookup(id), None);
        assert_eq!(
            reg.complete(id).unwrap_err().into_inner(),
            Error::NotInflight(id)
        );
    }

    #[test]
    fn timeouts() {
        let t0 = Instant::now();
        let mut reg = Reg::new();
        let a = reg.register("a", t0).unwrap();
        let b = reg.register("b", t0).unwrap();
        reg.start_timeout(a, Duration::from_millis(10), t0).unwrap();
        reg.start_timeout(b, Duration::from_millis(30), t0).unwrap();
        assert_eq!(reg.next_deadline(), Some(t0 + Duration::from_millis(10)));

        assert_eq!(reg.fire_timeouts(t0 + Duration::from_millis(5)), 0);
        let t1 = t0 + Duration::from_millis(10);
        assert_eq!(reg.fire_timeouts(t1), 1);
        assert_eq!(reg.take_event(a), Some(Event::TimedOut(t1)));
        assert_eq!(reg.take_event(a), None);

        // Timing out does not release the id.
        assert_eq!(reg.lookup(a), Some(&"a"));
        assert_eq!(reg.next_deadline(), Some(t0 + Duration::from_millis(30)));

        // Completing cancels the pending timeout.
        reg.complete(b).unwrap();
        assert_eq!(reg.next_deadline(), None);
        assert_eq!(reg.fire_timeouts(t0 + Duration::from_secs(1)), 0);
    }

    #[test]
    fn rearm() {
        let t0 = Instant::now();
        let mut reg = Reg::new();
        let a = reg.register("a", t0).unwrap();
        reg.start_timeout(a, Duration::from_millis(10), t0).unwrap();
        reg.start_timeout(a, Duration::from_millis(50), t0).unwrap();
        assert_eq!(reg.fire_timeouts(t0 + Duration::from_millis(20)), 0);
        assert_eq!(reg.fire_timeouts(t0 + Duration::from_millis(50)), 1);
    }

    #[test]
    fn resolution() {
        let t0 = Instant::now();
        let mut reg = Reg::new();
        let a = reg.register("a", t0).unwrap();
        reg.start_timeout(a, Duration::from_millis(10), t0).unwrap();
        reg.resolve(a, 42).unwrap();
        assert_eq!(
            reg.resolve(a, 43).unwrap_err().into_inner(),
            Error::AlreadyResolved(a)
        );

        // A resolved request no longer times out.
        assert_eq!(reg.fire_timeouts(t0 + Duration::from_secs(1)), 0);
        assert_eq!(reg.take_event(a), Some(Event::Resolved(42)));

        reg.complete(a).unwrap();
        assert_eq!(
            reg.resolve(a, 44).unwrap_err().into_inner(),
            Error::NotInflight(a)
        );
    }

    #[test]
    fn describe() {
        let t0 = Instant::now();
        let mut reg = Reg::new();
        let a = reg.register("get_device_id", t0).unwrap();
        let d = reg.describe(a, t0 + Duration::from_millis(5)).unwrap();
        assert_eq!(d.id, a);
        assert_eq!(d.created, t0);
        assert_eq!(d.age, Duration::from_millis(5));
        assert_eq!(d.data, "\"get_device_id\"");
        assert!(d.timeouts.is_empty());
        assert_eq!(reg.describe(9, t0), None);
    }

    #[test]
    fn timeout_history() {
        let t0 = Instant::now();
        let mut reg = Reg::new();
        let a = reg.register("a", t0).unwrap();
        let retry = Duration::from_millis(10);

        reg.start_timeout(a, retry, t0).unwrap();
        let t1 = t0 + retry;
        assert_eq!(reg.fire_timeouts(t1), 1);
        assert_eq!(reg.take_event(a), Some(Event::TimedOut(t1)));

        reg.start_timeout(a, retry, t1).unwrap();
        let t2 = t1 + retry;
        assert_eq!(reg.fire_timeouts(t2), 1);
        assert!(reg.has_event(a));

        let d = reg.describe(a, t2).unwrap();
        assert_eq!(d.timeouts, vec![t1, t2]);
        assert_eq!(d.age, Duration::from_millis(20));

        // Taking the event leaves the history alone.
        assert_eq!(reg.take_event(a), Some(Event::TimedOut(t2)));
        assert!(!reg.has_event(a));
        assert_eq!(reg.describe(a, t2).unwrap().timeouts, vec![t1, t2]);
    }
}
