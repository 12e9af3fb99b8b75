//! Change lists: what happens to each record when a zone is updated

use std::ops::BitOr;

use super::record::Record;

/// Change kind, combinable into a mask with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeState(u8);

impl ChangeState {
    pub const NO_CHANGE: ChangeState = ChangeState(1);
    pub const CREATE: ChangeState = ChangeState(1 << 1);
    pub const DELETE: ChangeState = ChangeState(1 << 2);
    pub const UPDATE: ChangeState = ChangeState(1 << 3);
    pub const ALL: ChangeState = ChangeState(0b1111);

    /// True when every bit of `other` is set in `self`
    pub fn contains(self, other: ChangeState) -> bool {
        self.0 & other.0 == other.0
    }

    fn intersects(self, other: ChangeState) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ChangeState {
    type Output = ChangeState;

    fn bitor(self, rhs: ChangeState) -> ChangeState {
        ChangeState(self.0 | rhs.0)
    }
}

/// Ordered `(record, state)` pairs for one zone update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeList {
    entries: Vec<(Record, ChangeState)>,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record, state: ChangeState) {
        self.entries.push((record, state));
    }

    /// Pairs whose state is in `mask`, in insertion order.
    ///
    /// Each call starts a fresh pass.
    pub fn iter(&self, mask: ChangeState) -> impl Iterator<Item = (&Record, ChangeState)> + '_ {
        self.entries
            .iter()
            .filter(move |(_, state)| mask.intersects(*state))
            .map(|(record, state)| (record, *state))
    }

    /// Records whose state is in `mask`
    pub fn records(&self, mask: ChangeState) -> Vec<Record> {
        self.iter(mask).map(|(record, _)| record.clone()).collect()
    }

    pub fn count(&self, mask: ChangeState) -> usize {
        self.iter(mask).count()
    }

    /// True when nothing needs to be sent
    pub fn is_noop(&self) -> bool {
        self.count(ChangeState::CREATE | ChangeState::DELETE | ChangeState::UPDATE) == 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keep everything, add input records not already present
pub fn append_changes(current: &[Record], input: &[Record]) -> ChangeList {
    let mut changes = ChangeList::new();

    for record in current {
        changes.push(record.clone(), ChangeState::NO_CHANGE);
    }

    let mut added: Vec<&Record> = Vec::new();
    for record in input {
        let known = current.iter().any(|c| c.same_identity(record))
            || added.iter().any(|a| a.same_identity(record));
        if !known {
            changes.push(record.clone(), ChangeState::CREATE);
            added.push(record);
        }
    }

    changes
}

/// Make each `(name, type)` set in the input exactly match the input.
///
/// A set where one current record is swapped for one input record with
/// the same TTL becomes a single update instead of a delete plus create,
/// unless a record that stays in the set has that TTL too.
pub fn set_changes(current: &[Record], input: &[Record]) -> ChangeList {
    let mut changes = ChangeList::new();

    for record in current {
        if !input.iter().any(|i| i.same_rrset(record)) {
            changes.push(record.clone(), ChangeState::NO_CHANGE);
        }
    }

    let mut done: Vec<&Record> = Vec::new();
    for head in input {
        if done.iter().any(|d| d.same_rrset(head)) {
            continue;
        }
        done.push(head);

        let mut wanted: Vec<&Record> = Vec::new();
        for record in input.iter().filter(|i| i.same_rrset(head)) {
            if !wanted.iter().any(|w| w.same_identity(record)) {
                wanted.push(record);
            }
        }
        let existing: Vec<&Record> = current.iter().filter(|c| c.same_rrset(head)).collect();

        let stale: Vec<&Record> = existing
            .iter()
            .copied()
            .filter(|e| !wanted.iter().any(|w| w.same_identity(e)))
            .collect();
        let fresh: Vec<&Record> = wanted
            .iter()
            .copied()
            .filter(|w| !existing.iter().any(|e| e.same_identity(w)))
            .collect();

        let kept: Vec<&Record> = existing
            .iter()
            .copied()
            .filter(|e| !stale.iter().any(|s| s.same_identity(e)))
            .collect();
        for record in &kept {
            changes.push((*record).clone(), ChangeState::NO_CHANGE);
        }

        // An update is addressed by name, type and TTL, so it must not
        // also match a record that stays.
        if let ([old], [new]) = (stale.as_slice(), fresh.as_slice()) {
            if old.ttl == new.ttl && !kept.iter().any(|k| k.ttl == old.ttl) {
                changes.push((*new).clone(), ChangeState::UPDATE);
                continue;
            }
        }

        for record in stale {
            changes.push(record.clone(), ChangeState::DELETE);
        }
        for record in fresh {
            changes.push(record.clone(), ChangeState::CREATE);
        }
    }

    changes
}

/// Remove current records matching any input filter
pub fn delete_changes(current: &[Record], filters: &[Record]) -> ChangeList {
    let mut changes = ChangeList::new();

    for record in current {
        let state = if filters.iter().any(|f| record.matches_filter(f)) {
            ChangeState::DELETE
        } else {
            ChangeState::NO_CHANGE
        };
        changes.push(record.clone(), state);
    }

    changes
}
