//! Contact registry: the single source of truth for which fingers are
//! down and where.
//!
//! All mutation goes through [`ContactRegistry::began`],
//! [`ContactRegistry::moved`] and [`ContactRegistry::ended`].  Everyone
//! else reads [`Contact`] snapshots.

use indexmap::IndexMap;
use log::trace;

// ════════════════════════════════════════════════════════════════════════════
// Identifiers and coordinates
// ════════════════════════════════════════════════════════════════════════════

/// Identifier of one physical touch, stable while the finger is down.
/// The input surface may reuse it after release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl std::fmt::Display for TouchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Input boundary
// ════════════════════════════════════════════════════════════════════════════

/// One entry of a touch batch as reported by the input surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id:       TouchId,
    pub location: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        TouchPoint { id: TouchId(id), location: Point::new(x, y) }
    }
}

/// A batch of touch reports.  `Cancelled` is handled exactly like `Ended`.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchBatch {
    Began(Vec<TouchPoint>),
    Moved(Vec<TouchPoint>),
    Ended(Vec<TouchPoint>),
    Cancelled(Vec<TouchPoint>),
}

impl TouchBatch {
    pub fn points(&self) -> &[TouchPoint] {
        match self {
            TouchBatch::Began(p)
            | TouchBatch::Moved(p)
            | TouchBatch::Ended(p)
            | TouchBatch::Cancelled(p) => p,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Contact + registry
// ════════════════════════════════════════════════════════════════════════════

/// A finger currently on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id:       TouchId,
    pub position: Point,
}

/// Keyed table of active contacts, iterated in order of first touch.
#[derive(Debug, Default)]
pub struct ContactRegistry {
    contacts: IndexMap<TouchId, Point>,
}

impl ContactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every identifier not already tracked.  Returns the ids that
    /// were actually added, in batch order.
    pub fn began(&mut self, touches: &[TouchPoint]) -> Vec<TouchId> {
        let mut added = Vec::new();
        for t in touches {
            if self.contacts.contains_key(&t.id) {
                trace!("began for tracked contact {} ignored", t.id);
                continue;
            }
            self.contacts.insert(t.id, t.location);
            added.push(t.id);
        }
        added
    }

    /// Update positions of tracked contacts in place.  Returns how many
    /// were updated; untracked ids are skipped.
    pub fn moved(&mut self, touches: &[TouchPoint]) -> usize {
        let mut updated = 0;
        for t in touches {
            match self.contacts.get_mut(&t.id) {
                Some(pos) => {
                    *pos = t.location;
                    updated += 1;
                }
                None => trace!("move for unknown contact {} ignored", t.id),
            }
        }
        updated
    }

    /// Remove every reported id that is tracked.  Returns the removed ids.
    pub fn ended(&mut self, touches: &[TouchPoint]) -> Vec<TouchId> {
        let mut removed = Vec::new();
        for t in touches {
            // shift_remove keeps first-touch order for the survivors
            if self.contacts.shift_remove(&t.id).is_some() {
                removed.push(t.id);
            } else {
                trace!("end for unknown contact {} ignored", t.id);
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.contacts.contains_key(&id)
    }

    pub fn position(&self, id: TouchId) -> Option<Point> {
        self.contacts.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Contact> + '_ {
        self.contacts
            .iter()
            .map(|(&id, &position)| Contact { id, position })
    }

    /// Read-only copy of the current contacts in first-touch order.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.iter().collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn began_inserts_new_ids_only() {
        let mut r = ContactRegistry::new();
        let added = r.began(&[TouchPoint::new(1, 10.0, 10.0), TouchPoint::new(2, 20.0, 20.0)]);
        assert_eq!(added, vec![TouchId(1), TouchId(2)]);

        // Duplicate report keeps the original position.
        let again = r.began(&[TouchPoint::new(1, 99.0, 99.0)]);
        assert!(again.is_empty());
        assert_eq!(r.len(), 2);
        assert_eq!(r.position(TouchId(1)), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn moved_updates_in_place_and_ignores_unknown() {
        let mut r = ContactRegistry::new();
        r.began(&[TouchPoint::new(1, 0.0, 0.0)]);
        let n = r.moved(&[TouchPoint::new(1, 5.0, 6.0), TouchPoint::new(7, 1.0, 1.0)]);
        assert_eq!(n, 1);
        assert_eq!(r.position(TouchId(1)), Some(Point::new(5.0, 6.0)));
        assert!(!r.contains(TouchId(7)));
    }

    #[test]
    fn ended_removes_and_ignores_unknown() {
        let mut r = ContactRegistry::new();
        r.began(&[TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 0.0, 0.0)]);
        let removed = r.ended(&[TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(9, 0.0, 0.0)]);
        assert_eq!(removed, vec![TouchId(1)]);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn snapshot_keeps_first_touch_order() {
        let mut r = ContactRegistry::new();
        r.began(&[TouchPoint::new(3, 0.0, 0.0)]);
        r.began(&[TouchPoint::new(1, 0.0, 0.0)]);
        r.began(&[TouchPoint::new(2, 0.0, 0.0)]);
        r.ended(&[TouchPoint::new(1, 0.0, 0.0)]);
        let ids: Vec<_> = r.snapshot().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![TouchId(3), TouchId(2)]);
    }

    #[test]
    fn id_reusable_after_release() {
        let mut r = ContactRegistry::new();
        r.began(&[TouchPoint::new(1, 0.0, 0.0)]);
        r.ended(&[TouchPoint::new(1, 0.0, 0.0)]);
        let added = r.began(&[TouchPoint::new(1, 4.0, 4.0)]);
        assert_eq!(added, vec![TouchId(1)]);
        assert_eq!(r.position(TouchId(1)), Some(Point::new(4.0, 4.0)));
    }

    #[test]
    fn population_tracks_begins_minus_ends() {
        let mut r = ContactRegistry::new();
        let mut expected = 0usize;
        let script: &[(bool, u64)] = &[
            (true, 1), (true, 2), (false, 1), (true, 3), (true, 1), (false, 2), (false, 3),
        ];
        for &(begin, id) in script {
            if begin {
                expected += r.began(&[TouchPoint::new(id, 0.0, 0.0)]).len();
            } else {
                expected -= r.ended(&[TouchPoint::new(id, 0.0, 0.0)]).len();
            }
            assert_eq!(r.len(), expected);
        }
        assert_eq!(r.len(), 1);
    }
}
