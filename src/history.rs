use crate::event::Event;

/// Accepted events of one user, in arrival order. Append-only and never truncated,
/// so memory grows with the number of events a user submits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserHistory {
    events: Vec<Event>,
}

impl UserHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// The last `n` events, or the whole history when it is shorter.
    pub fn last_n(&self, n: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn recent_window<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a Event> + 'a
    where
        P: FnMut(&Event) -> bool + 'a,
    {
        self.events.iter().filter(move |&event| predicate(event))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
