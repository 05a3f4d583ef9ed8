//! In-memory homework store.

use crate::models::{Homework, HomeworkId, NewHomework};
use chrono::Utc;
use tracing::{debug, info};

/// Insertion-ordered collection of homework records.
#[derive(Debug, Default)]
pub struct HomeworkStore {
    items: Vec<Homework>,
    last_id: Option<i64>,
}

impl HomeworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, assigning an id from the current instant.
    pub fn add(&mut self, new: NewHomework) -> HomeworkId {
        self.add_at(new, Utc::now().timestamp_millis())
    }

    /// Add a record with an id derived from `now_millis`.
    ///
    /// Ids are strictly increasing: a clock reading at or before the last
    /// issued id yields `last + 1`.
    pub fn add_at(&mut self, new: NewHomework, now_millis: i64) -> HomeworkId {
        let millis = match self.last_id {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_id = Some(millis);

        let id = HomeworkId::from_millis(millis);
        info!(id = %id, subject = %new.subject, title = %new.title, "homework added");
        self.items.push(Homework::from_new(id.clone(), new));
        id
    }

    /// Flip `completed` on the matching record. Missing ids are ignored.
    pub fn toggle(&mut self, id: &HomeworkId) {
        match self.items.iter_mut().find(|h| &h.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                info!(id = %id, completed = item.completed, "homework toggled");
            }
            None => debug!(id = %id, "toggle ignored, no such homework"),
        }
    }

    /// Remove the matching record. Missing ids are ignored.
    pub fn delete(&mut self, id: &HomeworkId) {
        let before = self.items.len();
        self.items.retain(|h| &h.id != id);
        if self.items.len() < before {
            info!(id = %id, "homework deleted");
        } else {
            debug!(id = %id, "delete ignored, no such homework");
        }
    }

    pub fn get(&self, id: &HomeworkId) -> Option<&Homework> {
        self.items.iter().find(|h| &h.id == id)
    }

    pub fn all(&self) -> &[Homework] {
        &self.items
    }

    /// Incomplete records in insertion order.
    pub fn incomplete(&self) -> Vec<Homework> {
        self.items.iter().filter(|h| !h.completed).cloned().collect()
    }

    /// Sum of estimated minutes over incomplete records.
    pub fn remaining_minutes(&self) -> u32 {
        self.items
            .iter()
            .filter(|h| !h.completed)
            .map(|h| h.estimated_minutes)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::NaiveDate;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn math() -> NewHomework {
        NewHomework::new("Math", "Ch.5", 60, due())
            .with_priority(Priority::High)
            .with_description("odd problems")
    }

    #[test]
    fn test_add_appends_incomplete_copy() {
        let mut store = HomeworkStore::new();
        let id = store.add(math());

        assert_eq!(store.len(), 1);
        let hw = store.get(&id).unwrap();
        assert_eq!(hw.subject, "Math");
        assert_eq!(hw.title, "Ch.5");
        assert_eq!(hw.description, "odd problems");
        assert_eq!(hw.estimated_minutes, 60);
        assert_eq!(hw.priority, Priority::High);
        assert_eq!(hw.due_date, due());
        assert!(!hw.completed);
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut store = HomeworkStore::new();
        let a = store.add_at(math(), 1_000);
        let b = store.add_at(math(), 1_000);
        let c = store.add_at(math(), 999);

        assert_eq!(a.as_str(), "1000");
        assert_eq!(b.as_str(), "1001");
        assert_eq!(c.as_str(), "1002");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut store = HomeworkStore::new();
        store.add_at(NewHomework::new("English", "Essay", 30, due()), 5);
        store.add_at(math(), 6);

        let titles: Vec<&str> = store.all().iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Essay", "Ch.5"]);
    }

    #[test]
    fn test_toggle_is_own_inverse() {
        let mut store = HomeworkStore::new();
        let id = store.add(math());

        store.toggle(&id);
        assert!(store.get(&id).unwrap().completed);
        store.toggle(&id);
        assert!(!store.get(&id).unwrap().completed);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut store = HomeworkStore::new();
        store.add_at(math(), 10);
        let missing = HomeworkId::from_millis(99);

        store.toggle(&missing);
        store.delete(&missing);

        assert_eq!(store.len(), 1);
        assert!(!store.all()[0].completed);
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = HomeworkStore::new();
        let id = store.add_at(math(), 10);
        store.add_at(math(), 11);

        store.delete(&id);
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_remaining_minutes_skips_completed() {
        let mut store = HomeworkStore::new();
        let a = store.add_at(math(), 1);
        store.add_at(NewHomework::new("English", "Essay", 30, due()), 2);
        assert_eq!(store.remaining_minutes(), 90);

        store.toggle(&a);
        assert_eq!(store.remaining_minutes(), 30);
        assert_eq!(store.incomplete().len(), 1);
        assert_eq!(store.incomplete()[0].title, "Essay");
    }
}
