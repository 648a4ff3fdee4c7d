//! Routine templates: named, ordered lists of exercises.
//!
//! Routines are a client-local convenience stored in the side store. Names
//! are matched by their normalized form, so "Push Day" and "push  day" are
//! the same routine.

use crate::error::ValidationError;
use crate::side_store::SideStore;
use crate::validate::{normalize_exercise_name, sanitize_exercise_name};
use serde::{Deserialize, Serialize};

pub const ROUTINES_STORAGE_KEY: &str = "gym-tracker-routines-v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub name: String,
    pub exercises: Vec<String>,
}

/// All saved routines, in the order they were first added
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineBook {
    routines: Vec<Routine>,
}

impl RoutineBook {
    /// Load from the side store; missing or malformed data gives an empty book
    pub fn load(store: &dyn SideStore) -> Self {
        let Some(raw) = store.load(ROUTINES_STORAGE_KEY) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!("Ignoring malformed routines: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn SideStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.save(ROUTINES_STORAGE_KEY, &json),
            Err(e) => tracing::warn!("Failed to serialize routines: {}", e),
        }
    }

    /// Add a routine, or replace the one with the same normalized name in
    /// place. Exercise names are sanitized and blanks dropped.
    pub fn upsert(
        &mut self,
        name: &str,
        exercises: &[String],
    ) -> Result<&Routine, ValidationError> {
        let name = sanitize_exercise_name(name);
        if name.is_empty() {
            return Err(ValidationError::new("routine name is required"));
        }

        let exercises: Vec<String> = exercises
            .iter()
            .map(|e| sanitize_exercise_name(e))
            .filter(|e| !e.is_empty())
            .collect();
        if exercises.is_empty() {
            return Err(ValidationError::new(
                "routine must list at least one exercise",
            ));
        }

        let routine = Routine { name, exercises };
        let index = match self.position(&routine.name) {
            Some(i) => {
                self.routines[i] = routine;
                i
            }
            None => {
                self.routines.push(routine);
                self.routines.len() - 1
            }
        };
        Ok(&self.routines[index])
    }

    /// Remove by name; returns whether anything was removed
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.routines.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Routine> {
        self.position(name).map(|i| &self.routines[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Routine> {
        self.routines.iter()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = normalize_exercise_name(name);
        self.routines
            .iter()
            .position(|r| normalize_exercise_name(&r.name) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side_store::MemorySideStore;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_upsert_sanitizes() {
        let mut book = RoutineBook::default();
        let routine = book
            .upsert("  Push   Day ", &names(&["Bench  Press", "  ", "Dips"]))
            .unwrap();
        assert_eq!(routine.name, "Push Day");
        assert_eq!(routine.exercises, names(&["Bench Press", "Dips"]));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut book = RoutineBook::default();
        book.upsert("Push", &names(&["Bench"])).unwrap();
        book.upsert("Pull", &names(&["Row"])).unwrap();
        book.upsert("PUSH", &names(&["Overhead Press"])).unwrap();

        let order: Vec<_> = book.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["PUSH", "Pull"]);
        assert_eq!(book.get("push").unwrap().exercises, names(&["Overhead Press"]));
    }

    #[test]
    fn test_invalid_routines_rejected() {
        let mut book = RoutineBook::default();
        assert_eq!(
            book.upsert("   ", &names(&["Squat"])).unwrap_err().message(),
            "routine name is required"
        );
        assert!(book.upsert("Legs", &names(&[" ", ""])).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut book = RoutineBook::default();
        book.upsert("Legs", &names(&["Squat"])).unwrap();
        assert!(!book.remove("Arms"));
        assert!(book.remove(" legs "));
        assert_eq!(book.len(), 0);
    }

    #[test]
    fn test_persist_through_side_store() {
        let store = MemorySideStore::new();
        let mut book = RoutineBook::default();
        book.upsert("Legs", &names(&["Squat", "Lunge"])).unwrap();
        book.save(&store);

        assert_eq!(RoutineBook::load(&store), book);

        store.save(ROUTINES_STORAGE_KEY, "[[[");
        assert!(RoutineBook::load(&store).is_empty());
    }
}
