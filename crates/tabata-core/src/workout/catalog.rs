//! In-memory workout collection: lookup, search, sort, and title rules.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::WorkoutDefinition;
use crate::timer::WorkoutLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "date-new")]
    DateNew,
    #[serde(rename = "date-old")]
    DateOld,
    #[serde(rename = "color")]
    Color,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::DateNew => "date-new",
            SortKey::DateOld => "date-old",
            SortKey::Color => "color",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            "date-new" => Ok(SortKey::DateNew),
            "date-old" => Ok(SortKey::DateOld),
            "color" => Ok(SortKey::Color),
            other => Err(format!(
                "unknown sort key '{other}' (expected name-asc, name-desc, date-new, date-old or color)"
            )),
        }
    }
}

/// Snapshot of the workout library. Entries are shared with any running
/// timer rather than copied.
#[derive(Debug, Clone, Default)]
pub struct WorkoutCatalog {
    workouts: Vec<Arc<WorkoutDefinition>>,
}

impl WorkoutCatalog {
    pub fn new(workouts: Vec<WorkoutDefinition>) -> Self {
        Self {
            workouts: workouts.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<WorkoutDefinition>> {
        self.workouts.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<WorkoutDefinition>> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Case-insensitive title check, optionally ignoring one workout id.
    pub fn has_title(&self, title: &str, except_id: Option<&str>) -> bool {
        let wanted = title.to_lowercase();
        self.workouts
            .iter()
            .any(|w| w.title.to_lowercase() == wanted && Some(w.id.as_str()) != except_id)
    }

    /// Favorites first, then `sort`. A non-empty `search` keeps workouts
    /// whose title or description contains it, ignoring case.
    pub fn filtered_sorted(&self, search: &str, sort: SortKey) -> Vec<Arc<WorkoutDefinition>> {
        let needle = search.trim().to_lowercase();
        let mut out: Vec<_> = self
            .workouts
            .iter()
            .filter(|w| {
                needle.is_empty()
                    || w.title.to_lowercase().contains(&needle)
                    || w.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        out.sort_by(|a, b| {
            b.is_favorite
                .cmp(&a.is_favorite)
                .then_with(|| compare(a, b, sort))
        });
        out
    }

    /// First free `"{title} (Copy)"`, `"{title} (Copy 2)"`, ... title.
    pub fn duplicate_title(&self, title: &str) -> String {
        let mut candidate = format!("{title} (Copy)");
        let mut counter = 2;
        while self.workouts.iter().any(|w| w.title == candidate) {
            candidate = format!("{title} (Copy {counter})");
            counter += 1;
        }
        candidate
    }
}

fn compare(a: &WorkoutDefinition, b: &WorkoutDefinition, sort: SortKey) -> Ordering {
    match sort {
        SortKey::NameAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::NameDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
        SortKey::DateNew => b.created_at.cmp(&a.created_at),
        SortKey::DateOld => a.created_at.cmp(&b.created_at),
        SortKey::Color => a.color.palette_index().cmp(&b.color.palette_index()),
    }
}

impl WorkoutLookup for WorkoutCatalog {
    fn find(&self, id: &str) -> Option<Arc<WorkoutDefinition>> {
        self.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Color, StepDefinition, StepType};

    fn workout(id: &str, title: &str, color: Color, created_at: i64, fav: bool) -> WorkoutDefinition {
        WorkoutDefinition {
            id: id.into(),
            title: title.into(),
            description: format!("{title} routine"),
            color,
            prepare: 0,
            prepare_media: None,
            sets: 1,
            cooldown: 0,
            cooldown_media: None,
            steps: vec![StepDefinition {
                id: "s".into(),
                step_type: StepType::Work,
                name: "Go".into(),
                description: String::new(),
                duration: 10,
                reps: 0,
                media: None,
            }],
            is_favorite: fav,
            created_at,
        }
    }

    fn catalog() -> WorkoutCatalog {
        WorkoutCatalog::new(vec![
            workout("a", "Core", Color::Purple, 3, false),
            workout("b", "arms", Color::Red, 1, false),
            workout("c", "Legs", Color::Green, 2, true),
        ])
    }

    fn ids(list: &[Arc<WorkoutDefinition>]) -> Vec<&str> {
        list.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn favorites_come_first_then_sort_key() {
        let c = catalog();
        assert_eq!(ids(&c.filtered_sorted("", SortKey::NameAsc)), ["c", "b", "a"]);
        assert_eq!(ids(&c.filtered_sorted("", SortKey::NameDesc)), ["c", "a", "b"]);
        assert_eq!(ids(&c.filtered_sorted("", SortKey::DateNew)), ["c", "a", "b"]);
        assert_eq!(ids(&c.filtered_sorted("", SortKey::DateOld)), ["c", "b", "a"]);
        assert_eq!(ids(&c.filtered_sorted("", SortKey::Color)), ["c", "b", "a"]);
    }

    #[test]
    fn search_matches_title_or_description() {
        let c = catalog();
        assert_eq!(ids(&c.filtered_sorted("ARM", SortKey::NameAsc)), ["b"]);
        assert_eq!(ids(&c.filtered_sorted("routine", SortKey::NameAsc)).len(), 3);
        assert!(c.filtered_sorted("yoga", SortKey::NameAsc).is_empty());
    }

    #[test]
    fn duplicate_title_counts_up() {
        let mut workouts = vec![workout("a", "Core", Color::Blue, 0, false)];
        let c = WorkoutCatalog::new(workouts.clone());
        assert_eq!(c.duplicate_title("Core"), "Core (Copy)");

        workouts.push(workout("b", "Core (Copy)", Color::Blue, 0, false));
        workouts.push(workout("c", "Core (Copy 2)", Color::Blue, 0, false));
        let c = WorkoutCatalog::new(workouts);
        assert_eq!(c.duplicate_title("Core"), "Core (Copy 3)");
    }

    #[test]
    fn title_check_ignores_case_and_self() {
        let c = catalog();
        assert!(c.has_title("CORE", None));
        assert!(!c.has_title("core", Some("a")));
    }

    #[test]
    fn lookup_shares_entries() {
        let c = catalog();
        let found = c.find("a").unwrap();
        assert!(Arc::ptr_eq(&found, c.get("a").unwrap()));
        assert!(c.find("zzz").is_none());
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("date-new".parse::<SortKey>(), Ok(SortKey::DateNew));
        assert!("newest".parse::<SortKey>().is_err());
    }
}
