//! SQLite-based workout library.
//!
//! Each workout is stored as its JSON export format alongside the columns
//! the library lists and sorts by.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::workout::{WorkoutCatalog, WorkoutDefinition};

/// Suffix given to imported workouts whose id or title is already taken.
const IMPORTED_SUFFIX: &str = " (Imported)";

/// SQLite database holding the workout library.
pub struct WorkoutStore {
    conn: Connection,
}

impl WorkoutStore {
    /// Open the library at `<data_dir>/tabata.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("tabata.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory library (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workouts (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                body        TEXT NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                created_at  INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_workouts_title ON workouts(title COLLATE NOCASE);",
        )?;
        Ok(())
    }

    /// A fresh workout id.
    pub fn new_id() -> String {
        format!("w-{}", Uuid::new_v4())
    }

    pub fn list(&self) -> Result<Vec<WorkoutDefinition>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM workouts ORDER BY created_at, rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut workouts = Vec::new();
        for body in rows {
            workouts.push(serde_json::from_str(&body?)?);
        }
        Ok(workouts)
    }

    /// Snapshot of the library for lookup and listing.
    pub fn catalog(&self) -> Result<WorkoutCatalog> {
        Ok(WorkoutCatalog::new(self.list()?))
    }

    pub fn find(&self, id: &str) -> Result<Option<WorkoutDefinition>> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM workouts WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        body.map(|b| serde_json::from_str(&b).map_err(CoreError::from))
            .transpose()
    }

    fn get(&self, id: &str) -> Result<WorkoutDefinition> {
        self.find(id)?.ok_or_else(|| {
            StorageError::NotFound {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn title_taken(&self, title: &str, except_id: Option<&str>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM workouts
             WHERE title = ?1 COLLATE NOCASE AND id IS NOT ?2",
            params![title, except_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn write(&self, workout: &WorkoutDefinition) -> Result<()> {
        let body = serde_json::to_string(workout)?;
        self.conn.execute(
            "INSERT INTO workouts (id, title, body, is_favorite, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                is_favorite = excluded.is_favorite",
            params![
                workout.id,
                workout.title,
                body,
                workout.is_favorite,
                workout.created_at
            ],
        )?;
        Ok(())
    }

    /// Insert a new workout or update an existing one.
    ///
    /// New workouts get an id if they have none, a creation time, and start
    /// as non-favorites. Steps without an id get one. Updates keep the
    /// stored creation time and favorite flag.
    ///
    /// # Errors
    /// Returns a validation error for unplayable workouts or a title that
    /// another workout already uses (ignoring case).
    pub fn save(&self, mut workout: WorkoutDefinition) -> Result<WorkoutDefinition> {
        workout.title = workout.title.trim().to_string();
        workout.description = workout.description.trim().to_string();
        workout.validate()?;
        for step in workout.steps.iter_mut().filter(|s| s.id.is_empty()) {
            step.id = format!("s-{}", Uuid::new_v4());
        }

        let existing = if workout.id.is_empty() {
            None
        } else {
            self.find(&workout.id)?
        };
        if self.title_taken(&workout.title, existing.as_ref().map(|w| w.id.as_str()))? {
            return Err(ValidationError::DuplicateTitle {
                title: workout.title,
            }
            .into());
        }

        match existing {
            Some(prev) => {
                workout.created_at = prev.created_at;
                workout.is_favorite = prev.is_favorite;
                info!(id = %workout.id, "updating workout");
            }
            None => {
                if workout.id.is_empty() {
                    workout.id = Self::new_id();
                }
                workout.created_at = Utc::now().timestamp_millis();
                workout.is_favorite = false;
                info!(id = %workout.id, "creating workout");
            }
        }
        self.write(&workout)?;
        Ok(workout)
    }

    /// Replace the workout stored under `id`, keeping that id.
    ///
    /// # Errors
    /// Returns [`StorageError::NotFound`] for an unknown id, otherwise the
    /// same errors as [`save`](Self::save).
    pub fn update(&self, id: &str, mut workout: WorkoutDefinition) -> Result<WorkoutDefinition> {
        self.get(id)?;
        workout.id = id.to_string();
        self.save(workout)
    }

    /// Returns whether a workout was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        if n > 0 {
            info!(%id, "deleted workout");
        }
        Ok(n > 0)
    }

    /// Flip the favorite flag. Returns the new value.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let mut workout = self.get(id)?;
        workout.is_favorite = !workout.is_favorite;
        self.write(&workout)?;
        Ok(workout.is_favorite)
    }

    /// Copy a workout under a fresh id and the first free "(Copy)" title.
    pub fn duplicate(&self, id: &str) -> Result<WorkoutDefinition> {
        let mut copy = self.get(id)?;
        copy.title = self.catalog()?.duplicate_title(&copy.title);
        copy.id = Self::new_id();
        copy.is_favorite = false;
        copy.created_at = Utc::now().timestamp_millis();
        self.write(&copy)?;
        info!(from = %id, id = %copy.id, "duplicated workout");
        Ok(copy)
    }

    /// Import one workout from its JSON export.
    ///
    /// If the id or exact title is already present, the import gets a new id
    /// and `" (Imported)"` appended to its title.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidFormat`] unless the document has an
    /// `id`, a `title`, and a `steps` array, and a validation error if the
    /// workout could not be played.
    pub fn import_json(&self, json: &str) -> Result<WorkoutDefinition> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        let has_id = value.get("id").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty());
        let has_title = value
            .get("title")
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty());
        let has_steps = value.get("steps").is_some_and(|v| v.is_array());
        if !(has_id && has_title && has_steps) {
            return Err(StorageError::InvalidFormat(
                "expected an object with id, title and steps".into(),
            )
            .into());
        }

        let mut workout: WorkoutDefinition =
            serde_json::from_value(value).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
        workout.validate()?;
        let exact_title: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM workouts WHERE title = ?1",
            [&workout.title],
            |row| row.get(0),
        )?;
        if self.find(&workout.id)?.is_some() || exact_title > 0 {
            workout.id = Self::new_id();
            workout.title.push_str(IMPORTED_SUFFIX);
        }
        if workout.created_at == 0 {
            workout.created_at = Utc::now().timestamp_millis();
        }
        self.write(&workout)?;
        info!(id = %workout.id, title = %workout.title, "imported workout");
        Ok(workout)
    }

    /// Pretty-printed JSON export of one workout.
    pub fn export_json(&self, id: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get(id)?)?)
    }

    /// Replace the whole library, as when restoring a backup.
    ///
    /// # Errors
    /// Nothing is replaced if any workout fails validation.
    pub fn replace_all(&mut self, workouts: &[WorkoutDefinition]) -> Result<()> {
        for workout in workouts {
            workout.validate()?;
        }
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM workouts", [])?;
        for workout in workouts {
            let body = serde_json::to_string(workout)?;
            tx.execute(
                "INSERT OR REPLACE INTO workouts (id, title, body, is_favorite, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    workout.id,
                    workout.title,
                    body,
                    workout.is_favorite,
                    workout.created_at
                ],
            )?;
        }
        tx.commit()?;
        info!(count = workouts.len(), "replaced workout library");
        Ok(())
    }
}

/// File name for an exported workout: whitespace becomes `_`.
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}.json")
}
