use std::path::{Path, PathBuf};

use tabata_core::storage::export_file_name;
use tabata_core::timer::format_time;
use tabata_core::{Config, SortKey, StorageError, WorkoutDefinition, WorkoutStore};

use super::confirm;

pub fn list(search: &str, sort: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sort = match sort {
        Some(key) => key.parse::<SortKey>()?,
        None => Config::load()?.library.sort,
    };
    let catalog = WorkoutStore::open()?.catalog()?;
    let workouts = catalog.filtered_sorted(search, sort);

    if json {
        let plain: Vec<_> = workouts.iter().map(|w| w.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&plain)?);
        return Ok(());
    }

    if workouts.is_empty() {
        println!("No workouts found.");
        return Ok(());
    }
    for w in workouts {
        let star = if w.is_favorite { '★' } else { '☆' };
        println!(
            "{star} {:<40} {:<24} {:>2} x {:<2} steps  {}  {}",
            w.id,
            w.title,
            w.sets,
            w.steps.len(),
            format_time(w.total_duration_secs().min(u64::from(u32::MAX)) as u32),
            w.color.name(),
        );
    }
    Ok(())
}

pub fn show(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = WorkoutStore::open()?;
    let workout = store
        .find(id)?
        .ok_or_else(|| not_found(id))?;
    print!("{}", workout.preview());
    Ok(())
}

fn not_found(id: &str) -> StorageError {
    StorageError::NotFound { id: id.to_string() }
}

fn read_definition(file: &Path) -> Result<WorkoutDefinition, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&json)?)
}

/// Add a workout from a definition file. Any id in the file is ignored.
pub fn create(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut workout = read_definition(file)?;
    workout.id.clear();
    let saved = WorkoutStore::open()?.save(workout)?;
    println!("Created '{}' as {}", saved.title, saved.id);
    Ok(())
}

pub fn edit(id: &str, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let workout = read_definition(file)?;
    let saved = WorkoutStore::open()?.update(id, workout)?;
    println!("Updated '{}' ({})", saved.title, saved.id);
    Ok(())
}

pub fn import(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(file)?;
    let workout = WorkoutStore::open()?.import_json(&json)?;
    println!("Imported '{}' as {}", workout.title, workout.id);
    Ok(())
}

pub fn export(id: &str, out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let store = WorkoutStore::open()?;
    let workout = store
        .find(id)?
        .ok_or_else(|| not_found(id))?;
    let json = store.export_json(id)?;

    match out {
        Some(path) if path == Path::new("-") => println!("{json}"),
        _ => {
            let path = out
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(export_file_name(&workout.title)));
            std::fs::write(&path, json)?;
            println!("Exported '{}' to {}", workout.title, path.display());
        }
    }
    Ok(())
}

pub fn delete(id: &str, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = WorkoutStore::open()?;
    if store.find(id)?.is_none() {
        return Err(not_found(id).into());
    }
    if !yes && !confirm("Are you sure you want to delete this workout?")? {
        println!("Cancelled.");
        return Ok(());
    }
    store.delete(id)?;
    println!("Deleted {id}");
    Ok(())
}

pub fn duplicate(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let copy = WorkoutStore::open()?.duplicate(id)?;
    println!("Created '{}' as {}", copy.title, copy.id);
    Ok(())
}

pub fn favorite(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let now = WorkoutStore::open()?.toggle_favorite(id)?;
    println!("{id} {}", if now { "favorited" } else { "unfavorited" });
    Ok(())
}
