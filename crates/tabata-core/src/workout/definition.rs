use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::queue::{build_execution_queue, EventKind};
use crate::error::ValidationError;

/// Kind of a step. `work` and `rest` are built in; any other tag is kept
/// verbatim so files from newer editors still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepType {
    Work,
    Rest,
    Other(String),
}

impl StepType {
    pub fn as_str(&self) -> &str {
        match self {
            StepType::Work => "work",
            StepType::Rest => "rest",
            StepType::Other(tag) => tag,
        }
    }
}

impl From<String> for StepType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "work" => StepType::Work,
            "rest" => StepType::Rest,
            _ => StepType::Other(tag),
        }
    }
}

impl From<StepType> for String {
    fn from(step_type: StepType) -> Self {
        step_type.as_str().to_string()
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color tag shown on workout cards. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Indigo,
    Purple,
}

impl Color {
    /// Palette order, used when sorting by color.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Indigo,
        Color::Purple,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Color::Red => "#ff3b30",
            Color::Orange => "#ff9500",
            Color::Yellow => "#ffcc00",
            Color::Green => "#34c759",
            Color::Blue => "#007aff",
            Color::Indigo => "#5856d6",
            Color::Purple => "#af52de",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Indigo => "indigo",
            Color::Purple => "purple",
        }
    }

    pub fn palette_index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Seconds. Zero means the step waits for the user to confirm.
    #[serde(default)]
    pub duration: u32,
    /// Display only.
    #[serde(default)]
    pub reps: u32,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub media: Option<String>,
}

impl StepDefinition {
    pub fn is_manual(&self) -> bool {
        self.duration == 0
    }
}

/// A playable workout.
///
/// Field names follow the browser app's export format so exported files
/// round-trip between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDefinition {
    /// Empty until the library assigns one.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Color,
    /// Seconds; 0 skips the phase.
    #[serde(default)]
    pub prepare: u32,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub prepare_media: Option<String>,
    #[serde(default = "default_sets")]
    pub sets: u32,
    /// Seconds between sets; 0 skips the phase.
    #[serde(default)]
    pub cooldown: u32,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub cooldown_media: Option<String>,
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
}

fn default_sets() -> u32 {
    1
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl WorkoutDefinition {
    /// Check the invariants that make a workout playable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.sets < 1 {
            return Err(ValidationError::NoSets);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        Ok(())
    }

    /// Seconds of countdown across one full run. Manual steps count as zero.
    pub fn total_duration_secs(&self) -> u64 {
        build_execution_queue(self)
            .iter()
            .map(|event| match event.kind {
                EventKind::Prepare => u64::from(self.prepare),
                EventKind::Cooldown => u64::from(self.cooldown),
                EventKind::Step { step_index } => self
                    .steps
                    .get(step_index)
                    .map(|s| u64::from(s.duration))
                    .unwrap_or(0),
            })
            .sum()
    }

    /// Plain-text summary for listing and previews.
    pub fn preview(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        if self.description.trim().is_empty() {
            out.push_str("No description.\n");
        } else {
            out.push_str(&self.description);
            out.push('\n');
        }
        out.push_str(&format!("Color: {} ({})\n", self.color.name(), self.color.hex()));
        out.push_str(&format!("Sets: {}\n", self.sets));
        out.push_str(&format!(
            "Prepare: {}s | Cooldown: {}s\n",
            self.prepare, self.cooldown
        ));
        out.push_str("Steps:\n");
        for (i, step) in self.steps.iter().enumerate() {
            let timing = if step.is_manual() {
                "Manual".to_string()
            } else {
                format!("{}s", step.duration)
            };
            let reps = if step.reps > 0 {
                format!(", {} reps", step.reps)
            } else {
                String::new()
            };
            out.push_str(&format!(
                "  {}. {} ({}) - {}{}\n",
                i + 1,
                step.name,
                step.step_type,
                timing,
                reps
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, duration: u32) -> StepDefinition {
        StepDefinition {
            id: format!("s-{name}"),
            step_type: StepType::Work,
            name: name.into(),
            description: String::new(),
            duration,
            reps: 0,
            media: None,
        }
    }

    fn workout() -> WorkoutDefinition {
        WorkoutDefinition {
            id: "w-1".into(),
            title: "Legs".into(),
            description: String::new(),
            color: Color::Green,
            prepare: 10,
            prepare_media: None,
            sets: 2,
            cooldown: 15,
            cooldown_media: None,
            steps: vec![step("Squat", 20), step("Hold", 0)],
            is_favorite: false,
            created_at: 0,
        }
    }

    #[test]
    fn validate_rejects_unplayable_workouts() {
        let mut w = workout();
        assert!(w.validate().is_ok());

        w.sets = 0;
        assert_eq!(w.validate(), Err(ValidationError::NoSets));

        w.sets = 1;
        w.steps.clear();
        assert_eq!(w.validate(), Err(ValidationError::NoSteps));

        w.title = "   ".into();
        assert_eq!(w.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn total_duration_skips_final_cooldown() {
        // 10 + (20 + 0) * 2 + 15
        assert_eq!(workout().total_duration_secs(), 65);
    }

    #[test]
    fn parses_browser_export() {
        let json = r#"{
            "id": "w-1700000000000",
            "title": "Tabata Classic",
            "description": "",
            "color": "red",
            "prepare": 10,
            "prepareMedia": "",
            "sets": 8,
            "cooldown": 0,
            "cooldownMedia": "",
            "steps": [
                {"id": "s-1", "type": "work", "name": "Burpees", "description": "",
                 "duration": 20, "reps": 0, "media": ""},
                {"id": "s-2", "type": "stretch", "name": "Reach", "description": "",
                 "duration": 10, "reps": 5, "media": "reach.gif"}
            ],
            "createdAt": 1700000000000,
            "isFavorite": true
        }"#;
        let w: WorkoutDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(w.color, Color::Red);
        assert_eq!(w.prepare_media, None);
        assert_eq!(w.steps[0].media, None);
        assert_eq!(w.steps[1].step_type, StepType::Other("stretch".into()));
        assert_eq!(w.steps[1].media.as_deref(), Some("reach.gif"));
        assert!(w.is_favorite);
    }

    #[test]
    fn step_type_serializes_as_tag() {
        let json = serde_json::to_string(&step("Run", 30)).unwrap();
        assert!(json.contains(r#""type":"work""#));
    }

    #[test]
    fn preview_lists_manual_steps_and_reps() {
        let mut w = workout();
        w.steps[1].reps = 12;
        let text = w.preview();
        assert!(text.contains("No description."));
        assert!(text.contains("1. Squat (work) - 20s\n"));
        assert!(text.contains("2. Hold (work) - Manual, 12 reps\n"));
    }
}
