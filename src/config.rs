use serde::{Deserialize, Serialize};

/// Default class length when a class does not override it.
pub const DEFAULT_CLASS_DURATION: u32 = 60;

/// A class a teacher can give, with its length in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

fn default_duration() -> u32 {
    DEFAULT_CLASS_DURATION
}

impl ClassDef {
    pub fn new(name: &str) -> Self {
        ClassDef {
            name: name.to_string(),
            duration_minutes: DEFAULT_CLASS_DURATION,
        }
    }
}

/// A (day, time-block) pair pre-assigned to a teacher and immune to
/// heuristic reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSlot {
    pub day: String,
    pub time: String,
}

/// One teacher: an ordered set of classes and optional fixed slots.
/// A teacher with fixed slots teaches its first class at those slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherDef {
    pub name: String,
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub fixed_slots: Vec<FixedSlot>,
}

/// Static configuration for one generation run: the teacher roster, the
/// day and time-block catalogs, the number of rooms and the weekly
/// occurrence cap per class. Passed into the allocator explicitly so
/// tests can run with synthetic rosters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub teachers: Vec<TeacherDef>,
    pub days: Vec<String>,
    pub time_blocks: Vec<String>,
    pub rooms: u8,
    pub occurrence_cap: u32,
}

impl ScheduleConfig {
    /// Registered duration of a class in minutes. Every conflict check
    /// must use this, never an assumed hour.
    pub fn duration_of(&self, class_name: &str) -> u32 {
        self.teachers
            .iter()
            .flat_map(|t| &t.classes)
            .find(|c| c.name == class_name)
            .map(|c| c.duration_minutes)
            .unwrap_or(DEFAULT_CLASS_DURATION)
    }

    /// All class names in roster order.
    pub fn class_names(&self) -> Vec<&str> {
        self.teachers
            .iter()
            .flat_map(|t| t.classes.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// True if (day, time, class) is one of a teacher's fixed slots.
    pub fn is_fixed_assignment(&self, day: &str, time: &str, class_name: &str) -> bool {
        self.teachers.iter().any(|t| {
            t.classes.first().map(|c| c.name.as_str()) == Some(class_name)
                && t.fixed_slots
                    .iter()
                    .any(|f| f.day == day && f.time == time)
        })
    }

    /// Total number of (day, time-block, room) triples.
    pub fn total_slots(&self) -> usize {
        self.days.len() * self.time_blocks.len() * self.rooms as usize
    }
}

impl Default for ScheduleConfig {
    /// The reference studio configuration: three professors, fifteen
    /// classes, five weekdays, ten time blocks and two rooms.
    fn default() -> Self {
        ScheduleConfig {
            teachers: vec![
                TeacherDef {
                    name: "Professor 1".to_string(),
                    classes: vec![ClassDef::new("Zumba")],
                    fixed_slots: vec![
                        FixedSlot {
                            day: "Terça".to_string(),
                            time: "19:00 - 20:00".to_string(),
                        },
                        FixedSlot {
                            day: "Quinta".to_string(),
                            time: "18:00 - 19:00".to_string(),
                        },
                    ],
                },
                TeacherDef {
                    name: "Professor 2".to_string(),
                    classes: [
                        "Body Upper",
                        "Core Express",
                        "Fit Step",
                        "Fullbody",
                        "GAP",
                        "Hiit",
                        "Localizada",
                        "Mobistretching",
                        "Treino Livre",
                        "Tabatta",
                        "Vitta Core legs",
                    ]
                    .iter()
                    .map(|name| ClassDef::new(name))
                    .collect(),
                    fixed_slots: Vec::new(),
                },
                TeacherDef {
                    name: "Professor 3".to_string(),
                    classes: vec![
                        ClassDef::new("Pilates"),
                        ClassDef::new("Yoga Flow"),
                        ClassDef::new("Power Yoga"),
                    ],
                    fixed_slots: Vec::new(),
                },
            ],
            days: ["Segunda", "Terça", "Quarta", "Quinta", "Sexta"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            time_blocks: [
                "10:00 - 11:00",
                "10:30 - 11:30",
                "16:00 - 17:00",
                "16:30 - 17:30",
                "17:00 - 18:00",
                "17:30 - 18:30",
                "18:00 - 19:00",
                "18:30 - 19:30",
                "19:00 - 20:00",
                "19:30 - 20:30",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            rooms: 2,
            occurrence_cap: 4,
        }
    }
}
