//! Data models for project metadata.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Publication status of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Archive,
    #[default]
    Backlog,
    InProgress,
    Complete,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Archive,
        Status::Backlog,
        Status::InProgress,
        Status::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Slug plus human name: the two identifiers every project carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub name: String,
    pub display_name: String,
}

impl ProjectIdentity {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.name)
    }
}

/// Root metadata record stored in `metadata.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project: ProjectInfo,
    pub physical_specifications: PhysicalSpecifications,
    pub technical_requirements: TechnicalRequirements,
    pub exhibition: Exhibition,
}

impl ProjectMetadata {
    /// Skeleton record for a freshly created project.
    pub fn new(project: &ProjectIdentity, date_created: NaiveDate) -> Self {
        let empty = || Value::String(String::new());
        Self {
            project: ProjectInfo {
                name: Some(project.name.clone()),
                display_name: project.display_name.clone(),
                date_created,
                status: Status::Backlog,
                tagline: None,
                embeds: Vec::new(),
                extra: Map::new(),
            },
            physical_specifications: PhysicalSpecifications {
                dimensions: Dimensions {
                    width: empty(),
                    height: empty(),
                    depth: empty(),
                    unit: "cm".to_string(),
                },
                weight: Weight {
                    value: empty(),
                    unit: "kg".to_string(),
                },
                materials: Materials::default(),
            },
            technical_requirements: TechnicalRequirements {
                lighting: empty(),
                mounting: empty(),
                environmental: Environmental {
                    temperature_range: empty(),
                    humidity_range: empty(),
                    ventilation_needs: empty(),
                },
            },
            exhibition: Exhibition {
                setup: Setup {
                    instructions: empty(),
                    time_required: empty(),
                    people_required: empty(),
                    tools_required: Vec::new(),
                },
                maintenance: Maintenance {
                    supplies_needed: Vec::new(),
                    tasks: Value::Array(Vec::new()),
                },
            },
        }
    }
}

/// Identifying section of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Slug; older records may leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub display_name: String,
    pub date_created: NaiveDate,
    pub status: Status,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub embeds: Vec<Embed>,
    /// Any other authored keys, passed through to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An embedded viewer (iframe, GitHub file, ...) shown alongside the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "src", alias = "url")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Embed {
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalSpecifications {
    pub dimensions: Dimensions,
    pub weight: Weight,
    pub materials: Materials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Value,
    pub height: Value,
    pub depth: Value,
    #[serde(deserialize_with = "nullable")]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub value: Value,
    #[serde(deserialize_with = "nullable")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Materials {
    #[serde(deserialize_with = "nullable")]
    pub primary: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub consumables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalRequirements {
    pub lighting: Value,
    pub mounting: Value,
    pub environmental: Environmental,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environmental {
    pub temperature_range: Value,
    pub humidity_range: Value,
    pub ventilation_needs: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exhibition {
    pub setup: Setup,
    pub maintenance: Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setup {
    pub instructions: Value,
    pub time_required: Value,
    pub people_required: Value,
    #[serde(deserialize_with = "nullable")]
    pub tools_required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(deserialize_with = "nullable")]
    pub supplies_needed: Vec<String>,
    pub tasks: Value,
}

/// One line of `makerpub list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub display_name: String,
    pub date_created: NaiveDate,
    pub status: Status,
}

impl ProjectSummary {
    pub fn from_metadata(name: impl Into<String>, metadata: &ProjectMetadata) -> Self {
        Self {
            name: name.into(),
            display_name: metadata.project.display_name.clone(),
            date_created: metadata.project.date_created,
            status: metadata.project.status,
        }
    }
}

/// Accept an explicit YAML null (an empty `key:` line) as the default value.
/// The key itself must still be present.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
