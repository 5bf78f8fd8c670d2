//! Models for staff identity and role metadata.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Store roles ordered roughly by seniority: shop-floor staff, assistant
/// chief, chief of store, area coordinator, head office admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StaffRole {
    #[default]
    Employee,
    Acos,
    Cos,
    Ac,
    Admin,
}

impl StaffRole {
    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Employee => "employee",
            StaffRole::Acos => "acos",
            StaffRole::Cos => "cos",
            StaffRole::Ac => "ac",
            StaffRole::Admin => "admin",
        }
    }

    /// Parses canonical values plus tolerated legacy spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Some(StaffRole::Employee),
            "acos" => Some(StaffRole::Acos),
            "cos" => Some(StaffRole::Cos),
            "ac" => Some(StaffRole::Ac),
            // older payloads called the area coordinator "supervisor"
            "supervisor" => Some(StaffRole::Ac),
            "admin" => Some(StaffRole::Admin),
            _ => None,
        }
    }
}

impl Serialize for StaffRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StaffRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StaffRole::parse(&s).ok_or_else(|| {
            serde::de::Error::unknown_variant(&s, &["employee", "acos", "cos", "ac", "admin"])
        })
    }
}

/// A staff member as seen by the workflow: the acting user for capability
/// checks, or a roster entry in directory lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Payroll identification number shown in roster pickers.
    #[serde(default)]
    pub nik: Option<String>,
    pub role: StaffRole,
    /// Flag promoting the user to the highest administrative tier; a
    /// superuser may approve any request regardless of the role hierarchy.
    #[serde(default)]
    pub is_superuser: bool,
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: StaffRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nik: None,
            role,
            is_superuser: false,
        }
    }
}

/// Lightweight party reference embedded inside request records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRef {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl From<&Employee> for StaffRef {
    fn from(employee: &Employee) -> Self {
        StaffRef {
            id: employee.id.clone(),
            name: employee.name.clone(),
            role: employee.role,
        }
    }
}
