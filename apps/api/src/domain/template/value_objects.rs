use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone the generated output should take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Formal,
    Creative,
}

/// Output format requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Plain,
    Structured,
}

/// Role the model is asked to play
///
/// `Custom` pairs with the free-text `custom_role` of [`TemplateSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Assistant,
    Developer,
    Analyst,
    Writer,
    Expert,
    Custom,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Professional => write!(f, "professional"),
            Tone::Casual => write!(f, "casual"),
            Tone::Friendly => write!(f, "friendly"),
            Tone::Formal => write!(f, "formal"),
            Tone::Creative => write!(f, "creative"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "friendly" => Ok(Tone::Friendly),
            "formal" => Ok(Tone::Formal),
            "creative" => Ok(Tone::Creative),
            other => Err(format!("Unknown tone: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Structured => write!(f, "structured"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            "structured" => Ok(OutputFormat::Structured),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Assistant => write!(f, "assistant"),
            Role::Developer => write!(f, "developer"),
            Role::Analyst => write!(f, "analyst"),
            Role::Writer => write!(f, "writer"),
            Role::Expert => write!(f, "expert"),
            Role::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assistant" => Ok(Role::Assistant),
            "developer" => Ok(Role::Developer),
            "analyst" => Ok(Role::Analyst),
            "writer" => Ok(Role::Writer),
            "expert" => Ok(Role::Expert),
            "custom" => Ok(Role::Custom),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Generation metadata attached to a template
///
/// Carried alongside the body but never interpreted by the renderer.
/// Only tone, format and role survive persistence, as the comma-joined tag
/// string produced by [`TemplateSettings::to_tags`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateSettings {
    pub tone: Tone,
    pub format: OutputFormat,
    pub role: Role,
    #[serde(default)]
    pub custom_role: String,
}

impl TemplateSettings {
    /// Joins tone, format and role into the persisted tag string
    ///
    /// # Example
    /// ```
    /// use promptdeck_api::domain::template::value_objects::TemplateSettings;
    ///
    /// assert_eq!(TemplateSettings::default().to_tags(), "professional,markdown,assistant");
    /// ```
    pub fn to_tags(&self) -> String {
        format!("{},{},{}", self.tone, self.format, self.role)
    }

    /// Rebuilds settings from a tag string; unrecognised parts fall back to defaults
    pub fn from_tags(tags: &str) -> Self {
        let mut parts = tags.split(',').map(str::trim);
        let tone = parts.next().and_then(|p| p.parse().ok()).unwrap_or_default();
        let format = parts.next().and_then(|p| p.parse().ok()).unwrap_or_default();
        let role = parts.next().and_then(|p| p.parse().ok()).unwrap_or_default();

        Self {
            tone,
            format,
            role,
            custom_role: String::new(),
        }
    }
}
