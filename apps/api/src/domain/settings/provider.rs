use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported model-listing providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Google,
    OpenRouter,
}

/// Static description of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: &'static str,
    pub default_base_url: &'static str,
    pub models_endpoint: &'static str,
}

pub const GOOGLE: Provider = Provider {
    id: ProviderId::Google,
    name: "Google AI",
    default_base_url: "https://generativelanguage.googleapis.com/v1beta",
    models_endpoint: "/models",
};

pub const OPENROUTER: Provider = Provider {
    id: ProviderId::OpenRouter,
    name: "OpenRouter",
    default_base_url: "https://openrouter.ai/api/v1",
    models_endpoint: "/models",
};

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Google, ProviderId::OpenRouter];

    pub fn provider(&self) -> &'static Provider {
        match self {
            ProviderId::Google => &GOOGLE,
            ProviderId::OpenRouter => &OPENROUTER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::OpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(ProviderId::Google),
            "openrouter" => Ok(ProviderId::OpenRouter),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Locale::Zh),
            "en" => Ok(Locale::En),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_table() {
        assert_eq!(ProviderId::Google.provider().name, "Google AI");
        assert_eq!(
            ProviderId::OpenRouter.provider().default_base_url,
            "https://openrouter.ai/api/v1"
        );
        assert!(ProviderId::ALL.iter().all(|p| p.provider().models_endpoint == "/models"));
    }

    #[test]
    fn provider_id_parse_and_display() {
        for id in ProviderId::ALL {
            assert_eq!(id.to_string().parse::<ProviderId>(), Ok(id));
        }
        assert!("anthropic".parse::<ProviderId>().is_err());
    }

    #[test]
    fn provider_id_serde_matches_display() {
        let json = serde_json::to_string(&ProviderId::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");
    }

    #[test]
    fn locale_defaults_to_chinese() {
        assert_eq!(Locale::default(), Locale::Zh);
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }
}
