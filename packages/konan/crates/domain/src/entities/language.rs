use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the model service is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "R")]
    R,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::R => "R",
        }
    }

    /// Base image used by the generated Dockerfile unless the project overrides it.
    pub fn default_base_image(&self) -> &'static str {
        match self {
            Language::Python => "python:3.10-slim-stretch",
            Language::R => "rocker/r-ver:4.2.1",
        }
    }

    /// One-shot command proving the runtime inside the image starts at all.
    pub fn version_probe(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["python", "--version"],
            Language::R => &["R", "--version"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Language::Python),
            "R" | "r" => Ok(Language::R),
            other => Err(format!(
                "unsupported language '{}', expected one of: python, R",
                other
            )),
        }
    }
}
