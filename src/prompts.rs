use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PROMPTS_FILE: &str = "prompts.yaml";

pub const SIMPLIFY_TEMPLATE: &str = "simplify_article";
pub const QUESTIONS_TEMPLATE: &str = "generate_questions";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{path} not found")]
    Missing { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Prompt template not found: {0}")]
    UnknownTemplate(String),

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        source: handlebars::RenderError,
    },
}

/// Named prompt templates, loaded once per run from a flat YAML mapping.
#[derive(Debug, Clone)]
pub struct PromptSet {
    templates: HashMap<String, String>,
}

impl PromptSet {
    pub fn load(path: &Path) -> Result<Self, PromptError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                PromptError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                PromptError::Io {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        let templates: HashMap<String, String> =
            serde_yaml::from_str(&contents).map_err(|source| PromptError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self { templates })
    }

    pub fn from_templates<I, K, V>(templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Render a template by name. Strict mode: a placeholder the context
    /// does not provide fails the render instead of expanding to nothing.
    pub fn render(&self, name: &str, context: &impl Serialize) -> Result<String, PromptError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| PromptError::UnknownTemplate(name.to_string()))?;

        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        // Prompts go to a language model, not a browser.
        hbs.register_escape_fn(handlebars::no_escape);

        hbs.render_template(template, context)
            .map_err(|source| PromptError::Render {
                name: name.to_string(),
                source,
            })
    }
}
