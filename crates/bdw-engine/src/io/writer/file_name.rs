use bdw_sdk::{Result, WriterError};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Placeholder substituted with a unique token in file name templates
pub const ID_PLACEHOLDER: &str = "{id}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"))
}

/// Fresh token for a file name: a v4 UUID in simple (hex) form
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Template for output file paths, e.g. `out/events.{id}`
///
/// The template must contain exactly one `{id}` placeholder. The file
/// extension of the output format is appended after substitution.
#[derive(Debug, Clone)]
pub struct FileNameTemplate {
    template: String,
    extension: String,
}

impl FileNameTemplate {
    /// Create a template, failing right away if it cannot render
    pub fn new(template: impl Into<String>, extension: impl Into<String>) -> Result<Self> {
        let template = Self {
            template: template.into(),
            extension: extension.into(),
        };
        template.placeholder_range()?;
        Ok(template)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn invalid(&self, reason: impl Into<String>) -> WriterError {
        WriterError::InvalidFileNameTemplate {
            template: self.template.clone(),
            reason: reason.into(),
        }
    }

    /// Locate the single `{id}` placeholder
    fn placeholder_range(&self) -> Result<std::ops::Range<usize>> {
        let placeholders: Vec<regex::Captures> =
            placeholder_regex().captures_iter(&self.template).collect();

        match placeholders.as_slice() {
            [] => Err(self.invalid(format!("missing {} placeholder", ID_PLACEHOLDER))),
            [caps] => {
                let whole = caps.get(0).expect("capture 0 is the whole match");
                match &caps[1] {
                    "id" => Ok(whole.range()),
                    spec if spec.starts_with("id:") => Err(self.invalid(format!(
                        "placeholder '{}' formats a number, but the file id is a string",
                        whole.as_str()
                    ))),
                    _ => Err(self.invalid(format!(
                        "unknown placeholder '{}', expected {}",
                        whole.as_str(),
                        ID_PLACEHOLDER
                    ))),
                }
            }
            many => Err(self.invalid(format!(
                "expected exactly one placeholder, found {}",
                many.len()
            ))),
        }
    }

    /// Render the template with `token` substituted and the extension appended
    pub fn render(&self, token: &str) -> Result<PathBuf> {
        let range = self.placeholder_range()?;
        let mut name = String::with_capacity(self.template.len() + token.len() + 16);
        name.push_str(&self.template[..range.start]);
        name.push_str(token);
        name.push_str(&self.template[range.end..]);
        name.push('.');
        name.push_str(&self.extension);
        Ok(PathBuf::from(name))
    }

    /// Render with a fresh unique token
    pub fn next_path(&self) -> Result<PathBuf> {
        self.render(&unique_id())
    }
}
