use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

const PROGRAM_NAME_FIELD: &str = "name";
const PROGRAMS_FIELD: &str = "programs";

/// Static admissions data: schools in document order, each holding its programs.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    schools: Vec<SchoolRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    pub name: String,
    pub programs: Vec<ProgramRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRecord {
    pub key: String,
    /// Declared display name, when the program carries a `name` field.
    pub name: Option<String>,
    pub fields: Vec<ProgramField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramField {
    pub key: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    List(Vec<Value>),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge file is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("knowledge file has an unexpected shape: {0}")]
    InvalidShape(String),
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let raw = fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, KnowledgeError> {
        let Value::Object(schools) = document else {
            return Err(KnowledgeError::InvalidShape(
                "top level must map school names to school records".to_string(),
            ));
        };

        let schools = schools
            .into_iter()
            .map(|(name, record)| parse_school(name, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { schools })
    }

    pub fn schools(&self) -> &[SchoolRecord] {
        &self.schools
    }

    pub fn program_count(&self) -> usize {
        self.schools.iter().map(|school| school.programs.len()).sum()
    }

    /// Renders the knowledge base as the markdown-ish block embedded in the system prompt.
    pub fn format_for_prompt(&self) -> String {
        let mut lines = Vec::new();
        for school in &self.schools {
            lines.push(format!("\n## Department of {}", title_case(&school.name)));
            for program in &school.programs {
                lines.push(format!("\n### {}", program.display_name()));
                for field in &program.fields {
                    lines.push(format!(
                        "- {}: {}",
                        humanize_label(&field.key),
                        field.value.render()
                    ));
                }
            }
        }
        lines.join("\n")
    }
}

impl ProgramRecord {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.key.to_uppercase())
    }
}

impl FieldValue {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            other => Self::Scalar(other),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Scalar(value) => render_scalar(value),
            Self::List(items) => items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn parse_school(name: String, record: Value) -> Result<SchoolRecord, KnowledgeError> {
    let programs = match record {
        Value::Object(mut fields) => fields.remove(PROGRAMS_FIELD),
        _ => None,
    };
    let Some(Value::Object(programs)) = programs else {
        return Err(KnowledgeError::InvalidShape(format!(
            "school '{name}' must contain a '{PROGRAMS_FIELD}' object"
        )));
    };

    let programs = programs
        .into_iter()
        .map(|(key, program)| match program {
            Value::Object(fields) => Ok(parse_program(key, fields)),
            _ => Err(KnowledgeError::InvalidShape(format!(
                "program '{key}' in school '{name}' must be an object"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SchoolRecord { name, programs })
}

fn parse_program(key: String, fields: Map<String, Value>) -> ProgramRecord {
    let mut name = None;
    let mut parsed_fields = Vec::with_capacity(fields.len());

    for (field_key, value) in fields {
        if field_key == PROGRAM_NAME_FIELD {
            name = Some(render_scalar(&value));
            continue;
        }
        parsed_fields.push(ProgramField {
            key: field_key,
            value: FieldValue::from_value(value),
        });
    }

    ProgramRecord {
        key,
        name,
        fields: parsed_fields,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `fees_per_year` -> `Fees Per Year`.
pub fn humanize_label(field: &str) -> String {
    title_case(&field.replace('_', " "))
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(ch);
            previous_is_letter = false;
        }
    }

    output
}
