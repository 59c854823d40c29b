use crate::utils::error::{Result, SuggestError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const USER_GOALS_FIELD: &str = "userGoals";
pub const TRENDING_SKILLS_FIELD: &str = "trendingSkills";
pub const SUGGESTED_PATHS_FIELD: &str = "suggestedLearningPaths";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSuggestionRequest {
    pub user_goals: String,
    pub trending_skills: String,
}

impl PathSuggestionRequest {
    pub fn new(user_goals: impl Into<String>, trending_skills: impl Into<String>) -> Self {
        Self {
            user_goals: user_goals.into(),
            trending_skills: trending_skills.into(),
        }
    }

    /// Builds a request from untyped JSON, naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SuggestError::validation("request", "expected a JSON object"))?;

        let user_goals = string_field(obj, USER_GOALS_FIELD)?;
        let trending_skills = string_field(obj, TRENDING_SKILLS_FIELD)?;

        let request = Self {
            user_goals,
            trending_skills,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_goals.is_empty() {
            return Err(SuggestError::validation(
                USER_GOALS_FIELD,
                "learning goals cannot be empty",
            ));
        }
        Ok(())
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SuggestError::validation(
            field,
            format!("expected a string, got {}", json_type_name(other)),
        )),
        None => Err(SuggestError::validation(field, "field is required")),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSuggestionResponse {
    pub suggested_learning_paths: Vec<String>,
}

impl PathSuggestionResponse {
    /// Checks structured provider output against the response shape. No repair
    /// is attempted: any mismatch is a provider error.
    pub fn from_provider_output(value: Value) -> Result<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(SuggestError::provider(format!(
                    "expected an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let items = match obj.get(SUGGESTED_PATHS_FIELD) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SuggestError::provider(format!(
                    "`{}` must be an array, got {}",
                    SUGGESTED_PATHS_FIELD,
                    json_type_name(other)
                )))
            }
            None => {
                return Err(SuggestError::provider(format!(
                    "response is missing `{}`",
                    SUGGESTED_PATHS_FIELD
                )))
            }
        };

        let mut paths = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(s) if !s.is_empty() => paths.push(s.clone()),
                Value::String(_) => {
                    return Err(SuggestError::provider(format!(
                        "`{}[{}]` is an empty string",
                        SUGGESTED_PATHS_FIELD, index
                    )))
                }
                other => {
                    return Err(SuggestError::provider(format!(
                        "`{}[{}]` must be a string, got {}",
                        SUGGESTED_PATHS_FIELD,
                        index,
                        json_type_name(other)
                    )))
                }
            }
        }

        Ok(Self {
            suggested_learning_paths: paths,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.suggested_learning_paths.is_empty()
    }

    /// JSON Schema handed to providers that support constrained output.
    pub fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                SUGGESTED_PATHS_FIELD: {
                    "type": "array",
                    "description": "A list of suggested learning paths based on the user goals and trending skills.",
                    "items": { "type": "string" }
                }
            },
            "required": [SUGGESTED_PATHS_FIELD],
            "additionalProperties": false
        })
    }
}

/// What the provider receives: the rendered prompt plus the shape it must answer in.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub output_schema: Value,
}

impl GenerationRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            output_schema: PathSuggestionResponse::output_schema(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionReport {
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    #[serde(flatten)]
    pub response: PathSuggestionResponse,
}

impl SuggestionReport {
    pub fn new(provider: &str, model: &str, response: PathSuggestionResponse) -> Self {
        Self {
            generated_at: Utc::now(),
            provider: provider.to_string(),
            model: model.to_string(),
            response,
        }
    }
}
