//! Schema validation for movie request bodies.
//!
//! Both entry points inspect a decoded JSON value and either produce a typed
//! value or the complete list of field problems found. Unknown keys are
//! ignored, so a client-supplied `id` never reaches the store.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::limits::{DEFAULT_RATE, MAX_RATE, MAX_YEAR, MIN_RATE, MIN_YEAR};
use crate::domain::Genre;
use crate::models::{MoviePatch, NewMovie};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every problem found in one body, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| {
                if e.field.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.field, e.message)
                }
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Partial,
}

/// Validates a create body against the full schema.
///
/// # Errors
///
/// Returns every missing or malformed field.
pub fn validate_movie(input: &Value) -> Result<NewMovie, ValidationErrors> {
    let mut checker = Checker::new(input, Mode::Full)?;

    let title = checker.field("title", parse_text);
    let year = checker.field("year", parse_year);
    let director = checker.field("director", parse_text);
    let duration = checker.field("duration", parse_duration);
    let poster = checker.field("poster", parse_poster);
    let genre = checker.field("genre", parse_genres);
    let rate = checker.optional_field("rate", parse_rate);

    checker.finish()?;

    match (title, year, director, duration, poster, genre) {
        (Some(title), Some(year), Some(director), Some(duration), Some(poster), Some(genre)) => {
            Ok(NewMovie {
                title,
                year,
                director,
                duration,
                poster,
                genre,
                rate: rate.unwrap_or(DEFAULT_RATE),
            })
        }
        _ => Err(ValidationErrors(vec![FieldError::new(
            "",
            "Incomplete movie body",
        )])),
    }
}

/// Validates an update body: every field optional, present fields held to the
/// same rules as [`validate_movie`]. No defaults are filled in.
///
/// # Errors
///
/// Returns every malformed field that is present.
pub fn validate_partial_movie(input: &Value) -> Result<MoviePatch, ValidationErrors> {
    let mut checker = Checker::new(input, Mode::Partial)?;

    let patch = MoviePatch {
        title: checker.field("title", parse_text),
        year: checker.field("year", parse_year),
        director: checker.field("director", parse_text),
        duration: checker.field("duration", parse_duration),
        poster: checker.field("poster", parse_poster),
        genre: checker.field("genre", parse_genres),
        rate: checker.optional_field("rate", parse_rate),
    };

    checker.finish()?;
    Ok(patch)
}

struct Checker<'a> {
    object: &'a Map<String, Value>,
    mode: Mode,
    errors: Vec<FieldError>,
}

impl<'a> Checker<'a> {
    fn new(input: &'a Value, mode: Mode) -> Result<Self, ValidationErrors> {
        match input {
            Value::Object(object) => Ok(Self {
                object,
                mode,
                errors: Vec::new(),
            }),
            other => Err(ValidationErrors(vec![FieldError::new(
                "",
                format!("Expected object, received {}", kind(other)),
            )])),
        }
    }

    /// Required in full mode, optional in partial mode.
    fn field<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&str, &Value) -> Result<T, Vec<FieldError>>,
    ) -> Option<T> {
        let required = self.mode == Mode::Full;
        self.check(name, required, parse)
    }

    fn optional_field<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&str, &Value) -> Result<T, Vec<FieldError>>,
    ) -> Option<T> {
        self.check(name, false, parse)
    }

    fn check<T>(
        &mut self,
        name: &str,
        required: bool,
        parse: impl FnOnce(&str, &Value) -> Result<T, Vec<FieldError>>,
    ) -> Option<T> {
        match self.object.get(name) {
            None => {
                if required {
                    self.errors
                        .push(FieldError::new(name, format!("{name} is required")));
                }
                None
            }
            Some(value) => match parse(name, value) {
                Ok(parsed) => Some(parsed),
                Err(mut errors) => {
                    self.errors.append(&mut errors);
                    None
                }
            },
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(field: &str, expected: &str, value: &Value) -> Vec<FieldError> {
    vec![FieldError::new(
        field,
        format!("Expected {expected}, received {}", kind(value)),
    )]
}

fn parse_text(field: &str, value: &Value) -> Result<String, Vec<FieldError>> {
    let Some(text) = value.as_str() else {
        return Err(type_error(field, "string", value));
    };
    if text.trim().is_empty() {
        return Err(vec![FieldError::new(
            field,
            format!("{field} cannot be empty"),
        )]);
    }
    Ok(text.to_string())
}

/// Accepts JSON integers and floats with no fractional part.
fn parse_integer(field: &str, value: &Value) -> Result<i64, Vec<FieldError>> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(n) if n.fract() != 0.0 => Err(vec![FieldError::new(
            field,
            "Expected integer, received float",
        )]),
        #[allow(clippy::cast_possible_truncation)]
        Some(n) if n.abs() < 9.0e15 => Ok(n as i64),
        Some(_) => Err(vec![FieldError::new(field, "Number is too large")]),
        None => Err(type_error(field, "number", value)),
    }
}

fn parse_year(field: &str, value: &Value) -> Result<i32, Vec<FieldError>> {
    let year = parse_integer(field, value)?;
    if !(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        return Err(vec![FieldError::new(
            field,
            format!("Year must be between {MIN_YEAR} and {MAX_YEAR}"),
        )]);
    }
    i32::try_from(year).map_err(|_| vec![FieldError::new(field, "Year is out of range")])
}

fn parse_duration(field: &str, value: &Value) -> Result<u32, Vec<FieldError>> {
    let duration = parse_integer(field, value)?;
    if duration <= 0 {
        return Err(vec![FieldError::new(
            field,
            "Duration must be a positive number of minutes",
        )]);
    }
    u32::try_from(duration).map_err(|_| vec![FieldError::new(field, "Duration is too large")])
}

fn parse_rate(field: &str, value: &Value) -> Result<f64, Vec<FieldError>> {
    let Some(rate) = value.as_f64() else {
        return Err(type_error(field, "number", value));
    };
    if !(MIN_RATE..=MAX_RATE).contains(&rate) {
        return Err(vec![FieldError::new(
            field,
            format!("Rate must be between {MIN_RATE} and {MAX_RATE}"),
        )]);
    }
    Ok(rate)
}

fn parse_poster(field: &str, value: &Value) -> Result<String, Vec<FieldError>> {
    let Some(poster) = value.as_str() else {
        return Err(type_error(field, "string", value));
    };
    url::Url::parse(poster)
        .map(|_| poster.to_string())
        .map_err(|_| vec![FieldError::new(field, "Poster must be a valid URL")])
}

fn parse_genres(field: &str, value: &Value) -> Result<Vec<Genre>, Vec<FieldError>> {
    let Some(entries) = value.as_array() else {
        return Err(type_error(field, "array", value));
    };
    if entries.is_empty() {
        return Err(vec![FieldError::new(
            field,
            "At least one genre is required",
        )]);
    }

    let mut genres = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let path = format!("{field}.{index}");
        match entry.as_str() {
            Some(name) => match name.parse::<Genre>() {
                Ok(genre) => genres.push(genre),
                Err(_) => {
                    let allowed: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
                    errors.push(FieldError::new(
                        path,
                        format!(
                            "Invalid genre '{name}'. Expected one of: {}",
                            allowed.join(", ")
                        ),
                    ));
                }
            },
            None => errors.extend(type_error(&path, "string", entry)),
        }
    }

    if errors.is_empty() {
        Ok(genres)
    } else {
        Err(errors)
    }
}
