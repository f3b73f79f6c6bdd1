//! Declarative book schema and the validator built from it.
//!
//! Both schema variants are generated from [`BOOK_FIELDS`] and compiled once by
//! [`BookSchema::new`]. Violations are reported in a fixed order: missing
//! properties first, then type mismatches, each in field declaration order.

use std::fmt::Display;

use error_stack::Report;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::{json, Map, Value};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
    pub required_on_update: bool,
}

pub static BOOK_FIELDS: [Field; 8] = [
    Field {
        name: "isbn",
        kind: FieldType::String,
        required_on_update: true,
    },
    Field {
        name: "amazon_url",
        kind: FieldType::String,
        required_on_update: true,
    },
    Field {
        name: "author",
        kind: FieldType::String,
        required_on_update: true,
    },
    Field {
        name: "language",
        kind: FieldType::String,
        required_on_update: true,
    },
    Field {
        name: "pages",
        kind: FieldType::Integer,
        required_on_update: false,
    },
    Field {
        name: "publisher",
        kind: FieldType::String,
        required_on_update: false,
    },
    Field {
        name: "title",
        kind: FieldType::String,
        required_on_update: false,
    },
    Field {
        name: "year",
        kind: FieldType::Integer,
        required_on_update: false,
    },
];

fn field_position(name: &str) -> Option<(usize, &'static Field)> {
    BOOK_FIELDS
        .iter()
        .enumerate()
        .find(|(_, field)| field.name == name)
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SchemaMode {
    Create,
    Update,
}

impl SchemaMode {
    fn requires(&self, field: &Field) -> bool {
        match self {
            SchemaMode::Create => true,
            SchemaMode::Update => field.required_on_update,
        }
    }

    fn document(&self) -> Value {
        let properties = BOOK_FIELDS
            .iter()
            .map(|field| (field.name.to_string(), json!({ "type": field.kind.as_str() })))
            .collect::<Map<String, Value>>();
        let required = BOOK_FIELDS
            .iter()
            .filter(|field| self.requires(field))
            .map(|field| field.name)
            .collect::<Vec<_>>();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Violation {
    Missing {
        field: &'static str,
    },
    /// `field` is `None` when the instance itself has the wrong type.
    Type {
        field: Option<&'static str>,
        expected: &'static str,
    },
}

impl Violation {
    fn sort_key(&self) -> (u8, usize) {
        let position = |name: &str| field_position(name).map_or(usize::MAX, |(index, _)| index);
        match self {
            Violation::Type { field: None, .. } => (0, 0),
            Violation::Missing { field } => (1, position(*field)),
            Violation::Type {
                field: Some(field), ..
            } => (2, position(*field)),
        }
    }

    fn from_error(error: &ValidationError) -> Option<Self> {
        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let (_, field) = field_position(property.as_str()?)?;
                Some(Violation::Missing { field: field.name })
            }
            ValidationErrorKind::Type { .. } => {
                let path = error.instance_path.as_str().trim_start_matches('/');
                if path.is_empty() {
                    return Some(Violation::Type {
                        field: None,
                        expected: "object",
                    });
                }
                let (_, field) = field_position(path)?;
                Some(Violation::Type {
                    field: Some(field.name),
                    expected: field.kind.as_str(),
                })
            }
            _ => None,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing { field } => write!(f, "instance requires property \"{field}\""),
            Violation::Type {
                field: Some(field),
                expected,
            } => write!(f, "instance.{field} is not of a type(s) {expected}"),
            Violation::Type {
                field: None,
                expected,
            } => write!(f, "instance is not of a type(s) {expected}"),
        }
    }
}

/// Ordered violations, attached to a [`KernelError::Validation`] report.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl AsRef<[Violation]> for Violations {
    fn as_ref(&self) -> &[Violation] {
        &self.0
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

pub struct BookSchema {
    create: Validator,
    update: Validator,
}

impl BookSchema {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            create: compile(SchemaMode::Create)?,
            update: compile(SchemaMode::Update)?,
        })
    }

    pub fn validate(&self, mode: SchemaMode, instance: &Value) -> Vec<Violation> {
        let validator = match mode {
            SchemaMode::Create => &self.create,
            SchemaMode::Update => &self.update,
        };
        let mut violations = validator
            .iter_errors(instance)
            .filter_map(|error| Violation::from_error(&error))
            .collect::<Vec<_>>();

        // Columns are 32-bit, so integers outside that range are rejected as well.
        // Integral floats such as `304.0` pass the schema but are not read as `i32`,
        // so they are reported as type mismatches too.
        if let Some(object) = instance.as_object() {
            for field in BOOK_FIELDS
                .iter()
                .filter(|field| field.kind == FieldType::Integer)
            {
                let Some(value) = object.get(field.name).filter(|value| value.is_number()) else {
                    continue;
                };
                let fits = value.as_i64().is_some_and(|n| i32::try_from(n).is_ok());
                let violation = Violation::Type {
                    field: Some(field.name),
                    expected: field.kind.as_str(),
                };
                if !fits && !violations.contains(&violation) {
                    violations.push(violation);
                }
            }
        }

        violations.sort_by_key(Violation::sort_key);
        violations.dedup();
        violations
    }

    /// Same as [`BookSchema::validate`], but fails with a [`Violations`] attachment.
    pub fn check(
        &self,
        mode: SchemaMode,
        instance: &Value,
    ) -> error_stack::Result<(), KernelError> {
        let violations = self.validate(mode, instance);
        if violations.is_empty() {
            return Ok(());
        }
        Err(Report::new(KernelError::Validation).attach_printable(Violations::new(violations)))
    }
}

fn compile(mode: SchemaMode) -> error_stack::Result<Validator, KernelError> {
    jsonschema::validator_for(&mode.document()).map_err(|error| {
        Report::new(KernelError::Internal)
            .attach_printable(format!("failed to compile {mode:?} book schema: {error}"))
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{BookSchema, SchemaMode, Violations};
    use crate::KernelError;

    fn messages(mode: SchemaMode, instance: serde_json::Value) -> Vec<String> {
        let schema = BookSchema::new().unwrap();
        Violations::new(schema.validate(mode, &instance)).messages()
    }

    fn valid_book() -> serde_json::Value {
        json!({
            "isbn": "9780143127741",
            "amazon_url": "https://www.amazon.com/dp/0143127748",
            "author": "Atul Gawande",
            "language": "english",
            "pages": 304,
            "publisher": "Metropolitan Books",
            "title": "Being Mortal: Medicine and What Matters in the End",
            "year": 2014
        })
    }

    #[test]
    fn accepts_complete_book() {
        assert!(messages(SchemaMode::Create, valid_book()).is_empty());
        assert!(messages(SchemaMode::Update, valid_book()).is_empty());
    }

    #[test]
    fn reports_type_mismatches_in_field_order() {
        let mut book = valid_book();
        book["pages"] = json!("304");
        book["amazon_url"] = json!(890);
        assert_eq!(
            messages(SchemaMode::Create, book),
            vec![
                "instance.amazon_url is not of a type(s) string",
                "instance.pages is not of a type(s) integer",
            ]
        );
    }

    #[test]
    fn update_requires_identity_fields_before_types() {
        let partial = json!({
            "pages": 500,
            "publisher": 90,
            "title": "Steve Jobs",
            "year": 2000
        });
        assert_eq!(
            messages(SchemaMode::Update, partial),
            vec![
                "instance requires property \"isbn\"",
                "instance requires property \"amazon_url\"",
                "instance requires property \"author\"",
                "instance requires property \"language\"",
                "instance.publisher is not of a type(s) string",
            ]
        );
    }

    #[test]
    fn update_allows_omitting_other_fields() {
        let partial = json!({
            "isbn": "9781451648539",
            "amazon_url": "https://www.amazon.com/dp/1451648537",
            "author": "Walter Isaacson",
            "language": "english",
            "pages": 500
        });
        assert!(messages(SchemaMode::Update, partial).is_empty());
    }

    #[test]
    fn create_requires_every_field() {
        let result = messages(SchemaMode::Create, json!({ "title": 7 }));
        assert_eq!(
            result,
            vec![
                "instance requires property \"isbn\"",
                "instance requires property \"amazon_url\"",
                "instance requires property \"author\"",
                "instance requires property \"language\"",
                "instance requires property \"pages\"",
                "instance requires property \"publisher\"",
                "instance requires property \"year\"",
                "instance.title is not of a type(s) string",
            ]
        );
    }

    #[test]
    fn rejects_null_values() {
        let mut book = valid_book();
        book["year"] = serde_json::Value::Null;
        assert_eq!(
            messages(SchemaMode::Create, book),
            vec!["instance.year is not of a type(s) integer"]
        );
    }

    #[test]
    fn rejects_non_object_instance() {
        assert_eq!(
            messages(SchemaMode::Create, json!([1, 2])),
            vec!["instance is not of a type(s) object"]
        );
    }

    #[test]
    fn rejects_integers_outside_column_range() {
        let mut book = valid_book();
        book["pages"] = json!(4_294_967_296_i64);
        assert_eq!(
            messages(SchemaMode::Create, book),
            vec!["instance.pages is not of a type(s) integer"]
        );
    }

    #[test]
    fn rejects_integral_floats() {
        let mut book = valid_book();
        book["pages"] = json!(304.0);
        book["year"] = json!(2014.5);
        assert_eq!(
            messages(SchemaMode::Create, book),
            vec![
                "instance.pages is not of a type(s) integer",
                "instance.year is not of a type(s) integer",
            ]
        );
    }

    #[test]
    fn check_attaches_violations() {
        let schema = BookSchema::new().unwrap();
        let report = schema
            .check(SchemaMode::Update, &json!({}))
            .expect_err("empty update must be rejected");
        assert_eq!(report.current_context(), &KernelError::Validation);
        let violations = report.downcast_ref::<Violations>().unwrap();
        assert_eq!(violations.as_ref().len(), 4);
        assert!(schema.check(SchemaMode::Create, &valid_book()).is_ok());
    }
}
