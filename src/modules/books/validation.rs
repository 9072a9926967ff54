//! Write-payload validation for books.
//!
//! `validate_create` and `validate_update` are the only constructors of
//! [`NewBook`] and [`BookChanges`], and the repository's write operations
//! accept nothing else, so an unvalidated payload cannot reach storage.

use std::num::IntErrorKind;

use serde_json::{json, Map, Value};

use super::models::Book;

/// Alternate key accepted for `publisher` when `publisher` itself is absent.
const PUBLISHER_ALIAS: &str = "published";

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    Required,
    InvalidType,
    OutOfRange,
    Immutable,
}

impl FieldErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldErrorCode::Required => "required",
            FieldErrorCode::InvalidType => "invalid_type",
            FieldErrorCode::OutOfRange => "out_of_range",
            FieldErrorCode::Immutable => "immutable",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name, or `$` for the payload as a whole
    pub field: &'static str,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// JSON form used in error response details.
    pub fn to_detail(&self) -> Value {
        json!({
            "field": self.field,
            "code": self.code.as_str(),
            "message": self.message,
        })
    }
}

/// A fully validated book, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook(Book);

impl NewBook {
    pub fn isbn(&self) -> &str {
        &self.0.isbn
    }

    pub fn as_book(&self) -> &Book {
        &self.0
    }

    pub fn into_book(self) -> Book {
        self.0
    }
}

/// Validated replacement values for every field except `isbn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    amazon_url: String,
    author: String,
    language: String,
    pages: i32,
    publisher: String,
    title: String,
    year: i32,
}

impl BookChanges {
    /// The book `isbn` becomes once these changes are applied.
    pub fn into_book(self, isbn: impl Into<String>) -> Book {
        Book {
            isbn: isbn.into(),
            amazon_url: self.amazon_url,
            author: self.author,
            language: self.language,
            pages: self.pages,
            publisher: self.publisher,
            title: self.title,
            year: self.year,
        }
    }
}

/// Validate a create payload; all eight fields are required.
///
/// On failure every offending field is reported, in field order.
pub fn validate_create(payload: &Value) -> Result<NewBook, Vec<FieldError>> {
    let mut fields = Fields::new(payload)?;

    let isbn = fields.string("isbn");
    let changes = fields.changes();

    match (isbn, changes, fields.errors.is_empty()) {
        (Some(isbn), Some(changes), true) => Ok(NewBook(changes.into_book(isbn))),
        _ => Err(fields.errors),
    }
}

/// Validate an update payload for the book at `isbn`.
///
/// Every field except `isbn` is required. An `isbn` in the body is accepted
/// only if it equals the path ISBN.
pub fn validate_update(isbn: &str, payload: &Value) -> Result<BookChanges, Vec<FieldError>> {
    let mut fields = Fields::new(payload)?;

    if let Some(body_isbn) = fields.lookup("isbn") {
        if body_isbn.as_str().map(str::trim) != Some(isbn) {
            fields.reject("isbn", FieldErrorCode::Immutable, "isbn cannot be changed");
        }
    }
    let changes = fields.changes();

    match (changes, fields.errors.is_empty()) {
        (Some(changes), true) => Ok(changes),
        _ => Err(fields.errors),
    }
}

/// Field extraction over a JSON object, accumulating errors as it goes.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Result<Self, Vec<FieldError>> {
        match payload.as_object() {
            Some(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            None => Err(vec![FieldError::new(
                "$",
                FieldErrorCode::InvalidType,
                "book payload must be a JSON object",
            )]),
        }
    }

    /// Every field but `isbn`, in field order.
    fn changes(&mut self) -> Option<BookChanges> {
        let amazon_url = self.string("amazon_url");
        let author = self.string("author");
        let language = self.string("language");
        let pages = self.integer("pages", true);
        let publisher = self.string("publisher");
        let title = self.string("title");
        let year = self.integer("year", false);

        Some(BookChanges {
            amazon_url: amazon_url?,
            author: author?,
            language: language?,
            pages: pages?,
            publisher: publisher?,
            title: title?,
            year: year?,
        })
    }

    /// Non-null value for `field`, honouring the publisher alias.
    fn lookup(&self, field: &str) -> Option<&'a Value> {
        let present = |key: &str| self.object.get(key).filter(|value| !value.is_null());
        match field {
            "publisher" => present(field).or_else(|| present(PUBLISHER_ALIAS)),
            _ => present(field),
        }
    }

    fn reject(&mut self, field: &'static str, code: FieldErrorCode, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, code, message));
    }

    fn string(&mut self, field: &'static str) -> Option<String> {
        match self.lookup(field) {
            None => {
                self.reject(field, FieldErrorCode::Required, format!("{field} is required"));
                None
            }
            Some(Value::String(raw)) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    self.reject(field, FieldErrorCode::Required, format!("{field} is required"));
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Some(_) => {
                self.reject(
                    field,
                    FieldErrorCode::InvalidType,
                    format!("{field} must be a string"),
                );
                None
            }
        }
    }

    /// Integer field; numeric strings and integral floats are coerced.
    fn integer(&mut self, field: &'static str, positive: bool) -> Option<i32> {
        let Some(value) = self.lookup(field) else {
            self.reject(field, FieldErrorCode::Required, format!("{field} is required"));
            return None;
        };

        let parsed = match coerce_integer(value) {
            Ok(parsed) => parsed,
            Err(code) => {
                let message = match code {
                    FieldErrorCode::Required => format!("{field} is required"),
                    FieldErrorCode::OutOfRange => format!("{field} is out of range"),
                    _ => format!("{field} must be an integer"),
                };
                self.reject(field, code, message);
                return None;
            }
        };

        match i32::try_from(parsed) {
            Ok(number) if positive && number <= 0 => {
                self.reject(
                    field,
                    FieldErrorCode::OutOfRange,
                    format!("{field} must be a positive integer"),
                );
                None
            }
            Ok(number) => Some(number),
            Err(_) => {
                self.reject(
                    field,
                    FieldErrorCode::OutOfRange,
                    format!("{field} is out of range"),
                );
                None
            }
        }
    }
}

fn coerce_integer(value: &Value) -> Result<i64, FieldErrorCode> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(int)
            } else if number.is_u64() {
                Err(FieldErrorCode::OutOfRange)
            } else {
                match number.as_f64() {
                    Some(float) if float.is_finite() && float.fract() == 0.0 => {
                        if float.abs() < i64::MAX as f64 {
                            Ok(float as i64)
                        } else {
                            Err(FieldErrorCode::OutOfRange)
                        }
                    }
                    _ => Err(FieldErrorCode::InvalidType),
                }
            }
        }
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(FieldErrorCode::Required);
            }
            trimmed.parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FieldErrorCode::OutOfRange,
                _ => FieldErrorCode::InvalidType,
            })
        }
        _ => Err(FieldErrorCode::InvalidType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> Value {
        json!({
            "isbn": "123456789",
            "amazon_url": "https://amazon.com/buttz",
            "author": "Dr. Buttz",
            "language": "ButtSpeak",
            "pages": 420,
            "publisher": "Butts&Co",
            "title": "Lord of the Butts: Fellowship of the Butts",
            "year": 2020
        })
    }

    fn without(mut payload: Value, keys: &[&str]) -> Value {
        let object = payload.as_object_mut().unwrap();
        for key in keys {
            object.remove(*key);
        }
        payload
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn accepts_complete_create_payload() {
        let book = validate_create(&full_payload()).unwrap().into_book();

        assert_eq!(book.isbn, "123456789");
        assert_eq!(book.pages, 420);
        assert_eq!(book.publisher, "Butts&Co");
        assert_eq!(book.year, 2020);
    }

    #[test]
    fn create_requires_isbn() {
        let errors = validate_create(&without(full_payload(), &["isbn"])).unwrap_err();

        assert_eq!(
            errors,
            vec![FieldError::new(
                "isbn",
                FieldErrorCode::Required,
                "isbn is required"
            )]
        );
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let errors = validate_create(&json!({ "pages": 12 })).unwrap_err();

        assert_eq!(
            fields(&errors),
            vec![
                "isbn",
                "amazon_url",
                "author",
                "language",
                "publisher",
                "title",
                "year"
            ]
        );
        assert!(errors.iter().all(|e| e.code == FieldErrorCode::Required));
    }

    #[test]
    fn published_is_accepted_for_publisher() {
        let mut payload = without(full_payload(), &["publisher"]);
        payload["published"] = json!("Butts&Co");

        let book = validate_create(&payload).unwrap().into_book();
        assert_eq!(book.publisher, "Butts&Co");
    }

    #[test]
    fn publisher_wins_over_alias() {
        let mut payload = full_payload();
        payload["published"] = json!("Someone Else");

        let book = validate_create(&payload).unwrap().into_book();
        assert_eq!(book.publisher, "Butts&Co");
    }

    #[test]
    fn numeric_strings_are_coerced_and_text_trimmed() {
        let mut payload = full_payload();
        payload["pages"] = json!(" 312 ");
        payload["year"] = json!(1999.0);
        payload["title"] = json!("  Padded Title  ");

        let book = validate_create(&payload).unwrap().into_book();
        assert_eq!(book.pages, 312);
        assert_eq!(book.year, 1999);
        assert_eq!(book.title, "Padded Title");
    }

    #[test]
    fn rejects_malformed_values() {
        let mut payload = full_payload();
        payload["pages"] = json!("many");
        payload["year"] = json!(2020.5);
        payload["author"] = json!(42);
        payload["language"] = json!("   ");

        let errors = validate_create(&payload).unwrap_err();
        let summary: Vec<(&str, FieldErrorCode)> =
            errors.iter().map(|e| (e.field, e.code)).collect();

        assert_eq!(
            summary,
            vec![
                ("author", FieldErrorCode::InvalidType),
                ("language", FieldErrorCode::Required),
                ("pages", FieldErrorCode::InvalidType),
                ("year", FieldErrorCode::InvalidType),
            ]
        );
    }

    #[test]
    fn pages_must_be_positive_and_fit() {
        let mut payload = full_payload();
        payload["pages"] = json!(0);
        payload["year"] = json!(9_999_999_999_i64);

        let errors = validate_create(&payload).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "pages");
        assert_eq!(errors[0].code, FieldErrorCode::OutOfRange);
        assert_eq!(errors[0].message, "pages must be a positive integer");
        assert_eq!(errors[1].field, "year");
        assert_eq!(errors[1].code, FieldErrorCode::OutOfRange);
    }

    #[test]
    fn null_counts_as_missing() {
        let mut payload = full_payload();
        payload["title"] = Value::Null;

        let errors = validate_create(&payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["title"]);
        assert_eq!(errors[0].code, FieldErrorCode::Required);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let errors = validate_create(&json!(["isbn"])).unwrap_err();

        assert_eq!(fields(&errors), vec!["$"]);
        assert_eq!(errors[0].code, FieldErrorCode::InvalidType);
    }

    #[test]
    fn update_does_not_require_isbn() {
        let payload = without(full_payload(), &["isbn"]);

        let book = validate_update("123456789", &payload)
            .unwrap()
            .into_book("123456789");
        assert_eq!(book.isbn, "123456789");
        assert_eq!(book.title, "Lord of the Butts: Fellowship of the Butts");
    }

    #[test]
    fn update_rejects_missing_language_and_title() {
        let payload = without(full_payload(), &["isbn", "language", "title"]);

        let errors = validate_update("123456789", &payload).unwrap_err();
        assert_eq!(fields(&errors), vec!["language", "title"]);
    }

    #[test]
    fn update_accepts_matching_isbn_but_not_a_new_one() {
        assert!(validate_update("123456789", &full_payload()).is_ok());

        let errors = validate_update("987654321", &full_payload()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "isbn");
        assert_eq!(errors[0].code, FieldErrorCode::Immutable);
    }

    #[test]
    fn detail_shape() {
        let detail = FieldError::new("isbn", FieldErrorCode::Required, "isbn is required").to_detail();
        assert_eq!(
            detail,
            json!({ "field": "isbn", "code": "required", "message": "isbn is required" })
        );
    }
}
