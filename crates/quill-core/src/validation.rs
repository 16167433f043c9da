//! Field validation.
//!
//! The `is_valid_*` functions are pure predicates. The `validate_*`
//! aggregators collect every violated rule of an entity into a
//! [`ValidationResult`] so callers can report them all at once.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::{Comment, Message, PostDraft, Profile, User};
use crate::error::DomainError;

pub const TITLE_MIN_LENGTH: usize = 3;
pub const TITLE_MAX_LENGTH: usize = 200;
pub const CONTENT_MIN_LENGTH: usize = 10;
pub const CONTENT_MAX_LENGTH: usize = 10_000;
pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;
pub const SUBJECT_MIN_LENGTH: usize = 3;
pub const SUBJECT_MAX_LENGTH: usize = 200;
pub const EMAIL_MAX_LENGTH: usize = 100;
pub const BIO_MAX_LENGTH: usize = 500;
pub const DESCRIPTION_MAX_LENGTH: usize = 2_000;
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const ERROR_TITLE_INVALID: &str = "Title must be between 3 and 200 characters";
pub const ERROR_CONTENT_EMPTY: &str = "Content cannot be empty";
pub const ERROR_CONTENT_TOO_SHORT: &str = "Content must be at least 10 characters";
pub const ERROR_CONTENT_TOO_LONG: &str = "Content must not exceed 10000 characters";
pub const ERROR_NAME_INVALID: &str =
    "Name must be 2 to 100 characters of letters, spaces, hyphens or apostrophes";
pub const ERROR_EMAIL_INVALID: &str = "Email address is invalid";
pub const ERROR_SUBJECT_INVALID: &str = "Subject must be between 3 and 200 characters";
pub const ERROR_AUTHOR_REQUIRED: &str = "Post author is required";
pub const ERROR_BIO_TOO_LONG: &str = "Bio must not exceed 500 characters";
pub const ERROR_DESCRIPTION_TOO_LONG: &str = "Description must not exceed 2000 characters";
pub const ERROR_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^\p{L}[\p{L} '\-]*$").unwrap();
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = trimmed_len(value);
    len >= min && len <= max
}

pub fn is_valid_title(title: &str) -> bool {
    length_between(title, TITLE_MIN_LENGTH, TITLE_MAX_LENGTH)
}

pub fn is_valid_content(content: &str) -> bool {
    length_between(content, CONTENT_MIN_LENGTH, CONTENT_MAX_LENGTH)
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.chars().count() <= EMAIL_MAX_LENGTH && EMAIL_RE.is_match(email)
}

pub fn is_valid_name(name: &str) -> bool {
    length_between(name, NAME_MIN_LENGTH, NAME_MAX_LENGTH) && NAME_RE.is_match(name.trim())
}

pub fn is_valid_subject(subject: &str) -> bool {
    length_between(subject, SUBJECT_MIN_LENGTH, SUBJECT_MAX_LENGTH)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LENGTH
}

/// Outcome of validating one entity: zero or more human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.push(message);
        }
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    pub fn all_errors(&self) -> String {
        self.errors.join("; ")
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}

/// Content check that tells apart empty, too short and too long bodies.
pub fn validate_content(content: Option<&str>) -> ValidationResult {
    match content.map(str::trim) {
        None | Some("") => ValidationResult::error(ERROR_CONTENT_EMPTY),
        Some(body) if trimmed_len(body) < CONTENT_MIN_LENGTH => {
            ValidationResult::error(ERROR_CONTENT_TOO_SHORT)
        }
        Some(body) if trimmed_len(body) > CONTENT_MAX_LENGTH => {
            ValidationResult::error(ERROR_CONTENT_TOO_LONG)
        }
        Some(_) => ValidationResult::success(),
    }
}

pub fn validate_post(draft: &PostDraft) -> ValidationResult {
    let mut result = ValidationResult::success();
    result.check(is_valid_title(&draft.title), ERROR_TITLE_INVALID);
    result.merge(validate_content(Some(&draft.content)));
    result.check(draft.author_id.is_some(), ERROR_AUTHOR_REQUIRED);
    result
}

pub fn validate_comment(comment: &Comment) -> ValidationResult {
    validate_content(Some(&comment.content))
}

pub fn validate_message(message: &Message) -> ValidationResult {
    let mut result = ValidationResult::success();
    result.check(is_valid_name(&message.name), ERROR_NAME_INVALID);
    result.check(is_valid_email(&message.email), ERROR_EMAIL_INVALID);
    result.check(is_valid_subject(&message.subject), ERROR_SUBJECT_INVALID);
    result.merge(validate_content(Some(&message.content)));
    result
}

pub fn validate_profile(profile: &Profile) -> ValidationResult {
    let mut result = ValidationResult::success();
    if let Some(bio) = &profile.bio {
        result.check(bio.chars().count() <= BIO_MAX_LENGTH, ERROR_BIO_TOO_LONG);
    }
    if let Some(description) = &profile.description {
        result.check(
            description.chars().count() <= DESCRIPTION_MAX_LENGTH,
            ERROR_DESCRIPTION_TOO_LONG,
        );
    }
    result
}

pub fn validate_user(user: &User) -> ValidationResult {
    let mut result = ValidationResult::success();
    result.check(is_valid_name(&user.name), ERROR_NAME_INVALID);
    result.check(is_valid_email(&user.email), ERROR_EMAIL_INVALID);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_rejects_blank() {
        assert!(!validate_content(Some("")).is_valid());
        assert!(!validate_content(None).is_valid());
        assert!(!validate_content(Some(" ")).is_valid());
        assert!(validate_content(Some("a valid body of sufficient length")).is_valid());
    }

    #[test]
    fn test_validate_content_length_messages() {
        assert_eq!(
            validate_content(Some("short")).first_error(),
            Some(ERROR_CONTENT_TOO_SHORT)
        );
        let long = "x".repeat(CONTENT_MAX_LENGTH + 1);
        assert_eq!(
            validate_content(Some(&long)).first_error(),
            Some(ERROR_CONTENT_TOO_LONG)
        );
    }

    #[test]
    fn test_title_bounds() {
        assert!(is_valid_title("Hello"));
        assert!(!is_valid_title("  "));
        assert!(!is_valid_title("ab"));
        assert!(!is_valid_title(&"t".repeat(TITLE_MAX_LENGTH + 1)));
    }

    #[test]
    fn test_email_and_name() {
        assert!(is_valid_email("reader@example.org"));
        assert!(!is_valid_email("reader@"));
        assert!(!is_valid_email("no spaces@example.org"));
        assert!(is_valid_name("Jean-Luc O'Neil"));
        assert!(is_valid_name("Zoé"));
        assert!(!is_valid_name("R2D2"));
        assert!(!is_valid_name("J"));
        assert!(!is_valid_name("J. R. Tolkien"));
    }

    #[test]
    fn test_validate_post_lists_every_rule() {
        let draft = PostDraft {
            id: None,
            title: String::new(),
            content: " ".into(),
            author_id: None,
        };
        let result = validate_post(&draft);
        assert_eq!(
            result.errors(),
            &[
                ERROR_TITLE_INVALID.to_string(),
                ERROR_CONTENT_EMPTY.to_string(),
                ERROR_AUTHOR_REQUIRED.to_string(),
            ]
        );
        assert_eq!(
            result.all_errors(),
            format!("{ERROR_TITLE_INVALID}; {ERROR_CONTENT_EMPTY}; {ERROR_AUTHOR_REQUIRED}")
        );
        assert!(matches!(
            result.into_result(),
            Err(DomainError::Validation(errors)) if errors.len() == 3
        ));
    }

    #[test]
    fn test_validate_message() {
        let ok = Message::new(
            "Jane Doe".into(),
            "jane@example.com".into(),
            "Question".into(),
            "I would like to know more.".into(),
        );
        assert!(validate_message(&ok).is_valid());

        let bad = Message::new("".into(), "nope".into(), "Q".into(), "".into());
        assert_eq!(validate_message(&bad).errors().len(), 4);
    }

    #[test]
    fn test_validate_profile_limits() {
        let mut profile = Profile::empty(1);
        profile.bio = Some("b".repeat(BIO_MAX_LENGTH));
        assert!(validate_profile(&profile).is_valid());
        profile.description = Some("d".repeat(DESCRIPTION_MAX_LENGTH + 1));
        assert_eq!(
            validate_profile(&profile).first_error(),
            Some(ERROR_DESCRIPTION_TOO_LONG)
        );
    }
}
