use thiserror::Error;

/// Minimum number of characters a task needs after trimming.
pub const MIN_TASK_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task cannot be empty")]
    Empty,
    #[error("Task must be at least 5 characters long")]
    TooShort,
    #[error("Task cannot start with a number")]
    StartsWithDigit,
}

/// Check a candidate task against the business rules and return the trimmed text.
///
/// Rules run in order and the first failure wins: empty, shorter than
/// [`MIN_TASK_CHARS`], then a leading ASCII digit.
pub fn validate(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() < MIN_TASK_CHARS {
        return Err(ValidationError::TooShort);
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::StartsWithDigit);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", ValidationError::Empty)]
    #[case("   \t ", ValidationError::Empty)]
    #[case("abc", ValidationError::TooShort)]
    #[case("  abcd  ", ValidationError::TooShort)]
    #[case("9abcd", ValidationError::StartsWithDigit)]
    #[case("  0 things", ValidationError::StartsWithDigit)]
    #[case("123", ValidationError::TooShort)]
    fn rejects_invalid_tasks(#[case] input: &str, #[case] expected: ValidationError) {
        assert_eq!(validate(input), Err(expected));
    }

    #[rstest]
    #[case("hello world", "hello world")]
    #[case("  water plants  ", "water plants")]
    #[case("task 1", "task 1")]
    #[case("-5 push-ups", "-5 push-ups")]
    fn accepts_valid_tasks(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input), Ok(expected));
    }

    #[test]
    fn messages_match_inline_copy() {
        assert_eq!(ValidationError::Empty.to_string(), "Task cannot be empty");
        assert_eq!(
            ValidationError::TooShort.to_string(),
            "Task must be at least 5 characters long"
        );
        assert_eq!(
            ValidationError::StartsWithDigit.to_string(),
            "Task cannot start with a number"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(validate("ééé"), Err(ValidationError::TooShort));
        assert_eq!(validate("ééééé"), Ok("ééééé"));
    }

    #[test]
    fn non_ascii_digits_do_not_count_as_numbers() {
        assert_eq!(validate("٣ apples"), Ok("٣ apples"));
    }

    #[test]
    fn accepted_text_stays_valid_after_trimming() {
        for input in ["hello world", "  padded task ", "\tfeed the cat\n"] {
            let accepted = validate(input).expect("valid input");
            assert_eq!(validate(accepted), Ok(accepted));
            assert_eq!(validate(input.trim()), Ok(accepted));
        }
    }
}
