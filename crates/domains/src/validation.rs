//! Field limits enforced before any remote call.
//!
//! Lengths count characters, not bytes.

use crate::errors::ValidationError;
use crate::models::{CommunityDraft, PostDraft};

pub const POST_DESCRIPTION_MAX: usize = 250;
pub const POST_IMAGE_LINK_MAX: usize = 250;
pub const COMMUNITY_NAME_MAX: usize = 50;
pub const COMMUNITY_DESCRIPTION_MAX: usize = 250;
pub const SEARCH_TERM_MIN: usize = 2;

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn at_most(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

pub fn validate_post(draft: &PostDraft) -> Result<(), ValidationError> {
    required("description", &draft.description)?;
    at_most("description", &draft.description, POST_DESCRIPTION_MAX)?;
    required("image link", &draft.image_link)?;
    at_most("image link", &draft.image_link, POST_IMAGE_LINK_MAX)
}

pub fn validate_community(draft: &CommunityDraft) -> Result<(), ValidationError> {
    required("name", &draft.name)?;
    at_most("name", &draft.name, COMMUNITY_NAME_MAX)?;
    at_most("description", &draft.description, COMMUNITY_DESCRIPTION_MAX)
}

/// Returns the trimmed term when it is long enough to search with.
pub fn validate_search_term(term: &str) -> Result<&str, ValidationError> {
    let term = term.trim();
    if term.chars().count() < SEARCH_TERM_MIN {
        return Err(ValidationError::SearchTermTooShort {
            min: SEARCH_TERM_MIN,
        });
    }
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_requires_both_fields() {
        assert_eq!(
            validate_post(&PostDraft::new("  ", "http://x/y.png")),
            Err(ValidationError::Required {
                field: "description"
            })
        );
        assert_eq!(
            validate_post(&PostDraft::new("hello", "")),
            Err(ValidationError::Required {
                field: "image link"
            })
        );
        assert!(validate_post(&PostDraft::new("hello", "http://x/y.png")).is_ok());
    }

    #[test]
    fn post_description_limit_counts_chars() {
        let at_limit = "é".repeat(POST_DESCRIPTION_MAX);
        assert!(validate_post(&PostDraft::new(at_limit, "http://x")).is_ok());

        let over = "a".repeat(POST_DESCRIPTION_MAX + 1);
        assert_eq!(
            validate_post(&PostDraft::new(over, "http://x")),
            Err(ValidationError::TooLong {
                field: "description",
                max: 250,
                actual: 251
            })
        );
    }

    #[test]
    fn community_description_is_optional_but_bounded() {
        assert!(validate_community(&CommunityDraft::new("Gardeners", "")).is_ok());
        assert!(matches!(
            validate_community(&CommunityDraft::new("Gardeners", "x".repeat(251))),
            Err(ValidationError::TooLong { field: "description", .. })
        ));
        assert!(matches!(
            validate_community(&CommunityDraft::new("n".repeat(51), "")),
            Err(ValidationError::TooLong { field: "name", max: 50, .. })
        ));
        assert_eq!(
            validate_community(&CommunityDraft::default()),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn search_term_needs_two_chars() {
        assert!(validate_search_term("a").is_err());
        assert!(validate_search_term(" a ").is_err());
        assert_eq!(validate_search_term(" ab "), Ok("ab"));
    }
}
