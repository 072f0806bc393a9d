//! Validated text content shared by donations and dishes.

use std::fmt;

use super::validation::{FieldViolation, TextBoundError, bounded_text};

/// Maximum length of a donation or dish title.
pub const TITLE_MAX: usize = 200;
/// Maximum length of a quantity description.
pub const QUANTITY_MAX: usize = 100;
/// Maximum length of a description.
pub const DESCRIPTION_MAX: usize = 5_000;

/// Validation errors for listing content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
    DescriptionTooLong { max: usize },
    EmptyQuantity,
    QuantityTooLong { max: usize },
}

impl fmt::Display for ContentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::EmptyQuantity => write!(f, "quantity must not be empty"),
            Self::QuantityTooLong { max } => write!(f, "quantity must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ContentValidationError {}

impl FieldViolation for ContentValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription | Self::DescriptionTooLong { .. } => "description",
            Self::EmptyQuantity | Self::QuantityTooLong { .. } => "quantity",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyDescription | Self::EmptyQuantity => "empty",
            Self::TitleTooLong { .. }
            | Self::DescriptionTooLong { .. }
            | Self::QuantityTooLong { .. } => "too_long",
        }
    }
}

macro_rules! content_text {
    ($(#[$meta:meta])* $name:ident, $max:expr, $empty:expr, $too_long:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the value.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, ContentValidationError> {
                bounded_text(raw.as_ref(), $max).map(Self).map_err(|err| match err {
                    TextBoundError::Empty => $empty,
                    TextBoundError::TooLong => $too_long,
                })
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

content_text!(
    /// Short headline such as "Bread".
    Title,
    TITLE_MAX,
    ContentValidationError::EmptyTitle,
    ContentValidationError::TitleTooLong { max: TITLE_MAX }
);

content_text!(
    /// Free-text description.
    Description,
    DESCRIPTION_MAX,
    ContentValidationError::EmptyDescription,
    ContentValidationError::DescriptionTooLong {
        max: DESCRIPTION_MAX
    }
);

content_text!(
    /// Unit-less quantity text, e.g. "10 loaves".
    Quantity,
    QUANTITY_MAX,
    ContentValidationError::EmptyQuantity,
    ContentValidationError::QuantityTooLong { max: QUANTITY_MAX }
);
