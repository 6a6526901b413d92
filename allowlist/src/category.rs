use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A named allowlist.
///
/// Categories are addressed either by number (as mint contracts refer to them) or by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Shadow = 1,
    Og = 2,
    White = 3,
    Degen = 4,
}

impl Category {
    /// Every category, in numeric order.
    pub const ALL: [Category; 4] = [
        Category::Shadow,
        Category::Og,
        Category::White,
        Category::Degen,
    ];

    /// Return the number used to address the category.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Return the lowercase name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::Shadow => "shadow",
            Category::Og => "og",
            Category::White => "white",
            Category::Degen => "degen",
        }
    }

    /// Return the environment variable holding the comma-separated members of the category.
    pub fn env_var(self) -> &'static str {
        match self {
            Category::Shadow => "SHADOW_LIST",
            Category::Og => "OG_LIST",
            Category::White => "WHITE_LIST",
            Category::Degen => "DEGEN_LIST",
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Category::ALL
            .into_iter()
            .find(|category| category.number() == number)
            .ok_or_else(|| Error::InvalidCategory(number.to_string()))
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<u8>() {
            return Category::try_from(number);
        }
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1", Category::Shadow; "shadow number")]
    #[test_case("2", Category::Og; "og number")]
    #[test_case("3", Category::White; "white number")]
    #[test_case("4", Category::Degen; "degen number")]
    #[test_case("degen", Category::Degen; "degen name")]
    #[test_case("OG", Category::Og; "og uppercase")]
    #[test_case(" white ", Category::White; "white padded")]
    fn test_parse(input: &str, expected: Category) {
        assert_eq!(input.parse::<Category>().unwrap(), expected);
    }

    #[test_case("0"; "zero")]
    #[test_case("5"; "five")]
    #[test_case("gold"; "unknown name")]
    #[test_case(""; "empty")]
    fn test_parse_invalid(input: &str) {
        assert!(matches!(
            input.parse::<Category>(),
            Err(Error::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_names() {
        for category in Category::ALL {
            assert_eq!(Category::try_from(category.number()).unwrap(), category);
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
            assert!(category.env_var().starts_with(&category.name().to_uppercase()));
        }
    }
}
