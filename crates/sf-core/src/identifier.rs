//! Strongly-typed SQL identifier newtypes.
//!
//! Every part of a relation address (database, schema, table) and every
//! primary-key column is held in its own newtype so they cannot be mixed up
//! when building statements. All of them share the same invariant: the name
//! is non-empty and contains no NUL character. Rendering into SQL only ever
//! goes through [`quote_ident`](crate::sql_utils::quote_ident).

use crate::sql_utils::quote_ident;

/// Why an identifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierError {
    /// The name was the empty string
    Empty,
    /// The name contained a NUL character
    NulCharacter,
}

impl std::fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierError::Empty => write!(f, "must not be empty"),
            IdentifierError::NulCharacter => write!(f, "must not contain a NUL character"),
        }
    }
}

impl std::error::Error for IdentifierError {}

fn check_identifier(s: &str) -> Result<(), IdentifierError> {
    if s.is_empty() {
        Err(IdentifierError::Empty)
    } else if s.contains('\0') {
        Err(IdentifierError::NulCharacter)
    } else {
        Ok(())
    }
}

/// Define a strongly-typed SQL identifier newtype.
///
/// Generates the struct, a validating `Deserialize`, `try_new()`, `as_str()`,
/// `quoted()`, `Display`, `AsRef<str>`, `Deref<Target=str>`, `TryFrom<&str>`
/// and `PartialEq<&str>`.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).map_err(|e| {
                    serde::de::Error::custom(format!(concat!(stringify!($Name), " {}"), e))
                })
            }
        }

        impl $Name {
            /// Create a new identifier, rejecting empty names and NUL characters.
            pub fn try_new(name: impl Into<String>) -> Result<Self, IdentifierError> {
                let s = name.into();
                check_identifier(&s)?;
                Ok(Self(s))
            }

            /// Return the raw (unquoted) identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Render the identifier as a quoted SQL identifier.
            pub fn quoted(&self) -> String {
                quote_ident(&self.0)
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl TryFrom<&str> for $Name {
            type Error = IdentifierError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::try_new(s)
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

define_identifier! {
    /// Database (catalog) that holds a relation.
    pub struct DatabaseName;
}

define_identifier! {
    /// Schema inside a database.
    pub struct SchemaName;
}

define_identifier! {
    /// Unqualified table name.
    pub struct TableName;
}

define_identifier! {
    /// Column name, used for primary-key columns.
    pub struct ColumnName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(TableName::try_new(""), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_rejects_nul() {
        assert_eq!(
            ColumnName::try_new("id\0"),
            Err(IdentifierError::NulCharacter)
        );
    }

    #[test]
    fn test_quoted_escapes_embedded_quotes() {
        let name = TableName::try_new(r#"odd"name"#).unwrap();
        assert_eq!(name.quoted(), r#""odd""name""#);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let err = serde_yaml::from_str::<SchemaName>("''").unwrap_err();
        assert!(err.to_string().contains("SchemaName must not be empty"));
    }

    #[test]
    fn test_deserialize_valid() {
        let name: DatabaseName = serde_yaml::from_str("dev").unwrap();
        assert_eq!(name, "dev");
    }
}
