//! Opaque, stable, textual identifiers shared across the core.
//!
//! IDs are globally unique and carry no structural meaning beyond equality;
//! they must survive a serialize/deserialize round trip verbatim (spec
//! invariant: "Serialize-then-deserialize yields a model equivalent to the
//! original: same IDs"). We generate them from a UUID v4 so two concurrently
//! created tabs/panes/shortcuts never collide, and render them without
//! hyphens so every ID is comfortably over the required 8 significant
//! characters.

use uuid::Uuid;

/// Generate a fresh opaque ID, tagged with `prefix` for human-readability in
/// logs (e.g. `tab_3f9a1c2b...`). The prefix is cosmetic; callers must not
/// depend on its presence when comparing IDs.
pub fn generate(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{raw}")
}

/// Define a newtype wrapping an opaque textual ID, with the boilerplate
/// every ID kind in the core needs: generation, raw construction (for
/// deserializing IDs that must be restored verbatim), and `Display`.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Allocate a fresh, globally unique ID.
            pub fn new() -> Self {
                Self($crate::id::generate($prefix))
            }

            /// Wrap an existing ID string verbatim, e.g. when restoring
            /// serialized state. No uniqueness or format check is performed;
            /// the caller is trusted to be reconstructing a prior ID.
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    define_id!(TestId, "test");

    #[test]
    fn generated_ids_are_unique_and_long_enough() {
        let a = TestId::new();
        let b = TestId::new();
        assert_ne!(a, b);
        assert!(a.as_str().len() >= 8);
    }

    #[test]
    fn from_raw_round_trips_through_serde() {
        let id = TestId::from_raw("tab_abcdef0123456789");
        let json = serde_json::to_string(&id).unwrap();
        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
        assert_eq!(back.as_str(), "tab_abcdef0123456789");
    }
}
