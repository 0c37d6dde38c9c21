/// Defines an open identifier enum: known variants with a canonical id and a
/// display label, plus `Custom(String)` for anything the build reports that we
/// do not recognize.
///
/// Ids and aliases are accepted when parsing and deserializing; serialization
/// always writes the canonical id.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $id:literal : $label:literal
                $( | $alias:literal )*
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.id())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::parse(&s))
            }
        }

        impl $enum_name {
            /// Canonical identifier as written in descriptors
            pub fn id(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $id,
                    )*
                    Self::Custom(name) => name,
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $label,
                    )*
                    Self::Custom(name) => name,
                }
            }

            /// Parses an id or alias; unknown input becomes `Custom`
            pub fn parse(value: &str) -> Self {
                match value {
                    $(
                        $id $(| $alias)* => Self::$variant,
                    )*
                    _ => Self::Custom(value.to_string()),
                }
            }

            pub fn is_custom(&self) -> bool {
                matches!(self, Self::Custom(_))
            }

            pub fn known() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.id())
            }
        }
    };
}
