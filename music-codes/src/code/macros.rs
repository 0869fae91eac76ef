//! Trait boilerplate shared by the code types.

/// Implements strict parsing and string serde for a [`MusicCode`] type.
///
/// This generates:
/// - `FromStr` and `TryFrom<&str>` rejecting unrecognized or invalid input
/// - `Serialize` as the display form
/// - `Deserialize` through the strict parser
///
/// [`MusicCode`]: crate::code::MusicCode
macro_rules! impl_code_traits {
    ($name:ident) => {
        impl std::str::FromStr for $name {
            type Err = $crate::error::CodeError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $crate::code::parse_strict(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::error::CodeError;

            fn try_from(value: &str) -> ::std::result::Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_code_traits;
