//! `define_port_error!`: adapter error enums with `thiserror` messages.
//!
//! Each variant gets a snake_case constructor. Field arguments take
//! `impl Into<FieldType>`, so adapters can write
//! `RecipeRepositoryError::not_found(id.to_string())` or pass a `&str`
//! straight through.

macro_rules! define_port_error {
    (
        $(#[$enum_meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: $ty),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@constructor $variant $( { $($field: $ty),* } )?); )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        /// Shaped like the image and recipe store errors.
        pub enum StoreError {
            Unreachable => "store unreachable",
            Rejected { reason: String } => "rejected: {reason}",
            TooLarge { bytes: u64, limit: u64 } => "{bytes} bytes exceeds {limit}",
        }
    }

    #[rstest]
    #[case(StoreError::unreachable(), "store unreachable")]
    #[case(StoreError::rejected("bad base64"), "rejected: bad base64")]
    #[case(StoreError::rejected(String::from("empty")), "rejected: empty")]
    #[case(StoreError::too_large(2_048_u64, 1_024_u64), "2048 bytes exceeds 1024")]
    fn constructors_build_the_matching_variant(#[case] error: StoreError, #[case] text: &str) {
        assert_eq!(error.to_string(), text);
    }

    #[rstest]
    fn field_order_follows_the_declaration() {
        assert_eq!(
            StoreError::too_large(5_u64, 1_u64),
            StoreError::TooLarge { bytes: 5, limit: 1 }
        );
    }
}
