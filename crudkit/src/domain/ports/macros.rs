//! `define_port_error!`: declares the error enum of an outbound port.
//!
//! The enum derives `thiserror::Error` with one message per variant. An
//! inherent impl adds a snake-case constructor per variant, so adapters write
//! `RecordModelError::connection("refused")` instead of spelling out the
//! struct literal. Constructor parameters take `impl Into<FieldType>`.

macro_rules! define_port_error {
    (
        $(#[$enum_doc:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_doc:meta])*
                $variant:ident $( {
                    $( $(#[$field_doc:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$enum_doc])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_doc])*
                #[error($display)]
                $variant $( { $( $(#[$field_doc])* $field : $ty ),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@constructor $variant $( { $( $field : $ty ),* } )?); )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $( $field:ident : $ty:ty ),* }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($( $field: impl Into<$ty> ),*) -> Self {
                Self::$variant { $( $field: $field.into() ),* }
            }
        }
    };
}

pub(crate) use define_port_error;
