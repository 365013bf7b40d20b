//! Helper macro for driven-port error enums.
//!
//! Each variant gets a snake_case constructor whose fields accept anything
//! convertible into the declared type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerPortError {
            Connection { message: String } => "ledger unavailable: {message}",
            Rejected { count: u32 } => "rejected {count} rows",
            Conflict { message: String, count: u32 } => "conflict on {message} ({count})",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = LedgerPortError::connection("pool closed");
        assert_eq!(err.to_string(), "ledger unavailable: pool closed");
    }

    #[rstest]
    fn non_string_fields_keep_their_type() {
        assert_eq!(LedgerPortError::rejected(3_u32).to_string(), "rejected 3 rows");
    }

    #[rstest]
    fn mixed_fields_build_in_declaration_order() {
        let err = LedgerPortError::conflict("user/landmark", 2_u32);
        assert_eq!(err.to_string(), "conflict on user/landmark (2)");
    }
}
