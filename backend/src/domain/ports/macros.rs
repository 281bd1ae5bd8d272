//! `define_port_error!`: generates a `thiserror` enum for a port together
//! with one snake-case constructor per variant taking `impl Into<_>` fields.

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
    define_port_error! {
        pub enum SamplePortError {
            Missing { name: String } => "{name} is missing",
            Busy { attempts: u32 } => "busy after {attempts} attempts",
            Failed { message: String, attempts: u32 } => "failed: {message} ({attempts})",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        assert_eq!(SamplePortError::missing("a.txt").to_string(), "a.txt is missing");
    }

    #[test]
    fn other_fields_keep_their_type() {
        let err = SamplePortError::busy(3_u32);
        assert_eq!(err, SamplePortError::Busy { attempts: 3 });
    }

    #[test]
    fn mixed_fields_are_ordered_as_declared() {
        let err = SamplePortError::failed("disk full", 2_u32);
        assert_eq!(err.to_string(), "failed: disk full (2)");
    }
}
