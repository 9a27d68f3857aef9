//! Macros for declaring flat state enums.

/// Generate a `State` implementation for a flat enum of unit variants.
///
/// The enum gets `Clone`, `Copy`, `PartialEq`, `Eq`, `Debug` and serde
/// derives; each variant's name is its identifier.
///
/// # Example
///
/// ```
/// use paged_fetch::core::State;
/// use paged_fetch::state_enum;
///
/// state_enum! {
///     pub enum Upload {
///         Pending,
///         Sent,
///         Rejected,
///     }
///     final: [Sent, Rejected]
///     error: [Rejected]
/// }
///
/// assert_eq!(Upload::Rejected.name(), "Rejected");
/// assert!(Upload::Rejected.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
