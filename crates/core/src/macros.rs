// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Macros shared by the cim crates.

/// Name every unit variant of an enum.
///
/// Generates `as_str()` plus a `Display` impl that writes the same text.
///
/// ```ignore
/// crate::simple_display! {
///     CommitState {
///         Pending => "pending",
///         Success => "success",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $name:literal ),+ $(,)? }) => {
        impl $enum {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Consuming builder setters, expanded inside an `impl` block.
///
/// `into` fields take `impl Into<T>`, `set` fields take `T`, and `option`
/// fields are `Option<T>` set from `impl Into<T>`.
///
/// ```ignore
/// impl RunPlan {
///     cim_core::setters! {
///         into { base_ref: String }
///         set { seed: u32 }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (
        $(into { $( $into:ident : $into_ty:ty ),* $(,)? })?
        $(set { $( $set:ident : $set_ty:ty ),* $(,)? })?
        $(option { $( $opt:ident : $opt_ty:ty ),* $(,)? })?
    ) => {
        $($( $crate::setters!(@one $into, impl Into<$into_ty>, |v| v.into()); )*)?
        $($( $crate::setters!(@one $set, $set_ty, |v| v); )*)?
        $($( $crate::setters!(@one $opt, impl Into<$opt_ty>, |v| Some(v.into())); )*)?
    };
    (@one $field:ident, $arg:ty, |$v:ident| $value:expr) => {
        pub fn $field(mut self, $v: $arg) -> Self {
            self.$field = $value;
            self
        }
    };
}
