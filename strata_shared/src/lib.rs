mod color;

pub use color::*;

pub use byteorder;
pub use chrono;
pub use indoc;
pub use log;
pub use maplit;
pub use pathdiff;
pub use thiserror;
pub use uuid;
pub use walkdir;

/// Name of the function this macro is called in
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        &name[..name.len() - 3]
    }};
}

/// Milliseconds since the unix epoch. Used for the `last_modified` field of asset meta files.
pub fn epoch_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
