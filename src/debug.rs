//! Macros for last-resort debugging.
//!
//! Decoding errors deliberately carry little more than a message and a
//! position. When that isn’t enough to figure out why some data was
//! rejected, build with the `extra-debug` feature. The `xerr!()` macro then
//! prints a backtrace to stderr before resolving into the expression it
//! encloses. Without the feature it is a no-op.
//!
//! All decoding errors are created via [`DecodeError`]’s constructors which
//! use the macro, so there is no need to sprinkle it elsewhere:
//!
//! ```rust,ignore
//! xerr!(DecodeError { kind, msg, pos })
//! ```
//!
//! [`DecodeError`]: ../decode/struct.DecodeError.html

#[cfg(feature = "extra-debug")]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        eprintln!(
            "--- EXTRA DEBUG ---\n{}\n--- EXTRA DEBUG ---",
            std::backtrace::Backtrace::force_capture()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => { $test };
}
