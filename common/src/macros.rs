//! Macros for building and returning [`Report`](crate::error::Report)s.
//!
//! Each macro takes the error value followed by any number of [`Display`](std::fmt::Display)-able attachments, which
//! are pushed onto the report's stack in order.

#[macro_export]
/// Wrap `$err` in a [`Report`](crate::error::Report) and push each `$attachment` onto it.
macro_rules! report_attach {
    ($err:expr $(, $($attachment:expr),+)? $(,)?) => {{
        let report = $crate::error::Report::from($err);
        $($(let report = report.attach_printable($attachment);)+)?
        report
    }};
}

#[macro_export]
/// Return early with `Err` of `$err` reported with the given `$attachment`s.
macro_rules! bail_attach {
    ($err:expr $(, $($attachment:expr),+)? $(,)?) => {
        return Err($crate::report_attach!($err $(, $($attachment),+)?))?
    };
}

#[macro_export]
/// Return early with `Err` of `$err` unless `$cond` holds.
///
/// The stringified condition is attached first, followed by the given `$attachment`s.
macro_rules! ensure_attach {
    ($cond:expr, $err:expr $(, $($attachment:expr),+)? $(,)?) => {
        if !$cond {
            $crate::bail_attach!($err, concat!("check failed: `", stringify!($cond), "`") $(, $($attachment),+)?);
        }
    };
}

#[macro_export]
/// Bind `$pat` to `$expr`, returning early with `Err` of `$err` if the pattern does not match.
///
/// The bindings introduced by `$pat` stay in scope after the macro.
macro_rules! ensure_matches_attach {
    ($expr:expr, $pat:pat, $err:expr $(, $($attachment:expr),+)? $(,)?) => {
        let $pat = $expr else {
            $crate::bail_attach!(
                $err,
                concat!("pattern `", stringify!($pat), "` did not match `", stringify!($expr), "`")
                $(, $($attachment),+)?
            );
        };
    };
}
