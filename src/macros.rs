/// Build an [`Interpolated`](crate::template::Interpolated) from a template
/// literal and one argument per hole.
///
/// Hole *i* takes argument *i*. The source text of each argument is kept so
/// unnamed holes can be named after it:
///
/// ```
/// use interplog::{interpolated, template::compile};
///
/// let value = 7000;
/// let record = compile(interpolated!("Total: {,8:N}", value)).unwrap();
/// assert_eq!(record.message(), "Total: 7,000.00");
/// assert_eq!(record.template(), "Total: {value,8:N}");
/// ```
#[macro_export]
macro_rules! interpolated {
    ($template:expr $(,)?) => {
        $crate::template::Interpolated::new($template, ::std::vec::Vec::new())
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::template::Interpolated::new(
            $template,
            ::std::vec![$($crate::template::Capture::captured(::std::stringify!($arg), $arg)),+],
        )
    };
}

/// Log through a [`Logger`](crate::logging::Logger) at `level`.
///
/// Arguments are only evaluated when the level is enabled. An optional
/// `{ event_id = .., error = .. }` block configures the entry.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, { $($key:ident = $value:expr),* $(,)? }, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            let entry = logger.entry(level);
            $(let entry = entry.$key($value);)*
            entry.log($crate::interpolated!($template $(, $arg)*))
        } else {
            ::std::result::Result::Ok(())
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, $crate::interpolated!($template $(, $arg)*))
        } else {
            ::std::result::Result::Ok(())
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Trace, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Information, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Warning, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::logging::Level::Critical, $($rest)+)
    };
}

/// Open a logging scope; the returned guard closes it when dropped.
#[macro_export]
macro_rules! scope {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.begin_scope($crate::interpolated!($template $(, $arg)*))
    };
}
