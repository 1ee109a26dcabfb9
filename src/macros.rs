// Logging shims. With the `defmt` feature these forward to the defmt macros,
// otherwise they only borrow their arguments so call sites stay warning free.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Format text through [`format::printf`](crate::format::printf) with typed arguments.
///
/// Every argument is converted with [`Arg::from`](crate::format::Arg), so the
/// argument kinds follow the Rust types: `&str` for `%s`, `char` for `%c`,
/// `u8` for `%b`, `u32` for `%h`, `u64` for `%w` and signed integers or
/// `usize` for `%i`.
///
/// ```rust
/// use fwshell::printf;
///
/// let mut out: heapless::Vec<u8, 64> = heapless::Vec::new();
/// printf!(&mut out, "%s=0x%h\n", "base", 0x3f21_5040u32).unwrap();
/// assert_eq!(&out[..], b"base=0x3f215040\n");
/// ```
#[macro_export]
macro_rules! printf {
    ($out:expr, $fmt:expr $(,)?) => {
        $crate::format::printf($out, $fmt, &[])
    };
    ($out:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::format::printf($out, $fmt, &[$($crate::format::Arg::from($arg)),+])
    };
}
