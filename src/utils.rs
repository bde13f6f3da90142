//! # Utility Functions Module
//!
//! Helpers for building the argument vectors passed to the mozjpeg tools.
//! Arguments are `OsString`s so paths reach the tools byte for byte, non
//! UTF-8 file names included.

use std::ffi::OsString;

/// Converts any iterable of argument-like items to `Vec<OsString>`.
///
/// # Example
/// ```rust
/// use mozjpeg_optimizer::utils::to_os_string_vec;
///
/// let args = to_os_string_vec(["-quality", "80", "-outfile", "out.jpg"]);
/// assert_eq!(args[1], "80");
/// ```
pub fn to_os_string_vec<T, I>(items: I) -> Vec<OsString>
where
    T: Into<OsString>,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(Into::into).collect()
}

/// Builds an argument vector from mixed literals, strings and paths.
///
/// # Example
/// ```rust
/// use mozjpeg_optimizer::args;
/// use std::path::Path;
///
/// let args = args!["-copy", "none", Path::new("photo.jpg")];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_os_string_vec([$(::std::ffi::OsString::from($item)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_to_os_string_vec() {
        let quality = 75;
        let result = to_os_string_vec(["-quality".to_string(), quality.to_string()]);
        assert_eq!(result, vec![OsString::from("-quality"), OsString::from("75")]);
    }

    #[test]
    fn test_to_os_string_vec_empty() {
        let result: Vec<OsString> = to_os_string_vec(Vec::<&str>::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_args_macro() {
        let quality = 85;
        let out = PathBuf::from("/tmp/out.jpg");
        let result = args!["-quality", quality.to_string(), "-outfile", out.as_path()];
        assert_eq!(result, vec!["-quality", "85", "-outfile", "/tmp/out.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_args_keep_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"caf\xe9 001.jpg"));
        let result = args!["-copy", "none", path];
        assert_eq!(result[2].as_bytes(), b"caf\xe9 001.jpg");
    }
}
