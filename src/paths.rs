//! Default output locations used by the `encode` and `decode` binaries.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const COMPRESSED_EXT: &str = "bin";
const DECOMPRESSED_SUFFIX: &str = "_decompressed.txt";

/// `notes.txt` -> `notes.txt.bin`
pub fn default_compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXT);
    PathBuf::from(name)
}

/// `notes.txt.bin` -> `notes.txt_decompressed.txt`; inputs without a `.bin`
/// extension just get the suffix appended. Non-UTF-8 names pass through as-is.
pub fn default_decompressed_path(input: &Path) -> PathBuf {
    let stem = if input.extension().is_some_and(|ext| ext == COMPRESSED_EXT) {
        input.with_extension("")
    } else {
        input.to_path_buf()
    };
    let mut name = OsString::from(stem);
    name.push(DECOMPRESSED_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_path_appends_bin() {
        assert_eq!(
            default_compressed_path(Path::new("dir/notes.txt")),
            PathBuf::from("dir/notes.txt.bin")
        );
    }

    #[test]
    fn decompressed_path_replaces_bin() {
        assert_eq!(
            default_decompressed_path(Path::new("dir/notes.txt.bin")),
            PathBuf::from("dir/notes.txt_decompressed.txt")
        );
        assert_eq!(
            default_decompressed_path(Path::new("archive.huff")),
            PathBuf::from("archive.huff_decompressed.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn decompressed_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"dir/caf\xe9.txt.bin"));
        let output = default_decompressed_path(input);
        assert_eq!(
            output.as_os_str().as_bytes(),
            b"dir/caf\xe9.txt_decompressed.txt"
        );

        let compressed = default_compressed_path(Path::new(OsStr::from_bytes(b"caf\xe9")));
        assert_eq!(compressed.as_os_str().as_bytes(), b"caf\xe9.bin");
    }
}
