//! UTF-16 string conversion helpers
//!
//! Platform-neutral so the native callback plumbing can be exercised
//! off Windows as well.

/// Convert a Rust string to a null-terminated wide string
pub fn to_wide_null(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a wide string, stopping at the first null, to a Rust string
pub fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

/// Decode little-endian UTF-16 bytes read from another address space.
///
/// A trailing odd byte is dropped.
pub fn utf16le_bytes_to_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Convert a wide string pointer to a Rust string
///
/// # Safety
/// The pointer must be null or point to a null-terminated UTF-16 string
pub unsafe fn wide_ptr_to_string(ptr: *const u16) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }

    let slice = std::slice::from_raw_parts(ptr, len);
    Some(String::from_utf16_lossy(slice))
}

/// Extract the file name from a Windows path
pub fn extract_filename(path: &str) -> &str {
    path.rsplit(|c: char| c == '\\' || c == '/').next().unwrap_or(path)
}
