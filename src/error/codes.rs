/// Error code registry for dataproc
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration load errors
/// - 3000-3999: Configuration save errors
/// - 4000-4999: Item processing errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration load errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_UNREADABLE: u16 = 1002;
    pub const CONFIG_PARSE_ERROR: u16 = 1003;
    pub const CONFIG_EMPTY: u16 = 1004;

    // Configuration save errors (3000-3999)
    pub const SAVE_IO_ERROR: u16 = 3001;
    pub const SAVE_SERIALIZATION_ERROR: u16 = 3011;
    pub const SAVE_NO_PATH: u16 = 3013;

    // Item processing errors (4000-4999)
    pub const ITEM_TRANSFORM_FAILED: u16 = 4000;
    pub const ITEM_TIMEOUT: u16 = 4002;
    pub const ITEM_PANICKED: u16 = 4005;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1001 => "Configuration file not found",
        1002 => "Configuration file could not be read",
        1003 => "Configuration file could not be parsed",
        1004 => "Configuration file holds no settings",

        3001 => "I/O error while writing configuration",
        3011 => "Configuration could not be serialized",
        3013 => "Configuration store has no backing path",

        4000 => "Item transformation failed",
        4002 => "Item transformation timed out",
        4005 => "Item transformation panicked",

        _ => "Unknown error code",
    }
}
