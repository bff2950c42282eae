//! Stable diagnostic codes.
//!
//! Every code has the shape `<SEVERITY>_<SUBSYSTEM>_<MNEMONIC>`, where the
//! severity prefix is `E` (error), `W` (warning) or `H` (hint). Downstream
//! tooling matches on these strings, so an existing code is never renamed.

// ============ File / Encoding ============

/// A line was not valid UTF-8 and was re-decoded as Windows-1252.
pub const E_FILE_UTF8_BAD: &str = "E_FILE_UTF8_BAD";
/// A line contains control characters other than tab.
pub const W_FILE_CTRL_CHAR: &str = "W_FILE_CTRL_CHAR";
/// Reading the byte stream failed; the rest of the file is skipped.
pub const E_FILE_READ_FAIL: &str = "E_FILE_READ_FAIL";

// ============ Horizontal whitespace ============

/// Leading whitespace before a header, directive or assignment.
pub const W_WSH_BOL: &str = "W_WSH_BOL";
/// Trailing whitespace at the end of a line.
pub const W_WSH_EOL: &str = "W_WSH_EOL";
/// Control bytes in the separator after `#include`.
pub const W_WSH_CTRL: &str = "W_WSH_CTRL";
/// Separator after `#include` is not a single space.
pub const W_WSH_INCLUDE: &str = "W_WSH_INCLUDE";
/// Unexpected whitespace around `=` or `=>`.
pub const W_WSH_VARSET: &str = "W_WSH_VARSET";

// ============ Vertical whitespace ============

/// Blank lines at the beginning of a file.
pub const W_WSV_BOF: &str = "W_WSV_BOF";
/// Blank lines at the end of a file.
pub const W_WSV_EOF: &str = "W_WSV_EOF";
/// A section header is not separated from earlier content by one blank line.
pub const H_WSV_CTX_BETWEEN: &str = "H_WSV_CTX_BETWEEN";

// ============ Config structure ============

pub const E_CONF_UNPARSABLE: &str = "E_CONF_UNPARSABLE";
pub const E_CONF_CTX_UNCLOSED: &str = "E_CONF_CTX_UNCLOSED";
pub const E_CONF_CTX_EMPTY: &str = "E_CONF_CTX_EMPTY";
pub const E_CONF_CTX_TRAILING: &str = "E_CONF_CTX_TRAILING";
/// An assignment appeared before any section header.
pub const E_CONF_VAR_NO_CTX: &str = "E_CONF_VAR_NO_CTX";
pub const E_CONF_DIRECTIVE_UNKNOWN: &str = "E_CONF_DIRECTIVE_UNKNOWN";
pub const E_CONF_INCLUDE_FAIL: &str = "E_CONF_INCLUDE_FAIL";
pub const E_CONF_INCLUDE_LOOP: &str = "E_CONF_INCLUDE_LOOP";
pub const E_CONF_INCLUDE_BAD: &str = "E_CONF_INCLUDE_BAD";
pub const W_CONF_INCLUDE_QUOTES: &str = "W_CONF_INCLUDE_QUOTES";
pub const W_CONF_INCLUDE_TRAILING: &str = "W_CONF_INCLUDE_TRAILING";
pub const W_CONF_COMMENT_UNCLOSED: &str = "W_CONF_COMMENT_UNCLOSED";

// ============ Dialplan structure ============

pub const H_DP_GENERAL_MISPLACED: &str = "H_DP_GENERAL_MISPLACED";
pub const H_DP_GLOBALS_MISPLACED: &str = "H_DP_GLOBALS_MISPLACED";
pub const E_DP_KEYWORD_UNKNOWN: &str = "E_DP_KEYWORD_UNKNOWN";
pub const E_DP_SAME_NO_EXTEN: &str = "E_DP_SAME_NO_EXTEN";
pub const E_DP_STEP_INCOMPLETE: &str = "E_DP_STEP_INCOMPLETE";
pub const E_DP_EXTEN_EMPTY: &str = "E_DP_EXTEN_EMPTY";
pub const E_DP_PRIO_BAD: &str = "E_DP_PRIO_BAD";
pub const E_DP_PRIO_NO_PREV: &str = "E_DP_PRIO_NO_PREV";
pub const E_DP_PRIO_DUPE: &str = "E_DP_PRIO_DUPE";

// ============ Application calls ============

/// Whitespace between the application name and `(`.
pub const E_APP_WSH: &str = "E_APP_WSH";
/// Whitespace between the priority comma and the application name.
pub const W_APP_WSH: &str = "W_APP_WSH";
pub const W_APP_NEED_PARENS: &str = "W_APP_NEED_PARENS";
pub const E_APP_MISSING: &str = "E_APP_MISSING";
pub const E_APP_PAREN_UNCLOSED: &str = "E_APP_PAREN_UNCLOSED";
pub const E_APP_TRAILING: &str = "E_APP_TRAILING";
pub const E_APP_NO_PARENS: &str = "E_APP_NO_PARENS";
/// The application is not in the registry.
pub const H_APP_MISSING: &str = "H_APP_MISSING";
pub const E_APP_ARG_FEW: &str = "E_APP_ARG_FEW";
pub const E_APP_ARG_MANY: &str = "E_APP_ARG_MANY";
pub const E_APP_ARG_BADOPT: &str = "E_APP_ARG_BADOPT";
pub const E_APP_ARG_UNBALANCED: &str = "E_APP_ARG_UNBALANCED";
