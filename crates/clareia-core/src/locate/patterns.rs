//! Regex patterns for markdown fences in service replies.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ```json ... ``` (tag is case-insensitive, content may start on the same line)
    pub static ref TAGGED_JSON_FENCE: Regex = Regex::new(
        r"(?s)```[ \t]*(?i:json)\b[ \t]*\r?\n?(.*?)```"
    ).unwrap();

    // ``` ... ``` with an optional language tag
    pub static ref ANY_FENCE: Regex = Regex::new(
        r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```"
    ).unwrap();

    // Residual fence markers at the edges of a candidate
    pub static ref LEADING_FENCE: Regex = Regex::new(
        r"^\s*```[A-Za-z0-9_+-]*[ \t]*\r?\n?"
    ).unwrap();

    pub static ref TRAILING_FENCE: Regex = Regex::new(
        r"\r?\n?[ \t]*```\s*$"
    ).unwrap();
}
