//! Single-page browser UI served at `/ui`: ask a question, see the answer and
//! chart, browse the log, download either export.

pub const PAGE: &str = include_str!("../assets/chat.html");
