use regex::Regex;

pub struct TextExtractors {
    // Any of <br>, <br/>, </br>, in any case.
    line_break_regex: Regex,
    // First "(...)" group, e.g. the start time in "Sáng (07:00)".
    parenthesized_regex: Regex,
}

impl TextExtractors {
    pub fn new() -> anyhow::Result<Self> {
        let line_break_regex = Regex::new(r"(?i)<\s*/?\s*br\s*/?\s*>")?;
        let parenthesized_regex = Regex::new(r"\(([^)]*)\)")?;
        Ok(Self {
            line_break_regex,
            parenthesized_regex,
        })
    }

    /// The room name is whatever precedes the first line break.
    pub fn extract_room(&self, room_field: &str) -> String {
        self.line_break_regex
            .split(room_field)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    pub fn extract_display_time(&self, session_field: &str) -> String {
        self.parenthesized_regex
            .captures(session_field)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}
