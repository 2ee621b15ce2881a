pub const INPUT_CHAR_LIMIT: usize = 32;
pub const DEFAULT_PLACEHOLDER: &str = "Enter a URL to ping...";

/// Placeholder text, hinting at the last host pinged when there is one.
pub fn placeholder_for(last_target: Option<&str>) -> String {
    match last_target {
        Some(target) => format!("{DEFAULT_PLACEHOLDER} (last: {target})"),
        None => DEFAULT_PLACEHOLDER.to_string(),
    }
}

/// Single-line text input with focus, in the spirit of a TUI text box.
#[derive(Debug, Clone)]
pub struct InputField {
    value: String,
    focused: bool,
    char_limit: usize,
    placeholder: String,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl InputField {
    /// A focused, empty input.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            focused: true,
            char_limit: INPUT_CHAR_LIMIT,
            placeholder: placeholder.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn reset(&mut self) {
        self.value.clear();
    }

    /// Appends `c` unless the input is full or `c` is a control character.
    pub fn insert(&mut self, c: char) {
        if c.is_control() || self.value.chars().count() >= self.char_limit {
            return;
        }
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }
}
