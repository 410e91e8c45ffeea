//! Error sinks handed to the scanner and parser.

/// Receives formatted error messages as they are found.
///
/// The scanner and parser call `report` inline and never look at what it
/// does; it exists only to display or collect messages.
pub trait Reporter {
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> Reporter for F {
    fn report(&mut self, message: &str) {
        self(message);
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {
    fn report(&mut self, _message: &str) {}
}
