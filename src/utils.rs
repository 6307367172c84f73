use crate::constants::{DEFAULT_HEADER_CAPACITY, DIRECTIVE_SEPARATOR};

pub(crate) trait BufferWriter {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer);
}

/// Accumulates `;`-separated directives. A directive's name is only written
/// once it emits content, so empty directives leave no trace.
#[derive(Debug)]
pub(crate) struct HeaderBuffer {
    value: String,
}

impl HeaderBuffer {
    #[inline]
    pub fn new() -> Self {
        Self {
            value: String::with_capacity(DEFAULT_HEADER_CAPACITY),
        }
    }

    #[inline]
    pub fn write<W: BufferWriter + ?Sized>(&mut self, writer: &W) -> &mut Self {
        writer.write_to_buffer(self);
        self
    }

    #[inline]
    pub fn directive(&mut self, name: &'static str) -> DirectiveWriter<'_> {
        DirectiveWriter {
            value: &mut self.value,
            name,
            started: false,
        }
    }

    #[inline]
    pub fn finish(self) -> Option<String> {
        (!self.value.is_empty()).then_some(self.value)
    }
}

pub(crate) struct DirectiveWriter<'a> {
    value: &'a mut String,
    name: &'static str,
    started: bool,
}

impl DirectiveWriter<'_> {
    #[inline]
    fn start(&mut self) {
        if !self.started {
            if !self.value.is_empty() {
                self.value.push(DIRECTIVE_SEPARATOR);
            }
            self.value.push_str(self.name);
            self.started = true;
        }
    }

    /// Writes the directive name with no value.
    #[inline]
    pub fn bare(&mut self) -> &mut Self {
        self.start();
        self
    }

    #[inline]
    pub fn token(&mut self, token: &str) -> &mut Self {
        self.start();
        self.value.push(' ');
        self.value.push_str(token);
        self
    }

    pub fn tokens<'t, I>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = &'t str>,
    {
        for token in tokens {
            self.token(token);
        }
        self
    }

    /// Writes `'<prefix><value>'` as one token.
    pub fn quoted(&mut self, prefix: &str, value: &str) -> &mut Self {
        self.start();
        self.value.reserve(prefix.len() + value.len() + 2);
        self.value.push(' ');
        self.value.push_str(prefix);
        self.value.push_str(value);
        self.value.push('\'');
        self
    }
}
