use serde_json::{Map, Value};
use std::fmt::{Arguments, Display, Result, Write};

/// Wraps an output buffer with methods that write rendered values in
/// their canonical string form.
///
/// Strings are written as-is, numbers and booleans through their
/// `Display` form, null as `null`, arrays as `[a, b]`, and maps as
/// `{key: value}`.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new [`Pipe`] that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the string form of the given [`Value`] to the buffer.
    ///
    /// # Errors
    ///
    /// All `Value` types are supported, so the only error that may be
    /// returned is propagated from the [`write!`] macro itself.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => self.write_str("null"),
            Value::String(string) => self.write_str(string),
            Value::Array(array) => self.write_array(array),
            Value::Object(object) => self.write_object(object),
            _ => self.write_display(value),
        }
    }

    /// Write the value to the buffer using its `Display` implementation.
    fn write_display(&mut self, value: impl Display) -> Result {
        write!(self.buffer, "{}", value)
    }

    /// Write the value to the buffer as a comma separated list surrounded
    /// by square brackets.
    fn write_array(&mut self, value: &[Value]) -> Result {
        write!(self.buffer, "[")?;
        let mut iter = value.iter();
        if let Some(item) = iter.next() {
            self.write_value(item)?;
            for item in iter {
                write!(self.buffer, ", ")?;
                self.write_value(item)?;
            }
        }
        write!(self.buffer, "]")
    }

    /// Write the value to the buffer as key/value pairs surrounded by
    /// curly braces.
    fn write_object(&mut self, value: &Map<String, Value>) -> Result {
        write!(self.buffer, "{{")?;
        let mut iter = value.iter();
        if let Some((key, item)) = iter.next() {
            write!(self.buffer, "{}: ", key)?;
            self.write_value(item)?;
            for (key, item) in iter {
                write!(self.buffer, ", {}: ", key)?;
                self.write_value(item)?;
            }
        }
        write!(self.buffer, "}}")
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}

#[cfg(test)]
mod tests {
    use super::Pipe;
    use serde_json::json;

    #[test]
    fn test_write_scalars() {
        assert_eq!(write(&json!("text")), "text");
        assert_eq!(write(&json!(10)), "10");
        assert_eq!(write(&json!(true)), "true");
        assert_eq!(write(&json!(null)), "null");
    }

    #[test]
    fn test_write_array() {
        assert_eq!(write(&json!([1, "two", [3]])), "[1, two, [3]]");
        assert_eq!(write(&json!([])), "[]");
    }

    #[test]
    fn test_write_object() {
        assert_eq!(write(&json!({"one": 1, "two": 2})), "{one: 1, two: 2}");
    }

    /// Write the given value through a Pipe and return the output.
    fn write(value: &serde_json::Value) -> String {
        let mut buffer = String::new();
        Pipe::new(&mut buffer).write_value(value).unwrap();

        buffer
    }
}
