//! Inputs a submission can be read from.

use core::any::type_name;
use std::io::Read;

use super::Error;

/// Anything that yields the text of one submission.
pub trait IntoSource {
    fn into_source(self) -> Result<String, Error>;
}

impl IntoSource for &str {
    fn into_source(self) -> Result<String, Error> {
        Ok(self.to_string())
    }
}

impl IntoSource for String {
    fn into_source(self) -> Result<String, Error> {
        Ok(self)
    }
}

impl IntoSource for &String {
    fn into_source(self) -> Result<String, Error> {
        Ok(self.clone())
    }
}

impl IntoSource for &[u8] {
    fn into_source(self) -> Result<String, Error> {
        core::str::from_utf8(self)
            .map(str::to_string)
            .map_err(|err| Error::input("bytes", err))
    }
}

impl IntoSource for Vec<u8> {
    fn into_source(self) -> Result<String, Error> {
        String::from_utf8(self).map_err(|err| Error::input("bytes", err))
    }
}

/// Source read to the end from any [`Read`] implementation.
///
/// # Example
///
/// ```
/// use safeparse_core::api::{Interpreter, Reader};
///
/// let file = std::io::Cursor::new("x = 1\n");
/// let mut interpreter = Interpreter::new();
/// interpreter.parse(Reader(file)).unwrap();
/// assert!(interpreter.environment().contains_key("x"));
/// ```
pub struct Reader<R>(pub R);

impl<R: Read> IntoSource for Reader<R> {
    fn into_source(mut self) -> Result<String, Error> {
        let mut text = String::new();
        self.0
            .read_to_string(&mut text)
            .map_err(|err| Error::input(short_type_name::<R>(), err))?;
        Ok(text)
    }
}

/// `type_name` without module paths, so `std::fs::File` reads as `File`.
fn short_type_name<T>() -> String {
    let full = type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '&' | '[' | ']' | ';' | '(' | ')' => {
                short.push_str(&segment);
                segment.clear();
                short.push(c);
            }
            _ => segment.push(c),
        }
    }
    short.push_str(&segment);
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::io;

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_text_sources() {
        assert_eq!("a = 1".into_source(), Ok("a = 1".to_string()));
        assert_eq!(String::from("a").into_source(), Ok("a".to_string()));
        assert_eq!((&String::from("b")).into_source(), Ok("b".to_string()));
        assert_eq!(b"c = 2".as_slice().into_source(), Ok("c = 2".to_string()));
    }

    #[test]
    fn test_reader_source() {
        let reader = Reader(io::Cursor::new(b"x = [1]\n".to_vec()));
        assert_eq!(reader.into_source(), Ok("x = [1]\n".to_string()));
    }

    #[test]
    fn test_unreadable_sources_name_their_type() {
        let err = Reader(Broken).into_source().unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Input {
                type_name: "Broken".to_string(),
                reason: "device unplugged".to_string(),
            }
        );
        assert_eq!(err.line, None);

        let err = vec![0xff, 0xfe].into_source().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Input { ref type_name, .. } if type_name == "bytes"));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<std::fs::File>(), "File");
        assert_eq!(
            short_type_name::<io::Cursor<Vec<u8>>>(),
            "Cursor<Vec<u8>>"
        );
    }
}
