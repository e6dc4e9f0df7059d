use fstore_derive::fstore_error;
use std::borrow::Cow;

#[fstore_error]
pub enum DemoError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

fn open() -> Result<(), DemoError> {
    let missing: Result<(), std::io::Error> = Err(std::io::Error::other("disk gone"));
    missing.context("Opening demo file")
}

fn main() {
    let err = open().unwrap_err();
    assert_eq!(err.to_string(), "I/O error (Opening demo file): disk gone");

    let plain: DemoError = std::io::Error::other("boom").into();
    assert!(matches!(plain, DemoError::Io { context: None, .. }));
}
