use fstore_derive::fstore_error;
use std::borrow::Cow;

#[fstore_error]
pub enum DemoError {
    #[error("Item missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let missing: Result<(), DemoError> =
        Err(DemoError::Missing { message: "foo".into(), context: None });
    let err = missing.context("reading").unwrap_err();
    assert_eq!(err.to_string(), "Item missing (reading): foo");

    let internal: DemoError = "unexpected".into();
    assert_eq!(internal.to_string(), "Internal error: unexpected");
}
