use fstore_derive::fstore_error;

#[fstore_error]
#[derive(Debug = "x")]
pub enum BadDeriveError {
    Missing { message: String },
}

fn main() {}
