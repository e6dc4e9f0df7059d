use fstore_derive::fstore_error;

#[fstore_error]
pub enum BadContextError {
    Missing { message: String, context: Option<String> },
}

fn main() {}
