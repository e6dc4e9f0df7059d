use fstore_derive::fstore_error;

#[fstore_error]
pub enum TupleError {
    Io(std::io::Error),
}

fn main() {}
