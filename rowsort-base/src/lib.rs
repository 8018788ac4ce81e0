mod error;

pub use error::{corruption_error, encoding_error, err, schema_error, Error, Result};
