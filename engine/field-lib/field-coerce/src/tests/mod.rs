
mod test_coerce;

use crate::{coerce_str, FieldType, FieldValue};
