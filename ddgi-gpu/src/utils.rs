mod bit_field;

pub use self::bit_field::*;
