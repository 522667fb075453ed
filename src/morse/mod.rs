pub mod symbol;
pub mod table;

pub use symbol::Symbol;
pub use table::{ALL_CHARS, decode_char, encode, encode_char, symbol_count};
