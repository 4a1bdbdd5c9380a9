#![allow(non_snake_case)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::too_long_first_doc_paragraph)]

pub mod circuits;
pub mod export;
pub mod groth16;
pub mod r1cs;
pub mod utils;
